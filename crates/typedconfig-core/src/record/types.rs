//! Runtime record descriptors
//!
//! A [`RecordType`] is the composite type produced by synthesis: an
//! ordered list of fields, the validators installed on them and the
//! capabilities the type carries. It is cheap to clone and shared freely
//! between threads.
//!
//! Copyright (c) 2025 TypedConfig Team
//! Licensed under the Apache-2.0 license

use crate::error::{Error, Result};
use crate::registry::{ValidatorBinding, ValueType};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fmt;
use std::sync::Arc;

/// Optional behaviour attached to a record type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Capability {
    /// Reading from and writing to YAML/JSON documents
    Io,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::Io => write!(f, "I/O"),
        }
    }
}

/// Type of one field: a checked scalar or a nested record
#[derive(Debug, Clone)]
pub enum FieldType {
    Scalar(Arc<dyn ValueType>),
    Record(RecordType),
}

impl FieldType {
    pub fn describe(&self) -> String {
        match self {
            FieldType::Scalar(ty) => ty.describe(),
            FieldType::Record(record) => record.name().to_string(),
        }
    }

    pub fn as_record(&self) -> Option<&RecordType> {
        match self {
            FieldType::Record(record) => Some(record),
            FieldType::Scalar(_) => None,
        }
    }
}

/// A resolved field
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: String,
    pub ty: FieldType,
    pub default: Option<Value>,
    pub doc: Option<String>,
    pub id: Option<Value>,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, ty: FieldType) -> Self {
        Self {
            name: name.into(),
            ty,
            default: None,
            doc: None,
            id: None,
        }
    }

    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    pub fn is_required(&self) -> bool {
        self.default.is_none()
    }
}

struct RecordInner {
    name: String,
    fields: Vec<FieldSpec>,
    declaration_order: Vec<String>,
    validators: Vec<ValidatorBinding>,
    capabilities: Vec<Capability>,
}

/// Composite type built from a branch of the rule document
#[derive(Clone)]
pub struct RecordType {
    inner: Arc<RecordInner>,
}

impl RecordType {
    /// Build a record type with fields in the given order
    ///
    /// Every binding is installed, so one validator name may check several
    /// fields; a binding with an empty target checks the whole record.
    pub fn new(
        name: impl Into<String>,
        fields: Vec<FieldSpec>,
        validators: Vec<ValidatorBinding>,
        capabilities: &[Capability],
    ) -> Result<Self> {
        let declaration_order = fields.iter().map(|field| field.name.clone()).collect();
        Self::from_parts(name.into(), fields, declaration_order, validators, capabilities)
    }

    pub(crate) fn from_parts(
        name: String,
        fields: Vec<FieldSpec>,
        declaration_order: Vec<String>,
        validators: Vec<ValidatorBinding>,
        capabilities: &[Capability],
    ) -> Result<Self> {
        for binding in &validators {
            if !binding.is_root() && !fields.iter().any(|field| field.name == binding.target) {
                return Err(Error::internal(format!(
                    "validator '{}' of '{}' targets unknown field '{}'",
                    binding.name, name, binding.target
                )));
            }
        }

        let mut unique = Vec::new();
        for capability in capabilities {
            if !unique.contains(capability) {
                unique.push(*capability);
            }
        }

        Ok(Self {
            inner: Arc::new(RecordInner {
                name,
                fields,
                declaration_order,
                validators,
                capabilities: unique,
            }),
        })
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Fields in construction order: required first, then defaulted
    pub fn fields(&self) -> &[FieldSpec] {
        &self.inner.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.inner.fields.iter().find(|field| field.name == name)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.inner.fields.iter().map(|field| field.name.as_str())
    }

    /// Field names in the order the rule document declared them
    pub fn declaration_order(&self) -> &[String] {
        &self.inner.declaration_order
    }

    /// All installed validators
    pub fn validators(&self) -> &[ValidatorBinding] {
        &self.inner.validators
    }

    /// First validator installed under `name`
    pub fn validator(&self, name: &str) -> Option<&ValidatorBinding> {
        self.inner.validators.iter().find(|binding| binding.name == name)
    }

    /// Every validator installed under `name`, one per target
    pub fn validators_named<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = &'a ValidatorBinding> + 'a {
        self.inner
            .validators
            .iter()
            .filter(move |binding| binding.name == name)
    }

    /// Validators checking the whole record
    pub fn root_validators(&self) -> impl Iterator<Item = &ValidatorBinding> {
        self.inner.validators.iter().filter(|binding| binding.is_root())
    }

    /// Validators checking one field
    pub fn field_validators<'a>(
        &'a self,
        field: &'a str,
    ) -> impl Iterator<Item = &'a ValidatorBinding> + 'a {
        self.inner
            .validators
            .iter()
            .filter(move |binding| !binding.is_root() && binding.target == field)
    }

    pub fn capabilities(&self) -> &[Capability] {
        &self.inner.capabilities
    }

    pub fn has_capability(&self, capability: Capability) -> bool {
        self.inner.capabilities.contains(&capability)
    }

    pub(crate) fn require(&self, capability: Capability) -> Result<()> {
        if self.has_capability(capability) {
            Ok(())
        } else {
            Err(Error::MissingCapability {
                record: self.name().to_string(),
                capability,
            })
        }
    }

    /// Machine-readable description of the type, nested records included
    pub fn schema(&self) -> Value {
        let fields: Vec<Value> = self
            .fields()
            .iter()
            .map(|field| {
                let mut entry = Map::new();
                entry.insert("name".to_string(), json!(field.name));
                entry.insert("type".to_string(), json!(field.ty.describe()));
                entry.insert("required".to_string(), json!(field.is_required()));
                if let Some(default) = &field.default {
                    entry.insert("default".to_string(), default.clone());
                }
                if let Some(doc) = &field.doc {
                    entry.insert("doc".to_string(), json!(doc));
                }
                if let Some(id) = &field.id {
                    entry.insert("id".to_string(), id.clone());
                }
                if let FieldType::Record(record) = &field.ty {
                    entry.insert("record".to_string(), record.schema());
                }
                Value::Object(entry)
            })
            .collect();

        let validators: Vec<Value> = self
            .validators()
            .iter()
            .map(|binding| {
                json!({
                    "name": binding.name,
                    "target": binding.target,
                    "pre": binding.options.pre,
                    "always": binding.options.always,
                    "params": binding.params,
                })
            })
            .collect();

        json!({
            "name": self.name(),
            "capabilities": self.capabilities(),
            "fields": fields,
            "validators": validators,
        })
    }
}

impl fmt::Debug for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordType")
            .field("name", &self.inner.name)
            .field("fields", &self.inner.fields)
            .field("validators", &self.inner.validators)
            .field("capabilities", &self.inner.capabilities)
            .finish()
    }
}
