//! Interpretation of leaf specs and branches
//!
//! An [`Interpreter`] turns the declarations found at one node into a
//! [`ResolvedRule`]: the field type, the validators the node declares and
//! the pass-through keys. Leaves and branches produce the same shape, so
//! the fold can treat a resolved branch like any other field.
//!
//! Copyright (c) 2025 TypedConfig Team
//! Licensed under the Apache-2.0 license

pub mod branch;
pub mod leaf;

use crate::error::{Error, OptsPolicy, Result, SchemaWarning};
use crate::record::FieldType;
use crate::registry::{TypeRegistry, ValidatorBinding, ValidatorOptions, ValidatorRegistry};
use crate::tree::NodePath;
use anyhow::anyhow;
use serde_json::{Map, Value};

/// Declarations of one node, resolved against the registries
#[derive(Debug, Clone, Default)]
pub struct ResolvedRule {
    /// Field type; `None` when a leaf declares no `type`
    pub ty: Option<FieldType>,
    /// Validators declared at this node
    pub validators: Vec<ValidatorBinding>,
    pub default: Option<Value>,
    pub doc: Option<String>,
    pub id: Option<Value>,
}

impl ResolvedRule {
    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }
}

/// Which kind of node a declaration belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NodeKind {
    Leaf,
    Branch,
}

impl NodeKind {
    pub(crate) fn malformed(self, path: &NodePath, reason: impl Into<String>) -> Error {
        let path = path.clone();
        let reason = reason.into();
        match self {
            NodeKind::Leaf => Error::MalformedLeaf { path, reason },
            NodeKind::Branch => Error::MalformedBranch { path, reason },
        }
    }
}

/// Resolves node declarations, collecting warnings along the way
pub struct Interpreter<'a> {
    types: &'a TypeRegistry,
    validators: &'a ValidatorRegistry,
    policy: OptsPolicy,
    warnings: Vec<SchemaWarning>,
}

impl<'a> Interpreter<'a> {
    pub fn new(types: &'a TypeRegistry, validators: &'a ValidatorRegistry, policy: OptsPolicy) -> Self {
        Self {
            types,
            validators,
            policy,
            warnings: Vec::new(),
        }
    }

    pub fn warnings(&self) -> &[SchemaWarning] {
        &self.warnings
    }

    pub fn into_warnings(self) -> Vec<SchemaWarning> {
        self.warnings
    }

    /// Build the validator a node declares, if any
    ///
    /// The target is the node's own key, or `""` when `root_validator` is
    /// truthy. At the document root the target is always `""`.
    pub(crate) fn resolve_validator(
        &self,
        path: &NodePath,
        declaration: &Map<String, Value>,
        kind: NodeKind,
    ) -> Result<Option<ValidatorBinding>> {
        let name = match declaration.get("validator") {
            None | Some(Value::Null) => return Ok(None),
            Some(Value::String(name)) => name.clone(),
            Some(other) => {
                return Err(kind.malformed(path, format!("validator must be a name, got {}", other)))
            }
        };

        let factory = self
            .validators
            .get(&name)
            .ok_or_else(|| Error::UnknownValidator {
                name: name.clone(),
                path: path.clone(),
            })?;

        let is_root = declaration.get("root_validator").is_some_and(is_truthy);
        let target = if is_root { String::new() } else { path.field_name() };

        let construction = |source: anyhow::Error| Error::ValidatorConstruction {
            name: name.clone(),
            path: path.clone(),
            source,
        };

        let options = ValidatorOptions::from_value(declaration.get("validator_opts")).map_err(construction)?;
        let params = match declaration.get("validator_params") {
            None | Some(Value::Null) => Map::new(),
            Some(Value::Object(params)) => params.clone(),
            Some(other) => {
                return Err(construction(anyhow!("validator_params must be a mapping, got {}", other)))
            }
        };

        let validator = factory.build(&target, &options, &params).map_err(construction)?;
        Ok(Some(ValidatorBinding {
            name,
            target,
            options,
            params,
            validator,
        }))
    }

    /// Copy `default`, `doc` and `id` into the rule
    pub(crate) fn pass_through(
        path: &NodePath,
        declaration: &Map<String, Value>,
        kind: NodeKind,
        rule: &mut ResolvedRule,
    ) -> Result<()> {
        rule.default = declaration.get("default").cloned();
        rule.doc = match declaration.get("doc") {
            None | Some(Value::Null) => None,
            Some(Value::String(doc)) => Some(doc.clone()),
            Some(other) => return Err(kind.malformed(path, format!("doc must be a string, got {}", other))),
        };
        rule.id = declaration.get("id").filter(|id| !id.is_null()).cloned();
        Ok(())
    }
}

/// Null, `false`, zero and empty strings or collections are false
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}
