//! Validator registry
//!
//! Copyright (c) 2025 TypedConfig Team
//! Licensed under the Apache-2.0 license

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// When a validator runs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValidatorOptions {
    /// Run on the raw input before the type check
    pub pre: bool,
    /// Run even when the value came from the field default
    pub always: bool,
}

impl ValidatorOptions {
    /// Read options from a `validator_opts` value; `null` means defaults
    pub fn from_value(value: Option<&Value>) -> anyhow::Result<Self> {
        match value {
            None | Some(Value::Null) => Ok(Self::default()),
            Some(value) => Ok(Self::deserialize(value)?),
        }
    }
}

/// A check on one field or on a whole record
///
/// Field validators get the field value as `subject` and the already
/// validated earlier fields as `values`. Whole-record validators get the
/// record mapping as both.
pub trait Validator: Send + Sync {
    fn validate(&self, subject: &Value, values: &Map<String, Value>) -> Result<(), String>;
}

impl<F> Validator for F
where
    F: Fn(&Value, &Map<String, Value>) -> Result<(), String> + Send + Sync,
{
    fn validate(&self, subject: &Value, values: &Map<String, Value>) -> Result<(), String> {
        self(subject, values)
    }
}

/// Builds a validator bound to a target key
///
/// The target is the field key, or `""` for a whole-record validator.
pub trait ValidatorFactory: Send + Sync {
    fn build(
        &self,
        target: &str,
        options: &ValidatorOptions,
        params: &Map<String, Value>,
    ) -> anyhow::Result<Arc<dyn Validator>>;
}

impl<F> ValidatorFactory for F
where
    F: Fn(&str, &ValidatorOptions, &Map<String, Value>) -> anyhow::Result<Arc<dyn Validator>>
        + Send
        + Sync,
{
    fn build(
        &self,
        target: &str,
        options: &ValidatorOptions,
        params: &Map<String, Value>,
    ) -> anyhow::Result<Arc<dyn Validator>> {
        self(target, options, params)
    }
}

/// A validator installed under its declared name
#[derive(Clone)]
pub struct ValidatorBinding {
    /// Declared validator name
    pub name: String,
    /// Target field, `""` for the whole record
    pub target: String,
    pub options: ValidatorOptions,
    pub params: Map<String, Value>,
    pub validator: Arc<dyn Validator>,
}

impl ValidatorBinding {
    pub fn is_root(&self) -> bool {
        self.target.is_empty()
    }

    pub fn run(&self, subject: &Value, values: &Map<String, Value>) -> Result<(), String> {
        self.validator.validate(subject, values)
    }
}

impl fmt::Debug for ValidatorBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatorBinding")
            .field("name", &self.name)
            .field("target", &self.target)
            .field("options", &self.options)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

/// Name to factory map for validators
#[derive(Default, Clone)]
pub struct ValidatorRegistry {
    factories: HashMap<String, Arc<dyn ValidatorFactory>>,
}

impl ValidatorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory, returning the one it replaces
    pub fn register<F>(
        &mut self,
        name: impl Into<String>,
        factory: F,
    ) -> Option<Arc<dyn ValidatorFactory>>
    where
        F: ValidatorFactory + 'static,
    {
        self.factories.insert(name.into(), Arc::new(factory))
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn ValidatorFactory>> {
        self.factories.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl fmt::Debug for ValidatorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatorRegistry")
            .field("validators", &self.names())
            .finish()
    }
}
