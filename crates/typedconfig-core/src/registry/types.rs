//! Field type registry
//!
//! Type names in rule documents resolve to [`TypeFactory`] objects. A
//! factory produces a [`ValueType`], which checks one configuration value.
//!
//! Copyright (c) 2025 TypedConfig Team
//! Licensed under the Apache-2.0 license

use anyhow::bail;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A concrete field type
pub trait ValueType: fmt::Debug + Send + Sync {
    /// Registry name the type was built from
    fn name(&self) -> &str;

    /// Check a value, returning the accepted (possibly normalized) value
    fn check(&self, value: &Value) -> Result<Value, String>;

    /// Human-readable description including any constraints
    fn describe(&self) -> String {
        self.name().to_string()
    }
}

/// Context handed to type factories
#[derive(Debug, Clone, Copy, Default)]
pub struct FactoryContext<'a> {
    /// Directory relative configuration file paths resolve against
    pub confdir: Option<&'a Path>,
}

/// Builds field types from a name plus optional options
///
/// `opts` sequences reach [`with_params`](TypeFactory::with_params),
/// mappings reach [`with_kwargs`](TypeFactory::with_kwargs). Factories that
/// take no options keep the default implementations, which reject them.
pub trait TypeFactory: Send + Sync {
    fn bare(&self, ctx: FactoryContext<'_>) -> anyhow::Result<Arc<dyn ValueType>>;

    fn with_params(
        &self,
        ctx: FactoryContext<'_>,
        params: &[Value],
    ) -> anyhow::Result<Arc<dyn ValueType>> {
        let _ = (ctx, params);
        bail!("type does not accept positional options")
    }

    fn with_kwargs(
        &self,
        ctx: FactoryContext<'_>,
        kwargs: &Map<String, Value>,
    ) -> anyhow::Result<Arc<dyn ValueType>> {
        let _ = (ctx, kwargs);
        bail!("type does not accept keyword options")
    }
}

/// Name to factory map for field types
#[derive(Default, Clone)]
pub struct TypeRegistry {
    factories: HashMap<String, Arc<dyn TypeFactory>>,
    confdir: Option<PathBuf>,
}

impl TypeRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory, returning the one it replaces
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F) -> Option<Arc<dyn TypeFactory>>
    where
        F: TypeFactory + 'static,
    {
        self.factories.insert(name.into(), Arc::new(factory))
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn TypeFactory>> {
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

    /// Set the directory `ConfFilePath` values are resolved against
    pub fn set_confdir(&mut self, confdir: impl Into<PathBuf>) {
        self.confdir = Some(confdir.into());
    }

    pub fn confdir(&self) -> Option<&Path> {
        self.confdir.as_deref()
    }

    pub fn context(&self) -> FactoryContext<'_> {
        FactoryContext {
            confdir: self.confdir(),
        }
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("types", &self.names())
            .field("confdir", &self.confdir)
            .finish()
    }
}
