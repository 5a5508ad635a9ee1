//! TypedConfig Core - configuration types synthesized from rule documents
//!
//! This crate reads a nested rule document, finds the configurable items in
//! it and folds them bottom-up into one record type that validates and holds
//! user configuration.
//!
//! # Main Components
//!
//! - **Tree**: path classification and the leaf/branch partition
//! - **Registries**: named field types and validators, filled by plugins
//! - **Interpreters**: resolve the declarations of leaves and branches
//! - **Synthesis**: build record types, defaulted fields last
//! - **Records**: construct and validate instances, read and write them
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use typedconfig_core::{get_config_type, Result};
//!
//! fn example() -> Result<()> {
//!     let rules = json!({
//!         "run": {
//!             "mode": {"type": "Literal", "opts": ["quiet", "verbose"]},
//!             "eff": {"type": "confloat", "opts": {"gt": 0, "lt": 1}},
//!         }
//!     });
//!
//!     let config_t = get_config_type(&rules)?;
//!     let config = config_t.from_document(&json!({"run": {"mode": "quiet", "eff": 0.3}}))?;
//!     assert_eq!(config.lookup("run.mode").map(|v| v.to_value()), Some(json!("quiet")));
//!     Ok(())
//! }
//! # example().unwrap();
//! ```
//!
//! Copyright (c) 2025 TypedConfig Team
//! Licensed under the Apache-2.0 license

pub mod builtin;
pub mod error;
pub mod fold;
pub mod interpret;
pub mod record;
pub mod registry;
pub mod synth;
pub mod tree;

// Re-export main types for convenience
pub use builtin::Builtins;
pub use error::{Error, OptsPolicy, Result, SchemaWarning};
pub use fold::{get_config_type, BuildOptions, Synthesis, TypeBuilder};
pub use interpret::{Interpreter, ResolvedRule};
pub use record::{
    Capability, FieldSpec, FieldType, FieldValue, Record, RecordType, ValidationError,
    ValidationErrors,
};
pub use registry::{
    FactoryContext, RegistryPlugin, TypeFactory, TypeRegistry, Validator, ValidatorBinding,
    ValidatorFactory, ValidatorOptions, ValidatorRegistry, ValueType,
};
pub use synth::synthesize;
pub use tree::{branches, classify, is_node, leaves, NodePath, PathKey, RESERVED_KEYS};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
