//! Default catalogue of types and validators
//!
//! Copyright (c) 2025 TypedConfig Team
//! Licensed under the Apache-2.0 license

pub mod types;
pub mod validators;

use crate::registry::{RegistryPlugin, TypeRegistry, ValidatorRegistry};

/// Plugin registering the built-in types and validators
#[derive(Debug, Clone, Copy, Default)]
pub struct Builtins;

impl RegistryPlugin for Builtins {
    fn register(&self, types: &mut TypeRegistry, validators: &mut ValidatorRegistry) {
        types::register_all(types);
        validators::register_all(validators);
    }
}
