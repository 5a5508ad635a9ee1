//! Type and validator registries
//!
//! Rule documents refer to types and validators by name. Names are looked
//! up in two registries, which are filled explicitly by
//! [`RegistryPlugin`]s before synthesis starts.
//!
//! Copyright (c) 2025 TypedConfig Team
//! Licensed under the Apache-2.0 license

pub mod types;
pub mod validators;

pub use types::{FactoryContext, TypeFactory, TypeRegistry, ValueType};
pub use validators::{
    Validator, ValidatorBinding, ValidatorFactory, ValidatorOptions, ValidatorRegistry,
};

/// A bundle of types and validators added to the registries in one step
pub trait RegistryPlugin {
    fn register(&self, types: &mut TypeRegistry, validators: &mut ValidatorRegistry);
}
