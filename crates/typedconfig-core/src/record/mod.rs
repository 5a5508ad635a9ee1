//! Synthesized record types and their instances
//!
//! Copyright (c) 2025 TypedConfig Team
//! Licensed under the Apache-2.0 license

pub mod error;
pub mod instance;
pub mod types;

pub use error::{ValidationError, ValidationErrors};
pub use instance::{FieldValue, Record};
pub use types::{Capability, FieldSpec, FieldType, RecordType};
