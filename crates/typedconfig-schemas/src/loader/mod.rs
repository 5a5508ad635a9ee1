//! Document loading and merging functionality
//!
//! This module provides:
//! - YAML and JSON parsing into ordered JSON values
//! - Serialization back to YAML or JSON files
//! - Recursive merging of several rule documents
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use typedconfig_schemas::loader::SchemaParser;
//! use std::path::Path;
//!
//! let parser = SchemaParser::new();
//! let rules = parser.parse_file(Path::new("rules.yaml"))?;
//! println!("Loaded rules: {}", serde_json::to_string_pretty(&rules)?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Copyright (c) 2025 TypedConfig Team
//! Licensed under the Apache-2.0 license

pub mod error;
pub mod merge;
pub mod parser;

pub use error::{LoaderError, LoaderResult};
pub use merge::{load_merged, merge_documents};
pub use parser::{Format, SchemaParser};
