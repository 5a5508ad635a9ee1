//! TypedConfig Schemas - rule and configuration document loading
//!
//! This crate is the document source for TypedConfig. It turns YAML and
//! JSON files into `serde_json::Value` documents (mapping key order is
//! preserved) and writes documents back out. It does not interpret the
//! rules; that is the job of `typedconfig-core`.
//!
//! ## Features
//!
//! - **Format detection**: `.yaml`, `.yml` and `.json` by extension
//! - **Fallback parsing**: JSON first, then YAML, for unknown extensions
//! - **Rule merging**: several rule files merged into one document, later
//!   files overriding earlier ones key by key
//!
//! ## Quick Start
//!
//! ```rust
//! use serde_json::json;
//! use typedconfig_schemas::merge_documents;
//!
//! let base = json!({"run": {"mode": {"type": "str"}}});
//! let extra = json!({"run": {"eff": {"type": "float"}}});
//!
//! let merged = merge_documents(&[base, extra]);
//! assert!(merged["run"]["mode"].is_object());
//! assert!(merged["run"]["eff"].is_object());
//! ```
//!
//! Copyright (c) 2025 TypedConfig Team
//! Licensed under the Apache-2.0 license

pub mod loader;

pub use loader::{
    load_merged, merge_documents, Format, LoaderError, LoaderResult, SchemaParser,
};
