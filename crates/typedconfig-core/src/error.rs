//! Error types for the TypedConfig core library
//!
//! This module defines the error handling for type synthesis and instance
//! construction, using thiserror for the error definitions and anyhow for
//! the open-ended failures reported by registry factories.
//!
//! Copyright (c) 2025 TypedConfig Team
//! Licensed under the Apache-2.0 license

use crate::record::{Capability, ValidationErrors};
use crate::tree::NodePath;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use typedconfig_schemas::LoaderError;

/// Main error type for TypedConfig operations
#[derive(Error, Debug)]
pub enum Error {
    /// A `type` name that the type registry does not know
    #[error("Unknown type '{name}' at '{path}'")]
    UnknownType { name: String, path: NodePath },

    /// A `validator` name that the validator registry does not know
    #[error("Unknown validator '{name}' at '{path}'")]
    UnknownValidator { name: String, path: NodePath },

    /// The type factory rejected its options
    #[error("Failed to construct type '{name}' at '{path}': {source}")]
    TypeConstruction {
        name: String,
        path: NodePath,
        #[source]
        source: anyhow::Error,
    },

    /// The validator factory rejected its options or parameters
    #[error("Failed to build validator '{name}' at '{path}': {source}")]
    ValidatorConstruction {
        name: String,
        path: NodePath,
        #[source]
        source: anyhow::Error,
    },

    /// `opts` was neither a sequence nor a mapping and the policy denies it
    #[error("Ambiguous option for type '{name}' at '{path}': {opts}")]
    AmbiguousOpts {
        name: String,
        path: NodePath,
        opts: String,
    },

    /// A leaf node that is not a usable leaf spec
    #[error("Malformed leaf at '{path}': {reason}")]
    MalformedLeaf { path: NodePath, reason: String },

    /// A branch node that is not a usable branch mapping
    #[error("Malformed branch at '{path}': {reason}")]
    MalformedBranch { path: NodePath, reason: String },

    /// A field reached type synthesis without a resolved type
    #[error("Field '{field}' of '{record}' has no resolved type")]
    UnresolvedType { record: String, field: String },

    /// An I/O operation on a record type that does not carry it
    #[error("Record type '{record}' does not provide the {capability} capability")]
    MissingCapability {
        record: String,
        capability: Capability,
    },

    /// Instance construction failed
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    /// Reading or writing a document failed
    #[error("Document error: {0}")]
    Loader(#[from] LoaderError),

    /// Broken internal invariant
    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Check if this error comes from a registry lookup
    pub fn is_lookup_failure(&self) -> bool {
        matches!(
            self,
            Self::UnknownType { .. } | Self::UnknownValidator { .. }
        )
    }
}

/// How to treat an `opts` value that is neither a sequence nor a mapping
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptsPolicy {
    /// Drop the option, use the bare type and record a warning
    #[default]
    Warn,
    /// Fail the synthesis
    Deny,
}

impl fmt::Display for OptsPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptsPolicy::Warn => write!(f, "warn"),
            OptsPolicy::Deny => write!(f, "deny"),
        }
    }
}

/// A non-fatal problem found while synthesizing a type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaWarning {
    /// Node the warning is about
    pub path: String,
    /// Human-readable message
    pub message: String,
}

impl SchemaWarning {
    pub fn new(path: &NodePath, message: impl Into<String>) -> Self {
        Self {
            path: path.to_string(),
            message: message.into(),
        }
    }
}

impl fmt::Display for SchemaWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_failure_classification() {
        let path = NodePath::from_keys(&["run", "mode"]);
        let err = Error::UnknownType {
            name: "NoSuchType".to_string(),
            path: path.clone(),
        };
        assert!(err.is_lookup_failure());
        assert!(err.to_string().contains("NoSuchType"));
        assert!(err.to_string().contains("run.mode"));

        let err = Error::MalformedLeaf {
            path,
            reason: "not a mapping".to_string(),
        };
        assert!(!err.is_lookup_failure());
    }

    #[test]
    fn test_opts_policy_serde() {
        let policy: OptsPolicy = serde_json::from_str("\"deny\"").unwrap();
        assert_eq!(policy, OptsPolicy::Deny);
        assert_eq!(OptsPolicy::default(), OptsPolicy::Warn);
        assert_eq!(OptsPolicy::Warn.to_string(), "warn");
    }

    #[test]
    fn test_warning_display() {
        let warning = SchemaWarning::new(&NodePath::from_keys(&["a", "b"]), "ambiguous option ignored: 3");
        assert_eq!(warning.to_string(), "a.b: ambiguous option ignored: 3");
    }
}
