//! Error types and handling for the CLI
//!
//! This module provides error types and utilities for handling
//! various failure modes in the CLI application.

use std::io;
use std::path::PathBuf;
use typedconfig_schemas::LoaderError;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for CLI operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error (file operations, etc.)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Error from typedconfig-core while synthesizing or reading
    #[error("{0}")]
    Core(#[from] typedconfig_core::Error),

    /// File not found
    #[error("File not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// Rule or configuration file could not be loaded
    #[error("{0}")]
    Loader(#[from] LoaderError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// The configuration file did not validate
    #[error("Validation failed with {count} error(s)")]
    ValidationFailed { count: usize },

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Generic error with context
    #[error("{message}")]
    Other { message: String },
}

impl Error {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a generic error with message
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Io(_) => 1,
            Self::Core(_) => 2,
            Self::FileNotFound { .. } => 3,
            Self::Loader(_) => 4,
            Self::Config(_) => 5,
            Self::ValidationFailed { .. } => 6,
            Self::Json(_) => 12,
            Self::Yaml(_) => 13,
            Self::Other { .. } => 99,
        }
    }
}

/// Format an error for display to the user
pub fn format_error(error: &Error, use_color: bool) -> String {
    if use_color {
        use colored::Colorize;
        format!("{} {}", "Error:".red().bold(), error)
    } else {
        format!("Error: {}", error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use typedconfig_core::NodePath;

    #[test]
    fn test_exit_codes_are_distinct_per_kind() {
        let errors = [
            Error::from(io::Error::new(io::ErrorKind::Other, "boom")),
            Error::from(typedconfig_core::Error::UnknownType {
                name: "Imaginary".to_string(),
                path: NodePath::from_keys(&["a"]),
            }),
            Error::FileNotFound { path: PathBuf::from("missing.yaml") },
            Error::from(LoaderError::unsupported_format(PathBuf::from("rules.txt"))),
            Error::config("bad"),
            Error::ValidationFailed { count: 2 },
        ];
        let codes: Vec<i32> = errors.iter().map(Error::exit_code).collect();
        assert_eq!(codes, [1, 2, 3, 4, 5, 6]);
        assert_eq!(Error::other("x").exit_code(), 99);
    }

    #[test]
    fn test_format_error_without_color() {
        let error = Error::ValidationFailed { count: 3 };
        assert_eq!(format_error(&error, false), "Error: Validation failed with 3 error(s)");
    }
}
