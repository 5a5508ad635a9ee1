//! Errors collected while constructing a record instance
//!
//! Copyright (c) 2025 TypedConfig Team
//! Licensed under the Apache-2.0 license

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// One failed check, located by a `$.a.b` style path
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub struct ValidationError {
    /// Location of the offending value
    pub path: String,
    /// Human-readable error message
    pub message: String,
    /// Validator that reported the failure, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule: Option<String>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.rule {
            Some(rule) => write!(f, "{} [{}]: {}", self.path, rule, self.message),
            None => write!(f, "{}: {}", self.path, self.message),
        }
    }
}

impl ValidationError {
    pub fn new<P, M>(path: P, message: M) -> Self
    where
        P: Into<String>,
        M: Into<String>,
    {
        Self {
            path: path.into(),
            message: message.into(),
            rule: None,
        }
    }

    /// Attribute the failure to a named validator
    pub fn with_rule(mut self, rule: impl Into<String>) -> Self {
        self.rule = Some(rule.into());
        self
    }
}

/// Every failure found while constructing one record
#[derive(Debug, Clone, Default, PartialEq, Eq, Error, Serialize, Deserialize)]
pub struct ValidationErrors {
    pub errors: Vec<ValidationError>,
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} validation error(s):", self.errors.len())?;
        for (i, error) in self.errors.iter().enumerate() {
            write!(f, "\n{}. {}", i + 1, error)?;
        }
        Ok(())
    }
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Move all errors of another collection into this one
    pub fn extend(&mut self, other: ValidationErrors) {
        self.errors.extend(other.errors);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.errors.iter()
    }

    /// Ok if no errors, Err if any errors exist
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl From<ValidationError> for ValidationErrors {
    fn from(error: ValidationError) -> Self {
        Self {
            errors: vec![error],
        }
    }
}

/// Location of the value currently being checked
#[derive(Debug, Clone)]
pub(crate) struct FieldPath {
    path: String,
}

impl FieldPath {
    pub(crate) fn root() -> Self {
        Self {
            path: "$".to_string(),
        }
    }

    pub(crate) fn child(&self, key: &str) -> Self {
        Self {
            path: format!("{}.{}", self.path, key),
        }
    }

    pub(crate) fn as_str(&self) -> &str {
        &self.path
    }

    pub(crate) fn error(&self, message: impl Into<String>) -> ValidationError {
        ValidationError::new(self.path.clone(), message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_path() {
        let root = FieldPath::root();
        assert_eq!(root.as_str(), "$");
        assert_eq!(root.child("top").child("first").as_str(), "$.top.first");
    }

    #[test]
    fn test_display_numbers_errors() {
        let mut errors = ValidationErrors::new();
        errors.add(ValidationError::new("$.a", "field required"));
        errors.add(ValidationError::new("$.b", "above threshold: 6 > 5").with_rule("threshold"));

        let text = errors.to_string();
        assert!(text.starts_with("2 validation error(s):"));
        assert!(text.contains("1. $.a: field required"));
        assert!(text.contains("2. $.b [threshold]: above threshold: 6 > 5"));
    }

    #[test]
    fn test_into_result() {
        assert!(ValidationErrors::new().into_result().is_ok());
        let errors: ValidationErrors = ValidationError::new("$", "bad").into();
        assert_eq!(errors.into_result().unwrap_err().len(), 1);
    }

    #[test]
    fn test_serialize_skips_missing_rule() {
        let json = serde_json::to_value(ValidationError::new("$.x", "bad")).unwrap();
        assert!(json.get("rule").is_none());
        assert_eq!(json["path"], "$.x");
    }
}
