//! Document parsing functionality for YAML and JSON formats
//!
//! Copyright (c) 2025 TypedConfig Team
//! Licensed under the Apache-2.0 license

use crate::loader::error::{LoaderError, LoaderResult};
use serde_json::Value;
use std::path::Path;
use tracing::debug;

/// Supported file formats for documents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// YAML format (.yaml, .yml)
    Yaml,
    /// JSON format (.json)
    Json,
}

impl Format {
    /// Detect format from file extension
    pub fn from_path(path: &Path) -> LoaderResult<Self> {
        if let Some(extension) = path.extension().and_then(|ext| ext.to_str()) {
            match extension.to_lowercase().as_str() {
                "yaml" | "yml" => Ok(Format::Yaml),
                "json" => Ok(Format::Json),
                _ => Err(LoaderError::unsupported_format(path.to_path_buf())),
            }
        } else {
            Err(LoaderError::unsupported_format(path.to_path_buf()))
        }
    }

    /// Get file extensions for this format
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Format::Yaml => &["yaml", "yml"],
            Format::Json => &["json"],
        }
    }

    /// Get the primary file extension for this format
    pub fn primary_extension(&self) -> &'static str {
        match self {
            Format::Yaml => "yaml",
            Format::Json => "json",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Format::Yaml => "YAML",
            Format::Json => "JSON",
        }
    }
}

/// Document parser with support for multiple formats
#[derive(Debug, Default)]
pub struct SchemaParser;

impl SchemaParser {
    /// Create a new parser
    pub fn new() -> Self {
        Self
    }

    /// Parse a document file, detecting format from extension
    pub fn parse_file(&self, path: &Path) -> LoaderResult<Value> {
        let format = Format::from_path(path)?;
        self.parse_file_as(path, format)
    }

    /// Parse a document file in the given format, whatever its extension
    pub fn parse_file_as(&self, path: &Path, format: Format) -> LoaderResult<Value> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| LoaderError::io_error(path.to_path_buf(), e))?;

        debug!(path = %path.display(), ?format, bytes = content.len(), "parsing document");
        self.parse_content(&content, format, path)
    }

    /// Parse a document file and require a mapping at the root
    pub fn parse_mapping_file(&self, path: &Path) -> LoaderResult<Value> {
        let value = self.parse_file(path)?;
        self.validate_root(&value, path)?;
        Ok(value)
    }

    /// Parse document content with explicit format
    pub fn parse_content(&self, content: &str, format: Format, path: &Path) -> LoaderResult<Value> {
        match format {
            Format::Yaml => self.parse_yaml(content, path),
            Format::Json => self.parse_json(content, path),
        }
    }

    /// Parse YAML content
    pub fn parse_yaml(&self, content: &str, path: &Path) -> LoaderResult<Value> {
        // First parse as YAML Value to catch YAML-specific errors
        let yaml_value: serde_yaml::Value = serde_yaml::from_str(content)
            .map_err(|e| LoaderError::yaml_parse_error(path.to_path_buf(), e))?;

        // Convert to JSON Value for consistent handling
        serde_json::to_value(yaml_value)
            .map_err(|e| LoaderError::json_parse_error(path.to_path_buf(), e))
    }

    /// Parse JSON content
    pub fn parse_json(&self, content: &str, path: &Path) -> LoaderResult<Value> {
        serde_json::from_str(content)
            .map_err(|e| LoaderError::json_parse_error(path.to_path_buf(), e))
    }

    /// Check that a document has a mapping at the root
    pub fn validate_root(&self, value: &Value, path: &Path) -> LoaderResult<()> {
        if value.is_object() {
            Ok(())
        } else {
            Err(LoaderError::validation_error(
                path.to_path_buf(),
                "document must be a mapping at the root level",
            ))
        }
    }

    /// Try to parse content with multiple formats (for auto-detection)
    pub fn parse_with_fallback(&self, content: &str, path: &Path) -> LoaderResult<(Value, Format)> {
        if let Ok(format) = Format::from_path(path) {
            if let Ok(value) = self.parse_content(content, format, path) {
                return Ok((value, format));
            }
        }

        // JSON is the stricter format, try it first
        if let Ok(value) = self.parse_json(content, path) {
            return Ok((value, Format::Json));
        }

        if let Ok(value) = self.parse_yaml(content, path) {
            return Ok((value, Format::Yaml));
        }

        Err(LoaderError::unsupported_format(path.to_path_buf()))
    }

    /// Serialize a value to string in the given format
    pub fn serialize(&self, value: &Value, format: Format) -> LoaderResult<String> {
        match format {
            Format::Json => serde_json::to_string_pretty(value)
                .map_err(|e| LoaderError::serialize_error(format.label(), e.to_string())),
            Format::Yaml => serde_yaml::to_string(value)
                .map_err(|e| LoaderError::serialize_error(format.label(), e.to_string())),
        }
    }

    /// Serialize a value and write it to a file, detecting format from extension
    pub fn write_file(&self, value: &Value, path: &Path) -> LoaderResult<()> {
        let format = Format::from_path(path)?;
        self.write_file_as(value, path, format)
    }

    /// Serialize a value in the given format and write it to a file
    pub fn write_file_as(&self, value: &Value, path: &Path, format: Format) -> LoaderResult<()> {
        let content = self.serialize(value, format)?;
        std::fs::write(path, content).map_err(|e| LoaderError::io_error(path.to_path_buf(), e))?;

        debug!(path = %path.display(), ?format, "wrote document");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_format_detection() {
        assert_eq!(Format::from_path(Path::new("rules.yaml")).unwrap(), Format::Yaml);
        assert_eq!(Format::from_path(Path::new("rules.YML")).unwrap(), Format::Yaml);
        assert_eq!(Format::from_path(Path::new("rules.json")).unwrap(), Format::Json);

        assert!(Format::from_path(Path::new("rules.txt")).is_err());
        assert!(Format::from_path(Path::new("rules")).is_err());
    }

    #[test]
    fn test_format_properties() {
        assert_eq!(Format::Yaml.primary_extension(), "yaml");
        assert_eq!(Format::Json.primary_extension(), "json");
        assert!(Format::Yaml.extensions().contains(&"yml"));
    }

    #[test]
    fn test_yaml_parsing_preserves_key_order() -> LoaderResult<()> {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("rules.yaml");

        let yaml_content = r#"
zeta:
  type: int
alpha:
  type: str
  default: foo
mid:
  type: Literal
  opts: [quiet, verbose]
"#;
        fs::write(&file_path, yaml_content).unwrap();

        let parser = SchemaParser::new();
        let result = parser.parse_file(&file_path)?;

        let keys: Vec<&String> = result.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["zeta", "alpha", "mid"]);
        assert_eq!(result["mid"]["opts"], json!(["quiet", "verbose"]));

        Ok(())
    }

    #[test]
    fn test_json_parsing() -> LoaderResult<()> {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("config.json");
        fs::write(&file_path, r#"{"run": {"mode": "quiet", "eff": 0.5}}"#).unwrap();

        let parser = SchemaParser::new();
        let result = parser.parse_file(&file_path)?;

        assert_eq!(result["run"]["mode"], "quiet");
        assert_eq!(result["run"]["eff"], 0.5);

        Ok(())
    }

    #[test]
    fn test_root_validation() {
        let parser = SchemaParser::new();
        let path = Path::new("rules.yaml");

        assert!(parser.validate_root(&json!({"a": 1}), path).is_ok());
        assert!(parser.validate_root(&json!([1, 2]), path).is_err());
        assert!(parser.validate_root(&json!("scalar"), path).is_err());
    }

    #[test]
    fn test_fallback_parsing() -> LoaderResult<()> {
        let parser = SchemaParser::new();

        let json_content = r#"{"id": "test"}"#;
        let (value, format) = parser.parse_with_fallback(json_content, Path::new("unknown.txt"))?;
        assert_eq!(format, Format::Json);
        assert_eq!(value["id"], "test");

        let yaml_content = "id: test\nmode: quiet";
        let (value, format) = parser.parse_with_fallback(yaml_content, Path::new("unknown.txt"))?;
        assert_eq!(format, Format::Yaml);
        assert_eq!(value["mode"], "quiet");

        Ok(())
    }

    #[test]
    fn test_write_and_reread() -> LoaderResult<()> {
        let dir = tempdir().unwrap();
        let parser = SchemaParser::new();
        let value = json!({
            "run": {"mode": "quiet", "eff": 0.25},
            "numbers": [1, 2, 3]
        });

        for name in ["out.yaml", "out.json"] {
            let path = dir.path().join(name);
            parser.write_file(&value, &path)?;
            assert_eq!(parser.parse_file(&path)?, value);
        }

        let yaml_str = parser.serialize(&value, Format::Yaml)?;
        assert!(yaml_str.contains("mode: quiet"));

        Ok(())
    }

    #[test]
    fn test_explicit_format_ignores_extension() -> LoaderResult<()> {
        let dir = tempdir().unwrap();
        let parser = SchemaParser::new();
        let path = dir.path().join("config.conf");
        let value = json!({"a": {"b": 1}});

        parser.write_file_as(&value, &path, Format::Yaml)?;
        assert_eq!(parser.parse_file_as(&path, Format::Yaml)?, value);
        assert!(parser.parse_file(&path).is_err());

        Ok(())
    }

    #[test]
    fn test_missing_file_reports_path() {
        let parser = SchemaParser::new();
        let err = parser.parse_file(Path::new("/definitely/not/here.yaml")).unwrap_err();
        assert!(matches!(err, LoaderError::IoError { .. }));
    }
}
