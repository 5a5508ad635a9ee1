//! Configuration management for the CLI
//!
//! This module handles loading configuration from:
//! - Default values
//! - Configuration files (YAML/JSON)
//! - Command-line arguments, which take precedence

use crate::cli::{BuildArgs, OutputFormat};
use crate::error::{Error, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use typedconfig_core::{BuildOptions, OptsPolicy, TypeBuilder};
use typedconfig_schemas::SchemaParser;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Type synthesis settings
    pub build: BuildConfig,

    /// Output settings
    pub output: OutputConfig,

    /// Logging settings
    pub logging: LogSection,
}

/// Type synthesis configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Policy for `opts` that are neither a sequence nor a mapping
    pub opts_policy: OptsPolicy,

    /// Directory for resolving relative `ConfFilePath` values
    pub confdir: Option<PathBuf>,
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Default output format
    pub format: String,

    /// Use colored output by default
    pub color: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogSection {
    /// Log level used when no `-v` flag is given
    pub level: Option<String>,

    /// Log format (compact, full, json)
    pub format: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: "human".to_string(),
            color: true,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let document = SchemaParser::new().parse_file(path)?;
        serde_json::from_value(document)
            .map_err(|e| Error::config(format!("{}: {}", path.display(), e)))
    }

    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        for path in Self::default_config_paths() {
            if path.exists() {
                match Self::from_file(&path) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        eprintln!("Warning: Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file or default locations
    pub fn load_with_file(file: Option<&Path>) -> Result<Self> {
        match file {
            Some(path) => Self::from_file(path),
            None => Self::load(),
        }
    }

    /// Get default configuration file paths to check
    fn default_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from(".typedconfig.yaml"),
            PathBuf::from(".typedconfig.json"),
        ];

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("typedconfig").join("config.yaml"));
        }

        if let Some(home_dir) = dirs::home_dir() {
            paths.push(home_dir.join(".typedconfig.yaml"));
        }

        paths
    }

    /// Output format from the command line, else from this configuration
    pub fn output_format(&self, flag: Option<OutputFormat>) -> Result<OutputFormat> {
        match flag {
            Some(format) => Ok(format),
            None => OutputFormat::from_str(&self.output.format, true).map_err(|_| {
                Error::config(format!("unknown output format '{}'", self.output.format))
            }),
        }
    }

    /// A type builder with the built-in catalogue and the effective settings
    ///
    /// `fallback_confdir` is used when neither the arguments nor this
    /// configuration name a directory.
    pub fn type_builder(&self, args: &BuildArgs, fallback_confdir: Option<&Path>) -> TypeBuilder {
        let opts_policy = args
            .opts_policy
            .map(OptsPolicy::from)
            .unwrap_or(self.build.opts_policy);
        let builder = TypeBuilder::new().with_options(BuildOptions { opts_policy });

        let confdir = args
            .confdir
            .as_deref()
            .or(self.build.confdir.as_deref())
            .or(fallback_confdir);
        match confdir {
            Some(dir) => builder.with_confdir(dir),
            None => builder,
        }
    }
}
