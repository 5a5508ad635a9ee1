//! Shared utilities for command handlers

use crate::error::{Error, Result};
use crate::logging::timing::Timer;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::debug;
use typedconfig_schemas::{load_merged, SchemaParser};

/// Fail early with a clear error if a file does not exist
pub fn require_file(path: &Path) -> Result<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(Error::FileNotFound {
            path: path.to_path_buf(),
        })
    }
}

/// Load and merge rule files, later files overriding earlier ones
pub fn load_rules(paths: &[PathBuf]) -> Result<Value> {
    let _timer = Timer::with_details("load_rules", &format!("{} file(s)", paths.len()));
    for path in paths {
        require_file(path)?;
    }

    let rules = load_merged(&SchemaParser::new(), paths)?;
    debug!(files = paths.len(), "Rule files merged");
    Ok(rules)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_rules_merges_in_order() {
        let dir = TempDir::new().unwrap();
        let base = dir.path().join("base.yaml");
        let extra = dir.path().join("extra.json");
        fs::write(&base, "run:\n  mode:\n    type: str\n  level:\n    type: int\n").unwrap();
        fs::write(&extra, r#"{"run": {"level": {"type": "int", "default": 3}}}"#).unwrap();

        let rules = load_rules(&[base, extra]).unwrap();
        assert_eq!(rules["run"]["mode"]["type"], "str");
        assert_eq!(rules["run"]["level"]["default"], 3);
    }

    #[test]
    fn test_missing_rule_file() {
        let err = load_rules(&[PathBuf::from("/nonexistent/rules.yaml")]).unwrap_err();
        assert!(matches!(err, Error::FileNotFound { .. }));
    }
}
