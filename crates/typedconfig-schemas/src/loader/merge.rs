//! Merging of several rule documents into one
//!
//! Common keys at the same depth are reconciled recursively and later
//! documents win. A key keeps the position of its first occurrence.
//!
//! Copyright (c) 2025 TypedConfig Team
//! Licensed under the Apache-2.0 license

use crate::loader::error::LoaderResult;
use crate::loader::parser::SchemaParser;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

/// Merge a sequence of documents
///
/// When every document is a mapping, keys are merged recursively;
/// otherwise the last document replaces the others wholesale. An empty
/// slice merges to an empty mapping.
pub fn merge_documents(documents: &[Value]) -> Value {
    if !documents.iter().all(Value::is_object) {
        return documents.last().cloned().unwrap_or_else(|| Value::Object(Map::new()));
    }

    let mut seen = HashSet::new();
    let mut keys: Vec<&String> = Vec::new();
    for document in documents {
        if let Value::Object(map) = document {
            keys.extend(map.keys().filter(|key| seen.insert(key.as_str())));
        }
    }

    let mut merged = Map::new();
    for key in keys {
        let matches: Vec<Value> = documents
            .iter()
            .filter_map(|document| document.get(key.as_str()).cloned())
            .collect();

        let value = if matches.len() > 1 {
            merge_documents(&matches)
        } else {
            matches.into_iter().next().unwrap_or(Value::Null)
        };
        merged.insert(key.clone(), value);
    }

    Value::Object(merged)
}

/// Read several document files and merge them in order
pub fn load_merged<P: AsRef<Path>>(parser: &SchemaParser, paths: &[P]) -> LoaderResult<Value> {
    let documents = paths
        .iter()
        .map(|path| parser.parse_mapping_file(path.as_ref()))
        .collect::<LoaderResult<Vec<_>>>()?;

    debug!(count = documents.len(), "merging documents");
    Ok(merge_documents(&documents))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_merge_overrides_and_order() {
        let d1 = json!({"a": 1, "b": {"c": 3, "d": 4}, "e": true});
        let d2 = json!({"c": 3, "b": {"e": 5, "d": 40}, "e": {"g": true, "h": "foo"}});

        let result = merge_documents(&[d1, d2]);
        let expected = json!({
            "a": 1,
            "b": {"c": 3, "d": 40, "e": 5},
            "e": {"g": true, "h": "foo"},
            "c": 3,
        });
        assert_eq!(result, expected);

        // key order: first occurrence wins
        let top: Vec<&String> = result.as_object().unwrap().keys().collect();
        assert_eq!(top, ["a", "b", "e", "c"]);
        let nested: Vec<&String> = result["b"].as_object().unwrap().keys().collect();
        assert_eq!(nested, ["c", "d", "e"]);
    }

    #[test]
    fn test_merge_many_keys_keeps_first_seen_order() {
        let width = 20_000;
        let forward: Map<String, Value> = (0..width).map(|i| (format!("k{}", i), json!(i))).collect();
        let backward: Map<String, Value> = (0..width)
            .rev()
            .map(|i| (format!("k{}", i), json!(-i)))
            .chain(std::iter::once(("tail".to_string(), json!(true))))
            .collect();

        let result = merge_documents(&[Value::Object(forward), Value::Object(backward)]);
        let merged = result.as_object().unwrap();
        assert_eq!(merged.len(), width as usize + 1);

        let keys: Vec<&String> = merged.keys().collect();
        assert_eq!(keys[0], "k0");
        assert_eq!(keys[width as usize - 1], &format!("k{}", width - 1));
        assert_eq!(keys[width as usize], "tail");
        assert_eq!(merged["k7"], json!(-7));
    }

    #[test]
    fn test_merge_non_mappings_takes_last() {
        assert_eq!(merge_documents(&[json!([1]), json!([2, 3])]), json!([2, 3]));
        assert_eq!(merge_documents(&[json!({"a": 1}), json!(7)]), json!(7));
    }

    #[test]
    fn test_merge_empty() {
        assert_eq!(merge_documents(&[]), json!({}));
    }

    #[test]
    fn test_load_merged_from_files() -> LoaderResult<()> {
        let dir = tempdir().unwrap();
        let first = dir.path().join("base.yaml");
        let second = dir.path().join("extra.json");
        fs::write(&first, "run:\n  mode:\n    type: str\n").unwrap();
        fs::write(&second, r#"{"run": {"eff": {"type": "float"}}}"#).unwrap();

        let merged = load_merged(&SchemaParser::new(), &[first, second])?;
        assert_eq!(merged["run"]["mode"]["type"], "str");
        assert_eq!(merged["run"]["eff"]["type"], "float");
        Ok(())
    }

    #[test]
    fn test_load_merged_rejects_scalar_document() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("scalar.yaml");
        fs::write(&path, "just a string\n").unwrap();

        assert!(load_merged(&SchemaParser::new(), &[path]).is_err());
    }
}
