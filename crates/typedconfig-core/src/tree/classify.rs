//! Classification of document paths into configurable nodes
//!
//! Copyright (c) 2025 TypedConfig Team
//! Licensed under the Apache-2.0 license

use super::path::{NodePath, PathKey};
use serde_json::Value;
use std::collections::BTreeSet;

/// Keys that make a mapping a leaf spec
///
/// Order follows the order in which a leaf spec is usually written.
pub const RESERVED_KEYS: [&str; 9] = [
    "type",
    "opts",
    "validator",
    "validator_opts",
    "validator_params",
    "root_validator",
    "default",
    "id",
    "doc",
];

/// Whether a key is one of the reserved spec keys
pub fn is_reserved(key: &str) -> bool {
    RESERVED_KEYS.contains(&key)
}

/// Whether a path addresses a configurable item
///
/// A path is a node when none of its steps is a reserved key. The root
/// path is the sentinel above the document and is never a node.
pub fn is_node(path: &NodePath) -> bool {
    !path.is_root()
        && !path
            .keys()
            .iter()
            .filter_map(PathKey::as_key)
            .any(is_reserved)
}

/// Collect every node path of a document
pub fn classify(document: &Value) -> BTreeSet<NodePath> {
    let mut nodes = BTreeSet::new();
    visit(document, &NodePath::root(), &mut nodes);
    nodes
}

fn visit(value: &Value, path: &NodePath, nodes: &mut BTreeSet<NodePath>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                // nothing below a reserved key can be a node
                if is_reserved(key) {
                    continue;
                }
                let child_path = path.child(key.as_str());
                nodes.insert(child_path.clone());
                visit(child, &child_path, nodes);
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                let child_path = path.child(index);
                nodes.insert(child_path.clone());
                visit(child, &child_path, nodes);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn p(keys: &[&str]) -> NodePath {
        NodePath::from_keys(keys)
    }

    #[test]
    fn test_nodes() {
        let conf = json!({
            "foo": {
                "bar": {"type": "int"},
                "baz": {
                    "bah": 42,
                    "alt": {"type": "Literal", "opts": ["abc", "xyz"]},
                },
            },
            "bla": {"eg": "str"},
        });
        let nodes = [
            p(&["foo"]),
            p(&["foo", "bar"]),
            p(&["foo", "baz"]),
            p(&["foo", "baz", "bah"]),
            p(&["foo", "baz", "alt"]),
            p(&["bla"]),
            p(&["bla", "eg"]),
        ];
        let not_nodes = [
            p(&["foo", "bar", "type"]),
            p(&["foo", "baz", "alt", "type"]),
            p(&["foo", "baz", "alt", "opts"]),
        ];

        assert!(nodes.iter().all(is_node));
        assert!(!not_nodes.iter().any(is_node));
        assert_eq!(classify(&conf), nodes.into_iter().collect());
    }

    #[test]
    fn test_opts_sequence_is_not_walked() {
        let conf = json!({"alt": {"type": "Literal", "opts": ["abc", "xyz"]}});
        let nodes = classify(&conf);
        assert_eq!(nodes.len(), 1);
        assert!(nodes.contains(&p(&["alt"])));
    }

    #[test]
    fn test_sequences_are_indexed() {
        let conf = json!({"foo": {"bar": [{"type": "int"}, {"baz": {"type": "str"}}]}});
        let nodes = classify(&conf);
        let bar = p(&["foo", "bar"]);
        assert!(nodes.contains(&bar.child(0)));
        assert!(nodes.contains(&bar.child(1)));
        assert!(nodes.contains(&bar.child(1).child("baz")));
        assert!(!nodes.contains(&bar.child(0).child("type")));
    }

    #[test]
    fn test_root_is_never_a_node() {
        assert!(!is_node(&NodePath::root()));
        assert!(classify(&json!({})).is_empty());
        assert!(classify(&json!(3)).is_empty());
    }
}
