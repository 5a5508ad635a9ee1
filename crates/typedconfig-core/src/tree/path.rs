//! Paths into a rule document
//!
//! Copyright (c) 2025 TypedConfig Team
//! Licensed under the Apache-2.0 license

use serde_json::Value;
use std::fmt;

/// One step of a path: a mapping key or a sequence index
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PathKey {
    Key(String),
    Index(usize),
}

impl PathKey {
    /// The mapping key, if this step is one
    pub fn as_key(&self) -> Option<&str> {
        match self {
            PathKey::Key(key) => Some(key),
            PathKey::Index(_) => None,
        }
    }

    /// Name used for the field addressed by this step
    pub fn name(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for PathKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathKey::Key(key) => write!(f, "{}", key),
            PathKey::Index(index) => write!(f, "{}", index),
        }
    }
}

impl From<&str> for PathKey {
    fn from(key: &str) -> Self {
        PathKey::Key(key.to_string())
    }
}

impl From<String> for PathKey {
    fn from(key: String) -> Self {
        PathKey::Key(key)
    }
}

impl From<usize> for PathKey {
    fn from(index: usize) -> Self {
        PathKey::Index(index)
    }
}

/// Full path from the document root to one location
///
/// The empty path is the root itself; it never names a node.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodePath(Vec<PathKey>);

impl NodePath {
    /// The empty path
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn new(keys: Vec<PathKey>) -> Self {
        Self(keys)
    }

    /// Build a path made only of mapping keys
    pub fn from_keys(keys: &[&str]) -> Self {
        Self(keys.iter().map(|key| PathKey::from(*key)).collect())
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> &[PathKey] {
        &self.0
    }

    pub fn last(&self) -> Option<&PathKey> {
        self.0.last()
    }

    /// Extend the path by one step
    pub fn child(&self, key: impl Into<PathKey>) -> Self {
        let mut keys = self.0.clone();
        keys.push(key.into());
        Self(keys)
    }

    /// The enclosing path, `None` for the root
    pub fn parent(&self) -> Option<Self> {
        if self.0.is_empty() {
            None
        } else {
            Some(Self(self.0[..self.0.len() - 1].to_vec()))
        }
    }

    /// Name of the field this path addresses (empty for the root)
    pub fn field_name(&self) -> String {
        self.last().map(PathKey::name).unwrap_or_default()
    }

    /// Whether `other` lies strictly below this path
    pub fn is_ancestor_of(&self, other: &NodePath) -> bool {
        self.0.len() < other.0.len() && other.0.starts_with(&self.0)
    }

    /// Whether any step of the path is the given mapping key
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.iter().any(|step| step.as_key() == Some(key))
    }

    /// Follow the path through a document
    pub fn lookup<'a>(&self, document: &'a Value) -> Option<&'a Value> {
        self.0.iter().try_fold(document, |current, step| match (step, current) {
            (PathKey::Key(key), Value::Object(map)) => map.get(key),
            (PathKey::Index(index), Value::Array(items)) => items.get(*index),
            _ => None,
        })
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "<root>");
        }
        let joined = self
            .0
            .iter()
            .map(PathKey::to_string)
            .collect::<Vec<_>>()
            .join(".");
        write!(f, "{}", joined)
    }
}

impl FromIterator<PathKey> for NodePath {
    fn from_iter<I: IntoIterator<Item = PathKey>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_display_joins_segments() {
        let path = NodePath::from_keys(&["foo", "bar"]).child(5).child("baz");
        assert_eq!(path.to_string(), "foo.bar.5.baz");
        assert_eq!(path.to_string().split('.').count(), path.len());
        assert_eq!(NodePath::root().to_string(), "<root>");
    }

    #[test]
    fn test_parent_and_field_name() {
        let path = NodePath::from_keys(&["top", "nest", "leaf"]);
        assert_eq!(path.field_name(), "leaf");
        assert_eq!(path.parent(), Some(NodePath::from_keys(&["top", "nest"])));
        assert_eq!(NodePath::from_keys(&["top"]).parent(), Some(NodePath::root()));
        assert_eq!(NodePath::root().parent(), None);
    }

    #[test]
    fn test_ancestor_is_strict_prefix() {
        let foo = NodePath::from_keys(&["foo"]);
        let foo_bar = NodePath::from_keys(&["foo", "bar"]);
        let bar_foo = NodePath::from_keys(&["bar", "foo"]);

        assert!(foo.is_ancestor_of(&foo_bar));
        assert!(!foo.is_ancestor_of(&foo));
        assert!(!foo_bar.is_ancestor_of(&foo));
        assert!(!foo.is_ancestor_of(&bar_foo));
    }

    #[test]
    fn test_lookup() {
        let doc = json!({"foo": {"bar": [{"x": 1}, {"baz": {"type": "int"}}]}});
        let path = NodePath::from_keys(&["foo", "bar"]).child(1).child("baz");
        assert_eq!(path.lookup(&doc), Some(&json!({"type": "int"})));

        let missing = NodePath::from_keys(&["foo", "nope"]);
        assert_eq!(missing.lookup(&doc), None);
        assert_eq!(NodePath::root().lookup(&doc), Some(&doc));
    }
}
