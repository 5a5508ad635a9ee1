//! Splitting node sets into leaves and branches
//!
//! Copyright (c) 2025 TypedConfig Team
//! Licensed under the Apache-2.0 license

use super::path::NodePath;
use std::collections::BTreeSet;

/// Whether `path` has no descendant in `paths`
///
/// A path that is not part of the set is not a leaf of it.
pub fn is_leaf(path: &NodePath, paths: &BTreeSet<NodePath>) -> bool {
    paths.contains(path) && !paths.iter().any(|other| path.is_ancestor_of(other))
}

/// Paths of the set with no descendant in the set
pub fn leaves(paths: &BTreeSet<NodePath>) -> BTreeSet<NodePath> {
    // BTreeSet order puts every descendant right after its ancestor, so
    // only the next path needs checking.
    let mut result = BTreeSet::new();
    let mut iter = paths.iter().peekable();
    while let Some(path) = iter.next() {
        let has_descendant = iter
            .peek()
            .is_some_and(|next| path.is_ancestor_of(next));
        if !has_descendant {
            result.insert(path.clone());
        }
    }
    result
}

/// Paths of the set that have at least one descendant in the set
pub fn branches(paths: &BTreeSet<NodePath>) -> BTreeSet<NodePath> {
    let leaf_set = leaves(paths);
    paths.difference(&leaf_set).cloned().collect()
}
