//! Walking the rule document
//!
//! Paths, node classification and the leaf/branch partition.
//!
//! Copyright (c) 2025 TypedConfig Team
//! Licensed under the Apache-2.0 license

pub mod classify;
pub mod partition;
pub mod path;

pub use classify::{classify, is_node, is_reserved, RESERVED_KEYS};
pub use partition::{branches, is_leaf, leaves};
pub use path::{NodePath, PathKey};
