//! Branch interpretation
//!
//! A branch becomes a field whose type is the record synthesized from its
//! already resolved children.
//!
//! Copyright (c) 2025 TypedConfig Team
//! Licensed under the Apache-2.0 license

use super::{Interpreter, NodeKind, ResolvedRule};
use crate::error::Result;
use crate::record::{Capability, FieldType, RecordType};
use crate::synth::synthesize_with;
use crate::tree::NodePath;
use serde_json::{Map, Value};

/// Keys that only make sense on a leaf
const LEAF_ONLY: [&str; 2] = ["type", "opts"];

impl Interpreter<'_> {
    /// Wrap resolved children into a record-typed field
    ///
    /// `declaration` is the branch mapping itself; validators it declares
    /// are returned on the rule, to be installed on the enclosing record.
    pub fn resolve_branch(
        &mut self,
        path: &NodePath,
        declaration: &Value,
        children: Vec<(String, ResolvedRule)>,
    ) -> Result<ResolvedRule> {
        let declaration = branch_mapping(path, declaration)?;
        reject_leaf_keys(path, declaration, &LEAF_ONLY)?;

        let record = synthesize_with(&format!("{}_t", path.field_name()), children, Vec::new(), &[])?;
        let mut resolved = ResolvedRule {
            ty: Some(FieldType::Record(record)),
            validators: self
                .resolve_validator(path, declaration, NodeKind::Branch)?
                .into_iter()
                .collect(),
            ..ResolvedRule::default()
        };
        Self::pass_through(path, declaration, NodeKind::Branch, &mut resolved)?;
        Ok(resolved)
    }

    /// Synthesize the document root as `config_t`
    ///
    /// The root carries the I/O capability, and any validator declared at
    /// the top level checks the whole configuration.
    pub fn resolve_root(
        &mut self,
        document: &Value,
        children: Vec<(String, ResolvedRule)>,
    ) -> Result<RecordType> {
        let root = NodePath::root();
        let declaration = branch_mapping(&root, document)?;
        reject_leaf_keys(&root, declaration, &["type", "opts", "default"])?;

        let own = self
            .resolve_validator(&root, declaration, NodeKind::Branch)?
            .into_iter()
            .collect();
        synthesize_with("config_t", children, own, &[Capability::Io])
    }
}

fn branch_mapping<'v>(path: &NodePath, declaration: &'v Value) -> Result<&'v Map<String, Value>> {
    match declaration {
        Value::Object(map) => Ok(map),
        Value::Array(_) => Err(NodeKind::Branch.malformed(path, "expected a mapping of fields, got a sequence")),
        other => Err(NodeKind::Branch.malformed(path, format!("expected a mapping of fields, got {}", other))),
    }
}

fn reject_leaf_keys(path: &NodePath, declaration: &Map<String, Value>, keys: &[&str]) -> Result<()> {
    match keys.iter().find(|key| declaration.contains_key(**key)) {
        Some(key) => Err(NodeKind::Branch.malformed(
            path,
            format!("'{}' is not allowed next to nested fields", key),
        )),
        None => Ok(()),
    }
}
