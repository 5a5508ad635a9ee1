//! Bottom-up construction of the configuration type
//!
//! Leaves are resolved first; after that each round resolves the branches
//! whose children are all resolved, until only the top-level fields are
//! left. Those become the fields of the root type.
//!
//! Copyright (c) 2025 TypedConfig Team
//! Licensed under the Apache-2.0 license

use crate::builtin::Builtins;
use crate::error::{Error, OptsPolicy, Result, SchemaWarning};
use crate::interpret::{Interpreter, ResolvedRule};
use crate::record::RecordType;
use crate::registry::{RegistryPlugin, TypeRegistry, ValidatorRegistry};
use crate::tree::{classify, is_reserved, leaves, NodePath};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;
use tracing::{debug, info_span};

type Resolved = BTreeMap<NodePath, ResolvedRule>;

/// Options controlling type synthesis
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildOptions {
    /// What to do with `opts` that are neither a sequence nor a mapping
    pub opts_policy: OptsPolicy,
}

/// Outcome of a synthesis, with what was noticed on the way
#[derive(Debug, Clone)]
pub struct Synthesis {
    pub config_type: RecordType,
    pub warnings: Vec<SchemaWarning>,
    /// Paths resolved in each round: the leaves first, then each ring of
    /// branches
    pub resolution_order: Vec<Vec<NodePath>>,
}

/// Synthesizes configuration types from rule documents
///
/// Holds the registries; one builder can serve any number of documents.
#[derive(Debug, Clone)]
pub struct TypeBuilder {
    types: TypeRegistry,
    validators: ValidatorRegistry,
    options: BuildOptions,
}

impl Default for TypeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeBuilder {
    /// A builder with the built-in types and validators
    pub fn new() -> Self {
        Self::empty().with_plugin(&Builtins)
    }

    /// A builder with empty registries
    pub fn empty() -> Self {
        Self {
            types: TypeRegistry::new(),
            validators: ValidatorRegistry::new(),
            options: BuildOptions::default(),
        }
    }

    pub fn with_plugin(mut self, plugin: &dyn RegistryPlugin) -> Self {
        plugin.register(&mut self.types, &mut self.validators);
        self
    }

    pub fn with_options(mut self, options: BuildOptions) -> Self {
        self.options = options;
        self
    }

    /// Resolve `ConfFilePath` values against this directory
    pub fn with_confdir(mut self, confdir: impl Into<PathBuf>) -> Self {
        self.types.set_confdir(confdir);
        self
    }

    pub fn options(&self) -> &BuildOptions {
        &self.options
    }

    pub fn types(&self) -> &TypeRegistry {
        &self.types
    }

    pub fn types_mut(&mut self) -> &mut TypeRegistry {
        &mut self.types
    }

    pub fn validators(&self) -> &ValidatorRegistry {
        &self.validators
    }

    pub fn validators_mut(&mut self) -> &mut ValidatorRegistry {
        &mut self.validators
    }

    /// Synthesize the configuration type of a rule document
    pub fn build(&self, document: &Value) -> Result<RecordType> {
        self.build_with_report(document).map(|synthesis| synthesis.config_type)
    }

    /// Synthesize, also returning warnings and the resolution order
    pub fn build_with_report(&self, document: &Value) -> Result<Synthesis> {
        let span = info_span!("synthesize");
        let _guard = span.enter();

        if !document.is_object() {
            return Err(Error::MalformedBranch {
                path: NodePath::root(),
                reason: "a rule document must be a mapping".to_string(),
            });
        }

        let mut interpreter = Interpreter::new(&self.types, &self.validators, self.options.opts_policy);
        let paths = classify(document);
        let leaf_set = leaves(&paths);
        debug!(nodes = paths.len(), leaves = leaf_set.len(), "classified rule document");

        let mut resolved = Resolved::new();
        for path in &leaf_set {
            let rule = lookup(document, path)?;
            resolved.insert(path.clone(), interpreter.resolve_leaf(path, rule)?);
        }
        let mut resolution_order = vec![leaf_set.iter().cloned().collect::<Vec<_>>()];

        let mut remaining: BTreeSet<NodePath> = paths.difference(&leaf_set).cloned().collect();
        while !remaining.is_empty() {
            let ring = leaves(&remaining);
            debug!(round = resolution_order.len(), branches = ring.len(), "resolving branch ring");
            resolved = resolve_ring(&mut interpreter, document, &ring, resolved)?;

            remaining = ring
                .iter()
                .filter_map(NodePath::parent)
                .filter(|parent| !parent.is_root())
                .chain(remaining.difference(&ring).cloned())
                .collect();
            resolution_order.push(ring.into_iter().collect());
        }

        let children = take_children(&mut resolved, &NodePath::root(), document)?;
        if let Some(path) = resolved.keys().next() {
            return Err(Error::internal(format!("'{}' was resolved but never used", path)));
        }
        let config_type = interpreter.resolve_root(document, children)?;

        let warnings = interpreter.into_warnings();
        debug!(
            fields = config_type.fields().len(),
            warnings = warnings.len(),
            "synthesized configuration type"
        );
        Ok(Synthesis {
            config_type,
            warnings,
            resolution_order,
        })
    }
}

/// Synthesize with the built-in types and validators
pub fn get_config_type(document: &Value) -> Result<RecordType> {
    TypeBuilder::new().build(document)
}

fn lookup<'d>(document: &'d Value, path: &NodePath) -> Result<&'d Value> {
    path.lookup(document)
        .ok_or_else(|| Error::internal(format!("classified path '{}' is not in the document", path)))
}

/// Resolve one ring of branches, moving their children into them
fn resolve_ring(
    interpreter: &mut Interpreter<'_>,
    document: &Value,
    ring: &BTreeSet<NodePath>,
    mut resolved: Resolved,
) -> Result<Resolved> {
    for path in ring {
        let declaration = lookup(document, path)?;
        let children = take_children(&mut resolved, path, declaration)?;
        let rule = interpreter.resolve_branch(path, declaration, children)?;
        resolved.insert(path.clone(), rule);
    }
    Ok(resolved)
}

/// Remove the children of a branch from the map, in declaration order
fn take_children(
    resolved: &mut Resolved,
    path: &NodePath,
    declaration: &Value,
) -> Result<Vec<(String, ResolvedRule)>> {
    let Value::Object(map) = declaration else {
        return Err(Error::MalformedBranch {
            path: path.clone(),
            reason: "expected a mapping of fields".to_string(),
        });
    };

    map.keys()
        .filter(|key| !is_reserved(key))
        .map(|key| {
            let child = path.child(key.as_str());
            resolved
                .remove(&child)
                .map(|rule| (key.clone(), rule))
                .ok_or_else(|| Error::internal(format!("'{}' was not resolved before its parent", child)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_three_levels_resolve_bottom_up() {
        let document = json!({"a": {"b": {"c": {"type": "int"}}}});
        let synthesis = TypeBuilder::new().build_with_report(&document).unwrap();

        let order: Vec<Vec<String>> = synthesis
            .resolution_order
            .iter()
            .map(|round| round.iter().map(NodePath::to_string).collect())
            .collect();
        assert_eq!(order, [vec!["a.b.c"], vec!["a.b"], vec!["a"]]);

        let a = synthesis.config_type.field("a").unwrap();
        let a_t = a.ty.as_record().unwrap();
        assert_eq!(a_t.name(), "a_t");
        assert_eq!(a_t.field("b").unwrap().ty.as_record().unwrap().name(), "b_t");
    }

    #[test]
    fn test_uneven_depths() {
        let document = json!({
            "top": {
                "shallow": {"type": "int"},
                "deep": {"deeper": {"leaf": {"type": "str"}}},
            },
            "flat": {"type": "bool"},
        });
        let synthesis = TypeBuilder::new().build_with_report(&document).unwrap();
        assert_eq!(synthesis.resolution_order.len(), 4);

        let record = synthesis
            .config_type
            .from_document(&json!({
                "top": {"shallow": 1, "deep": {"deeper": {"leaf": "x"}}},
                "flat": true,
            }))
            .unwrap();
        assert_eq!(
            record.lookup("top.deep.deeper.leaf").map(|v| v.to_value()),
            Some(json!("x"))
        );
    }

    #[test]
    fn test_caller_document_is_untouched() {
        let document = json!({"run": {"mode": {"type": "str"}}});
        let before = document.clone();
        get_config_type(&document).unwrap();
        assert_eq!(document, before);
    }

    #[test]
    fn test_non_mapping_root() {
        let err = get_config_type(&json!(["a"])).unwrap_err();
        assert!(matches!(err, Error::MalformedBranch { ref path, .. } if path.is_root()));
    }

    #[test]
    fn test_empty_document() {
        let config_t = get_config_type(&json!({})).unwrap();
        assert!(config_t.fields().is_empty());
        assert!(config_t.from_document(&json!({})).is_ok());
    }
}
