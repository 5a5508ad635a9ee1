//! Leaf spec interpretation
//!
//! Copyright (c) 2025 TypedConfig Team
//! Licensed under the Apache-2.0 license

use super::{Interpreter, NodeKind, ResolvedRule};
use crate::error::{Error, OptsPolicy, Result, SchemaWarning};
use crate::record::FieldType;
use crate::tree::NodePath;
use serde_json::{Map, Value};
use tracing::warn;

impl Interpreter<'_> {
    /// Resolve the `type`, `validator` and pass-through keys of a leaf
    pub fn resolve_leaf(&mut self, path: &NodePath, rule: &Value) -> Result<ResolvedRule> {
        let Value::Object(declaration) = rule else {
            return Err(NodeKind::Leaf.malformed(
                path,
                format!("expected a mapping of spec keys, got {}", rule),
            ));
        };

        let mut resolved = ResolvedRule {
            ty: self.resolve_type(path, declaration)?,
            validators: self
                .resolve_validator(path, declaration, NodeKind::Leaf)?
                .into_iter()
                .collect(),
            ..ResolvedRule::default()
        };
        Self::pass_through(path, declaration, NodeKind::Leaf, &mut resolved)?;
        Ok(resolved)
    }

    fn resolve_type(&mut self, path: &NodePath, declaration: &Map<String, Value>) -> Result<Option<FieldType>> {
        let name = match declaration.get("type") {
            None | Some(Value::Null) => return Ok(None),
            Some(Value::String(name)) => name.as_str(),
            Some(other) => {
                return Err(NodeKind::Leaf.malformed(path, format!("type must be a name, got {}", other)))
            }
        };

        let factory = self.types.get(name).ok_or_else(|| Error::UnknownType {
            name: name.to_string(),
            path: path.clone(),
        })?;
        let ctx = self.types.context();

        let built = match declaration.get("opts") {
            None | Some(Value::Null) => factory.bare(ctx),
            Some(Value::Array(params)) if params.is_empty() => factory.bare(ctx),
            Some(Value::Array(params)) => factory.with_params(ctx, params),
            Some(Value::Object(kwargs)) if kwargs.is_empty() => factory.bare(ctx),
            Some(Value::Object(kwargs)) => factory.with_kwargs(ctx, kwargs),
            Some(other) => match self.policy {
                OptsPolicy::Deny => {
                    return Err(Error::AmbiguousOpts {
                        name: name.to_string(),
                        path: path.clone(),
                        opts: other.to_string(),
                    })
                }
                OptsPolicy::Warn => {
                    warn!(path = %path, opts = %other, "ambiguous option ignored");
                    self.warnings.push(SchemaWarning::new(
                        path,
                        format!("ambiguous option ignored: {}", other),
                    ));
                    factory.bare(ctx)
                }
            },
        };

        let built = built.map_err(|source| Error::TypeConstruction {
            name: name.to_string(),
            path: path.clone(),
            source,
        })?;
        Ok(Some(FieldType::Scalar(built)))
    }
}
