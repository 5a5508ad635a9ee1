//! Record type synthesis
//!
//! Copyright (c) 2025 TypedConfig Team
//! Licensed under the Apache-2.0 license

use crate::error::{Error, Result};
use crate::interpret::ResolvedRule;
use crate::record::{Capability, FieldSpec, RecordType};
use crate::registry::ValidatorBinding;
use tracing::trace;

/// Build a record type from resolved fields in declaration order
///
/// Fields without a default keep their relative order and come first,
/// followed by the defaulted fields in theirs. Every validator the fields
/// declare is installed on the new type.
pub fn synthesize(
    name: &str,
    fields: Vec<(String, ResolvedRule)>,
    bases: &[Capability],
) -> Result<RecordType> {
    synthesize_with(name, fields, Vec::new(), bases)
}

/// Like [`synthesize`], with extra validators declared by the record itself
pub(crate) fn synthesize_with(
    name: &str,
    fields: Vec<(String, ResolvedRule)>,
    own_validators: Vec<ValidatorBinding>,
    bases: &[Capability],
) -> Result<RecordType> {
    let declaration_order: Vec<String> = fields.iter().map(|(key, _)| key.clone()).collect();

    let mut validators = own_validators;
    let mut required = Vec::new();
    let mut defaulted = Vec::new();

    for (key, rule) in fields {
        let ResolvedRule {
            ty,
            validators: declared,
            default,
            doc,
            id,
        } = rule;

        let ty = ty.ok_or_else(|| Error::UnresolvedType {
            record: name.to_string(),
            field: key.clone(),
        })?;
        validators.extend(declared);

        let spec = FieldSpec {
            name: key,
            ty,
            default,
            doc,
            id,
        };
        if spec.is_required() {
            required.push(spec);
        } else {
            defaulted.push(spec);
        }
    }

    required.extend(defaulted);
    trace!(record = name, fields = required.len(), validators = validators.len(), "synthesized record type");
    RecordType::from_parts(name.to_string(), required, declaration_order, validators, bases)
}
