//! Record instances and their construction
//!
//! Copyright (c) 2025 TypedConfig Team
//! Licensed under the Apache-2.0 license

use super::error::{FieldPath, ValidationErrors};
use super::types::{Capability, FieldSpec, FieldType, RecordType};
use crate::error::{Error, Result};
use crate::registry::ValidatorBinding;
use serde_json::{Map, Value};
use std::path::Path;
use tracing::debug;
use typedconfig_schemas::{Format, SchemaParser};

/// Value held by one field of a record
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Value(Value),
    Record(Record),
}

impl FieldValue {
    /// Plain document form of the value
    pub fn to_value(&self) -> Value {
        match self {
            FieldValue::Value(value) => value.clone(),
            FieldValue::Record(record) => record.to_value(),
        }
    }
}

/// A validated instance of a [`RecordType`]
#[derive(Debug, Clone)]
pub struct Record {
    record_type: RecordType,
    values: Vec<(String, FieldValue)>,
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.record_type.name() == other.record_type.name() && self.values == other.values
    }
}

impl Record {
    pub fn record_type(&self) -> &RecordType {
        &self.record_type
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    /// Scalar value of a field
    pub fn get_value(&self, name: &str) -> Option<&Value> {
        match self.get(name)? {
            FieldValue::Value(value) => Some(value),
            FieldValue::Record(_) => None,
        }
    }

    /// Nested record of a field
    pub fn get_record(&self, name: &str) -> Option<&Record> {
        match self.get(name)? {
            FieldValue::Record(record) => Some(record),
            FieldValue::Value(_) => None,
        }
    }

    /// Follow a dotted path of field names, e.g. `top.nest.leaf`
    pub fn lookup(&self, dotted: &str) -> Option<&FieldValue> {
        let mut parts = dotted.split('.');
        let first = self.get(parts.next()?)?;
        parts.try_fold(first, |current, part| match current {
            FieldValue::Record(record) => record.get(part),
            FieldValue::Value(_) => None,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.values.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Plain document form of the record, in field order
    pub fn to_value(&self) -> Value {
        Value::Object(self.plain_values())
    }

    fn plain_values(&self) -> Map<String, Value> {
        self.values
            .iter()
            .map(|(key, value)| (key.clone(), value.to_value()))
            .collect()
    }

    /// Export the record as a mapping
    pub fn to_mapping(&self) -> Result<Map<String, Value>> {
        self.record_type.require(Capability::Io)?;
        Ok(self.plain_values())
    }

    pub fn write_yaml(&self, path: impl AsRef<Path>) -> Result<()> {
        self.write_as(path.as_ref(), Format::Yaml)
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<()> {
        self.write_as(path.as_ref(), Format::Json)
    }

    /// Write the record, picking the format from the file extension
    pub fn write_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        self.write_as(path, Format::from_path(path)?)
    }

    fn write_as(&self, path: &Path, format: Format) -> Result<()> {
        let mapping = self.to_mapping()?;
        SchemaParser::new().write_file_as(&Value::Object(mapping), path, format)?;
        Ok(())
    }
}

impl RecordType {
    /// Construct and validate an instance from a mapping
    ///
    /// Every failure is collected; the error lists all of them.
    pub fn instantiate(&self, values: &Map<String, Value>) -> Result<Record> {
        debug!(record = self.name(), keys = values.len(), "constructing record");
        Ok(self.construct(values, &FieldPath::root())?)
    }

    /// Construct the configuration from a whole document
    pub fn from_document(&self, document: &Value) -> Result<Record> {
        self.require(Capability::Io)?;
        match document {
            Value::Object(map) => self.instantiate(map),
            other => Err(Error::Validation(
                FieldPath::root()
                    .error(format!("expected a mapping at the root, got {}", kind_of(other)))
                    .into(),
            )),
        }
    }

    pub fn read_yaml(&self, path: impl AsRef<Path>) -> Result<Record> {
        self.read_as(path.as_ref(), Format::Yaml)
    }

    pub fn read_json(&self, path: impl AsRef<Path>) -> Result<Record> {
        self.read_as(path.as_ref(), Format::Json)
    }

    /// Read a configuration file, picking the format from the extension
    pub fn read_file(&self, path: impl AsRef<Path>) -> Result<Record> {
        let path = path.as_ref();
        self.read_as(path, Format::from_path(path)?)
    }

    fn read_as(&self, path: &Path, format: Format) -> Result<Record> {
        self.require(Capability::Io)?;
        let document = SchemaParser::new().parse_file_as(path, format)?;
        self.from_document(&document)
    }

    fn construct(
        &self,
        input: &Map<String, Value>,
        path: &FieldPath,
    ) -> std::result::Result<Record, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        for key in input.keys() {
            if self.field(key).is_none() {
                errors.add(path.child(key).error("extra fields not permitted"));
            }
        }

        let raw = Value::Object(input.clone());
        for binding in self.root_validators().filter(|b| b.options.pre) {
            run_validator(binding, &raw, input, path, &mut errors);
        }

        let mut validated = Map::new();
        let mut values = Vec::with_capacity(self.fields().len());
        let mut field_failed = false;

        for field in self.fields() {
            let field_path = path.child(&field.name);
            match self.construct_field(field, input.get(&field.name), &validated, &field_path) {
                Ok(value) => {
                    validated.insert(field.name.clone(), value.to_value());
                    values.push((field.name.clone(), value));
                }
                Err(field_errors) => {
                    field_failed = true;
                    errors.extend(field_errors);
                }
            }
        }

        if !field_failed {
            let whole = Value::Object(validated.clone());
            for binding in self.root_validators().filter(|b| !b.options.pre) {
                run_validator(binding, &whole, &validated, path, &mut errors);
            }
        }

        errors.into_result()?;
        Ok(Record {
            record_type: self.clone(),
            values,
        })
    }

    fn construct_field(
        &self,
        field: &FieldSpec,
        raw: Option<&Value>,
        validated: &Map<String, Value>,
        path: &FieldPath,
    ) -> std::result::Result<FieldValue, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let (raw, from_default) = match (raw, &field.default) {
            (Some(raw), _) => (raw, false),
            (None, Some(default)) => (default, true),
            (None, None) => return Err(path.error("field required").into()),
        };
        let runs = |binding: &&ValidatorBinding| !from_default || binding.options.always;

        for binding in self.field_validators(&field.name).filter(|b| b.options.pre).filter(runs) {
            run_validator(binding, raw, validated, path, &mut errors);
        }
        errors.into_result()?;

        // a null default makes the field optional
        let value = if from_default && raw.is_null() {
            FieldValue::Value(Value::Null)
        } else {
            check_field(&field.ty, raw, path)?
        };

        let plain = value.to_value();
        let mut errors = ValidationErrors::new();
        for binding in self.field_validators(&field.name).filter(|b| !b.options.pre).filter(runs) {
            run_validator(binding, &plain, validated, path, &mut errors);
        }
        errors.into_result()?;
        Ok(value)
    }
}

fn check_field(
    ty: &FieldType,
    raw: &Value,
    path: &FieldPath,
) -> std::result::Result<FieldValue, ValidationErrors> {
    match ty {
        FieldType::Scalar(value_type) => value_type
            .check(raw)
            .map(FieldValue::Value)
            .map_err(|message| path.error(message).into()),
        FieldType::Record(record_type) => match raw {
            Value::Object(map) => record_type.construct(map, path).map(FieldValue::Record),
            other => Err(path
                .error(format!("expected a mapping for {}, got {}", record_type.name(), kind_of(other)))
                .into()),
        },
    }
}

fn run_validator(
    binding: &ValidatorBinding,
    subject: &Value,
    values: &Map<String, Value>,
    path: &FieldPath,
    errors: &mut ValidationErrors,
) {
    if let Err(message) = binding.run(subject, values) {
        errors.add(path.error(message).with_rule(binding.name.clone()));
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::Builtins;
    use crate::registry::{RegistryPlugin, TypeRegistry, ValidatorOptions, ValidatorRegistry};
    use serde_json::json;
    use std::sync::Arc;
    use tempfile::tempdir;

    struct Catalogue {
        types: TypeRegistry,
        validators: ValidatorRegistry,
    }

    impl Catalogue {
        fn new() -> Self {
            let mut types = TypeRegistry::new();
            let mut validators = ValidatorRegistry::new();
            Builtins.register(&mut types, &mut validators);
            Self { types, validators }
        }

        fn field(&self, name: &str, ty: &str) -> FieldSpec {
            let ty = self.types.get(ty).unwrap().bare(self.types.context()).unwrap();
            FieldSpec::new(name, FieldType::Scalar(ty))
        }

        fn binding(&self, name: &str, target: &str, options: ValidatorOptions, params: Value) -> ValidatorBinding {
            let params = params.as_object().cloned().unwrap();
            let validator = self
                .validators
                .get(name)
                .unwrap()
                .build(target, &options, &params)
                .unwrap();
            ValidatorBinding {
                name: name.to_string(),
                target: target.to_string(),
                options,
                params,
                validator,
            }
        }
    }

    fn map(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    fn range_type(cat: &Catalogue) -> RecordType {
        RecordType::new(
            "range_t",
            vec![cat.field("min", "PositiveInt"), cat.field("max", "PositiveInt")],
            vec![cat.binding("range_check", "max", ValidatorOptions::default(), json!({"min_key": "min"}))],
            &[Capability::Io],
        )
        .unwrap()
    }

    #[test]
    fn test_instantiate_and_access() {
        let cat = Catalogue::new();
        let record = range_type(&cat).instantiate(&map(json!({"min": 1, "max": 5}))).unwrap();
        assert_eq!(record.get_value("min"), Some(&json!(1)));
        assert_eq!(record.get_value("max"), Some(&json!(5)));
        assert!(record.get_record("min").is_none());
        assert_eq!(record.to_value(), json!({"min": 1, "max": 5}));
    }

    #[test]
    fn test_errors_are_collected() {
        let cat = Catalogue::new();
        let ty = range_type(&cat);

        let err = ty.instantiate(&map(json!({"min": -1, "extra": 0}))).unwrap_err();
        let Error::Validation(errors) = err else {
            panic!("expected validation errors");
        };
        let paths: Vec<&str> = errors.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, ["$.extra", "$.min", "$.max"]);
        assert_eq!(errors.errors[2].message, "field required");

        let err = ty.instantiate(&map(json!({"min": 10, "max": 5}))).unwrap_err();
        let Error::Validation(errors) = err else {
            panic!("expected validation errors");
        };
        assert_eq!(errors.errors[0].rule.as_deref(), Some("range_check"));
        assert_eq!(errors.errors[0].message, "bad range: 10 > 5");
    }

    #[test]
    fn test_defaults_skip_validators_unless_always() {
        let cat = Catalogue::new();
        let lenient = RecordType::new(
            "t",
            vec![cat.field("level", "int").with_default(json!(9))],
            vec![cat.binding("threshold", "level", ValidatorOptions::default(), json!({"threshold": 5}))],
            &[],
        )
        .unwrap();
        let record = lenient.instantiate(&Map::new()).unwrap();
        assert_eq!(record.get_value("level"), Some(&json!(9)));
        assert!(lenient.instantiate(&map(json!({"level": 9}))).is_err());

        let always = ValidatorOptions { pre: false, always: true };
        let strict = RecordType::new(
            "t",
            vec![cat.field("level", "int").with_default(json!(9))],
            vec![cat.binding("threshold", "level", always, json!({"threshold": 5}))],
            &[],
        )
        .unwrap();
        assert!(strict.instantiate(&Map::new()).is_err());
    }

    #[test]
    fn test_null_default_is_optional() {
        let cat = Catalogue::new();
        let ty = RecordType::new(
            "opts_t",
            vec![cat.field("moreopts", "Any").with_default(Value::Null)],
            vec![],
            &[],
        )
        .unwrap();
        let record = ty.instantiate(&Map::new()).unwrap();
        assert_eq!(record.get_value("moreopts"), Some(&Value::Null));
    }

    #[test]
    fn test_pre_validator_sees_raw_input() {
        let cat = Catalogue::new();
        let seen_raw = ValidatorBinding {
            name: "no_strings".to_string(),
            target: "count".to_string(),
            options: ValidatorOptions { pre: true, always: false },
            params: Map::new(),
            validator: Arc::new(|subject: &Value, _: &Map<String, Value>| {
                if subject.is_string() {
                    Err("strings are not accepted".to_string())
                } else {
                    Ok(())
                }
            }),
        };
        let ty = RecordType::new("t", vec![cat.field("count", "int")], vec![seen_raw], &[]).unwrap();

        let Error::Validation(errors) = ty.instantiate(&map(json!({"count": "3"}))).unwrap_err() else {
            panic!("expected validation errors");
        };
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.errors[0].message, "strings are not accepted");
    }

    #[test]
    fn test_nested_record_paths_and_lookup() {
        let cat = Catalogue::new();
        let inner = RecordType::new(
            "zero_sum_total_t",
            vec![cat.field("foo", "PositiveInt"), cat.field("bar", "PositiveInt")],
            vec![cat.binding("zero_sum", "", ValidatorOptions::default(), json!({"total": 15}))],
            &[],
        )
        .unwrap();
        let outer = RecordType::new(
            "config_t",
            vec![FieldSpec::new("zero_sum_total", FieldType::Record(inner))],
            vec![],
            &[Capability::Io],
        )
        .unwrap();

        let record = outer
            .from_document(&json!({"zero_sum_total": {"foo": 5, "bar": 10}}))
            .unwrap();
        assert_eq!(
            record.lookup("zero_sum_total.bar"),
            Some(&FieldValue::Value(json!(10)))
        );
        assert!(record.lookup("zero_sum_total.nope").is_none());

        let Error::Validation(errors) = outer
            .from_document(&json!({"zero_sum_total": {"foo": 15, "bar": 10}}))
            .unwrap_err()
        else {
            panic!("expected validation errors");
        };
        assert_eq!(errors.errors[0].path, "$.zero_sum_total");
        assert!(errors.errors[0].message.contains("do not add up"));

        assert!(outer.from_document(&json!([1, 2])).is_err());
        assert!(outer.from_document(&json!({"zero_sum_total": 3})).is_err());
    }

    #[test]
    fn test_io_requires_capability() {
        let cat = Catalogue::new();
        let plain = RecordType::new("inner_t", vec![cat.field("x", "int")], vec![], &[]).unwrap();

        let err = plain.from_document(&json!({"x": 1})).unwrap_err();
        assert!(matches!(err, Error::MissingCapability { .. }));

        let record = plain.instantiate(&map(json!({"x": 1}))).unwrap();
        assert!(matches!(record.to_mapping(), Err(Error::MissingCapability { .. })));
    }

    #[test]
    fn test_yaml_and_json_round_trip() {
        let cat = Catalogue::new();
        let ty = range_type(&cat);
        let record = ty.instantiate(&map(json!({"min": 2, "max": 7}))).unwrap();
        let dir = tempdir().unwrap();

        let yaml = dir.path().join("range.yaml");
        record.write_yaml(&yaml).unwrap();
        assert_eq!(ty.read_yaml(&yaml).unwrap(), record);

        let json_path = dir.path().join("range.json");
        record.write_json(&json_path).unwrap();
        assert_eq!(ty.read_json(&json_path).unwrap(), record);
        assert_eq!(ty.read_file(&json_path).unwrap(), record);
    }
}
