//! Built-in validators
//!
//! Field validators check one value against its siblings; whole-record
//! validators check the record mapping. Parameters come from
//! `validator_params` and are read with serde, rejecting unknown keys.
//!
//! Copyright (c) 2025 TypedConfig Team
//! Licensed under the Apache-2.0 license

use crate::registry::{Validator, ValidatorOptions, ValidatorRegistry};
use anyhow::bail;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::sync::Arc;

type Built = anyhow::Result<Arc<dyn Validator>>;

/// Register every built-in validator
pub fn register_all(registry: &mut ValidatorRegistry) {
    registry.register("range_check", range_check);
    registry.register("threshold", threshold);
    registry.register("mult_of", mult_of);
    registry.register("quadrant", quadrant);
    registry.register("zero_sum", zero_sum);
    registry.register("sum_by_name", sum_by_name);
}

fn params<T: DeserializeOwned>(params: &Map<String, Value>) -> anyhow::Result<T> {
    Ok(T::deserialize(Value::Object(params.clone()))?)
}

fn field_only(name: &str, target: &str) -> anyhow::Result<()> {
    if target.is_empty() {
        bail!("'{}' checks a single field and cannot be a root validator", name);
    }
    Ok(())
}

fn root_only(name: &str, target: &str) -> anyhow::Result<()> {
    if !target.is_empty() {
        bail!("'{}' checks a whole record and must be a root validator", name);
    }
    Ok(())
}

fn number(value: &Value) -> Result<f64, String> {
    value
        .as_f64()
        .ok_or_else(|| format!("expected a number, got {}", value))
}

fn list_values(values: &Map<String, Value>) -> String {
    let items: Vec<String> = values.values().map(Value::to_string).collect();
    format!("[{}]", items.join(", "))
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RangeCheck {
    min_key: String,
}

/// The field is the upper end of a range whose lower end is `min_key`
fn range_check(target: &str, _options: &ValidatorOptions, raw: &Map<String, Value>) -> Built {
    field_only("range_check", target)?;
    let RangeCheck { min_key } = params(raw)?;

    Ok(Arc::new(move |subject: &Value, values: &Map<String, Value>| {
        let Some(min) = values.get(&min_key) else {
            return Ok(());
        };
        if number(min)? > number(subject)? {
            return Err(format!("bad range: {} > {}", min, subject));
        }
        Ok(())
    }))
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Threshold {
    threshold: f64,
}

fn threshold(target: &str, _options: &ValidatorOptions, raw: &Map<String, Value>) -> Built {
    field_only("threshold", target)?;
    let Threshold { threshold } = params(raw)?;

    Ok(Arc::new(move |subject: &Value, _values: &Map<String, Value>| {
        if number(subject)? > threshold {
            return Err(format!("above threshold: {} > {}", subject, threshold));
        }
        Ok(())
    }))
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct MultOf {
    factor: f64,
}

fn mult_of(target: &str, _options: &ValidatorOptions, raw: &Map<String, Value>) -> Built {
    field_only("mult_of", target)?;
    let MultOf { factor } = params(raw)?;
    if factor == 0.0 {
        bail!("factor must be non-zero");
    }

    Ok(Arc::new(move |subject: &Value, _values: &Map<String, Value>| {
        if number(subject)? % factor != 0.0 {
            return Err(format!("{} is not a multiple of {}", subject, factor));
        }
        Ok(())
    }))
}

/// Axis names: either a list of keys or a string of one-letter keys
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Axes {
    Letters(String),
    Keys(Vec<String>),
}

impl Axes {
    fn into_keys(self) -> Vec<String> {
        match self {
            Axes::Letters(letters) => letters.chars().map(String::from).collect(),
            Axes::Keys(keys) => keys,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Quadrant {
    axes: Axes,
    signs: Vec<f64>,
}

/// Every named axis is present and has the requested sign (0 means any)
fn quadrant(target: &str, _options: &ValidatorOptions, raw: &Map<String, Value>) -> Built {
    root_only("quadrant", target)?;
    let Quadrant { axes, signs } = params(raw)?;
    let axes = axes.into_keys();
    if axes.len() != signs.len() {
        bail!("got {} axes but {} signs", axes.len(), signs.len());
    }

    Ok(Arc::new(move |_subject: &Value, values: &Map<String, Value>| {
        let inside = axes.iter().zip(&signs).all(|(axis, &sign)| {
            match values.get(axis).and_then(Value::as_f64) {
                Some(x) => sign == 0.0 || x * sign > 0.0,
                None => false,
            }
        });
        if inside {
            Ok(())
        } else {
            Err(format!(
                "{} not in quadrant: {:?}",
                Value::Object(values.clone()),
                signs
            ))
        }
    }))
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Total {
    total: f64,
}

/// All field values of the record add up to `total`
fn zero_sum(target: &str, _options: &ValidatorOptions, raw: &Map<String, Value>) -> Built {
    root_only("zero_sum", target)?;
    let Total { total } = params(raw)?;

    Ok(Arc::new(move |_subject: &Value, values: &Map<String, Value>| {
        let mut sum = 0.0;
        for value in values.values() {
            sum += number(value)?;
        }
        if sum != total {
            return Err(format!("{} do not add up to {}", list_values(values), total));
        }
        Ok(())
    }))
}

/// The fields `first` and `second` add up to `total`
fn sum_by_name(target: &str, _options: &ValidatorOptions, raw: &Map<String, Value>) -> Built {
    root_only("sum_by_name", target)?;
    let Total { total } = params(raw)?;

    Ok(Arc::new(move |_subject: &Value, values: &Map<String, Value>| {
        let get = |key: &str| values.get(key).map(number).unwrap_or(Ok(0.0));
        if get("first")? + get("second")? != total {
            return Err(format!("{} do not add up to {}", list_values(values), total));
        }
        Ok(())
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn build(name: &str, target: &str, raw: Value) -> Built {
        let mut registry = ValidatorRegistry::new();
        register_all(&mut registry);
        let raw = raw.as_object().cloned().unwrap_or_default();
        registry
            .get(name)
            .unwrap()
            .build(target, &ValidatorOptions::default(), &raw)
    }

    fn map(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_range_check() {
        let v = build("range_check", "max", json!({"min_key": "min"})).unwrap();
        assert!(v.validate(&json!(5), &map(json!({"min": 1}))).is_ok());
        assert!(v.validate(&json!(5), &map(json!({}))).is_ok());
        let err = v.validate(&json!(5), &map(json!({"min": 10}))).unwrap_err();
        assert_eq!(err, "bad range: 10 > 5");
    }

    #[test]
    fn test_threshold() {
        let v = build("threshold", "foo", json!({"threshold": 5})).unwrap();
        assert!(v.validate(&json!(2), &Map::new()).is_ok());
        let err = v.validate(&json!(6), &Map::new()).unwrap_err();
        assert!(err.starts_with("above threshold:"));
    }

    #[test]
    fn test_mult_of() {
        let v = build("mult_of", "leaf", json!({"factor": 5})).unwrap();
        assert!(v.validate(&json!(15), &Map::new()).is_ok());
        assert_eq!(
            v.validate(&json!(13), &Map::new()).unwrap_err(),
            "13 is not a multiple of 5"
        );
        assert!(build("mult_of", "leaf", json!({"factor": 0})).is_err());
    }

    #[test]
    fn test_quadrant() {
        let v = build("quadrant", "", json!({"axes": "xy", "signs": [1, -1]})).unwrap();
        let record = map(json!({"x": 2, "y": -3}));
        assert!(v.validate(&Value::Object(record.clone()), &record).is_ok());

        let record = map(json!({"x": 2, "y": 3}));
        let err = v.validate(&Value::Object(record.clone()), &record).unwrap_err();
        assert!(err.contains("not in quadrant"));

        let v = build("quadrant", "", json!({"axes": ["lon", "lat"], "signs": [0, 1]})).unwrap();
        let record = map(json!({"lon": -120.5, "lat": 45.0}));
        assert!(v.validate(&Value::Object(record.clone()), &record).is_ok());
    }

    #[test]
    fn test_sums() {
        let v = build("zero_sum", "", json!({"total": 15})).unwrap();
        let ok = map(json!({"foo": 5, "bar": 10}));
        assert!(v.validate(&Value::Object(ok.clone()), &ok).is_ok());
        let bad = map(json!({"foo": 15, "bar": 10}));
        let err = v.validate(&Value::Object(bad.clone()), &bad).unwrap_err();
        assert_eq!(err, "[15, 10] do not add up to 15");

        let v = build("sum_by_name", "", json!({"total": 15})).unwrap();
        let ok = map(json!({"first": 5, "second": 10, "nest": {"leaf": 15}}));
        assert!(v.validate(&Value::Object(ok.clone()), &ok).is_ok());
        let bad = map(json!({"first": 5, "second": 1}));
        assert!(v
            .validate(&Value::Object(bad.clone()), &bad)
            .unwrap_err()
            .contains("do not add up"));
    }

    #[test]
    fn test_target_kind_is_enforced() {
        assert!(build("threshold", "", json!({"threshold": 1})).is_err());
        assert!(build("zero_sum", "foo", json!({"total": 1})).is_err());
    }

    #[test]
    fn test_unknown_params_are_rejected() {
        assert!(build("threshold", "foo", json!({"threshold": 1, "extra": 2})).is_err());
        assert!(build("range_check", "foo", json!({})).is_err());
    }
}
