//! Built-in field types
//!
//! Scalar and container primitives, filesystem paths (plain or with a
//! column subset), literal choices and constrained numbers (optionally
//! tagged with a unit).
//!
//! Copyright (c) 2025 TypedConfig Team
//! Licensed under the Apache-2.0 license

use crate::registry::{FactoryContext, TypeFactory, TypeRegistry, ValueType};
use anyhow::{anyhow, bail};
use serde::Deserialize;
use serde_json::{Map, Number, Value};
use std::cmp::Ordering;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Register every built-in type
pub fn register_all(registry: &mut TypeRegistry) {
    for (name, kind) in [
        ("bool", Primitive::Bool),
        ("int", Primitive::Int),
        ("float", Primitive::Float),
        ("str", Primitive::Str),
        ("Any", Primitive::Any),
        ("List", Primitive::List),
        ("Dict", Primitive::Dict),
    ] {
        registry.register(name, PrimitiveFactory { name, kind });
    }

    for (name, kind) in [
        ("Path", PathKind::Any),
        ("FilePath", PathKind::File),
        ("DirectoryPath", PathKind::Directory),
        ("ConfFilePath", PathKind::ConfFile),
    ] {
        registry.register(name, PathFactory { name, kind });
    }
    registry.register("FileWithSubset", FileWithSubsetFactory);

    registry.register("Literal", LiteralFactory);

    registry.register("conint", NumberFactory::constrained("conint", true));
    registry.register("confloat", NumberFactory::constrained("confloat", false));
    registry.register("unitint", NumberFactory::unit("unitint", true));
    registry.register("unitfloat", NumberFactory::unit("unitfloat", false));

    let zero = || Some(Number::from(0));
    let positive = Bounds { gt: zero(), ..Bounds::default() };
    let negative = Bounds { lt: zero(), ..Bounds::default() };
    let non_negative = Bounds { ge: zero(), ..Bounds::default() };
    let non_positive = Bounds { le: zero(), ..Bounds::default() };
    registry.register("PositiveInt", NumberFactory::preset("PositiveInt", true, positive.clone()));
    registry.register("NegativeInt", NumberFactory::preset("NegativeInt", true, negative.clone()));
    registry.register("NonNegativeInt", NumberFactory::preset("NonNegativeInt", true, non_negative));
    registry.register("NonPositiveInt", NumberFactory::preset("NonPositiveInt", true, non_positive));
    registry.register("PositiveFloat", NumberFactory::preset("PositiveFloat", false, positive));
    registry.register("NegativeFloat", NumberFactory::preset("NegativeFloat", false, negative));
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Primitive {
    Bool,
    Int,
    Float,
    Str,
    Any,
    List,
    Dict,
}

#[derive(Debug)]
struct PrimitiveType {
    name: &'static str,
    kind: Primitive,
}

impl ValueType for PrimitiveType {
    fn name(&self) -> &str {
        self.name
    }

    fn check(&self, value: &Value) -> Result<Value, String> {
        let accepted = match (self.kind, value) {
            (Primitive::Any, _) => Some(value.clone()),
            (Primitive::Bool, Value::Bool(_)) => Some(value.clone()),
            (Primitive::Str, Value::String(_)) => Some(value.clone()),
            (Primitive::List, Value::Array(_)) => Some(value.clone()),
            (Primitive::Dict, Value::Object(_)) => Some(value.clone()),
            (Primitive::Int, _) => as_integer(value),
            (Primitive::Float, _) => as_float(value),
            _ => None,
        };
        accepted.ok_or_else(|| format!("value is not a valid {}: {}", self.name, value))
    }
}

struct PrimitiveFactory {
    name: &'static str,
    kind: Primitive,
}

impl TypeFactory for PrimitiveFactory {
    fn bare(&self, _ctx: FactoryContext<'_>) -> anyhow::Result<Arc<dyn ValueType>> {
        Ok(Arc::new(PrimitiveType {
            name: self.name,
            kind: self.kind,
        }))
    }
}

/// Integral numbers, including floats without a fractional part
fn as_integer(value: &Value) -> Option<Value> {
    match value {
        Value::Number(n) if n.is_i64() || n.is_u64() => Some(value.clone()),
        Value::Number(n) => n
            .as_f64()
            .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
            .map(|f| Value::from(f as i64)),
        _ => None,
    }
}

fn as_float(value: &Value) -> Option<Value> {
    value
        .as_f64()
        .and_then(Number::from_f64)
        .map(Value::Number)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PathKind {
    Any,
    File,
    Directory,
    ConfFile,
}

#[derive(Debug)]
struct PathType {
    name: &'static str,
    kind: PathKind,
    base: Option<PathBuf>,
}

impl ValueType for PathType {
    fn name(&self) -> &str {
        self.name
    }

    fn check(&self, value: &Value) -> Result<Value, String> {
        let raw = value
            .as_str()
            .ok_or_else(|| format!("value is not a valid path: {}", value))?;

        let path = match (&self.base, self.kind) {
            (Some(base), PathKind::ConfFile) if Path::new(raw).is_relative() => base.join(raw),
            _ => PathBuf::from(raw),
        };

        match self.kind {
            PathKind::Any => {}
            PathKind::File | PathKind::ConfFile => require_file(&path)?,
            PathKind::Directory => {
                if !path.exists() {
                    return Err(format!("file or directory at path \"{}\" does not exist", path.display()));
                }
                if !path.is_dir() {
                    return Err(format!("path \"{}\" does not point to a directory", path.display()));
                }
            }
        }

        Ok(Value::String(path.to_string_lossy().into_owned()))
    }

    fn describe(&self) -> String {
        match &self.base {
            Some(base) => format!("{}({})", self.name, base.display()),
            None => self.name.to_string(),
        }
    }
}

fn require_file(path: &Path) -> Result<(), String> {
    if !path.exists() {
        return Err(format!("file or directory at path \"{}\" does not exist", path.display()));
    }
    if !path.is_file() {
        return Err(format!("path \"{}\" does not point to a file", path.display()));
    }
    Ok(())
}

struct PathFactory {
    name: &'static str,
    kind: PathKind,
}

impl TypeFactory for PathFactory {
    fn bare(&self, ctx: FactoryContext<'_>) -> anyhow::Result<Arc<dyn ValueType>> {
        let base = match self.kind {
            PathKind::ConfFile => ctx.confdir.map(Path::to_path_buf),
            _ => None,
        };
        Ok(Arc::new(PathType {
            name: self.name,
            kind: self.kind,
            base,
        }))
    }
}

/// An existing file plus the column to read from it
///
/// Accepts `"path:column"` (split at the last colon) or a mapping with
/// `filepath` and `column`; the checked value is always the mapping.
#[derive(Debug)]
struct FileWithSubsetType;

impl ValueType for FileWithSubsetType {
    fn name(&self) -> &str {
        "FileWithSubset"
    }

    fn check(&self, value: &Value) -> Result<Value, String> {
        let (filepath, column) = match value {
            Value::String(raw) => raw
                .rsplit_once(':')
                .ok_or_else(|| format!("expected 'path:column', got \"{}\"", raw))?,
            Value::Object(map) => match (map.get("filepath"), map.get("column")) {
                (Some(Value::String(filepath)), Some(Value::String(column))) if map.len() == 2 => {
                    (filepath.as_str(), column.as_str())
                }
                _ => return Err(format!("expected 'filepath' and 'column' strings, got {}", value)),
            },
            other => return Err(format!("value is not a valid file subset: {}", other)),
        };
        require_file(Path::new(filepath))?;

        let mut subset = Map::new();
        subset.insert("filepath".to_string(), Value::from(filepath));
        subset.insert("column".to_string(), Value::from(column));
        Ok(Value::Object(subset))
    }
}

struct FileWithSubsetFactory;

impl TypeFactory for FileWithSubsetFactory {
    fn bare(&self, _ctx: FactoryContext<'_>) -> anyhow::Result<Arc<dyn ValueType>> {
        Ok(Arc::new(FileWithSubsetType))
    }
}

#[derive(Debug)]
struct LiteralType {
    choices: Vec<Value>,
}

impl ValueType for LiteralType {
    fn name(&self) -> &str {
        "Literal"
    }

    fn check(&self, value: &Value) -> Result<Value, String> {
        if self.choices.contains(value) {
            Ok(value.clone())
        } else {
            Err(format!(
                "unexpected value {}; permitted: {}",
                value,
                join_values(&self.choices)
            ))
        }
    }

    fn describe(&self) -> String {
        format!("Literal[{}]", join_values(&self.choices))
    }
}

fn join_values(values: &[Value]) -> String {
    values
        .iter()
        .map(Value::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

struct LiteralFactory;

impl TypeFactory for LiteralFactory {
    fn bare(&self, _ctx: FactoryContext<'_>) -> anyhow::Result<Arc<dyn ValueType>> {
        bail!("Literal needs a sequence of permitted values")
    }

    fn with_params(
        &self,
        _ctx: FactoryContext<'_>,
        params: &[Value],
    ) -> anyhow::Result<Arc<dyn ValueType>> {
        if params.is_empty() {
            bail!("Literal needs at least one permitted value");
        }
        Ok(Arc::new(LiteralType {
            choices: params.to_vec(),
        }))
    }
}

/// Numeric constraints shared by the constrained number types
///
/// Bounds keep the number as written, so integers compare exactly at any
/// magnitude and only mixed comparisons go through `f64`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
struct Bounds {
    gt: Option<Number>,
    ge: Option<Number>,
    lt: Option<Number>,
    le: Option<Number>,
    multiple_of: Option<Number>,
}

fn as_wide_integer(n: &Number) -> Option<i128> {
    n.as_i64().map(i128::from).or_else(|| n.as_u64().map(i128::from))
}

fn compare(x: &Number, bound: &Number) -> Option<Ordering> {
    match (as_wide_integer(x), as_wide_integer(bound)) {
        (Some(x), Some(bound)) => Some(x.cmp(&bound)),
        _ => x.as_f64()?.partial_cmp(&bound.as_f64()?),
    }
}

fn is_multiple(x: &Number, factor: &Number) -> bool {
    match (as_wide_integer(x), as_wide_integer(factor)) {
        (Some(x), Some(factor)) => factor != 0 && x % factor == 0,
        _ => match (x.as_f64(), factor.as_f64()) {
            (Some(x), Some(factor)) => x % factor == 0.0,
            _ => false,
        },
    }
}

impl Bounds {
    fn validate(&self) -> anyhow::Result<()> {
        if let Some(factor) = &self.multiple_of {
            if factor.as_f64() == Some(0.0) {
                bail!("multiple_of must be non-zero");
            }
        }
        Ok(())
    }

    fn check(&self, x: &Number) -> Result<(), String> {
        use Ordering::{Equal, Greater, Less};

        if let Some(gt) = &self.gt {
            if !matches!(compare(x, gt), Some(Greater)) {
                return Err(format!("ensure this value is greater than {}", gt));
            }
        }
        if let Some(ge) = &self.ge {
            if !matches!(compare(x, ge), Some(Greater | Equal)) {
                return Err(format!("ensure this value is greater than or equal to {}", ge));
            }
        }
        if let Some(lt) = &self.lt {
            if !matches!(compare(x, lt), Some(Less)) {
                return Err(format!("ensure this value is less than {}", lt));
            }
        }
        if let Some(le) = &self.le {
            if !matches!(compare(x, le), Some(Less | Equal)) {
                return Err(format!("ensure this value is less than or equal to {}", le));
            }
        }
        if let Some(factor) = &self.multiple_of {
            if !is_multiple(x, factor) {
                return Err(format!("ensure this value is a multiple of {}", factor));
            }
        }
        Ok(())
    }

    fn describe(&self) -> String {
        let mut parts = String::new();
        for (label, bound) in [
            ("gt", &self.gt),
            ("ge", &self.ge),
            ("lt", &self.lt),
            ("le", &self.le),
            ("multiple_of", &self.multiple_of),
        ] {
            if let Some(bound) = bound {
                if !parts.is_empty() {
                    parts.push_str(", ");
                }
                let _ = write!(parts, "{}={}", label, bound);
            }
        }
        parts
    }
}

#[derive(Debug)]
struct NumberType {
    name: &'static str,
    integer: bool,
    bounds: Bounds,
    unit: Option<String>,
}

impl ValueType for NumberType {
    fn name(&self) -> &str {
        self.name
    }

    fn check(&self, value: &Value) -> Result<Value, String> {
        let accepted = if self.integer {
            as_integer(value)
        } else {
            as_float(value)
        };
        let kind = if self.integer { "integer" } else { "float" };
        let accepted =
            accepted.ok_or_else(|| format!("value is not a valid {}: {}", kind, value))?;

        let Value::Number(x) = &accepted else {
            return Err(format!("value is not a valid {}: {}", kind, value));
        };
        self.bounds.check(x)?;
        Ok(accepted)
    }

    fn describe(&self) -> String {
        let mut description = self.name.to_string();
        if let Some(unit) = &self.unit {
            let _ = write!(description, "[{}]", unit);
        }
        let bounds = self.bounds.describe();
        if !bounds.is_empty() {
            let _ = write!(description, "({})", bounds);
        }
        description
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NumberKind {
    /// Options are the constraints themselves
    Constrained,
    /// Fixed constraints, no options
    Preset,
    /// A required `unit` plus constraints
    Unit,
}

struct NumberFactory {
    name: &'static str,
    integer: bool,
    kind: NumberKind,
    preset: Bounds,
}

impl NumberFactory {
    fn constrained(name: &'static str, integer: bool) -> Self {
        Self {
            name,
            integer,
            kind: NumberKind::Constrained,
            preset: Bounds::default(),
        }
    }

    fn preset(name: &'static str, integer: bool, preset: Bounds) -> Self {
        Self {
            name,
            integer,
            kind: NumberKind::Preset,
            preset,
        }
    }

    fn unit(name: &'static str, integer: bool) -> Self {
        Self {
            name,
            integer,
            kind: NumberKind::Unit,
            preset: Bounds::default(),
        }
    }

    fn make(&self, bounds: Bounds, unit: Option<String>) -> Arc<dyn ValueType> {
        Arc::new(NumberType {
            name: self.name,
            integer: self.integer,
            bounds,
            unit,
        })
    }
}

impl TypeFactory for NumberFactory {
    fn bare(&self, _ctx: FactoryContext<'_>) -> anyhow::Result<Arc<dyn ValueType>> {
        match self.kind {
            NumberKind::Unit => bail!("{} needs a 'unit' option", self.name),
            _ => Ok(self.make(self.preset.clone(), None)),
        }
    }

    fn with_kwargs(
        &self,
        _ctx: FactoryContext<'_>,
        kwargs: &Map<String, Value>,
    ) -> anyhow::Result<Arc<dyn ValueType>> {
        match self.kind {
            NumberKind::Preset => bail!("{} does not accept options", self.name),
            NumberKind::Constrained => {
                let bounds = Bounds::deserialize(&Value::Object(kwargs.clone()))?;
                bounds.validate()?;
                Ok(self.make(bounds, None))
            }
            NumberKind::Unit => {
                let mut rest = kwargs.clone();
                let unit = match rest.remove("unit") {
                    Some(Value::String(unit)) => unit,
                    Some(other) => bail!("unit must be a string, got {}", other),
                    None => return Err(anyhow!("{} needs a 'unit' option", self.name)),
                };
                let bounds = Bounds::deserialize(&Value::Object(rest))?;
                bounds.validate()?;
                Ok(self.make(bounds, Some(unit)))
            }
        }
    }
}
