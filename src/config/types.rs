//! Raw config types matching the JSON model files (models.json + api_entities.json).

use crate::config::CrudMethods;
use crate::error::AppError;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;

/// Rust-side type a column value maps to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NativeType {
    Boolean,
    SmallInt,
    Integer,
    BigInt,
    Float,
    Double,
    Decimal,
    Text,
    Bytes,
    Uuid,
    Date,
    Time,
    DateTime,
    Json,
}

impl NativeType {
    /// Map a SQL type name (e.g. "int4", "varchar(255)", "timestamp with time zone").
    pub fn from_sql_name(name: &str) -> Option<Self> {
        let lower = name.trim().to_lowercase();
        let base = lower.split('(').next().unwrap_or("").trim();
        let ty = match base {
            "bool" | "boolean" => NativeType::Boolean,
            "smallint" | "int2" | "smallserial" | "serial2" => NativeType::SmallInt,
            "int" | "integer" | "int4" | "serial" | "serial4" => NativeType::Integer,
            "bigint" | "int8" | "bigserial" | "serial8" => NativeType::BigInt,
            "real" | "float4" => NativeType::Float,
            "double precision" | "float8" | "float" | "double" => NativeType::Double,
            "numeric" | "decimal" | "money" => NativeType::Decimal,
            "text" | "varchar" | "character varying" | "char" | "character" | "citext"
            | "string" => NativeType::Text,
            "bytea" | "blob" | "bytes" | "binary" => NativeType::Bytes,
            "uuid" => NativeType::Uuid,
            "date" => NativeType::Date,
            "time" | "timetz" => NativeType::Time,
            "json" | "jsonb" => NativeType::Json,
            b if b.starts_with("time with") || b.starts_with("time without") => NativeType::Time,
            b if b == "timestamp" || b == "timestamptz" || b.starts_with("timestamp ") => {
                NativeType::DateTime
            }
            _ => return None,
        };
        Some(ty)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NativeType::Boolean => "boolean",
            NativeType::SmallInt => "smallint",
            NativeType::Integer => "integer",
            NativeType::BigInt => "bigint",
            NativeType::Float => "real",
            NativeType::Double => "double precision",
            NativeType::Decimal => "numeric",
            NativeType::Text => "text",
            NativeType::Bytes => "bytea",
            NativeType::Uuid => "uuid",
            NativeType::Date => "date",
            NativeType::Time => "time",
            NativeType::DateTime => "timestamptz",
            NativeType::Json => "jsonb",
        }
    }

    /// Rust type a handler would bind this column to.
    pub fn rust_type(&self) -> &'static str {
        match self {
            NativeType::Boolean => "bool",
            NativeType::SmallInt => "i16",
            NativeType::Integer => "i32",
            NativeType::BigInt => "i64",
            NativeType::Float => "f32",
            NativeType::Double => "f64",
            NativeType::Decimal => "String",
            NativeType::Text => "String",
            NativeType::Bytes => "Vec<u8>",
            NativeType::Uuid => "uuid::Uuid",
            NativeType::Date => "chrono::NaiveDate",
            NativeType::Time => "chrono::NaiveTime",
            NativeType::DateTime => "chrono::DateTime<chrono::Utc>",
            NativeType::Json => "serde_json::Value",
        }
    }

    /// Parse a raw path segment (e.g. an id from `/users/:id`) into a JSON value of this type.
    pub fn parse_path_value(&self, raw: &str) -> Result<Value, AppError> {
        let invalid = || AppError::BadRequest(format!("invalid {}: {}", self.as_str(), raw));
        Ok(match self {
            NativeType::Boolean => {
                if raw.eq_ignore_ascii_case("true") {
                    Value::Bool(true)
                } else if raw.eq_ignore_ascii_case("false") {
                    Value::Bool(false)
                } else {
                    return Err(invalid());
                }
            }
            NativeType::SmallInt => Value::from(raw.parse::<i16>().map_err(|_| invalid())?),
            NativeType::Integer => Value::from(raw.parse::<i32>().map_err(|_| invalid())?),
            NativeType::BigInt => Value::from(raw.parse::<i64>().map_err(|_| invalid())?),
            NativeType::Float => {
                let n: f32 = raw.parse().map_err(|_| invalid())?;
                if !n.is_finite() {
                    return Err(invalid());
                }
                serde_json::Number::from_f64(f64::from(n))
                    .map(Value::Number)
                    .ok_or_else(invalid)?
            }
            NativeType::Double => {
                let n: f64 = raw.parse().map_err(|_| invalid())?;
                serde_json::Number::from_f64(n)
                    .map(Value::Number)
                    .ok_or_else(invalid)?
            }
            // Kept as text so precision is not lost; must still read as a finite number.
            NativeType::Decimal => {
                let n: f64 = raw.parse().map_err(|_| invalid())?;
                if !n.is_finite() {
                    return Err(invalid());
                }
                Value::String(raw.to_string())
            }
            NativeType::Uuid => {
                let u = uuid::Uuid::parse_str(raw).map_err(|_| invalid())?;
                Value::String(u.to_string())
            }
            NativeType::Date => {
                let d = chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| invalid())?;
                Value::String(d.to_string())
            }
            NativeType::Time => {
                let t = chrono::NaiveTime::parse_from_str(raw, "%H:%M:%S%.f").map_err(|_| invalid())?;
                Value::String(t.to_string())
            }
            NativeType::DateTime => {
                let dt = chrono::DateTime::parse_from_rfc3339(raw).map_err(|_| invalid())?;
                Value::String(dt.with_timezone(&chrono::Utc).to_rfc3339())
            }
            NativeType::Json => serde_json::from_str(raw).map_err(|_| invalid())?,
            NativeType::Text | NativeType::Bytes => Value::String(raw.to_string()),
        })
    }
}

impl fmt::Display for NativeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declared column type.
///
/// In JSON a string names a SQL type; unknown names become [`ColumnType::Opaque`].
/// An object `{ "name": "...", "impl": <type> }` is a custom type wrapping `impl`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ColumnType {
    Native(NativeType),
    /// Custom type with no native mapping of its own, delegating storage to `inner`.
    Wrapped { name: String, inner: Box<ColumnType> },
    /// Custom type that registered neither a native mapping nor an implementation.
    Opaque(String),
}

impl ColumnType {
    pub fn wrapped(name: impl Into<String>, inner: ColumnType) -> Self {
        ColumnType::Wrapped {
            name: name.into(),
            inner: Box::new(inner),
        }
    }

    /// The native mapping of this type itself, without looking at any wrapped type.
    pub fn direct_native(&self) -> Option<NativeType> {
        match self {
            ColumnType::Native(t) => Some(*t),
            ColumnType::Wrapped { .. } | ColumnType::Opaque(_) => None,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            ColumnType::Native(t) => t.as_str(),
            ColumnType::Wrapped { name, .. } | ColumnType::Opaque(name) => name,
        }
    }
}

impl From<NativeType> for ColumnType {
    fn from(t: NativeType) -> Self {
        ColumnType::Native(t)
    }
}

impl<'de> Deserialize<'de> for ColumnType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let v = Value::deserialize(deserializer)?;
        column_type_from_value(v).map_err(serde::de::Error::custom)
    }
}

fn column_type_from_value(v: Value) -> Result<ColumnType, String> {
    match v {
        Value::String(s) => Ok(match NativeType::from_sql_name(&s) {
            Some(t) => ColumnType::Native(t),
            None => ColumnType::Opaque(s),
        }),
        Value::Object(mut obj) => {
            let name = match obj.remove("name") {
                Some(Value::String(s)) => s,
                _ => return Err("custom column type requires a string \"name\"".into()),
            };
            let inner = obj.remove("impl");
            if !obj.is_empty() {
                return Err(format!(
                    "custom column type '{}' has unknown keys: {:?} (expected \"name\" and \"impl\")",
                    name,
                    obj.keys().collect::<Vec<_>>()
                ));
            }
            match inner {
                Some(inner) => Ok(ColumnType::Wrapped {
                    name,
                    inner: Box::new(column_type_from_value(inner)?),
                }),
                None => Ok(ColumnType::Opaque(name)),
            }
        }
        other => Err(format!(
            "column type must be a string or {{ \"name\": \"...\", \"impl\": ... }}; got {}",
            type_name_of_json(&other)
        )),
    }
}

impl Serialize for ColumnType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            ColumnType::Native(t) => serializer.serialize_str(t.as_str()),
            ColumnType::Wrapped { name, inner } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("name", name)?;
                map.serialize_entry("impl", inner)?;
                map.end()
            }
            ColumnType::Opaque(name) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("name", name)?;
                map.end()
            }
        }
    }
}

fn type_name_of_json(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    pub name: String,
    #[serde(default)]
    pub primary_key: bool,
    #[serde(default)]
    pub unique: bool,
    #[serde(rename = "type")]
    pub type_: ColumnType,
    #[serde(default = "default_true")]
    pub nullable: bool,
}

fn default_true() -> bool {
    true
}

impl ColumnDescriptor {
    pub fn new(name: impl Into<String>, type_: impl Into<ColumnType>) -> Self {
        Self {
            name: name.into(),
            primary_key: false,
            unique: false,
            type_: type_.into(),
            nullable: true,
        }
    }

    /// Mark as primary key. Primary key columns are never nullable.
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self.nullable = false;
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }
}

/// A table-like entity: columns in declared order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EntityModel {
    pub name: String,
    pub columns: Vec<ColumnDescriptor>,
}

impl EntityModel {
    pub fn new(name: impl Into<String>, columns: Vec<ColumnDescriptor>) -> Self {
        Self {
            name: name.into(),
            columns,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ApiEntityConfig {
    /// Name of the [`EntityModel`] exposed.
    pub model: String,
    pub path_segment: String,
    #[serde(default)]
    pub operations: CrudMethods,
}

/// All config types in one struct for in-memory loading.
#[derive(Clone, Debug, Default)]
pub struct FullConfig {
    pub models: Vec<EntityModel>,
    pub api_entities: Vec<ApiEntityConfig>,
}
