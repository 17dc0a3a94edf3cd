//! Allowed CRUD operations for a generated endpoint set.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Operation names a generated router understands, in canonical order.
pub const VALID_METHODS: [&str; 7] = [
    "create",
    "read",
    "read_multi",
    "read_paginated",
    "update",
    "delete",
    "db_delete",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CrudMethod {
    Create,
    Read,
    ReadMulti,
    ReadPaginated,
    Update,
    /// Soft delete when the model supports it.
    Delete,
    /// Hard delete from the database.
    DbDelete,
}

impl CrudMethod {
    pub const ALL: [CrudMethod; 7] = [
        CrudMethod::Create,
        CrudMethod::Read,
        CrudMethod::ReadMulti,
        CrudMethod::ReadPaginated,
        CrudMethod::Update,
        CrudMethod::Delete,
        CrudMethod::DbDelete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CrudMethod::Create => "create",
            CrudMethod::Read => "read",
            CrudMethod::ReadMulti => "read_multi",
            CrudMethod::ReadPaginated => "read_paginated",
            CrudMethod::Update => "update",
            CrudMethod::Delete => "delete",
            CrudMethod::DbDelete => "db_delete",
        }
    }
}

impl fmt::Display for CrudMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CrudMethod {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CrudMethod::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| ConfigError::InvalidMethod(s.to_string()))
    }
}

/// Check every name against [`VALID_METHODS`]. Returns the input untouched: order and
/// duplicates are kept. Fails on the first unknown name.
pub fn validate_methods(values: Vec<String>) -> Result<Vec<String>, ConfigError> {
    for v in &values {
        if !VALID_METHODS.contains(&v.as_str()) {
            return Err(ConfigError::InvalidMethod(v.clone()));
        }
    }
    Ok(values)
}

/// A validated method set. Deserializing goes through [`validate_methods`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct CrudMethods {
    valid_methods: Vec<String>,
}

impl CrudMethods {
    pub fn new<I, S>(methods: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let valid_methods = validate_methods(methods.into_iter().map(Into::into).collect())?;
        Ok(Self { valid_methods })
    }

    pub fn as_slice(&self) -> &[String] {
        &self.valid_methods
    }

    pub fn allows(&self, method: CrudMethod) -> bool {
        self.valid_methods.iter().any(|m| m == method.as_str())
    }
}

impl Default for CrudMethods {
    fn default() -> Self {
        Self {
            valid_methods: VALID_METHODS.iter().map(|m| m.to_string()).collect(),
        }
    }
}

impl TryFrom<Vec<String>> for CrudMethods {
    type Error = ConfigError;

    fn try_from(values: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(values)
    }
}

impl From<CrudMethods> for Vec<String> {
    fn from(methods: CrudMethods) -> Self {
        methods.valid_methods
    }
}
