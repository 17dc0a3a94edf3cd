//! Resolved entity model: config validated and flattened for endpoint generation.

use crate::config::{CrudMethods, NativeType};
use std::collections::HashMap;

#[derive(Clone, Debug)]
pub struct ColumnInfo {
    pub name: String,
    /// None when the column's custom type has no native mapping (primary keys always resolve).
    pub native_type: Option<NativeType>,
    pub nullable: bool,
    pub primary_key: bool,
    pub unique: bool,
}

#[derive(Clone, Debug)]
pub struct ResolvedEntity {
    pub table_name: String,
    pub path_segment: String,
    /// Full ordered identity.
    pub pk_columns: Vec<String>,
    /// First primary key column only; composite keys are truncated here.
    pub pk_name: String,
    /// Native type of `pk_name`, used to parse `/:id` path segments.
    pub pk_type: NativeType,
    pub columns: Vec<ColumnInfo>,
    /// Columns checked for conflicts before create/update.
    pub unique_columns: Vec<String>,
    pub operations: CrudMethods,
}

impl ResolvedEntity {
    pub fn column(&self, name: &str) -> Option<&ColumnInfo> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn has_composite_key(&self) -> bool {
        self.pk_columns.len() > 1
    }
}

#[derive(Clone, Debug, Default)]
pub struct ResolvedModel {
    pub entities: Vec<ResolvedEntity>,
    pub entity_by_path: HashMap<String, ResolvedEntity>,
}

impl ResolvedModel {
    pub fn entity_by_path(&self, path: &str) -> Option<&ResolvedEntity> {
        self.entity_by_path.get(path)
    }
}
