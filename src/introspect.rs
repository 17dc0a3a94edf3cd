//! Read-only queries over an [`EntityModel`]: identity, native column types, uniqueness.
//!
//! All failures are configuration-time errors. They are raised while endpoint metadata is
//! built and should abort startup.

use crate::config::{ColumnDescriptor, ColumnType, EntityModel, NativeType};
use crate::error::ConfigError;

/// All primary key columns in declared order.
pub fn primary_keys(model: &EntityModel) -> Result<Vec<&ColumnDescriptor>, ConfigError> {
    let keys: Vec<&ColumnDescriptor> = model.columns.iter().filter(|c| c.primary_key).collect();
    if keys.is_empty() {
        return Err(ConfigError::NoPrimaryKey {
            model: model.name.clone(),
        });
    }
    Ok(keys)
}

/// Name of the first primary key column.
///
/// For a composite key the remaining columns are dropped. Use [`primary_keys`] when the
/// full identity is needed.
pub fn primary_key_name(model: &EntityModel) -> Result<&str, ConfigError> {
    let keys = primary_keys(model)?;
    if keys.len() > 1 {
        tracing::debug!(
            model = %model.name,
            columns = keys.len(),
            "composite primary key, using first column"
        );
    }
    let first = keys[0];
    Ok(first.name.as_str())
}

/// Native type of a column: the declared type's own mapping, otherwise the mapping of the
/// type it directly wraps. Only one level of wrapping is followed.
pub fn native_type(column: &ColumnDescriptor) -> Result<NativeType, ConfigError> {
    if let Some(t) = column.type_.direct_native() {
        return Ok(t);
    }
    let fallback = match &column.type_ {
        ColumnType::Wrapped { inner, .. } => inner.direct_native(),
        ColumnType::Native(_) | ColumnType::Opaque(_) => None,
    };
    fallback.ok_or_else(|| ConfigError::UnresolvedColumnType {
        column: column.name.clone(),
    })
}

/// Columns with a uniqueness constraint, in declared order. Empty when there are none.
pub fn unique_columns(model: &EntityModel) -> Vec<&ColumnDescriptor> {
    model.columns.iter().filter(|c| c.unique).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(cols: &[&ColumnDescriptor]) -> Vec<String> {
        cols.iter().map(|c| c.name.clone()).collect()
    }

    #[test]
    fn single_primary_key() {
        let model = EntityModel::new(
            "users",
            vec![
                ColumnDescriptor::new("id", NativeType::BigInt).primary_key(),
                ColumnDescriptor::new("name", NativeType::Text),
            ],
        );
        assert_eq!(primary_key_name(&model).unwrap(), "id");
        assert_eq!(names(&primary_keys(&model).unwrap()), ["id"]);
    }

    #[test]
    fn composite_primary_key_keeps_declared_order() {
        let model = EntityModel::new(
            "orders",
            vec![
                ColumnDescriptor::new("note", NativeType::Text),
                ColumnDescriptor::new("tenant_id", NativeType::Uuid).primary_key(),
                ColumnDescriptor::new("id", NativeType::BigInt).primary_key(),
            ],
        );
        assert_eq!(names(&primary_keys(&model).unwrap()), ["tenant_id", "id"]);
        assert_eq!(primary_key_name(&model).unwrap(), "tenant_id");
    }

    #[test]
    fn no_primary_key() {
        let model = EntityModel::new("logs", vec![ColumnDescriptor::new("line", NativeType::Text)]);
        assert_eq!(
            primary_keys(&model).unwrap_err(),
            ConfigError::NoPrimaryKey { model: "logs".into() }
        );
        assert!(primary_key_name(&model).is_err());
    }

    #[test]
    fn direct_native_type() {
        let col = ColumnDescriptor::new("created", NativeType::DateTime);
        assert_eq!(native_type(&col).unwrap(), NativeType::DateTime);
    }

    #[test]
    fn wrapped_type_falls_back_to_inner() {
        let col = ColumnDescriptor::new(
            "email",
            ColumnType::wrapped("email_address", NativeType::Text.into()),
        );
        assert_eq!(native_type(&col).unwrap(), NativeType::Text);
    }

    #[test]
    fn opaque_type_is_unresolved() {
        let col = ColumnDescriptor::new("area", ColumnType::Opaque("geometry".into()));
        assert_eq!(
            native_type(&col).unwrap_err(),
            ConfigError::UnresolvedColumnType { column: "area".into() }
        );
    }

    #[test]
    fn wrapped_opaque_type_is_unresolved() {
        let col = ColumnDescriptor::new(
            "area",
            ColumnType::wrapped("area_type", ColumnType::Opaque("geometry".into())),
        );
        assert!(native_type(&col).is_err());
    }

    #[test]
    fn only_one_level_of_wrapping_is_followed() {
        let twice = ColumnType::wrapped(
            "outer",
            ColumnType::wrapped("inner", NativeType::Integer.into()),
        );
        let col = ColumnDescriptor::new("score", twice);
        assert!(matches!(
            native_type(&col),
            Err(ConfigError::UnresolvedColumnType { column }) if column == "score"
        ));
    }

    #[test]
    fn unique_columns_in_declared_order() {
        let model = EntityModel::new(
            "people",
            vec![
                ColumnDescriptor::new("email", NativeType::Text).unique(),
                ColumnDescriptor::new("name", NativeType::Text),
                ColumnDescriptor::new("ssn", NativeType::Text).unique(),
            ],
        );
        assert_eq!(names(&unique_columns(&model)), ["email", "ssn"]);
    }

    #[test]
    fn no_unique_columns_is_empty() {
        let model = EntityModel::new(
            "tags",
            vec![ColumnDescriptor::new("id", NativeType::Integer).primary_key()],
        );
        assert!(unique_columns(&model).is_empty());
    }
}
