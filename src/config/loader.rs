//! Load config from JSON files and resolve it into endpoint metadata.

use crate::config::resolved::{ColumnInfo, ResolvedEntity, ResolvedModel};
use crate::config::types::*;
use crate::config::{validate, FullConfig};
use crate::error::ConfigError;
use crate::introspect::{native_type, primary_key_name, primary_keys, unique_columns};
use std::collections::HashMap;
use std::path::Path;

/// Build resolved model from full config. Validates first; any error is fatal for startup.
pub fn resolve(config: &FullConfig) -> Result<ResolvedModel, ConfigError> {
    validate(config)?;

    let models_by_name: HashMap<_, _> = config.models.iter().map(|m| (m.name.as_str(), m)).collect();

    let mut entities = Vec::new();
    let mut entity_by_path = HashMap::new();

    for api in &config.api_entities {
        let model = models_by_name
            .get(api.model.as_str())
            .ok_or_else(|| ConfigError::MissingReference {
                kind: "model",
                id: api.model.clone(),
            })?;
        let entity = resolve_entity(model, api)?;
        tracing::debug!(
            model = %model.name,
            path = %entity.path_segment,
            pk = ?entity.pk_columns,
            unique = ?entity.unique_columns,
            "resolved entity"
        );
        entity_by_path.insert(api.path_segment.clone(), entity.clone());
        entities.push(entity);
    }

    Ok(ResolvedModel {
        entities,
        entity_by_path,
    })
}

fn resolve_entity(model: &EntityModel, api: &ApiEntityConfig) -> Result<ResolvedEntity, ConfigError> {
    let pk_cols = primary_keys(model)?;
    let pk_name = primary_key_name(model)?.to_string();

    let mut pk_types = HashMap::with_capacity(pk_cols.len());
    for c in &pk_cols {
        pk_types.insert(c.name.as_str(), native_type(c)?);
    }
    let pk_type = pk_types
        .get(pk_name.as_str())
        .copied()
        .ok_or_else(|| ConfigError::UnresolvedColumnType {
            column: pk_name.clone(),
        })?;

    let columns = model
        .columns
        .iter()
        .map(|c| {
            let resolved = match pk_types.get(c.name.as_str()) {
                Some(t) => Some(*t),
                None => match native_type(c) {
                    Ok(t) => Some(t),
                    Err(e) => {
                        tracing::warn!(
                            model = %model.name,
                            column = %c.name,
                            declared_type = %c.type_.name(),
                            error = %e,
                            "column left untyped"
                        );
                        None
                    }
                },
            };
            ColumnInfo {
                name: c.name.clone(),
                native_type: resolved,
                nullable: c.nullable,
                primary_key: c.primary_key,
                unique: c.unique,
            }
        })
        .collect();

    Ok(ResolvedEntity {
        table_name: model.name.clone(),
        path_segment: api.path_segment.clone(),
        pk_columns: pk_cols.iter().map(|c| c.name.clone()).collect(),
        pk_name,
        pk_type,
        columns,
        unique_columns: unique_columns(model).iter().map(|c| c.name.clone()).collect(),
        operations: api.operations.clone(),
    })
}

/// Load full config from `models.json` and `api_entities.json` in `dir`.
/// A missing `api_entities.json` means no entity is exposed.
pub async fn load_from_dir(dir: impl AsRef<Path>) -> Result<FullConfig, ConfigError> {
    let dir = dir.as_ref();
    let models: Vec<EntityModel> = read_json(&dir.join("models.json")).await?;
    let api_entities_path = dir.join("api_entities.json");
    let api_entities: Vec<ApiEntityConfig> = if tokio::fs::try_exists(&api_entities_path)
        .await
        .map_err(|e| ConfigError::Load(e.to_string()))?
    {
        read_json(&api_entities_path).await?
    } else {
        Vec::new()
    };

    Ok(FullConfig {
        models,
        api_entities,
    })
}

async fn read_json<T>(path: &Path) -> Result<T, ConfigError>
where
    T: for<'de> serde::Deserialize<'de>,
{
    tracing::debug!(path = %path.display(), "load config");
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| ConfigError::Load(format!("{}: {}", path.display(), e)))?;
    serde_json::from_str(&raw).map_err(|e| ConfigError::Load(format!("{}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CrudMethods;

    fn orders() -> EntityModel {
        EntityModel::new(
            "orders",
            vec![
                ColumnDescriptor::new("tenant_id", NativeType::Uuid).primary_key(),
                ColumnDescriptor::new("id", NativeType::BigInt).primary_key(),
                ColumnDescriptor::new("reference", NativeType::Text).unique(),
                ColumnDescriptor::new("shape", ColumnType::Opaque("geometry".into())),
            ],
        )
    }

    fn config(model: EntityModel) -> FullConfig {
        FullConfig {
            api_entities: vec![ApiEntityConfig {
                model: model.name.clone(),
                path_segment: "orders".into(),
                operations: CrudMethods::new(["read", "read_multi"]).unwrap(),
            }],
            models: vec![model],
        }
    }

    #[test]
    fn resolves_entity_metadata() {
        let resolved = resolve(&config(orders())).unwrap();
        let entity = resolved.entity_by_path("orders").unwrap();

        assert_eq!(entity.pk_columns, vec!["tenant_id", "id"]);
        assert_eq!(entity.pk_name, "tenant_id");
        assert_eq!(entity.pk_type, NativeType::Uuid);
        assert!(entity.has_composite_key());
        assert_eq!(entity.unique_columns, vec!["reference"]);
        assert_eq!(entity.column("shape").unwrap().native_type, None);
        assert_eq!(entity.column("id").unwrap().native_type, Some(NativeType::BigInt));
        assert_eq!(entity.operations.as_slice(), ["read", "read_multi"]);
    }

    #[test]
    fn unresolved_primary_key_type_is_fatal() {
        let model = EntityModel::new(
            "orders",
            vec![ColumnDescriptor::new("id", ColumnType::Opaque("hashid".into())).primary_key()],
        );
        assert_eq!(
            resolve(&config(model)).unwrap_err(),
            ConfigError::UnresolvedColumnType { column: "id".into() }
        );
    }

    #[test]
    fn model_without_primary_key_is_fatal() {
        let model = EntityModel::new("orders", vec![ColumnDescriptor::new("id", NativeType::BigInt)]);
        assert!(matches!(
            resolve(&config(model)),
            Err(ConfigError::NoPrimaryKey { .. })
        ));
    }

    #[tokio::test]
    async fn loads_json_files_from_dir() {
        let dir = std::env::temp_dir().join(format!("crud-introspect-{}", uuid::Uuid::new_v4()));
        tokio::fs::create_dir_all(&dir).await.unwrap();
        tokio::fs::write(
            dir.join("models.json"),
            r#"[{"name":"users","columns":[
                {"name":"id","type":"bigserial","primary_key":true},
                {"name":"email","type":{"name":"email_address","impl":"citext"},"unique":true}
            ]}]"#,
        )
        .await
        .unwrap();

        let without_api = load_from_dir(&dir).await.unwrap();
        assert_eq!(without_api.models.len(), 1);
        assert!(without_api.api_entities.is_empty());

        tokio::fs::write(dir.join("api_entities.json"), r#"[{"model":"users","path_segment":"users"}]"#)
            .await
            .unwrap();
        let config = load_from_dir(&dir).await.unwrap();
        assert_eq!(config.api_entities[0].operations, CrudMethods::default());

        let resolved = resolve(&config).unwrap();
        let users = resolved.entity_by_path("users").unwrap();
        assert_eq!(users.column("email").unwrap().native_type, Some(NativeType::Text));

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }

    #[tokio::test]
    async fn misspelled_column_type_key_fails_load() {
        let dir = std::env::temp_dir().join(format!("crud-introspect-{}", uuid::Uuid::new_v4()));
        tokio::fs::create_dir_all(&dir).await.unwrap();
        tokio::fs::write(
            dir.join("models.json"),
            r#"[{"name":"users","columns":[
                {"name":"id","type":"uuid","primary_key":true},
                {"name":"email","type":{"name":"email_address","Impl":"citext"}}
            ]}]"#,
        )
        .await
        .unwrap();

        let err = load_from_dir(&dir).await.unwrap_err();
        assert!(matches!(&err, ConfigError::Load(msg) if msg.contains("unknown keys")));

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }

    #[tokio::test]
    async fn invalid_method_in_file_fails_load() {
        let dir = std::env::temp_dir().join(format!("crud-introspect-{}", uuid::Uuid::new_v4()));
        tokio::fs::create_dir_all(&dir).await.unwrap();
        tokio::fs::write(dir.join("models.json"), "[]").await.unwrap();
        tokio::fs::write(
            dir.join("api_entities.json"),
            r#"[{"model":"users","path_segment":"users","operations":["read","purge"]}]"#,
        )
        .await
        .unwrap();

        let err = load_from_dir(&dir).await.unwrap_err();
        assert!(matches!(&err, ConfigError::Load(msg) if msg.contains("Invalid CRUD method: purge")));

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }
}
