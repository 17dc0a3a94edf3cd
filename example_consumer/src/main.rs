//! Example consumer: loads a model config, resolves endpoint metadata and serves read
//! endpoints guarded by an API-key hook.
//!
//! Run from repo root: `cargo run -p example-consumer`
//! Config dir defaults to `example_consumer/sample` (override with `CONFIG_PATH`).

use axum::extract::Path;
use axum::routing::get;
use axum::{Json, Router};
use crud_introspect::{
    load_from_dir, resolve, with_dependencies, AppError, CrudMethod, HookArg, OperationDependencies,
    RequestContext, ResolvedEntity,
};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("crud_introspect=info,example_consumer=info")),
        )
        .init();

    let config_path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "example_consumer/sample".into());
    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:3000".into());
    let api_key = std::env::var("API_KEY").ok();

    let config = load_from_dir(&config_path).await?;
    let model = resolve(&config)?;

    let mut app = Router::new();
    for entity in &model.entities {
        let column_types: Vec<(&str, &str)> = entity
            .columns
            .iter()
            .map(|c| (c.name.as_str(), c.native_type.map_or("?", |t| t.rust_type())))
            .collect();
        tracing::info!(
            path = %entity.path_segment,
            pk = ?entity.pk_columns,
            columns = ?column_types,
            unique = ?entity.unique_columns,
            operations = ?entity.operations.as_slice(),
            "entity"
        );
        if !entity.operations.allows(CrudMethod::Read) {
            continue;
        }
        let mut deps = OperationDependencies::new();
        deps.set(CrudMethod::Read, api_key.clone().map(|key| vec![api_key_hook(key)]));
        app = app.merge(with_dependencies(read_route(entity), deps.get(CrudMethod::Read)));
    }

    let listener = TcpListener::bind(&bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}

fn api_key_hook(expected: String) -> HookArg {
    HookArg::plain(move |ctx: RequestContext| {
        let expected = expected.clone();
        async move {
            match ctx.header("x-api-key") {
                Some(key) if key == expected => Ok(()),
                _ => Err(AppError::Unauthorized("missing or invalid x-api-key".into())),
            }
        }
    })
}

/// Echoes the parsed identity; a real generator would run the query here.
fn read_route(entity: &ResolvedEntity) -> Router {
    let pk_type = entity.pk_type;
    let pk_name = entity.pk_name.clone();
    let table = entity.table_name.clone();
    Router::new().route(
        &format!("/{}/:id", entity.path_segment),
        get(move |Path(raw): Path<String>| async move {
            let id = pk_type.parse_path_value(&raw)?;
            Ok::<_, AppError>(Json(serde_json::json!({
                "table": table,
                "key": { pk_name: id },
            })))
        }),
    )
}
