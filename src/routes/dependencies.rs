//! Runs injection handles in front of generated endpoints.

use crate::dependencies::Depends;
use crate::extractors::RequestContext;
use axum::{
    extract::Request,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    Router,
};
use std::sync::Arc;

/// Attach `deps` to every route of `router`. Handles run in order before the handler;
/// the first rejection becomes the response. `None` or an empty slice leaves the router as is.
pub fn with_dependencies<S>(router: Router<S>, deps: Option<&[Depends]>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    let deps: Arc<[Depends]> = match deps {
        Some(d) if !d.is_empty() => d.into(),
        _ => return router,
    };
    router.layer(middleware::from_fn(move |req: Request, next: Next| {
        let deps = deps.clone();
        async move { run_dependencies(&deps, req, next).await }
    }))
}

async fn run_dependencies(deps: &[Depends], req: Request, next: Next) -> Response {
    let (parts, body) = req.into_parts();
    let ctx = RequestContext::from_parts(&parts);
    for dep in deps {
        if let Err(e) = dep.run(&ctx).await {
            tracing::debug!(method = %ctx.method, uri = %ctx.uri, error = %e, "request rejected by hook");
            return e.into_response();
        }
    }
    next.run(Request::from_parts(parts, body)).await
}
