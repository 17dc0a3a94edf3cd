//! Hooks and the injection handle the router runs per request.

use crate::error::AppError;
use crate::extractors::RequestContext;
use async_trait::async_trait;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// Custom per-request logic attached to a generated endpoint (e.g. authorization).
/// Returning an error rejects the request before the handler runs.
#[async_trait]
pub trait Hook: Send + Sync + 'static {
    async fn call(&self, ctx: &RequestContext) -> Result<(), AppError>;
}

#[async_trait]
impl<F, Fut> Hook for F
where
    F: Fn(RequestContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), AppError>> + Send + 'static,
{
    async fn call(&self, ctx: &RequestContext) -> Result<(), AppError> {
        (self)(ctx.clone()).await
    }
}

/// Injection handle: a hook wrapped for the routing layer. Cheap to clone.
#[derive(Clone)]
pub struct Depends {
    hook: Arc<dyn Hook>,
}

impl Depends {
    /// The one wrapping primitive: every handle the crate hands out is built here.
    pub fn new(hook: Arc<dyn Hook>) -> Self {
        Depends { hook }
    }

    pub async fn run(&self, ctx: &RequestContext) -> Result<(), AppError> {
        self.hook.call(ctx).await
    }

    /// True when both handles wrap the same hook allocation.
    pub fn ptr_eq(&self, other: &Depends) -> bool {
        Arc::ptr_eq(&self.hook, &other.hook)
    }
}

impl fmt::Debug for Depends {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Depends")
            .field("hook", &Arc::as_ptr(&self.hook))
            .finish()
    }
}

/// Hook argument accepted by [`inject_dependencies`](super::inject_dependencies).
#[derive(Clone)]
pub enum HookArg {
    Plain(Arc<dyn Hook>),
    /// Already wrapped by the caller. Deprecated.
    Wrapped(Depends),
}

impl HookArg {
    pub fn plain<H: Hook>(hook: H) -> Self {
        HookArg::Plain(Arc::new(hook))
    }

    pub fn is_wrapped(&self) -> bool {
        matches!(self, HookArg::Wrapped(_))
    }

    /// Plain hooks are wrapped with [`Depends::new`]; pre-wrapped handles pass through.
    pub fn into_depends(self) -> Depends {
        match self {
            HookArg::Plain(hook) => Depends::new(hook),
            HookArg::Wrapped(d) => d,
        }
    }
}

impl From<Depends> for HookArg {
    fn from(d: Depends) -> Self {
        HookArg::Wrapped(d)
    }
}

impl From<Arc<dyn Hook>> for HookArg {
    fn from(hook: Arc<dyn Hook>) -> Self {
        HookArg::Plain(hook)
    }
}

impl fmt::Debug for HookArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HookArg::Plain(hook) => f.debug_tuple("Plain").field(&Arc::as_ptr(hook)).finish(),
            HookArg::Wrapped(d) => f.debug_tuple("Wrapped").field(d).finish(),
        }
    }
}
