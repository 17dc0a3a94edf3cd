//! Hook injection: wraps caller-supplied hooks into handles the router runs per request.

mod hook;
mod inject;
mod operation;
pub use hook::{Depends, Hook, HookArg};
pub use inject::{inject_dependencies, LEGACY_DEPENDS_WARNING};
pub use operation::OperationDependencies;
