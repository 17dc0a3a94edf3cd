//! Request extractors handed to hooks.

mod context;
pub use context::RequestContext;
