//! Router integration for injection handles.

mod dependencies;
pub use dependencies::with_dependencies;
