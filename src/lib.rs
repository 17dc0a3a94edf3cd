//! crud-introspect: metadata resolution for generated CRUD endpoints.
//!
//! Answers three questions about an entity model without per-entity code: which CRUD
//! operations are allowed ([`config::methods`]), what the identity and uniqueness columns
//! are ([`introspect`]), and how caller hooks are attached to endpoints ([`dependencies`]).

pub mod config;
pub mod dependencies;
pub mod error;
pub mod extractors;
pub mod introspect;
pub mod routes;

pub use config::{
    load_from_dir, resolve, validate_methods, ColumnDescriptor, ColumnType, CrudMethod, CrudMethods,
    EntityModel, FullConfig, NativeType, ResolvedEntity, ResolvedModel, VALID_METHODS,
};
pub use dependencies::{inject_dependencies, Depends, Hook, HookArg, OperationDependencies};
pub use error::{AppError, ConfigError};
pub use extractors::RequestContext;
pub use introspect::{native_type, primary_key_name, primary_keys, unique_columns};
pub use routes::with_dependencies;
