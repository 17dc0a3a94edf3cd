pub mod methods;
pub mod types;
pub mod loader;
pub mod validator;
pub mod resolved;

pub use methods::*;
pub use types::*;
pub use loader::*;
pub use validator::*;
pub use resolved::*;
