pub mod context;
pub mod error;
pub mod types;

pub use context::OperationContext;
pub use error::{BoxError, ContextError, Result, ShardError};
pub use types::{ShardBackupType, Table, qualified_name};
