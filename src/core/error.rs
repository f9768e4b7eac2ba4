use std::time::Duration;
use thiserror::Error;

/// Error type produced by external collaborators (database client, version accessor).
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failure of the execution context a collaborator call ran under.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContextError {
    #[error("operation cancelled")]
    Cancelled,

    #[error("operation timed out after {0:?}")]
    DeadlineExceeded(Duration),
}

#[derive(Error, Debug)]
pub enum ShardError {
    /// The version accessor failed; its error is surfaced unchanged.
    #[error(transparent)]
    VersionRetrieval(BoxError),

    #[error(
        "sharded operations are only supported for server >= v21.x (reported version {version}, minimum {minimum})"
    )]
    ShardOperationVersion { version: i64, minimum: i64 },

    #[error("invalid server version: {0}")]
    InvalidVersion(String),

    #[error("could not determine replication state: {source}")]
    ReplicaState {
        #[source]
        source: BoxError,
    },

    #[error("could not determine in-shard state for {table}: no active replicas")]
    NoActiveReplicas { table: String },

    #[error("shard function failed for {table}: {source}")]
    ShardFunc {
        table: String,
        #[source]
        source: BoxError,
    },

    #[error("error determining backup shard state for \"{table}\": unknown backup shard")]
    UnknownBackupShard { table: String },

    #[error(transparent)]
    Context(#[from] ContextError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, ShardError>;

impl ShardError {
    /// Wraps a query transport or decode failure.
    pub fn replica_state(source: impl Into<BoxError>) -> Self {
        Self::ReplicaState {
            source: source.into(),
        }
    }

    /// Wraps a foreign error raised by a custom shard function.
    pub fn shard_func(table: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::ShardFunc {
            table: table.into(),
            source: source.into(),
        }
    }

    /// Returns the context failure behind this error, whether it was raised directly
    /// or while the replication state query was in flight.
    pub fn context_error(&self) -> Option<&ContextError> {
        match self {
            Self::Context(err) => Some(err),
            Self::ReplicaState { source } => source.downcast_ref::<ContextError>(),
            _ => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self.context_error(), Some(ContextError::Cancelled))
    }
}
