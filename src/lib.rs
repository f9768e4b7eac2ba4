// ============================================================================
// shardkeeper Library
// ============================================================================
//
// Decides which replica of a replicated table captures its full backup, using
// only replication state visible on the local node. Every replica runs the same
// computation and reaches the same answer without talking to the others.

pub mod core;
pub mod config;
pub mod version;
pub mod sharding;
pub mod backuper;
pub mod observability;

// Re-export main types for convenience
pub use backuper::Backuper;
pub use config::BackupConfig;
pub use crate::core::{
    BoxError, ContextError, OperationContext, Result, ShardBackupType, ShardError, Table,
    qualified_name,
};
pub use sharding::{
    BackupSharder, FnvHashModShardFunc, InMemoryQuerier, InMemoryQueryError, Querier,
    REPLICA_STATE_QUERY, ReplicaDeterminer, ShardDetermination, ShardFunc, ShardSummary,
    TableReplicaMetadata, fnv1a_32, stable_replica_index,
};
pub use version::{
    MIN_VERSION_SHARD_OP, ServerVersion, StaticVersionError, StaticVersioner, Versioner,
    can_shard_operation,
};
