use crate::core::{BoxError, OperationContext, Result, ShardError, qualified_name};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, warn};

// Backup sharding is split by concern: replica state, hashing, assignment, lookup, querying.
include!("sharding/metadata.rs");
include!("sharding/shard_hash.rs");
include!("sharding/shard_func.rs");
include!("sharding/determination.rs");
include!("sharding/replica_determiner.rs");
include!("sharding/in_memory_querier.rs");
