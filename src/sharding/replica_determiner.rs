/// Query listing every replicated table, every known replica and whether it is active.
pub const REPLICA_STATE_QUERY: &str =
    "SELECT database, table, replica_name, replica_is_active FROM system.replicas;";

/// Row-returning access to the database.
#[async_trait]
pub trait Querier: Send + Sync {
    /// Runs `query` and returns each result row as a JSON object keyed by column name.
    async fn select_rows(
        &self,
        ctx: &OperationContext,
        query: &str,
    ) -> std::result::Result<Vec<serde_json::Value>, BoxError>;
}

/// Produces a shard determination for the current point in time.
#[async_trait]
pub trait BackupSharder: Send + Sync {
    async fn determine_shards(&self, ctx: &OperationContext) -> Result<ShardDetermination>;
}

/// Obtains a shard determination by examining local replica state.
#[derive(Clone)]
pub struct ReplicaDeterminer {
    querier: Arc<dyn Querier>,
    shard_func: Arc<dyn ShardFunc>,
}

impl ReplicaDeterminer {
    pub fn new(querier: Arc<dyn Querier>, shard_func: impl ShardFunc + 'static) -> Self {
        Self {
            querier,
            shard_func: Arc::new(shard_func),
        }
    }

    /// Determiner using [`FnvHashModShardFunc`].
    pub fn fnv_hash_mod(querier: Arc<dyn Querier>) -> Self {
        Self::new(querier, FnvHashModShardFunc)
    }

    /// Obtains the local replication state through a single query to `system.replicas`.
    pub async fn get_replica_state(
        &self,
        ctx: &OperationContext,
    ) -> Result<Vec<TableReplicaMetadata>> {
        let rows = ctx
            .run(self.querier.select_rows(ctx, REPLICA_STATE_QUERY))
            .await
            .map_err(ShardError::replica_state)?
            .map_err(ShardError::replica_state)?;

        rows.into_iter()
            .map(|row| serde_json::from_value(row).map_err(ShardError::replica_state))
            .collect()
    }
}

#[async_trait]
impl BackupSharder for ReplicaDeterminer {
    async fn determine_shards(&self, ctx: &OperationContext) -> Result<ShardDetermination> {
        let metadata = self.get_replica_state(ctx).await?;

        let mut determination = ShardDetermination::default();
        for entry in &metadata {
            let in_shard = self.shard_func.assign(entry)?;
            let full_name = entry.full_name();
            if let Some(previous) = determination.insert(full_name.clone(), in_shard) {
                warn!(
                    table = %full_name,
                    previous,
                    current = in_shard,
                    "duplicate replica state row, keeping the later one"
                );
            }
        }

        let summary = determination.summary();
        debug!(
            rows = metadata.len(),
            full = summary.full,
            schema_only = summary.schema_only,
            "determined backup shards"
        );
        Ok(determination)
    }
}
