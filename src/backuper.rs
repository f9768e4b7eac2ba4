use crate::config::BackupConfig;
use crate::core::{OperationContext, Result, ShardBackupType, ShardError, Table};
use crate::sharding::{BackupSharder, Querier, ReplicaDeterminer};
use crate::version::{Versioner, can_shard_operation};
use std::sync::Arc;
use tracing::{Instrument, debug, info, info_span};

/// Decides, per table, whether this replica takes a full or a schema-only backup.
pub struct Backuper {
    config: BackupConfig,
    versioner: Arc<dyn Versioner>,
    sharder: Arc<dyn BackupSharder>,
}

impl Backuper {
    /// Creates a backuper that shards with [`ReplicaDeterminer::fnv_hash_mod`] over `querier`.
    pub fn new(
        config: BackupConfig,
        versioner: Arc<dyn Versioner>,
        querier: Arc<dyn Querier>,
    ) -> Self {
        Self {
            config,
            versioner,
            sharder: Arc::new(ReplicaDeterminer::fnv_hash_mod(querier)),
        }
    }

    /// Replaces the version source.
    pub fn with_versioner(mut self, versioner: Arc<dyn Versioner>) -> Self {
        self.versioner = versioner;
        self
    }

    /// Replaces the shard determination strategy.
    pub fn with_backup_sharder(mut self, sharder: Arc<dyn BackupSharder>) -> Self {
        self.sharder = sharder;
        self
    }

    pub fn config(&self) -> &BackupConfig {
        &self.config
    }

    /// Populates `backup_type` for every table.
    ///
    /// Tables start as [`ShardBackupType::Full`]. With sharded operation enabled, the server
    /// version is checked, shards are determined, and tables outside the local shard become
    /// [`ShardBackupType::Schema`]. Any error aborts the whole batch and leaves every table
    /// `Full`; callers must discard the batch rather than proceed with it.
    pub async fn populate_backup_shard_field(
        &self,
        ctx: &OperationContext,
        tables: &mut [Table],
    ) -> Result<()> {
        for table in tables.iter_mut() {
            table.backup_type = ShardBackupType::Full;
        }
        if !self.config.sharded_operation {
            debug!(
                tables = tables.len(),
                "sharded operation disabled, backing up all tables in full"
            );
            return Ok(());
        }

        let span = info_span!("populate_backup_shard_field", tables = tables.len());
        async {
            can_shard_operation(ctx, self.versioner.as_ref()).await?;
            let assignment = self.sharder.determine_shards(ctx).await?;

            let in_shard = tables
                .iter()
                .map(|table| assignment.in_shard(&table.database, &table.name))
                .collect::<Result<Vec<_>>>()?;

            let mut schema_only = 0usize;
            for (table, in_shard) in tables.iter_mut().zip(in_shard) {
                if !in_shard {
                    table.backup_type = ShardBackupType::Schema;
                    schema_only += 1;
                }
            }
            info!(
                full = tables.len() - schema_only,
                schema_only, "applied backup shard assignment"
            );
            Ok::<(), ShardError>(())
        }
        .instrument(span)
        .await
    }
}
