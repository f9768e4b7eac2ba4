/// Decides whether the local replica owns the full backup of a table.
///
/// Implementations must be pure: the same metadata always yields the same answer.
/// Any `Fn(&TableReplicaMetadata) -> Result<bool>` qualifies.
pub trait ShardFunc: Send + Sync {
    fn assign(&self, md: &TableReplicaMetadata) -> Result<bool>;
}

impl<F> ShardFunc for F
where
    F: Fn(&TableReplicaMetadata) -> Result<bool> + Send + Sync,
{
    fn assign(&self, md: &TableReplicaMetadata) -> Result<bool> {
        self(md)
    }
}

/// Hashes `database.table` with FNV-1a and takes it mod N, where N is the number of
/// active replicas, to index into the alphabetically sorted active replica list.
/// The replica at that index handles the full backup.
#[derive(Debug, Clone, Copy, Default)]
pub struct FnvHashModShardFunc;

impl FnvHashModShardFunc {
    /// Returns the name of the replica that owns the table.
    pub fn owner<'a>(&self, md: &'a TableReplicaMetadata) -> Result<&'a str> {
        let active = md.active_replicas();
        if active.is_empty() {
            return Err(ShardError::NoActiveReplicas {
                table: md.full_name(),
            });
        }
        Ok(active[stable_replica_index(&md.full_name(), active.len())])
    }
}

impl ShardFunc for FnvHashModShardFunc {
    fn assign(&self, md: &TableReplicaMetadata) -> Result<bool> {
        Ok(self.owner(md)? == md.replica_name)
    }
}
