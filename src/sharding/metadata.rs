/// Replication state of one table as seen by the local replica (a `system.replicas` row).
///
/// Every column is required when decoding; a row with a missing column is rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableReplicaMetadata {
    pub database: String,
    pub table: String,
    /// Name the local node is registered under in cluster metadata.
    pub replica_name: String,
    /// Every known replica of the table; a value above zero marks it active.
    pub replica_is_active: HashMap<String, i64>,
}

impl TableReplicaMetadata {
    pub fn new(
        database: impl Into<String>,
        table: impl Into<String>,
        replica_name: impl Into<String>,
    ) -> Self {
        Self {
            database: database.into(),
            table: table.into(),
            replica_name: replica_name.into(),
            replica_is_active: HashMap::new(),
        }
    }

    /// Records a replica with the given activity indicator.
    pub fn with_replica(mut self, replica: impl Into<String>, active: i64) -> Self {
        self.replica_is_active.insert(replica.into(), active);
        self
    }

    /// Returns the table name in the form `database.table`.
    pub fn full_name(&self) -> String {
        qualified_name(&self.database, &self.table)
    }

    /// Returns the active replicas sorted lexicographically.
    pub fn active_replicas(&self) -> Vec<&str> {
        let mut active = self
            .replica_is_active
            .iter()
            .filter(|(_, activity)| **activity > 0)
            .map(|(replica, _)| replica.as_str())
            .collect::<Vec<_>>();
        active.sort_unstable();
        active
    }
}
