/// Which tables the local replica backs up in full, keyed by `database.table`.
///
/// Built once per backup run and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ShardDetermination {
    entries: BTreeMap<String, bool>,
}

/// Counts of tables by assignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ShardSummary {
    pub full: usize,
    pub schema_only: usize,
}

impl ShardDetermination {
    /// Builds a determination from `(database.table, in_shard)` pairs.
    pub fn from_entries<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, bool)>,
        K: Into<String>,
    {
        entries.into_iter().collect()
    }

    /// Returns whether the given table is within the local backup shard.
    ///
    /// A table with no entry is an error, never a default: the caller cannot prove
    /// another replica covers it.
    pub fn in_shard(&self, database: &str, table: &str) -> Result<bool> {
        let full_name = qualified_name(database, table);
        match self.entries.get(&full_name) {
            Some(in_shard) => Ok(*in_shard),
            None => Err(ShardError::UnknownBackupShard { table: full_name }),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates entries in qualified-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.entries
            .iter()
            .map(|(name, in_shard)| (name.as_str(), *in_shard))
    }

    pub fn summary(&self) -> ShardSummary {
        let full = self.entries.values().filter(|in_shard| **in_shard).count();
        ShardSummary {
            full,
            schema_only: self.entries.len() - full,
        }
    }

    fn insert(&mut self, full_name: String, in_shard: bool) -> Option<bool> {
        self.entries.insert(full_name, in_shard)
    }
}

impl<K: Into<String>> FromIterator<(K, bool)> for ShardDetermination {
    fn from_iter<I: IntoIterator<Item = (K, bool)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(name, in_shard)| (name.into(), in_shard))
                .collect(),
        }
    }
}
