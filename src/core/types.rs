use serde::{Deserialize, Serialize};
use std::fmt;

/// Builds the `database.table` key that joins replica state, shard assignments and
/// the tables being backed up.
///
/// Names containing `.` are not escaped, so `("a.b", "c")` and `("a", "b.c")` collide.
pub fn qualified_name(database: &str, table: &str) -> String {
    format!("{}.{}", database, table)
}

/// What a replica captures for a table during backup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShardBackupType {
    /// Data and schema.
    #[default]
    Full,
    /// DDL only; another replica owns the data.
    Schema,
}

impl ShardBackupType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShardBackupType::Full => "full",
            ShardBackupType::Schema => "schema",
        }
    }
}

impl fmt::Display for ShardBackupType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A table selected for backup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub database: String,
    pub name: String,
    #[serde(default)]
    pub backup_type: ShardBackupType,
}

impl Table {
    pub fn new(database: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            name: name.into(),
            backup_type: ShardBackupType::default(),
        }
    }

    pub fn full_name(&self) -> String {
        qualified_name(&self.database, &self.name)
    }
}
