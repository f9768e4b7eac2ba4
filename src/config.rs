use crate::core::{OperationContext, Result, ShardError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Backup sharding configuration
///
/// Loaded from a top-level JSON object, or assembled with the builder methods.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackupConfig {
    /// Split full-backup duty across replicas instead of backing up every table everywhere
    pub sharded_operation: bool,

    /// Upper bound for each server call (version lookup, replica state query)
    pub query_timeout_secs: Option<u64>,
}

impl BackupConfig {
    /// Create a configuration with sharding disabled
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable sharded operation
    pub fn sharded_operation(mut self, enabled: bool) -> Self {
        self.sharded_operation = enabled;
        self
    }

    /// Set the per-call query timeout
    pub fn query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout_secs = Some(timeout.as_secs());
        self
    }

    pub fn query_timeout_duration(&self) -> Option<Duration> {
        self.query_timeout_secs.map(Duration::from_secs)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.query_timeout_secs == Some(0) {
            return Err(ShardError::InvalidConfig(
                "query_timeout_secs must be > 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Parse and validate a JSON document
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| ShardError::InvalidConfig(format!("malformed config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            ShardError::InvalidConfig(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&raw)
    }

    /// Execution context cancelled through `cancel` and carrying the configured timeout
    pub fn operation_context(&self, cancel: CancellationToken) -> OperationContext {
        let ctx = OperationContext::with_cancellation(cancel);
        match self.query_timeout_duration() {
            Some(timeout) => ctx.with_timeout(timeout),
            None => ctx,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = BackupConfig::default();
        assert!(!config.sharded_operation);
        assert_eq!(config.query_timeout_duration(), None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = BackupConfig::new()
            .sharded_operation(true)
            .query_timeout(Duration::from_secs(30));

        assert!(config.sharded_operation);
        assert_eq!(config.query_timeout_secs, Some(30));
        assert_eq!(
            config.operation_context(CancellationToken::new()).timeout(),
            Some(Duration::from_secs(30))
        );
    }

    #[test]
    fn test_operation_context_follows_token() {
        let shutdown = CancellationToken::new();
        let ctx = BackupConfig::default().operation_context(shutdown.clone());
        assert_eq!(ctx.timeout(), None);
        assert!(!ctx.is_cancelled());

        shutdown.cancel();
        assert!(ctx.is_cancelled());
    }

    #[test]
    fn test_from_json_str() {
        let config = BackupConfig::from_json_str(r#"{"sharded_operation": true}"#).unwrap();
        assert!(config.sharded_operation);
        assert_eq!(config.query_timeout_secs, None);

        let empty = BackupConfig::from_json_str("{}").unwrap();
        assert_eq!(empty, BackupConfig::default());
    }

    #[test]
    fn test_validate() {
        let invalid = BackupConfig::from_json_str(r#"{"query_timeout_secs": 0}"#);
        assert!(matches!(invalid, Err(ShardError::InvalidConfig(_))));

        let malformed = BackupConfig::from_json_str(r#"{"sharded_operation": "yes"}"#);
        assert!(matches!(malformed, Err(ShardError::InvalidConfig(_))));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"sharded_operation": true, "query_timeout_secs": 5}}"#).unwrap();

        let config = BackupConfig::from_file(file.path()).unwrap();
        assert!(config.sharded_operation);
        assert_eq!(config.query_timeout_duration(), Some(Duration::from_secs(5)));

        let missing = BackupConfig::from_file(file.path().with_extension("missing"));
        assert!(matches!(missing, Err(ShardError::InvalidConfig(_))));
    }
}
