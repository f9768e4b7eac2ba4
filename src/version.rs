use crate::core::{BoxError, OperationContext, Result, ShardError};
use async_trait::async_trait;
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use thiserror::Error;

/// Lowest server version (encoded as `major * 1_000_000 + minor * 1_000 + patch`)
/// whose `system.replicas` view is reliable enough for sharded operation.
pub const MIN_VERSION_SHARD_OP: i64 = 21_000_000;

/// Source of the cluster server version.
#[async_trait]
pub trait Versioner: Send + Sync {
    /// Returns the server version in its comparable integer encoding.
    async fn get_version(&self, ctx: &OperationContext) -> std::result::Result<i64, BoxError>;
}

/// Checks whether sharded backup creation is supported by the server.
///
/// A failing version lookup is returned as [`ShardError::VersionRetrieval`] carrying the
/// accessor's own error; a version below [`MIN_VERSION_SHARD_OP`] yields
/// [`ShardError::ShardOperationVersion`].
pub async fn can_shard_operation(ctx: &OperationContext, versioner: &dyn Versioner) -> Result<()> {
    let version = ctx
        .run(versioner.get_version(ctx))
        .await?
        .map_err(ShardError::VersionRetrieval)?;
    if version < MIN_VERSION_SHARD_OP {
        return Err(ShardError::ShardOperationVersion {
            version,
            minimum: MIN_VERSION_SHARD_OP,
        });
    }
    Ok(())
}

/// A dotted server version such as `21.8.3.44`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ServerVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl ServerVersion {
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Parses `major.minor[.patch[.build]]`; the build component is ignored.
    pub fn parse(version: &str) -> Result<Self> {
        let version = version.trim();
        let invalid = || ShardError::InvalidVersion(version.to_string());

        let parts: Vec<&str> = version.split('.').collect();
        if parts.len() < 2 || parts.len() > 4 {
            return Err(invalid());
        }

        let mut numbers = [0u32; 3];
        for (slot, part) in numbers.iter_mut().zip(parts.iter()) {
            *slot = part.parse().map_err(|_| invalid())?;
        }
        if let Some(build) = parts.get(3) {
            build.parse::<u64>().map_err(|_| invalid())?;
        }
        if numbers[1] >= 1_000 || numbers[2] >= 1_000 {
            return Err(invalid());
        }

        Ok(Self::new(numbers[0], numbers[1], numbers[2]))
    }

    /// Integer encoding compared against [`MIN_VERSION_SHARD_OP`].
    pub fn as_int(&self) -> i64 {
        self.major as i64 * 1_000_000 + self.minor as i64 * 1_000 + self.patch as i64
    }
}

impl FromStr for ServerVersion {
    type Err = ShardError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for ServerVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("static version lookup failed: {0}")]
pub struct StaticVersionError(pub String);

/// A [`Versioner`] answering from a fixed value, for offline planning and tests.
#[derive(Debug, Default)]
pub struct StaticVersioner {
    version: i64,
    failure: Option<String>,
    calls: AtomicUsize,
}

impl StaticVersioner {
    pub fn new(version: i64) -> Self {
        Self {
            version,
            ..Self::default()
        }
    }

    /// A versioner whose every lookup fails with [`StaticVersionError`].
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::default()
        }
    }

    /// Number of lookups served so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl From<ServerVersion> for StaticVersioner {
    fn from(version: ServerVersion) -> Self {
        Self::new(version.as_int())
    }
}

#[async_trait]
impl Versioner for StaticVersioner {
    async fn get_version(&self, _ctx: &OperationContext) -> std::result::Result<i64, BoxError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.failure {
            Some(message) => Err(Box::new(StaticVersionError(message.clone()))),
            None => Ok(self.version),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_version_retrieval_error_passes_through() {
        let ctx = OperationContext::new();
        let versioner = StaticVersioner::failing("server gone");
        let err = can_shard_operation(&ctx, &versioner).await.unwrap_err();
        match err {
            ShardError::VersionRetrieval(inner) => {
                let inner = inner.downcast_ref::<StaticVersionError>().unwrap();
                assert_eq!(inner, &StaticVersionError("server gone".to_string()));
            }
            other => panic!("expected VersionRetrieval, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_version_threshold() {
        let ctx = OperationContext::new();
        for version in [-1, 0, 20_012_999, MIN_VERSION_SHARD_OP - 1] {
            let err = can_shard_operation(&ctx, &StaticVersioner::new(version))
                .await
                .unwrap_err();
            assert!(matches!(
                err,
                ShardError::ShardOperationVersion { version: v, minimum: MIN_VERSION_SHARD_OP } if v == version
            ));
        }
        for version in [MIN_VERSION_SHARD_OP, 21_008_003, 24_003_001] {
            can_shard_operation(&ctx, &StaticVersioner::new(version))
                .await
                .unwrap();
        }
    }

    #[tokio::test]
    async fn test_cancelled_context_skips_lookup() {
        let ctx = OperationContext::new();
        ctx.cancel();
        let versioner = StaticVersioner::new(MIN_VERSION_SHARD_OP);
        let err = can_shard_operation(&ctx, &versioner).await.unwrap_err();
        assert!(err.is_cancelled());
        assert_eq!(versioner.calls(), 0);
    }

    #[test]
    fn test_parse_server_version() {
        let version = ServerVersion::parse("21.8.3.44").unwrap();
        assert_eq!(version, ServerVersion::new(21, 8, 3));
        assert_eq!(version.as_int(), 21_008_003);
        assert_eq!(version.to_string(), "21.8.3");

        assert_eq!("20.3".parse::<ServerVersion>().unwrap().as_int(), 20_003_000);
        assert!(ServerVersion::parse("21.1").unwrap().as_int() >= MIN_VERSION_SHARD_OP);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for input in ["", "21", "v21.8", "21.x.1", "21.1000.0", "21.8.3.44.1", "21.8.3.b"] {
            assert!(
                matches!(ServerVersion::parse(input), Err(ShardError::InvalidVersion(_))),
                "{input} should be rejected"
            );
        }
    }
}
