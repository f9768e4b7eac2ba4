#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("in-memory query failed: {0}")]
pub struct InMemoryQueryError(pub String);

/// A [`Querier`] serving fixed rows, for offline planning and tests.
///
/// Every issued query text is recorded so callers can assert what was asked.
#[derive(Clone, Default)]
pub struct InMemoryQuerier {
    rows: Arc<Vec<serde_json::Value>>,
    failure: Option<String>,
    queries: Arc<Mutex<Vec<String>>>,
}

impl InMemoryQuerier {
    pub fn new(rows: Vec<serde_json::Value>) -> Self {
        Self {
            rows: Arc::new(rows),
            ..Self::default()
        }
    }

    /// Serves the given metadata as `system.replicas` rows.
    pub fn from_metadata(metadata: &[TableReplicaMetadata]) -> Result<Self> {
        let rows = metadata
            .iter()
            .map(serde_json::to_value)
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(ShardError::replica_state)?;
        Ok(Self::new(rows))
    }

    /// A querier whose every query fails with [`InMemoryQueryError`].
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::default()
        }
    }

    /// Returns the query texts issued so far, oldest first.
    pub async fn queries(&self) -> Vec<String> {
        self.queries.lock().await.clone()
    }
}

#[async_trait]
impl Querier for InMemoryQuerier {
    async fn select_rows(
        &self,
        _ctx: &OperationContext,
        query: &str,
    ) -> std::result::Result<Vec<serde_json::Value>, BoxError> {
        self.queries.lock().await.push(query.to_string());
        match &self.failure {
            Some(message) => Err(Box::new(InMemoryQueryError(message.clone()))),
            None => Ok(self.rows.as_ref().clone()),
        }
    }
}
