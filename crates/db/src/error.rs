use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failures surfaced by the bootstrap. Nothing here is retried.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("invalid MongoDB connection string")]
    InvalidUri(#[source] BoxError),

    #[error("failed to reach MongoDB at {endpoint}")]
    Connection {
        endpoint: String,
        #[source]
        source: BoxError,
    },

    #[error("failed to {operation} on `{target}`")]
    Operation {
        operation: &'static str,
        target: String,
        #[source]
        source: BoxError,
    },
}

impl DbError {
    pub fn connection(endpoint: impl Into<String>, source: impl Into<BoxError>) -> Self {
        DbError::Connection {
            endpoint: endpoint.into(),
            source: source.into(),
        }
    }

    pub fn operation(
        operation: &'static str,
        target: impl Into<String>,
        source: impl Into<BoxError>,
    ) -> Self {
        DbError::Operation {
            operation,
            target: target.into(),
            source: source.into(),
        }
    }

    pub fn is_connection(&self) -> bool {
        matches!(self, DbError::Connection { .. })
    }
}
