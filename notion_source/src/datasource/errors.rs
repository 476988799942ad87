use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum DataSourceError {
    /// A search result lacks a key the normalizer relies on
    #[error("Malformed Notion record: {0}")]
    MalformedRecord(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<sqlx::Error> for DataSourceError {
    fn from(err: sqlx::Error) -> Self {
        Self::Storage(err.to_string())
    }
}
