//! Errors surfaced by the data source entry points

use thiserror::Error;

use crate::datasource::DataSourceError;
use crate::oauth2::OAuth2Error;
use crate::storage::StorageError;

#[derive(Error, Debug)]
pub enum CoordinationError {
    /// No enabled binding with this id belongs to the tenant
    #[error("Binding not found: {binding_id}")]
    BindingNotFound { binding_id: String },

    #[error("OAuth2 error: {0}")]
    OAuth2Error(OAuth2Error),

    #[error("Data source error: {0}")]
    DataSourceError(DataSourceError),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl CoordinationError {
    /// Log the error and return self
    pub fn log(self) -> Self {
        match &self {
            Self::BindingNotFound { binding_id } => {
                tracing::error!("Binding not found: {}", binding_id)
            }
            Self::OAuth2Error(err) => tracing::error!("OAuth2 error: {}", err),
            Self::DataSourceError(err) => tracing::error!("Data source error: {}", err),
            Self::Storage(msg) => tracing::error!("Storage error: {}", msg),
        }
        self
    }
}

impl From<OAuth2Error> for CoordinationError {
    fn from(err: OAuth2Error) -> Self {
        let error = Self::OAuth2Error(err);
        tracing::error!("{}", error);
        error
    }
}

impl From<DataSourceError> for CoordinationError {
    fn from(err: DataSourceError) -> Self {
        let error = Self::DataSourceError(err);
        tracing::error!("{}", error);
        error
    }
}

impl From<StorageError> for CoordinationError {
    fn from(err: StorageError) -> Self {
        let error = Self::Storage(err.to_string());
        tracing::error!("{}", error);
        error
    }
}
