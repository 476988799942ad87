use crate::datasource::errors::DataSourceError;
use crate::datasource::types::{DataSourceBinding, SourceInfo};
use crate::storage::GENERIC_DATA_STORE;

use super::postgres::*;
use super::sqlite::*;

/// Tenant and provider a binding query is scoped to
#[derive(Debug, Clone, Copy)]
pub(crate) struct BindingKey<'a> {
    pub(crate) tenant_id: &'a str,
    pub(crate) provider: &'a str,
}

impl<'a> BindingKey<'a> {
    pub(crate) fn new(tenant_id: &'a str, provider: &'a str) -> Self {
        Self {
            tenant_id,
            provider,
        }
    }
}

pub(crate) struct DataSourceStore;

impl DataSourceStore {
    /// Creates the bindings table if needed and checks its columns
    pub(crate) async fn init() -> Result<(), DataSourceError> {
        let store = GENERIC_DATA_STORE.lock().await;

        if let Some(pool) = store.as_sqlite() {
            create_tables_sqlite(pool).await?;
            validate_binding_tables_sqlite(pool).await
        } else if let Some(pool) = store.as_postgres() {
            create_tables_postgres(pool).await?;
            validate_binding_tables_postgres(pool).await
        } else {
            Err(DataSourceError::Storage(
                "Unsupported database type".to_string(),
            ))
        }
    }

    /// Binding holding `access_token`, disabled or not
    #[cfg(test)]
    pub(crate) async fn get_binding_by_token(
        key: &BindingKey<'_>,
        access_token: &str,
    ) -> Result<Option<DataSourceBinding>, DataSourceError> {
        let store = GENERIC_DATA_STORE.lock().await;

        match store.as_sqlite() {
            Some(pool) => get_binding_by_token_sqlite(pool, key, access_token).await,
            None => Err(DataSourceError::Storage(
                "Test helper supports SQLite only".to_string(),
            )),
        }
    }

    pub(crate) async fn get_enabled_binding(
        key: &BindingKey<'_>,
        binding_id: &str,
    ) -> Result<Option<DataSourceBinding>, DataSourceError> {
        let store = GENERIC_DATA_STORE.lock().await;

        if let Some(pool) = store.as_sqlite() {
            get_enabled_binding_sqlite(pool, key, binding_id).await
        } else if let Some(pool) = store.as_postgres() {
            get_enabled_binding_postgres(pool, key, binding_id).await
        } else {
            Err(DataSourceError::Storage(
                "Unsupported database type".to_string(),
            ))
        }
    }

    /// All bindings of the tenant, most recently updated first
    pub(crate) async fn list_bindings(
        key: &BindingKey<'_>,
    ) -> Result<Vec<DataSourceBinding>, DataSourceError> {
        let store = GENERIC_DATA_STORE.lock().await;

        if let Some(pool) = store.as_sqlite() {
            list_bindings_sqlite(pool, key).await
        } else if let Some(pool) = store.as_postgres() {
            list_bindings_postgres(pool, key).await
        } else {
            Err(DataSourceError::Storage(
                "Unsupported database type".to_string(),
            ))
        }
    }

    /// Replaces `source_info` of the binding keyed by `access_token` and
    /// re-enables it, or creates a fresh binding when there is none.
    pub(crate) async fn upsert_binding(
        key: &BindingKey<'_>,
        access_token: &str,
        source_info: &SourceInfo,
    ) -> Result<DataSourceBinding, DataSourceError> {
        let new_id = uuid::Uuid::new_v4().to_string();
        let store = GENERIC_DATA_STORE.lock().await;

        let binding = if let Some(pool) = store.as_sqlite() {
            upsert_binding_sqlite(pool, key, access_token, source_info, new_id).await?
        } else if let Some(pool) = store.as_postgres() {
            upsert_binding_postgres(pool, key, access_token, source_info, new_id).await?
        } else {
            return Err(DataSourceError::Storage(
                "Unsupported database type".to_string(),
            ));
        };

        tracing::info!(
            "Stored {} binding {} for tenant {} ({} pages)",
            binding.provider,
            binding.id,
            binding.tenant_id,
            binding.source_info.total
        );
        Ok(binding)
    }

    pub(crate) async fn update_source_info(
        binding_id: &str,
        source_info: &SourceInfo,
    ) -> Result<DataSourceBinding, DataSourceError> {
        let store = GENERIC_DATA_STORE.lock().await;

        let binding = if let Some(pool) = store.as_sqlite() {
            update_source_info_sqlite(pool, binding_id, source_info).await?
        } else if let Some(pool) = store.as_postgres() {
            update_source_info_postgres(pool, binding_id, source_info).await?
        } else {
            return Err(DataSourceError::Storage(
                "Unsupported database type".to_string(),
            ));
        };

        tracing::info!(
            "Resynced binding {} ({} pages)",
            binding.id,
            binding.source_info.total
        );
        Ok(binding)
    }

    #[cfg(test)]
    pub(crate) async fn disable_binding(binding_id: &str) -> Result<(), DataSourceError> {
        let store = GENERIC_DATA_STORE.lock().await;

        match store.as_sqlite() {
            Some(pool) => set_disabled_sqlite(pool, binding_id).await,
            None => Err(DataSourceError::Storage(
                "Test helper supports SQLite only".to_string(),
            )),
        }
    }
}
