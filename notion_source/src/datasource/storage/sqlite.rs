use chrono::Utc;
use sqlx::{Pool, Sqlite, types::Json};

use crate::datasource::errors::DataSourceError;
use crate::datasource::types::{DataSourceBinding, SourceInfo};
use crate::storage::validate_sqlite_table_schema;

use super::config::DB_TABLE_DATA_SOURCE_BINDINGS;
use super::store_type::BindingKey;

pub(super) async fn create_tables_sqlite(pool: &Pool<Sqlite>) -> Result<(), DataSourceError> {
    let table_name = DB_TABLE_DATA_SOURCE_BINDINGS.as_str();

    sqlx::query(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS {table_name} (
            id TEXT PRIMARY KEY NOT NULL,
            tenant_id TEXT NOT NULL,
            provider TEXT NOT NULL,
            access_token TEXT NOT NULL,
            source_info TEXT NOT NULL,
            disabled BOOLEAN NOT NULL DEFAULT FALSE,
            created_at TIMESTAMP NOT NULL,
            updated_at TIMESTAMP NOT NULL
        )
        "#
    ))
    .execute(pool)
    .await?;

    sqlx::query(&format!(
        r#"
        CREATE UNIQUE INDEX IF NOT EXISTS idx_{}_tenant_token
        ON {}(tenant_id, provider, access_token)
        "#,
        table_name.replace(".", "_"),
        table_name
    ))
    .execute(pool)
    .await?;

    Ok(())
}

pub(super) async fn validate_binding_tables_sqlite(
    pool: &Pool<Sqlite>,
) -> Result<(), DataSourceError> {
    let table_name = DB_TABLE_DATA_SOURCE_BINDINGS.as_str();

    let expected_columns = [
        ("id", "TEXT"),
        ("tenant_id", "TEXT"),
        ("provider", "TEXT"),
        ("access_token", "TEXT"),
        ("source_info", "TEXT"),
        ("disabled", "BOOLEAN"),
        ("created_at", "TIMESTAMP"),
        ("updated_at", "TIMESTAMP"),
    ];

    validate_sqlite_table_schema(pool, table_name, &expected_columns, DataSourceError::Storage)
        .await
}

#[cfg(test)]
pub(super) async fn get_binding_by_token_sqlite(
    pool: &Pool<Sqlite>,
    key: &BindingKey<'_>,
    access_token: &str,
) -> Result<Option<DataSourceBinding>, DataSourceError> {
    let table_name = DB_TABLE_DATA_SOURCE_BINDINGS.as_str();
    create_tables_sqlite(pool).await?;

    let binding = sqlx::query_as::<_, DataSourceBinding>(&format!(
        r#"
        SELECT * FROM {table_name}
        WHERE tenant_id = ? AND provider = ? AND access_token = ?
        "#
    ))
    .bind(key.tenant_id)
    .bind(key.provider)
    .bind(access_token)
    .fetch_optional(pool)
    .await?;

    Ok(binding)
}

pub(super) async fn get_enabled_binding_sqlite(
    pool: &Pool<Sqlite>,
    key: &BindingKey<'_>,
    binding_id: &str,
) -> Result<Option<DataSourceBinding>, DataSourceError> {
    let table_name = DB_TABLE_DATA_SOURCE_BINDINGS.as_str();
    create_tables_sqlite(pool).await?;

    let binding = sqlx::query_as::<_, DataSourceBinding>(&format!(
        r#"
        SELECT * FROM {table_name}
        WHERE tenant_id = ? AND provider = ? AND id = ? AND disabled = FALSE
        "#
    ))
    .bind(key.tenant_id)
    .bind(key.provider)
    .bind(binding_id)
    .fetch_optional(pool)
    .await?;

    Ok(binding)
}

pub(super) async fn list_bindings_sqlite(
    pool: &Pool<Sqlite>,
    key: &BindingKey<'_>,
) -> Result<Vec<DataSourceBinding>, DataSourceError> {
    let table_name = DB_TABLE_DATA_SOURCE_BINDINGS.as_str();
    create_tables_sqlite(pool).await?;

    let bindings = sqlx::query_as::<_, DataSourceBinding>(&format!(
        r#"
        SELECT * FROM {table_name}
        WHERE tenant_id = ? AND provider = ?
        ORDER BY updated_at DESC
        "#
    ))
    .bind(key.tenant_id)
    .bind(key.provider)
    .fetch_all(pool)
    .await?;

    Ok(bindings)
}

/// Inserts the binding or, when the tenant already holds one for this token,
/// replaces its `source_info` and re-enables it. Returns the stored row.
pub(super) async fn upsert_binding_sqlite(
    pool: &Pool<Sqlite>,
    key: &BindingKey<'_>,
    access_token: &str,
    source_info: &SourceInfo,
    new_id: String,
) -> Result<DataSourceBinding, DataSourceError> {
    let table_name = DB_TABLE_DATA_SOURCE_BINDINGS.as_str();
    create_tables_sqlite(pool).await?;

    let now = Utc::now();
    let binding_id: String = sqlx::query_scalar(&format!(
        r#"
        INSERT INTO {table_name}
        (id, tenant_id, provider, access_token, source_info, disabled, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, FALSE, ?, ?)
        ON CONFLICT (tenant_id, provider, access_token) DO UPDATE SET
            source_info = excluded.source_info,
            disabled = FALSE,
            updated_at = excluded.updated_at
        RETURNING id
        "#
    ))
    .bind(&new_id)
    .bind(key.tenant_id)
    .bind(key.provider)
    .bind(access_token)
    .bind(Json(source_info))
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await?;

    fetch_binding_sqlite(pool, &binding_id).await
}

pub(super) async fn update_source_info_sqlite(
    pool: &Pool<Sqlite>,
    binding_id: &str,
    source_info: &SourceInfo,
) -> Result<DataSourceBinding, DataSourceError> {
    let table_name = DB_TABLE_DATA_SOURCE_BINDINGS.as_str();
    create_tables_sqlite(pool).await?;

    sqlx::query(&format!(
        r#"
        UPDATE {table_name} SET
            source_info = ?,
            disabled = FALSE,
            updated_at = ?
        WHERE id = ?
        "#
    ))
    .bind(Json(source_info))
    .bind(Utc::now())
    .bind(binding_id)
    .execute(pool)
    .await?;

    fetch_binding_sqlite(pool, binding_id).await
}

async fn fetch_binding_sqlite(
    pool: &Pool<Sqlite>,
    binding_id: &str,
) -> Result<DataSourceBinding, DataSourceError> {
    let table_name = DB_TABLE_DATA_SOURCE_BINDINGS.as_str();

    let binding = sqlx::query_as::<_, DataSourceBinding>(&format!(
        "SELECT * FROM {table_name} WHERE id = ?"
    ))
    .bind(binding_id)
    .fetch_one(pool)
    .await?;

    Ok(binding)
}

/// Marks a binding as disabled. Only tests need this, nothing in the crate
/// ever disables a binding.
#[cfg(test)]
pub(super) async fn set_disabled_sqlite(
    pool: &Pool<Sqlite>,
    binding_id: &str,
) -> Result<(), DataSourceError> {
    let table_name = DB_TABLE_DATA_SOURCE_BINDINGS.as_str();

    sqlx::query(&format!(
        "UPDATE {table_name} SET disabled = TRUE WHERE id = ?"
    ))
    .bind(binding_id)
    .execute(pool)
    .await?;

    Ok(())
}
