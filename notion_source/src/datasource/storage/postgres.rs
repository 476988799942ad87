use chrono::Utc;
use sqlx::{Pool, Postgres, types::Json};

use crate::datasource::errors::DataSourceError;
use crate::datasource::types::{DataSourceBinding, SourceInfo};
use crate::storage::validate_postgres_table_schema;

use super::config::DB_TABLE_DATA_SOURCE_BINDINGS;
use super::store_type::BindingKey;

pub(super) async fn create_tables_postgres(pool: &Pool<Postgres>) -> Result<(), DataSourceError> {
    let table_name = DB_TABLE_DATA_SOURCE_BINDINGS.as_str();

    sqlx::query(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS {table_name} (
            id TEXT PRIMARY KEY NOT NULL,
            tenant_id TEXT NOT NULL,
            provider TEXT NOT NULL,
            access_token TEXT NOT NULL,
            source_info JSONB NOT NULL,
            disabled BOOLEAN NOT NULL DEFAULT FALSE,
            created_at TIMESTAMPTZ NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL
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

pub(super) async fn validate_binding_tables_postgres(
    pool: &Pool<Postgres>,
) -> Result<(), DataSourceError> {
    let table_name = DB_TABLE_DATA_SOURCE_BINDINGS.as_str();

    let expected_columns = [
        ("id", "text"),
        ("tenant_id", "text"),
        ("provider", "text"),
        ("access_token", "text"),
        ("source_info", "jsonb"),
        ("disabled", "boolean"),
        ("created_at", "timestamp with time zone"),
        ("updated_at", "timestamp with time zone"),
    ];

    validate_postgres_table_schema(pool, table_name, &expected_columns, DataSourceError::Storage)
        .await
}

pub(super) async fn get_enabled_binding_postgres(
    pool: &Pool<Postgres>,
    key: &BindingKey<'_>,
    binding_id: &str,
) -> Result<Option<DataSourceBinding>, DataSourceError> {
    let table_name = DB_TABLE_DATA_SOURCE_BINDINGS.as_str();

    let binding = sqlx::query_as::<_, DataSourceBinding>(&format!(
        r#"
        SELECT * FROM {table_name}
        WHERE tenant_id = $1 AND provider = $2 AND id = $3 AND disabled = FALSE
        "#
    ))
    .bind(key.tenant_id)
    .bind(key.provider)
    .bind(binding_id)
    .fetch_optional(pool)
    .await?;

    Ok(binding)
}

pub(super) async fn list_bindings_postgres(
    pool: &Pool<Postgres>,
    key: &BindingKey<'_>,
) -> Result<Vec<DataSourceBinding>, DataSourceError> {
    let table_name = DB_TABLE_DATA_SOURCE_BINDINGS.as_str();

    let bindings = sqlx::query_as::<_, DataSourceBinding>(&format!(
        r#"
        SELECT * FROM {table_name}
        WHERE tenant_id = $1 AND provider = $2
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
pub(super) async fn upsert_binding_postgres(
    pool: &Pool<Postgres>,
    key: &BindingKey<'_>,
    access_token: &str,
    source_info: &SourceInfo,
    new_id: String,
) -> Result<DataSourceBinding, DataSourceError> {
    let table_name = DB_TABLE_DATA_SOURCE_BINDINGS.as_str();

    let now = Utc::now();
    let binding_id: String = sqlx::query_scalar(&format!(
        r#"
        INSERT INTO {table_name}
        (id, tenant_id, provider, access_token, source_info, disabled, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, FALSE, $6, $7)
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

    fetch_binding_postgres(pool, &binding_id).await
}

pub(super) async fn update_source_info_postgres(
    pool: &Pool<Postgres>,
    binding_id: &str,
    source_info: &SourceInfo,
) -> Result<DataSourceBinding, DataSourceError> {
    let table_name = DB_TABLE_DATA_SOURCE_BINDINGS.as_str();

    sqlx::query(&format!(
        r#"
        UPDATE {table_name} SET
            source_info = $1,
            disabled = FALSE,
            updated_at = $2
        WHERE id = $3
        "#
    ))
    .bind(Json(source_info))
    .bind(Utc::now())
    .bind(binding_id)
    .execute(pool)
    .await?;

    fetch_binding_postgres(pool, binding_id).await
}

async fn fetch_binding_postgres(
    pool: &Pool<Postgres>,
    binding_id: &str,
) -> Result<DataSourceBinding, DataSourceError> {
    let table_name = DB_TABLE_DATA_SOURCE_BINDINGS.as_str();

    let binding = sqlx::query_as::<_, DataSourceBinding>(&format!(
        "SELECT * FROM {table_name} WHERE id = $1"
    ))
    .bind(binding_id)
    .fetch_one(pool)
    .await?;

    Ok(binding)
}
