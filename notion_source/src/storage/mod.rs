mod data_store;
mod errors;
mod schema_validation;

/// Checks the store configuration and opens the connection pool.
pub(crate) async fn init() -> Result<(), StorageError> {
    data_store::check_store_config()?;
    let _ = &*GENERIC_DATA_STORE;

    Ok(())
}

pub(crate) use data_store::{DB_TABLE_PREFIX, GENERIC_DATA_STORE};
pub(crate) use errors::StorageError;
pub(crate) use schema_validation::{validate_postgres_table_schema, validate_sqlite_table_schema};
