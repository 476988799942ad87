//! Process-wide relational store shared by every binding operation

use sqlx::{Pool, Postgres, Sqlite};
use std::{env, str::FromStr, sync::LazyLock};
use tokio::sync::Mutex;

use super::errors::StorageError;

const SUPPORTED_STORE_TYPES: [&str; 2] = ["sqlite", "postgres"];

static GENERIC_DATA_STORE_TYPE: LazyLock<String> = LazyLock::new(|| {
    env::var("GENERIC_DATA_STORE_TYPE").expect("GENERIC_DATA_STORE_TYPE must be set")
});

static GENERIC_DATA_STORE_URL: LazyLock<String> = LazyLock::new(|| {
    env::var("GENERIC_DATA_STORE_URL").expect("GENERIC_DATA_STORE_URL must be set")
});

/// Table prefix from environment variable
pub(crate) static DB_TABLE_PREFIX: LazyLock<String> =
    LazyLock::new(|| env::var("DB_TABLE_PREFIX").unwrap_or_else(|_| "nds_".to_string()));

/// Connection pool of whichever backend was configured
#[derive(Clone, Debug)]
pub(crate) enum DataStore {
    Sqlite(Pool<Sqlite>),
    Postgres(Pool<Postgres>),
}

impl DataStore {
    pub(crate) fn as_sqlite(&self) -> Option<&Pool<Sqlite>> {
        match self {
            Self::Sqlite(pool) => Some(pool),
            Self::Postgres(_) => None,
        }
    }

    pub(crate) fn as_postgres(&self) -> Option<&Pool<Postgres>> {
        match self {
            Self::Postgres(pool) => Some(pool),
            Self::Sqlite(_) => None,
        }
    }

    fn connect_lazy(store_type: &str, store_url: &str) -> Result<Self, StorageError> {
        match store_type {
            "sqlite" => {
                let opts = sqlx::sqlite::SqliteConnectOptions::from_str(store_url)
                    .map_err(|e| StorageError::Config(format!("Invalid SQLite URL: {e}")))?
                    .create_if_missing(true);
                Ok(Self::Sqlite(sqlx::SqlitePool::connect_lazy_with(opts)))
            }
            "postgres" => {
                let pool = sqlx::PgPool::connect_lazy(store_url)
                    .map_err(|e| StorageError::Config(format!("Invalid Postgres URL: {e}")))?;
                Ok(Self::Postgres(pool))
            }
            t => Err(StorageError::Config(format!(
                "Unsupported store type: {t}. Supported types are 'sqlite' and 'postgres'"
            ))),
        }
    }
}

pub(crate) static GENERIC_DATA_STORE: LazyLock<Mutex<DataStore>> = LazyLock::new(|| {
    let store_type = GENERIC_DATA_STORE_TYPE.as_str();
    let store_url = GENERIC_DATA_STORE_URL.as_str();

    tracing::info!("Initializing data store with type: {}", store_type);

    let store = match DataStore::connect_lazy(store_type, store_url) {
        Ok(store) => store,
        Err(e) => panic!("{e}"),
    };

    Mutex::new(store)
});

/// Validates the store environment without touching the pool, so that
/// `init()` can report misconfiguration as an error instead of a panic.
pub(super) fn check_store_config() -> Result<(), StorageError> {
    let store_type = env::var("GENERIC_DATA_STORE_TYPE")
        .map_err(|_| StorageError::Config("GENERIC_DATA_STORE_TYPE must be set".to_string()))?;
    env::var("GENERIC_DATA_STORE_URL")
        .map_err(|_| StorageError::Config("GENERIC_DATA_STORE_URL must be set".to_string()))?;

    if !SUPPORTED_STORE_TYPES.contains(&store_type.as_str()) {
        return Err(StorageError::Config(format!(
            "Unsupported store type: {store_type}. Supported types are 'sqlite' and 'postgres'"
        )));
    }
    Ok(())
}
