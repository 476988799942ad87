use std::{env, sync::LazyLock};

use crate::storage::DB_TABLE_PREFIX;

/// Data source bindings table name
pub(super) static DB_TABLE_DATA_SOURCE_BINDINGS: LazyLock<String> = LazyLock::new(|| {
    env::var("DB_TABLE_DATA_SOURCE_BINDINGS")
        .unwrap_or_else(|_| format!("{}{}", *DB_TABLE_PREFIX, "data_source_bindings"))
});
