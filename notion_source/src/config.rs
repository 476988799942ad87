//! Central configuration for the notion_source crate

use std::sync::LazyLock;

/// Route prefix under which the data source endpoints are mounted
///
/// The Notion callback URL is derived from this prefix when
/// `NOTION_REDIRECT_URI` is not set.
/// Default: "/datasource"
pub static DATASOURCE_ROUTE_PREFIX: LazyLock<String> = LazyLock::new(|| {
    std::env::var("DATASOURCE_ROUTE_PREFIX").unwrap_or_else(|_| "/datasource".to_string())
});
