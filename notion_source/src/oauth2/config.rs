use std::{env, sync::LazyLock};

use crate::config::DATASOURCE_ROUTE_PREFIX;

pub(crate) static NOTION_AUTH_URL: LazyLock<String> = LazyLock::new(|| {
    env::var("NOTION_AUTH_URL")
        .unwrap_or_else(|_| "https://api.notion.com/v1/oauth/authorize".to_string())
});

pub(crate) static NOTION_TOKEN_URL: LazyLock<String> = LazyLock::new(|| {
    env::var("NOTION_TOKEN_URL")
        .unwrap_or_else(|_| "https://api.notion.com/v1/oauth/token".to_string())
});

pub(crate) static NOTION_SEARCH_URL: LazyLock<String> = LazyLock::new(|| {
    env::var("NOTION_SEARCH_URL").unwrap_or_else(|_| "https://api.notion.com/v1/search".to_string())
});

/// Value of the `Notion-Version` header sent with every API call
pub(crate) static NOTION_API_VERSION: LazyLock<String> =
    LazyLock::new(|| env::var("NOTION_API_VERSION").unwrap_or_else(|_| "2022-06-28".to_string()));

pub(super) static NOTION_HTTP_TIMEOUT_SECS: LazyLock<u64> = LazyLock::new(|| {
    env::var("NOTION_HTTP_TIMEOUT_SECS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(30)
});

/// Callback URL registered with the Notion integration.
///
/// `NOTION_REDIRECT_URI` wins; otherwise it is built from `ORIGIN` and the
/// route prefix. Returns `None` when neither is available.
pub(super) fn notion_redirect_uri() -> Option<String> {
    if let Ok(uri) = env::var("NOTION_REDIRECT_URI") {
        return Some(uri);
    }
    env::var("ORIGIN").ok().map(|origin| {
        format!(
            "{}{}/notion/callback",
            origin.trim_end_matches('/'),
            DATASOURCE_ROUTE_PREFIX.as_str()
        )
    })
}

/// Provider endpoints used by one [`NotionOAuth`](super::NotionOAuth) instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotionEndpoints {
    /// Consent screen URL
    pub auth_url: String,
    /// Authorization-code exchange URL
    pub token_url: String,
    /// Search API URL
    pub search_url: String,
}

impl NotionEndpoints {
    /// Endpoints rooted at `base_url`, e.g. `https://api.notion.com/v1`
    pub fn with_base_url(base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        Self {
            auth_url: format!("{base}/oauth/authorize"),
            token_url: format!("{base}/oauth/token"),
            search_url: format!("{base}/search"),
        }
    }
}

impl Default for NotionEndpoints {
    fn default() -> Self {
        Self {
            auth_url: NOTION_AUTH_URL.clone(),
            token_url: NOTION_TOKEN_URL.clone(),
            search_url: NOTION_SEARCH_URL.clone(),
        }
    }
}
