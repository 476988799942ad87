use std::time::Duration;

use crate::oauth2::config::NOTION_HTTP_TIMEOUT_SECS;
use crate::oauth2::errors::OAuth2Error;

/// Creates the HTTP client used for calls to the Notion API.
///
/// - `timeout`: `NOTION_HTTP_TIMEOUT_SECS` (default 30s) so that a hung
///   provider response cannot block the caller forever.
/// - `pool_idle_timeout`: 90 seconds before an idle connection is dropped.
pub(super) fn get_client() -> Result<reqwest::Client, OAuth2Error> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(*NOTION_HTTP_TIMEOUT_SECS))
        .pool_idle_timeout(Duration::from_secs(90))
        .build()
        .map_err(|e| OAuth2Error::Internal(format!("Failed to create reqwest client: {e}")))
}
