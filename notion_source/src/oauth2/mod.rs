mod config;
mod errors;
mod main;
mod types;

pub use config::NotionEndpoints;
pub use errors::OAuth2Error;
pub use main::NotionOAuth;
pub use types::TokenGrant;

pub(crate) fn init() -> Result<(), OAuth2Error> {
    // Fail early on endpoint overrides that cannot be used as URLs
    let endpoints = NotionEndpoints::default();
    for url in [
        &endpoints.auth_url,
        &endpoints.token_url,
        &endpoints.search_url,
    ] {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(OAuth2Error::Config(format!("Invalid Notion endpoint URL: {url}")));
        }
    }
    tracing::debug!("Notion API version: {}", config::NOTION_API_VERSION.as_str());
    Ok(())
}
