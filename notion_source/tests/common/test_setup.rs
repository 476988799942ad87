use notion_source::{NotionEndpoints, NotionOAuth, TenantContext};
use std::sync::Once;

use super::mock_notion_server::mock_notion_server;

pub const TEST_REDIRECT_URI: &str = "http://localhost:3000/datasource/notion/callback";

/// Loads `.env_test`, starts from an empty database and resets the mock server
pub async fn init_test_environment() {
    static ENV_INIT: Once = Once::new();
    ENV_INIT.call_once(|| {
        if dotenvy::from_filename(".env_test").is_err() {
            dotenvy::dotenv().ok();
        }
        if let Ok(url) = std::env::var("GENERIC_DATA_STORE_URL") {
            if let Some(path) = url.strip_prefix("sqlite:") {
                let _ = std::fs::remove_file(path);
            }
        }
    });

    notion_source::init()
        .await
        .expect("Failed to initialize notion_source");

    mock_notion_server().state.reset();
}

/// Client pointed at the mock server
pub fn notion_client() -> NotionOAuth {
    let base_url = format!("{}/v1", mock_notion_server().base_url);
    NotionOAuth::new("test-client-id", "test-client-secret", TEST_REDIRECT_URI)
        .with_endpoints(NotionEndpoints::with_base_url(&base_url))
}

pub fn unique_tenant() -> TenantContext {
    TenantContext::new(format!("tenant-{}", uuid::Uuid::new_v4()))
}
