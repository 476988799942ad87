use serde_json::Value;

use crate::oauth2::config::NOTION_API_VERSION;
use crate::oauth2::errors::OAuth2Error;
use crate::oauth2::types::{SearchObject, SearchRequest, SearchResponse};

use super::core::NotionOAuth;
use super::utils::get_client;

impl NotionOAuth {
    /// Raw page records shared with the integration (first result page only)
    pub async fn search_pages(&self, access_token: &str) -> Result<Vec<Value>, OAuth2Error> {
        self.search_objects(access_token, SearchObject::Page).await
    }

    /// Raw database records shared with the integration (first result page only)
    pub async fn search_databases(&self, access_token: &str) -> Result<Vec<Value>, OAuth2Error> {
        self.search_objects(access_token, SearchObject::Database).await
    }

    async fn search_objects(
        &self,
        access_token: &str,
        object: SearchObject,
    ) -> Result<Vec<Value>, OAuth2Error> {
        let client = get_client()?;
        let response = client
            .post(self.endpoints.search_url.as_str())
            .bearer_auth(access_token)
            .header("Notion-Version", NOTION_API_VERSION.as_str())
            .json(&SearchRequest::objects(object))
            .send()
            .await
            .map_err(|e| OAuth2Error::Search(e.to_string()))?;

        let status = response.status();
        let response_body = response
            .text()
            .await
            .map_err(|e| OAuth2Error::Search(e.to_string()))?;

        if !status.is_success() {
            tracing::error!(
                "Notion {} search failed with status {}",
                object.as_str(),
                status
            );
            return Err(OAuth2Error::Search(format!("{status}: {response_body}")));
        }

        let search_response: SearchResponse =
            serde_json::from_str(&response_body).map_err(|e| {
                OAuth2Error::Search(format!(
                    "Failed to parse {} search response: {e}",
                    object.as_str()
                ))
            })?;

        tracing::debug!(
            "Notion {} search returned {} results",
            object.as_str(),
            search_response.results.len()
        );

        Ok(search_response.results)
    }
}
