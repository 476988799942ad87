use std::env;

use crate::datasource::DatabaseListing;
use crate::oauth2::config::{NotionEndpoints, notion_redirect_uri};
use crate::oauth2::errors::OAuth2Error;
use crate::oauth2::types::{NotionTokenResponse, TokenGrant};

use super::utils::get_client;

/// OAuth2 client of one Notion public integration.
///
/// Holds the integration credentials, the callback URL registered with Notion
/// and the endpoints to talk to. Construct it with [`NotionOAuth::new`] or
/// [`NotionOAuth::from_env`].
#[derive(Clone)]
pub struct NotionOAuth {
    pub(super) client_id: String,
    pub(super) client_secret: String,
    pub(super) redirect_uri: String,
    pub(super) endpoints: NotionEndpoints,
    pub(super) database_listing: DatabaseListing,
}

impl std::fmt::Debug for NotionOAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotionOAuth")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[redacted]")
            .field("redirect_uri", &self.redirect_uri)
            .field("endpoints", &self.endpoints)
            .field("database_listing", &self.database_listing)
            .finish()
    }
}

impl NotionOAuth {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_uri: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_uri: redirect_uri.into(),
            endpoints: NotionEndpoints::default(),
            database_listing: DatabaseListing::default(),
        }
    }

    /// Builds the client from `NOTION_CLIENT_ID`, `NOTION_CLIENT_SECRET`,
    /// `NOTION_REDIRECT_URI` (or `ORIGIN`) and `NOTION_DATABASE_LISTING`.
    pub fn from_env() -> Result<Self, OAuth2Error> {
        let client_id = env::var("NOTION_CLIENT_ID")
            .map_err(|_| OAuth2Error::Config("NOTION_CLIENT_ID must be set".to_string()))?;
        let client_secret = env::var("NOTION_CLIENT_SECRET")
            .map_err(|_| OAuth2Error::Config("NOTION_CLIENT_SECRET must be set".to_string()))?;
        let redirect_uri = notion_redirect_uri().ok_or_else(|| {
            OAuth2Error::Config("NOTION_REDIRECT_URI or ORIGIN must be set".to_string())
        })?;

        let database_listing = match env::var("NOTION_DATABASE_LISTING") {
            Ok(value) => value.parse::<DatabaseListing>().map_err(OAuth2Error::Config)?,
            Err(_) => DatabaseListing::default(),
        };

        Ok(Self::new(client_id, client_secret, redirect_uri).with_database_listing(database_listing))
    }

    pub fn with_endpoints(mut self, endpoints: NotionEndpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    pub fn with_database_listing(mut self, database_listing: DatabaseListing) -> Self {
        self.database_listing = database_listing;
        self
    }

    pub fn redirect_uri(&self) -> &str {
        &self.redirect_uri
    }

    pub fn endpoints(&self) -> &NotionEndpoints {
        &self.endpoints
    }

    pub fn database_listing(&self) -> DatabaseListing {
        self.database_listing
    }

    /// Consent screen URL the user is redirected to before the callback.
    pub fn authorization_url(&self) -> String {
        format!(
            "{}?client_id={}&response_type=code&redirect_uri={}&owner=user",
            self.endpoints.auth_url,
            urlencoding::encode(&self.client_id),
            urlencoding::encode(&self.redirect_uri),
        )
    }

    /// Exchanges the callback `code` for an access token.
    ///
    /// A body without `access_token` is reported as
    /// [`OAuth2Error::AuthExchange`] carrying the whole body, whatever the
    /// HTTP status was.
    pub async fn exchange_code_for_token(&self, code: &str) -> Result<TokenGrant, OAuth2Error> {
        let client = get_client()?;
        let response = client
            .post(self.endpoints.token_url.as_str())
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .header(reqwest::header::ACCEPT, "application/json")
            .form(&[
                ("code", code),
                ("grant_type", "authorization_code"),
                ("redirect_uri", self.redirect_uri.as_str()),
            ])
            .send()
            .await
            .map_err(|e| OAuth2Error::TokenExchange(e.to_string()))?;

        let status = response.status();
        tracing::debug!("Token Exchange Response status: {}", status);

        let response_body = response
            .text()
            .await
            .map_err(|e| OAuth2Error::TokenExchange(e.to_string()))?;

        let token_response: NotionTokenResponse =
            serde_json::from_str(&response_body).map_err(|e| {
                OAuth2Error::TokenExchange(format!(
                    "Failed to parse token response ({e}): {response_body}"
                ))
            })?;

        let access_token = match token_response.access_token {
            Some(token) if !token.is_empty() => token,
            _ => {
                tracing::error!("Token endpoint returned no access token, status: {}", status);
                return Err(OAuth2Error::AuthExchange(response_body));
            }
        };

        tracing::debug!(
            "Authorized workspace: {:?} ({:?})",
            token_response.workspace_name,
            token_response.workspace_id
        );

        Ok(TokenGrant {
            access_token,
            workspace_name: token_response.workspace_name,
            workspace_icon: token_response.workspace_icon,
            workspace_id: token_response.workspace_id,
        })
    }
}
