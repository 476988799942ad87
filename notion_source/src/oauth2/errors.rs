use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum OAuth2Error {
    /// The token endpoint answered without an access token; carries the raw body
    #[error("Error in Notion OAuth: {0}")]
    AuthExchange(String),

    #[error("Token exchange error: {0}")]
    TokenExchange(String),

    #[error("Search error: {0}")]
    Search(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
