//! Entry points tying the OAuth2 client, the normalizer and the binding store
//! together.

mod errors;
mod notion;
mod types;

pub use errors::CoordinationError;
pub use notion::OAuthDataSource;
pub use types::TenantContext;
