//! notion-source - binds a tenant to a Notion workspace through OAuth2
//!
//! The crate builds the consent URL, exchanges the authorization code,
//! discovers the pages and databases the integration was granted and keeps
//! them on a tenant-scoped binding record in SQLite or PostgreSQL.
//!
//! Call [`init`] once at startup, then drive the flow through
//! [`OAuthDataSource`], implemented by [`NotionOAuth`].

mod config;
mod coordination;
mod datasource;
mod oauth2;
mod storage;


pub use config::DATASOURCE_ROUTE_PREFIX;

pub use coordination::{CoordinationError, OAuthDataSource, TenantContext};

pub use datasource::{
    DataSourceBinding, DataSourceError, DatabaseListing, NOTION_PROVIDER, PageDescriptor,
    PageIcon, PageKind, ROOT_PARENT_ID, SourceInfo, UNKNOWN_ICON_KIND,
    normalize_search_results,
};

pub use oauth2::{NotionEndpoints, NotionOAuth, OAuth2Error, TokenGrant};

/// Opens the data store and prepares the bindings table
pub async fn init() -> Result<(), CoordinationError> {
    storage::init().await?;
    oauth2::init()?;
    datasource::DataSourceStore::init().await?;
    Ok(())
}
