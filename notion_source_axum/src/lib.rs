//! notion-source-axum - axum routes for the notion-source library
//!
//! Mount [`data_source_router`] under [`DATASOURCE_ROUTE_PREFIX`] and insert
//! a [`TenantContext`] request extension from your session layer.

mod config;
mod error;
mod handlers;
mod router;
mod tenant;

pub use config::DATASOURCE_REDIRECT_AFTER_AUTH;
pub use router::{data_source_router, data_source_router_no_trace};
pub use tenant::Tenant;

pub use notion_source::{DATASOURCE_ROUTE_PREFIX, NotionOAuth, TenantContext, init};
