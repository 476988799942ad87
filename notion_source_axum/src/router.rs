//! Router for the data source endpoints

use axum::Router;
use std::sync::Arc;
use tower_http::LatencyUnit;
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;

use notion_source::OAuthDataSource;

/// Create the router for one data source
///
/// The endpoints are nested under the provider name, so mounting the router
/// at `DATASOURCE_ROUTE_PREFIX` yields for Notion:
/// - GET  {DATASOURCE_ROUTE_PREFIX}/notion/authorize
/// - GET  {DATASOURCE_ROUTE_PREFIX}/notion/callback
/// - GET  {DATASOURCE_ROUTE_PREFIX}/notion/bindings
/// - POST {DATASOURCE_ROUTE_PREFIX}/notion/bindings/{binding_id}/sync
pub fn data_source_router(source: Arc<dyn OAuthDataSource>) -> Router {
    data_source_router_no_trace(source).layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_request(DefaultOnRequest::new().level(Level::INFO))
            .on_response(
                DefaultOnResponse::new()
                    .level(Level::INFO)
                    .latency_unit(LatencyUnit::Millis),
            ),
    )
}

/// Same as [`data_source_router`] without the HTTP tracing middleware
pub fn data_source_router_no_trace(source: Arc<dyn OAuthDataSource>) -> Router {
    let path = format!("/{}", source.provider());
    Router::new().nest(&path, super::handlers::router(source))
}
