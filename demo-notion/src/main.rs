use axum::{Router, middleware, routing::get};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use notion_source_axum::{DATASOURCE_ROUTE_PREFIX, NotionOAuth, data_source_router};

mod handlers;
mod server;

use crate::{
    handlers::{index, tenant_from_header},
    server::spawn_http_server,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "{}=debug,notion_source=debug,notion_source_axum=debug,tower_http=info",
                    env!("CARGO_CRATE_NAME")
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    notion_source_axum::init().await?;
    let notion = NotionOAuth::from_env()?;

    let app = Router::new()
        .route("/", get(index))
        .nest(
            DATASOURCE_ROUTE_PREFIX.as_str(),
            data_source_router(Arc::new(notion)),
        )
        .layer(middleware::from_fn(tenant_from_header));

    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3000);

    spawn_http_server(port, app).await?;
    Ok(())
}
