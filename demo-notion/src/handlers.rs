use axum::{
    extract::Request,
    middleware::Next,
    response::{Html, Response},
};
use std::sync::LazyLock;

use notion_source_axum::{DATASOURCE_ROUTE_PREFIX, TenantContext};

/// Tenant used when a request carries no `X-Tenant-Id` header, e.g. the
/// browser coming back from the Notion consent screen
static DEMO_TENANT_ID: LazyLock<String> =
    LazyLock::new(|| std::env::var("DEMO_TENANT_ID").unwrap_or_else(|_| "demo".to_string()));

/// Stands in for a real session layer
pub(crate) async fn tenant_from_header(mut req: Request, next: Next) -> Response {
    let tenant_id = req
        .headers()
        .get("X-Tenant-Id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| DEMO_TENANT_ID.clone());

    req.extensions_mut().insert(TenantContext::new(tenant_id));
    next.run(req).await
}

pub(crate) async fn index() -> Html<String> {
    let prefix = DATASOURCE_ROUTE_PREFIX.as_str();
    Html(format!(
        r#"<!doctype html>
<html>
  <body>
    <h1>Notion data source demo</h1>
    <p><a href="{prefix}/notion/authorize">Connect a Notion workspace</a></p>
    <p><a href="{prefix}/notion/bindings">List bindings</a></p>
  </body>
</html>
"#
    ))
}
