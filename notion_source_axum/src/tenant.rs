use axum::extract::FromRequestParts;
use http::{StatusCode, request::Parts};
use notion_source::TenantContext;

/// The acting tenant, taken from the [`TenantContext`] request extension.
///
/// The host inserts the extension from its own session layer before the
/// data source routes run. Requests without it are rejected with 401.
///
/// ```no_run
/// use axum::{Router, routing::get};
/// use notion_source_axum::Tenant;
///
/// async fn whoami(Tenant(tenant): Tenant) -> String {
///     tenant.tenant_id
/// }
///
/// let app: Router = Router::new().route("/whoami", get(whoami));
/// ```
#[derive(Clone, Debug)]
pub struct Tenant(pub TenantContext);

impl<S> FromRequestParts<S> for Tenant
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<TenantContext>() {
            Some(tenant) => Ok(Tenant(tenant.clone())),
            None => {
                tracing::debug!("No tenant context on request to {}", parts.uri.path());
                Err((StatusCode::UNAUTHORIZED, "Unauthorized"))
            }
        }
    }
}
