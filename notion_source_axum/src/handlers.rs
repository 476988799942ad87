use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::Redirect,
    routing::{get, post},
};
use std::{collections::HashMap, sync::Arc};

use notion_source::{DataSourceBinding, OAuthDataSource};

use super::config::DATASOURCE_REDIRECT_AFTER_AUTH;
use super::error::IntoResponseError;
use super::tenant::Tenant;

type SharedSource = Arc<dyn OAuthDataSource>;

pub(super) fn router(source: SharedSource) -> Router {
    Router::new()
        .route("/authorize", get(authorize))
        .route("/callback", get(callback))
        .route("/bindings", get(list_bindings))
        .route("/bindings/{binding_id}/sync", post(sync_binding))
        .with_state(source)
}

async fn authorize(State(source): State<SharedSource>) -> Redirect {
    let url = source.get_authorization_url();
    tracing::debug!("Redirecting to {} consent screen", source.provider());
    Redirect::to(&url)
}

async fn callback(
    State(source): State<SharedSource>,
    Tenant(tenant): Tenant,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Redirect, (StatusCode, String)> {
    if let Some(error) = params.get("error") {
        tracing::debug!("Authorization denied by {}: {}", source.provider(), error);
        return Err((
            StatusCode::BAD_REQUEST,
            format!("Authorization failed: {error}"),
        ));
    }

    let code = params
        .get("code")
        .ok_or_else(|| (StatusCode::BAD_REQUEST, "Missing code".to_string()))?;

    let binding = source
        .get_access_token(&tenant, code)
        .await
        .into_response_error()?;
    tracing::info!(
        "Tenant {} bound {} workspace {:?}",
        tenant.tenant_id,
        source.provider(),
        binding.source_info.workspace_name
    );

    Ok(Redirect::to(DATASOURCE_REDIRECT_AFTER_AUTH.as_str()))
}

async fn sync_binding(
    State(source): State<SharedSource>,
    Tenant(tenant): Tenant,
    Path(binding_id): Path<String>,
) -> Result<Json<DataSourceBinding>, (StatusCode, String)> {
    source
        .sync_data_source(&tenant, &binding_id)
        .await
        .map(Json)
        .into_response_error()
}

async fn list_bindings(
    State(source): State<SharedSource>,
    Tenant(tenant): Tenant,
) -> Result<Json<Vec<DataSourceBinding>>, (StatusCode, String)> {
    source
        .list_bindings(&tenant)
        .await
        .map(Json)
        .into_response_error()
}
