use async_trait::async_trait;

use crate::datasource::{
    BindingKey, DataSourceBinding, DataSourceStore, NOTION_PROVIDER, PageDescriptor, SourceInfo,
    normalize_search_results,
};
use crate::oauth2::NotionOAuth;

use super::errors::CoordinationError;
use super::types::TenantContext;

/// An OAuth2-authorized document source a tenant can bind to.
#[async_trait]
pub trait OAuthDataSource: Send + Sync {
    /// Provider name stored on the bindings this source creates
    fn provider(&self) -> &'static str;

    /// Consent screen URL to send the user to
    fn get_authorization_url(&self) -> String;

    /// Completes the authorization: exchanges `code`, fetches the document
    /// tree and upserts the tenant's binding for the obtained token.
    async fn get_access_token(
        &self,
        tenant: &TenantContext,
        code: &str,
    ) -> Result<DataSourceBinding, CoordinationError>;

    /// Refetches the document tree of an enabled binding
    async fn sync_data_source(
        &self,
        tenant: &TenantContext,
        binding_id: &str,
    ) -> Result<DataSourceBinding, CoordinationError>;

    async fn list_bindings(
        &self,
        tenant: &TenantContext,
    ) -> Result<Vec<DataSourceBinding>, CoordinationError>;
}

impl NotionOAuth {
    /// Searches pages and databases visible to `access_token` and flattens
    /// them into descriptors.
    pub async fn get_authorized_pages(
        &self,
        access_token: &str,
    ) -> Result<Vec<PageDescriptor>, CoordinationError> {
        let page_results = self.search_pages(access_token).await?;
        let database_results = self.search_databases(access_token).await?;

        let pages =
            normalize_search_results(&page_results, &database_results, self.database_listing())?;
        tracing::debug!(
            "Normalized {} pages and {} databases into {} descriptors",
            page_results.len(),
            database_results.len(),
            pages.len()
        );

        Ok(pages)
    }
}

#[async_trait]
impl OAuthDataSource for NotionOAuth {
    fn provider(&self) -> &'static str {
        NOTION_PROVIDER
    }

    fn get_authorization_url(&self) -> String {
        self.authorization_url()
    }

    async fn get_access_token(
        &self,
        tenant: &TenantContext,
        code: &str,
    ) -> Result<DataSourceBinding, CoordinationError> {
        let grant = self.exchange_code_for_token(code).await?;
        let pages = self.get_authorized_pages(&grant.access_token).await?;

        let source_info = SourceInfo::new(
            grant.workspace_name,
            grant.workspace_icon,
            grant.workspace_id,
            pages,
        );

        let key = BindingKey::new(&tenant.tenant_id, NOTION_PROVIDER);
        let binding =
            DataSourceStore::upsert_binding(&key, &grant.access_token, &source_info).await?;

        Ok(binding)
    }

    async fn sync_data_source(
        &self,
        tenant: &TenantContext,
        binding_id: &str,
    ) -> Result<DataSourceBinding, CoordinationError> {
        let key = BindingKey::new(&tenant.tenant_id, NOTION_PROVIDER);
        let binding = DataSourceStore::get_enabled_binding(&key, binding_id)
            .await?
            .ok_or_else(|| {
                CoordinationError::BindingNotFound {
                    binding_id: binding_id.to_string(),
                }
                .log()
            })?;

        let pages = self.get_authorized_pages(&binding.access_token).await?;

        let mut source_info = binding.source_info;
        source_info.replace_pages(pages);

        let binding = DataSourceStore::update_source_info(&binding.id, &source_info).await?;
        Ok(binding)
    }

    async fn list_bindings(
        &self,
        tenant: &TenantContext,
    ) -> Result<Vec<DataSourceBinding>, CoordinationError> {
        let key = BindingKey::new(&tenant.tenant_id, NOTION_PROVIDER);
        Ok(DataSourceStore::list_bindings(&key).await?)
    }
}
