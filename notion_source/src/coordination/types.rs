use serde::{Deserialize, Serialize};

/// The tenant on whose behalf an operation runs.
///
/// Hosts build it from their own session or request context and pass it to
/// every entry point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantContext {
    pub tenant_id: String,
}

impl TenantContext {
    pub fn new(tenant_id: impl Into<String>) -> Self {
        Self {
            tenant_id: tenant_id.into(),
        }
    }
}
