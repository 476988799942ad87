use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Body returned by the Notion token endpoint.
///
/// Every field is optional so that error bodies still parse and can be
/// reported verbatim. Fields holding anything but a string read as `None`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct NotionTokenResponse {
    #[serde(default, deserialize_with = "string_or_none")]
    pub(crate) access_token: Option<String>,
    #[serde(default, deserialize_with = "string_or_none")]
    pub(crate) workspace_name: Option<String>,
    #[serde(default, deserialize_with = "string_or_none")]
    pub(crate) workspace_icon: Option<String>,
    #[serde(default, deserialize_with = "string_or_none")]
    pub(crate) workspace_id: Option<String>,
}

fn string_or_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_str().map(str::to_string))
}

/// Successful outcome of the authorization-code exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenGrant {
    pub access_token: String,
    pub workspace_name: Option<String>,
    pub workspace_icon: Option<String>,
    pub workspace_id: Option<String>,
}

/// Object kinds accepted by the search filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SearchObject {
    Page,
    Database,
}

impl SearchObject {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::Page => "page",
            Self::Database => "database",
        }
    }
}

#[derive(Debug, Serialize)]
struct SearchFilter {
    value: &'static str,
    property: &'static str,
}

/// JSON body of a search request: `{"filter": {"value": .., "property": "object"}}`
#[derive(Debug, Serialize)]
pub(crate) struct SearchRequest {
    filter: SearchFilter,
}

impl SearchRequest {
    pub(crate) fn objects(object: SearchObject) -> Self {
        Self {
            filter: SearchFilter {
                value: object.as_str(),
                property: "object",
            },
        }
    }
}

/// Only the first page of results is read; `has_more`/`next_cursor` are ignored.
#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    pub(crate) results: Vec<Value>,
}
