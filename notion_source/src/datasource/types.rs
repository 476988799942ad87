use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value, json};
use sqlx::FromRow;
use std::str::FromStr;

use super::errors::DataSourceError;

/// Provider name stored on every Notion binding
pub const NOTION_PROVIDER: &str = "notion";

/// `parent_id` of descriptors that sit directly under the workspace
pub const ROOT_PARENT_ID: &str = "root";

/// Persisted link between one tenant and one authorized Notion workspace
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DataSourceBinding {
    pub id: String,
    pub tenant_id: String,
    pub provider: String,
    #[serde(skip_serializing, default)]
    pub access_token: String,
    #[sqlx(json)]
    pub source_info: SourceInfo,
    pub disabled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Workspace metadata plus the cached document tree
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceInfo {
    pub workspace_name: Option<String>,
    pub workspace_icon: Option<String>,
    pub workspace_id: Option<String>,
    pub pages: Vec<PageDescriptor>,
    pub total: usize,
}

impl SourceInfo {
    pub fn new(
        workspace_name: Option<String>,
        workspace_icon: Option<String>,
        workspace_id: Option<String>,
        pages: Vec<PageDescriptor>,
    ) -> Self {
        let total = pages.len();
        Self {
            workspace_name,
            workspace_icon,
            workspace_id,
            pages,
            total,
        }
    }

    /// Swaps the document tree, keeping the workspace fields
    pub fn replace_pages(&mut self, pages: Vec<PageDescriptor>) {
        self.total = pages.len();
        self.pages = pages;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageKind {
    Page,
    Database,
}

/// One normalized page or database of the workspace.
///
/// In JSON a page's `page_icon` is only the payload of its icon (`"📄"`,
/// `{"url": ..}`), a database's keeps the tagged provider shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "StoredDescriptor", try_from = "StoredDescriptor")]
pub struct PageDescriptor {
    pub page_id: String,
    pub page_name: String,
    pub page_icon: Option<PageIcon>,
    pub parent_id: String,
    pub kind: PageKind,
}

#[derive(Serialize, Deserialize)]
struct StoredDescriptor {
    page_id: String,
    page_name: String,
    page_icon: Option<Value>,
    parent_id: String,
    #[serde(rename = "type")]
    kind: PageKind,
}

impl From<PageDescriptor> for StoredDescriptor {
    fn from(descriptor: PageDescriptor) -> Self {
        let page_icon = descriptor.page_icon.map(|icon| match descriptor.kind {
            PageKind::Page => icon.payload(),
            PageKind::Database => icon.to_value(),
        });

        Self {
            page_id: descriptor.page_id,
            page_name: descriptor.page_name,
            page_icon,
            parent_id: descriptor.parent_id,
            kind: descriptor.kind,
        }
    }
}

impl TryFrom<StoredDescriptor> for PageDescriptor {
    type Error = DataSourceError;

    fn try_from(stored: StoredDescriptor) -> Result<Self, Self::Error> {
        let page_icon = match (&stored.page_icon, stored.kind) {
            (None, _) => None,
            (Some(payload), PageKind::Page) => PageIcon::from_payload(payload),
            (Some(icon), PageKind::Database) => PageIcon::from_value(icon)?,
        };

        Ok(Self {
            page_id: stored.page_id,
            page_name: stored.page_name,
            page_icon,
            parent_id: stored.parent_id,
            kind: stored.kind,
        })
    }
}

/// Kind given to page icons read back from storage whose payload matches
/// none of the known shapes
pub const UNKNOWN_ICON_KIND: &str = "unknown";

/// Icon of a page or database, keyed by the kind Notion reports in `icon.type`.
///
/// Serialized on its own in Notion's tagged shape, e.g.
/// `{"type": "external", "external": {"url": "..."}}`.
#[derive(Debug, Clone, PartialEq)]
pub enum PageIcon {
    Emoji(String),
    External {
        url: String,
    },
    File {
        url: String,
        expiry_time: Option<String>,
    },
    /// Kinds this crate does not know about, kept verbatim
    Unknown {
        kind: String,
        payload: Value,
    },
}

impl PageIcon {
    /// Decodes an `icon` object. `null` means no icon.
    pub fn from_value(icon: &Value) -> Result<Option<Self>, DataSourceError> {
        if icon.is_null() {
            return Ok(None);
        }

        let kind = icon.get("type").and_then(Value::as_str).ok_or_else(|| {
            DataSourceError::MalformedRecord(format!("icon without a type: {icon}"))
        })?;
        let payload = icon.get(kind);

        let missing = || DataSourceError::MalformedRecord(format!("icon '{kind}' without payload"));

        let decoded = match kind {
            "emoji" => Self::Emoji(payload.and_then(Value::as_str).ok_or_else(missing)?.to_string()),
            "external" => Self::External {
                url: payload
                    .and_then(|p| p.get("url"))
                    .and_then(Value::as_str)
                    .ok_or_else(missing)?
                    .to_string(),
            },
            "file" => {
                let payload = payload.ok_or_else(missing)?;
                Self::File {
                    url: payload
                        .get("url")
                        .and_then(Value::as_str)
                        .ok_or_else(missing)?
                        .to_string(),
                    expiry_time: payload
                        .get("expiry_time")
                        .and_then(Value::as_str)
                        .map(str::to_string),
                }
            }
            other => Self::Unknown {
                kind: other.to_string(),
                payload: payload.cloned().unwrap_or(Value::Null),
            },
        };

        Ok(Some(decoded))
    }

    /// Decodes the bare payload a page icon is stored as.
    ///
    /// A string is an emoji, `{"url"}` an external link and
    /// `{"url", "expiry_time"}` an uploaded file. Other payloads come back as
    /// [`PageIcon::Unknown`] under [`UNKNOWN_ICON_KIND`].
    pub fn from_payload(payload: &Value) -> Option<Self> {
        let decoded = match payload {
            Value::Null => return None,
            Value::String(emoji) => Self::Emoji(emoji.clone()),
            Value::Object(map) => {
                let url = map.get("url").and_then(Value::as_str);

                match url {
                    Some(url) if map.len() == 1 => Self::External {
                        url: url.to_string(),
                    },
                    Some(url) if map.len() == 2 && map.contains_key("expiry_time") => {
                        Self::File {
                            url: url.to_string(),
                            expiry_time: map
                                .get("expiry_time")
                                .and_then(Value::as_str)
                                .map(str::to_string),
                        }
                    }
                    _ => Self::unknown_payload(payload),
                }
            }
            other => Self::unknown_payload(other),
        };

        Some(decoded)
    }

    fn unknown_payload(payload: &Value) -> Self {
        Self::Unknown {
            kind: UNKNOWN_ICON_KIND.to_string(),
            payload: payload.clone(),
        }
    }

    pub fn kind(&self) -> &str {
        match self {
            Self::Emoji(_) => "emoji",
            Self::External { .. } => "external",
            Self::File { .. } => "file",
            Self::Unknown { kind, .. } => kind,
        }
    }

    /// The value held under the icon's kind key
    pub fn payload(&self) -> Value {
        match self {
            Self::Emoji(emoji) => Value::String(emoji.clone()),
            Self::External { url } => json!({"url": url}),
            Self::File { url, expiry_time } => json!({"url": url, "expiry_time": expiry_time}),
            Self::Unknown { payload, .. } => payload.clone(),
        }
    }

    fn to_value(&self) -> Value {
        let mut map = Map::new();
        map.insert("type".to_string(), Value::String(self.kind().to_string()));
        map.insert(self.kind().to_string(), self.payload());
        Value::Object(map)
    }
}

impl Serialize for PageIcon {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for PageIcon {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        PageIcon::from_value(&value)
            .map_err(serde::de::Error::custom)?
            .ok_or_else(|| serde::de::Error::custom("icon must not be null"))
    }
}

/// How database search results are merged into the descriptor list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DatabaseListing {
    /// Pages first, then every database exactly once
    #[default]
    Once,
    /// Every database repeated after each page, as stored by older deployments
    PerPage,
}

impl FromStr for DatabaseListing {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "once" => Ok(Self::Once),
            "per_page" => Ok(Self::PerPage),
            _ => Err(format!(
                "Invalid NOTION_DATABASE_LISTING '{s}'. Must be 'once' or 'per_page'."
            )),
        }
    }
}
