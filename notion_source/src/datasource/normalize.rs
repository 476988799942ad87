//! Flattening of raw Notion search results into [`PageDescriptor`]s.
//!
//! Pages and databases come back from the search API in different shapes:
//! a page keeps its title inside `properties` (under `Name` for database rows,
//! under `title` otherwise) while a database carries a top-level `title`
//! array. Both share the `parent` and `icon` conventions.

use serde_json::Value;

use super::errors::DataSourceError;
use super::types::{DatabaseListing, PageDescriptor, PageIcon, PageKind, ROOT_PARENT_ID};

const UNTITLED: &str = "Untitled";

/// Builds the descriptor list from the two search result sets.
pub fn normalize_search_results(
    page_results: &[Value],
    database_results: &[Value],
    listing: DatabaseListing,
) -> Result<Vec<PageDescriptor>, DataSourceError> {
    // Databases are only ever listed under a page in this mode
    if listing == DatabaseListing::PerPage && page_results.is_empty() {
        return Ok(Vec::new());
    }

    let databases = database_results
        .iter()
        .map(database_descriptor)
        .collect::<Result<Vec<_>, _>>()?;

    let mut descriptors = Vec::new();
    for page_result in page_results {
        descriptors.push(page_descriptor(page_result)?);
        if listing == DatabaseListing::PerPage {
            descriptors.extend(databases.iter().cloned());
        }
    }

    if listing == DatabaseListing::Once {
        descriptors.extend(databases);
    }

    Ok(descriptors)
}

fn page_descriptor(record: &Value) -> Result<PageDescriptor, DataSourceError> {
    let page_id = record_id(record, "page")?;
    let properties = required(record, "properties", "page")?;

    let page_name = if let Some(name) = properties.get("Name") {
        first_plain_text(required(name, "title", "Name property")?)?
    } else if let Some(title) = properties.get("title") {
        first_plain_text(required(title, "title", "title property")?)?
    } else {
        None
    };

    Ok(PageDescriptor {
        page_id,
        page_name: page_name.unwrap_or_else(|| UNTITLED.to_string()),
        page_icon: record_icon(record)?,
        parent_id: parent_id(required(record, "parent", "page")?)?,
        kind: PageKind::Page,
    })
}

fn database_descriptor(record: &Value) -> Result<PageDescriptor, DataSourceError> {
    let page_id = record_id(record, "database")?;
    let page_name = first_plain_text(required(record, "title", "database")?)?;

    Ok(PageDescriptor {
        page_id,
        page_name: page_name.unwrap_or_else(|| UNTITLED.to_string()),
        page_icon: record_icon(record)?,
        parent_id: parent_id(required(record, "parent", "database")?)?,
        kind: PageKind::Database,
    })
}

fn required<'a>(value: &'a Value, key: &str, context: &str) -> Result<&'a Value, DataSourceError> {
    value
        .get(key)
        .ok_or_else(|| DataSourceError::MalformedRecord(format!("{context} without '{key}'")))
}

fn record_id(record: &Value, context: &str) -> Result<String, DataSourceError> {
    required(record, "id", context)?
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| DataSourceError::MalformedRecord(format!("{context} id is not a string")))
}

fn record_icon(record: &Value) -> Result<Option<PageIcon>, DataSourceError> {
    match record.get("icon") {
        Some(icon) => PageIcon::from_value(icon),
        None => Ok(None),
    }
}

/// `plain_text` of the first rich-text entry, `None` for an empty array
fn first_plain_text(rich_text: &Value) -> Result<Option<String>, DataSourceError> {
    let entries = rich_text.as_array().ok_or_else(|| {
        DataSourceError::MalformedRecord(format!("title is not an array: {rich_text}"))
    })?;

    match entries.first() {
        Some(entry) => {
            let text = required(entry, "plain_text", "title entry")?
                .as_str()
                .ok_or_else(|| {
                    DataSourceError::MalformedRecord("plain_text is not a string".to_string())
                })?;
            Ok(Some(text.to_string()))
        }
        None => Ok(None),
    }
}

/// `"root"` for workspace-level records, otherwise the id held under the
/// key named by `parent.type` (`page_id`, `database_id`, `block_id`).
fn parent_id(parent: &Value) -> Result<String, DataSourceError> {
    let parent_type = required(parent, "type", "parent")?
        .as_str()
        .ok_or_else(|| DataSourceError::MalformedRecord("parent type is not a string".into()))?;

    if parent_type == "workspace" {
        return Ok(ROOT_PARENT_ID.to_string());
    }

    required(parent, parent_type, "parent")?
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| {
            DataSourceError::MalformedRecord(format!("parent '{parent_type}' is not a string"))
        })
}
