mod errors;
mod normalize;
mod storage;
mod types;

pub use errors::DataSourceError;
pub use normalize::normalize_search_results;
pub use types::{
    DataSourceBinding, DatabaseListing, NOTION_PROVIDER, PageDescriptor, PageIcon, PageKind,
    ROOT_PARENT_ID, SourceInfo, UNKNOWN_ICON_KIND,
};

pub(crate) use storage::{BindingKey, DataSourceStore};
