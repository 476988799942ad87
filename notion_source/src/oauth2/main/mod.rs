mod core;
mod search;
mod utils;

pub use core::NotionOAuth;
