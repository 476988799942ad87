use std::sync::LazyLock;

/// Where the browser is sent once the Notion callback has been processed
/// Default: "/"
pub static DATASOURCE_REDIRECT_AFTER_AUTH: LazyLock<String> = LazyLock::new(|| {
    std::env::var("DATASOURCE_REDIRECT_AFTER_AUTH").unwrap_or_else(|_| "/".to_string())
});
