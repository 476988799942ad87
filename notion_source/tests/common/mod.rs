pub mod mock_notion_server;
pub mod test_setup;

pub use fixtures::*;
pub use mock_notion_server::mock_notion_server;
pub use test_setup::{TEST_REDIRECT_URI, init_test_environment, notion_client, unique_tenant};
