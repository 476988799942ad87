use notion_source::{
    CoordinationError, DatabaseListing, OAuth2Error, OAuthDataSource, PageIcon, PageKind,
};
use serde_json::json;
use serial_test::serial;

use crate::common::{
    TEST_REDIRECT_URI, database_under_page, init_test_environment, mock_notion_server,
    notion_client, titled_page, token_error, token_success, unique_tenant, untitled_root_page,
};

#[tokio::test]
#[serial]
async fn test_authorization_creates_binding_with_pages_then_databases() {
    init_test_environment().await;
    let mock = &mock_notion_server().state;
    mock.set_token_response(200, token_success("tok", "Acme", "w1"));
    mock.set_search_results(
        vec![untitled_root_page("p1")],
        vec![database_under_page("db1", "Tasks", "p1")],
    );
    let tenant = unique_tenant();

    let binding = notion_client()
        .get_access_token(&tenant, "auth-code")
        .await
        .expect("authorization should succeed");

    assert_eq!(binding.tenant_id, tenant.tenant_id);
    assert_eq!(binding.provider, "notion");
    assert_eq!(binding.access_token, "tok");
    assert!(!binding.disabled);

    let info = &binding.source_info;
    assert_eq!(info.workspace_name.as_deref(), Some("Acme"));
    assert_eq!(info.workspace_id.as_deref(), Some("w1"));
    assert_eq!(
        info.workspace_icon.as_deref(),
        Some("https://example.com/acme.png")
    );
    assert_eq!(info.total, 2);

    assert_eq!(info.pages[0].kind, PageKind::Page);
    assert_eq!(info.pages[0].page_id, "p1");
    assert_eq!(info.pages[0].page_name, "Untitled");
    assert_eq!(info.pages[0].parent_id, "root");
    assert_eq!(info.pages[0].page_icon, None);

    assert_eq!(info.pages[1].kind, PageKind::Database);
    assert_eq!(info.pages[1].page_id, "db1");
    assert_eq!(info.pages[1].page_name, "Tasks");
    assert_eq!(info.pages[1].parent_id, "p1");
    assert_eq!(
        info.pages[1].page_icon,
        Some(PageIcon::External {
            url: "https://example.com/db.png".to_string()
        })
    );

    let bindings = notion_client()
        .list_bindings(&tenant)
        .await
        .expect("listing should succeed");
    assert_eq!(bindings.len(), 1);
    assert_eq!(bindings[0].id, binding.id);
}

#[tokio::test]
#[serial]
async fn test_token_request_uses_basic_auth_and_form_body() {
    init_test_environment().await;
    let mock = &mock_notion_server().state;
    mock.set_token_response(200, token_success("tok", "Acme", "w1"));

    notion_client()
        .get_access_token(&unique_tenant(), "the-code")
        .await
        .expect("authorization should succeed");

    let requests = mock.token_requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(
        request.authorization.as_deref(),
        Some("Basic dGVzdC1jbGllbnQtaWQ6dGVzdC1jbGllbnQtc2VjcmV0")
    );
    assert_eq!(request.accept.as_deref(), Some("application/json"));
    assert_eq!(request.form.get("code").map(String::as_str), Some("the-code"));
    assert_eq!(
        request.form.get("grant_type").map(String::as_str),
        Some("authorization_code")
    );
    assert_eq!(
        request.form.get("redirect_uri").map(String::as_str),
        Some(TEST_REDIRECT_URI)
    );
}

#[tokio::test]
#[serial]
async fn test_search_requests_use_bearer_token_and_object_filter() {
    init_test_environment().await;
    let mock = &mock_notion_server().state;
    mock.set_token_response(200, token_success("tok-search", "Acme", "w1"));

    notion_client()
        .get_access_token(&unique_tenant(), "code")
        .await
        .expect("authorization should succeed");

    let requests = mock.search_requests();
    assert_eq!(requests.len(), 2);
    for request in &requests {
        assert_eq!(request.authorization.as_deref(), Some("Bearer tok-search"));
        assert_eq!(request.notion_version.as_deref(), Some("2022-06-28"));
    }
    assert_eq!(
        requests[0].body,
        json!({"filter": {"value": "page", "property": "object"}})
    );
    assert_eq!(
        requests[1].body,
        json!({"filter": {"value": "database", "property": "object"}})
    );
}

#[tokio::test]
#[serial]
async fn test_repeated_authorization_updates_single_binding() {
    init_test_environment().await;
    let mock = &mock_notion_server().state;
    let tenant = unique_tenant();
    let client = notion_client();

    mock.set_token_response(200, token_success("tok", "Acme", "w1"));
    mock.set_search_results(vec![untitled_root_page("p1")], Vec::new());
    let first = client
        .get_access_token(&tenant, "code-1")
        .await
        .expect("first authorization");

    mock.set_token_response(200, token_success("tok", "Acme Renamed", "w1"));
    mock.set_search_results(
        vec![untitled_root_page("p1"), titled_page("p2", "Child", "p1")],
        Vec::new(),
    );
    let second = client
        .get_access_token(&tenant, "code-2")
        .await
        .expect("second authorization");

    assert_eq!(second.id, first.id);
    assert_eq!(second.created_at, first.created_at);
    assert_eq!(
        second.source_info.workspace_name.as_deref(),
        Some("Acme Renamed")
    );
    assert_eq!(second.source_info.total, 2);
    assert_eq!(second.source_info.pages[1].page_name, "Child");
    assert_eq!(
        second.source_info.pages[1].page_icon,
        Some(PageIcon::Emoji("📄".to_string()))
    );

    let bindings = client.list_bindings(&tenant).await.expect("listing");
    assert_eq!(bindings.len(), 1);
    assert_eq!(bindings[0].source_info, second.source_info);
}

#[tokio::test]
#[serial]
async fn test_error_response_without_token_is_auth_exchange_error() {
    init_test_environment().await;
    let mock = &mock_notion_server().state;
    mock.set_token_response(400, token_error());
    let tenant = unique_tenant();

    let result = notion_client().get_access_token(&tenant, "bad-code").await;

    match result {
        Err(CoordinationError::OAuth2Error(OAuth2Error::AuthExchange(body))) => {
            assert_eq!(body, token_error())
        }
        other => panic!("Expected AuthExchange error, got {other:?}"),
    }
    assert!(mock.search_requests().is_empty());

    let bindings = notion_client().list_bindings(&tenant).await.expect("listing");
    assert!(bindings.is_empty());
}

#[tokio::test]
#[serial]
async fn test_success_status_without_token_leaves_existing_binding_untouched() {
    init_test_environment().await;
    let mock = &mock_notion_server().state;
    let tenant = unique_tenant();
    let client = notion_client();

    mock.set_token_response(200, token_success("tok", "Acme", "w1"));
    let existing = client
        .get_access_token(&tenant, "code")
        .await
        .expect("authorization");

    let body = json!({"access_token": "", "workspace_name": "Other"}).to_string();
    mock.set_token_response(200, body.clone());
    let result = client.get_access_token(&tenant, "code-again").await;

    match result {
        Err(CoordinationError::OAuth2Error(OAuth2Error::AuthExchange(raw))) => {
            assert_eq!(raw, body)
        }
        other => panic!("Expected AuthExchange error, got {other:?}"),
    }

    let bindings = client.list_bindings(&tenant).await.expect("listing");
    assert_eq!(bindings.len(), 1);
    assert_eq!(bindings[0].updated_at, existing.updated_at);
    assert_eq!(
        bindings[0].source_info.workspace_name.as_deref(),
        Some("Acme")
    );
}

#[tokio::test]
#[serial]
async fn test_non_json_token_body_is_token_exchange_error() {
    init_test_environment().await;
    let mock = &mock_notion_server().state;
    mock.set_token_response(502, "<html>Bad Gateway</html>");

    let result = notion_client()
        .get_access_token(&unique_tenant(), "code")
        .await;

    match result {
        Err(CoordinationError::OAuth2Error(OAuth2Error::TokenExchange(msg))) => {
            assert!(msg.contains("Bad Gateway"))
        }
        other => panic!("Expected TokenExchange error, got {other:?}"),
    }
}

#[tokio::test]
#[serial]
async fn test_search_failure_creates_no_binding() {
    init_test_environment().await;
    let mock = &mock_notion_server().state;
    mock.set_token_response(200, token_success("tok", "Acme", "w1"));
    mock.set_search_status(401);
    let tenant = unique_tenant();

    let result = notion_client().get_access_token(&tenant, "code").await;

    match result {
        Err(CoordinationError::OAuth2Error(OAuth2Error::Search(msg))) => {
            assert!(msg.starts_with("401"))
        }
        other => panic!("Expected Search error, got {other:?}"),
    }

    let bindings = notion_client().list_bindings(&tenant).await.expect("listing");
    assert!(bindings.is_empty());
}

#[tokio::test]
#[serial]
async fn test_malformed_search_record_creates_no_binding() {
    init_test_environment().await;
    let mock = &mock_notion_server().state;
    mock.set_token_response(200, token_success("tok", "Acme", "w1"));
    mock.set_search_results(vec![json!({"object": "page", "id": "p1"})], Vec::new());
    let tenant = unique_tenant();

    let result = notion_client().get_access_token(&tenant, "code").await;

    assert!(matches!(
        result,
        Err(CoordinationError::DataSourceError(_))
    ));
    let bindings = notion_client().list_bindings(&tenant).await.expect("listing");
    assert!(bindings.is_empty());
}

#[tokio::test]
#[serial]
async fn test_per_page_listing_repeats_databases_after_each_page() {
    init_test_environment().await;
    let mock = &mock_notion_server().state;
    mock.set_token_response(200, token_success("tok", "Acme", "w1"));
    mock.set_search_results(
        vec![untitled_root_page("p1"), titled_page("p2", "Child", "p1")],
        vec![database_under_page("db1", "Tasks", "p1")],
    );

    let legacy = notion_client().with_database_listing(DatabaseListing::PerPage);
    let binding = legacy
        .get_access_token(&unique_tenant(), "code")
        .await
        .expect("authorization");

    let ids: Vec<&str> = binding
        .source_info
        .pages
        .iter()
        .map(|p| p.page_id.as_str())
        .collect();
    assert_eq!(ids, vec!["p1", "db1", "p2", "db1"]);
    assert_eq!(binding.source_info.total, 4);
}

#[tokio::test]
#[serial]
async fn test_non_string_workspace_fields_do_not_block_authorization() {
    init_test_environment().await;
    let mock = &mock_notion_server().state;
    let body = json!({
        "access_token": "tok",
        "workspace_name": "Acme",
        "workspace_icon": {"type": "emoji", "emoji": "🏢"},
        "workspace_id": 7
    });
    mock.set_token_response(200, body.to_string());

    let binding = notion_client()
        .get_access_token(&unique_tenant(), "code")
        .await
        .expect("authorization should succeed");

    assert_eq!(binding.access_token, "tok");
    assert_eq!(binding.source_info.workspace_name.as_deref(), Some("Acme"));
    assert!(binding.source_info.workspace_icon.is_none());
    assert!(binding.source_info.workspace_id.is_none());
}
