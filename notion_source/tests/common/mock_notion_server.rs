//! Axum-based stand-in for the Notion OAuth and search endpoints
//!
//! One server is started per test binary on a background thread with its own
//! runtime. Tests configure the canned responses through [`MockNotionState`]
//! and inspect the requests it recorded.

use axum::{
    Form, Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
    routing::post,
};
use serde_json::{Value, json};
use std::{
    collections::HashMap,
    sync::{Arc, LazyLock, Mutex, mpsc},
    thread,
};

/// Request received by the token endpoint
#[derive(Clone, Debug)]
pub struct RecordedTokenRequest {
    pub authorization: Option<String>,
    pub accept: Option<String>,
    pub form: HashMap<String, String>,
}

/// Request received by the search endpoint
#[derive(Clone, Debug)]
pub struct RecordedSearchRequest {
    pub authorization: Option<String>,
    pub notion_version: Option<String>,
    pub body: Value,
}

#[derive(Clone, Debug)]
pub struct MockResponses {
    pub token_status: u16,
    pub token_body: String,
    pub search_status: u16,
    pub page_results: Vec<Value>,
    pub database_results: Vec<Value>,
}

impl Default for MockResponses {
    fn default() -> Self {
        Self {
            token_status: 200,
            token_body: json!({"access_token": "tok"}).to_string(),
            search_status: 200,
            page_results: Vec::new(),
            database_results: Vec::new(),
        }
    }
}

#[derive(Clone, Default)]
pub struct MockNotionState {
    pub responses: Arc<Mutex<MockResponses>>,
    pub token_requests: Arc<Mutex<Vec<RecordedTokenRequest>>>,
    pub search_requests: Arc<Mutex<Vec<RecordedSearchRequest>>>,
}

impl MockNotionState {
    /// Restores the default responses and forgets recorded requests
    pub fn reset(&self) {
        *self.responses.lock().unwrap() = MockResponses::default();
        self.token_requests.lock().unwrap().clear();
        self.search_requests.lock().unwrap().clear();
    }

    pub fn set_token_response(&self, status: u16, body: impl Into<String>) {
        let mut responses = self.responses.lock().unwrap();
        responses.token_status = status;
        responses.token_body = body.into();
    }

    pub fn set_search_results(&self, pages: Vec<Value>, databases: Vec<Value>) {
        let mut responses = self.responses.lock().unwrap();
        responses.page_results = pages;
        responses.database_results = databases;
    }

    pub fn set_search_status(&self, status: u16) {
        self.responses.lock().unwrap().search_status = status;
    }

    pub fn token_requests(&self) -> Vec<RecordedTokenRequest> {
        self.token_requests.lock().unwrap().clone()
    }

    pub fn search_requests(&self) -> Vec<RecordedSearchRequest> {
        self.search_requests.lock().unwrap().clone()
    }
}

pub struct MockNotionServer {
    pub base_url: String,
    pub state: MockNotionState,
}

static MOCK_NOTION_SERVER: LazyLock<MockNotionServer> = LazyLock::new(start_server);

/// The shared mock server, started on first use
pub fn mock_notion_server() -> &'static MockNotionServer {
    &MOCK_NOTION_SERVER
}

fn start_server() -> MockNotionServer {
    let state = MockNotionState::default();
    let app = Router::new()
        .route("/v1/oauth/token", post(token_handler))
        .route("/v1/search", post(search_handler))
        .with_state(state.clone());

    let (addr_tx, addr_rx) = mpsc::channel();
    thread::spawn(move || {
        let rt = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");
        rt.block_on(async move {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                .await
                .expect("Failed to bind mock Notion server");
            let addr = listener.local_addr().expect("Listener has no local address");
            addr_tx.send(addr).expect("Failed to report mock server address");
            axum::serve(listener, app)
                .await
                .expect("Mock Notion server stopped");
        });
    });

    let addr = addr_rx
        .recv()
        .expect("Mock Notion server failed to start");

    MockNotionServer {
        base_url: format!("http://{addr}"),
        state,
    }
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

fn json_response(status: u16, body: String) -> impl IntoResponse {
    (
        StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        [(header::CONTENT_TYPE, "application/json")],
        body,
    )
}

async fn token_handler(
    State(state): State<MockNotionState>,
    headers: HeaderMap,
    Form(form): Form<HashMap<String, String>>,
) -> impl IntoResponse {
    state.token_requests.lock().unwrap().push(RecordedTokenRequest {
        authorization: header_value(&headers, "authorization"),
        accept: header_value(&headers, "accept"),
        form,
    });

    let responses = state.responses.lock().unwrap().clone();
    json_response(responses.token_status, responses.token_body)
}

async fn search_handler(
    State(state): State<MockNotionState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    let object = body["filter"]["value"].as_str().unwrap_or_default().to_string();

    state.search_requests.lock().unwrap().push(RecordedSearchRequest {
        authorization: header_value(&headers, "authorization"),
        notion_version: header_value(&headers, "notion-version"),
        body,
    });

    let responses = state.responses.lock().unwrap().clone();
    if responses.search_status != 200 {
        let error = json!({"object": "error", "status": responses.search_status, "code": "unauthorized"});
        return json_response(responses.search_status, error.to_string());
    }

    let results = match object.as_str() {
        "database" => responses.database_results,
        _ => responses.page_results,
    };
    let body = json!({
        "object": "list",
        "results": results,
        "next_cursor": null,
        "has_more": false
    });
    json_response(200, body.to_string())
}
