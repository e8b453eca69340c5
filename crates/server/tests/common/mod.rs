//! Common test utilities for API testing with mocks.
//!
//! The fixture builds the real router around a `MockIndexer` and a
//! `MockDownloadClient`, so requests run the whole acquisition stack
//! in-process.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use seafarer_core::load_config_from_str;
use seafarer_core::testing::{MockDownloadClient, MockIndexer};
use seafarer_server::{api::create_router, state::AppState};

/// Re-export fixtures for test convenience
pub use seafarer_core::testing::fixtures;

const TEST_CONFIG: &str = r#"
[server]
port = 0

[indexer]
backend = "jackett"

[indexer.jackett]
url = "http://localhost:9117"
api_key = "super-secret-api-key"

[download_client]
backend = "qbittorrent"

[download_client.qbittorrent]
url = "http://localhost:8080"
username = "admin"
password = "hunter2"

[acquisition]
episode_delay_ms = 0
"#;

/// Test fixture with an in-process router and controllable mocks.
pub struct TestFixture {
    pub router: Router,
    pub indexer: Arc<MockIndexer>,
    pub download_client: Arc<MockDownloadClient>,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
    pub text: String,
}

impl TestFixture {
    pub fn new() -> Self {
        let config = load_config_from_str(TEST_CONFIG).expect("test config should parse");

        let indexer = Arc::new(MockIndexer::new());
        let download_client = Arc::new(MockDownloadClient::new());

        let state = Arc::new(AppState::new(
            config,
            Arc::clone(&indexer) as Arc<dyn seafarer_core::Indexer>,
            Arc::clone(&download_client) as Arc<dyn seafarer_core::DownloadClient>,
        ));

        Self {
            router: create_router(state),
            indexer,
            download_client,
        }
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, None).await
    }

    /// Send a POST request with JSON body.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request("POST", path, Some(body.to_string())).await
    }

    /// Send a POST request with a raw body (for malformed JSON).
    pub async fn post_raw(&self, path: &str, body: &str) -> TestResponse {
        self.request("POST", path, Some(body.to_string())).await
    }

    async fn request(&self, method: &str, path: &str, body: Option<String>) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(path);
        let body = match body {
            Some(body) => {
                builder = builder.header("Content-Type", "application/json");
                Body::from(body)
            }
            None => Body::empty(),
        };
        let request = builder.body(body).unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read body")
            .to_bytes();

        let text = String::from_utf8_lossy(&body_bytes).to_string();
        let body = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body, text }
    }
}
