//! Test application wiring
//!
//! [`TestApp`] starts a mock HRMS backend and builds an [`AppState`] pointed
//! at it, with an in-memory token store and a recording notifier.

use std::sync::Arc;

use serde_json::Value;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use hrms_portal::controller::RecordingNotifier;
use hrms_portal::services::MemoryTokenStore;
use hrms_portal::{ApiClient, AppConfig, AppState, TokenStore};

/// Mount prefix of the backend API on the mock server
pub const API_PREFIX: &str = "/api";

/// Test application with a mock backend
pub struct TestApp {
    pub server: MockServer,
    pub state: AppState,
    pub notifier: Arc<RecordingNotifier>,
}

impl TestApp {
    /// Create a new test application with an in-memory token store
    pub async fn new() -> Self {
        Self::with_store(Arc::new(MemoryTokenStore::new())).await
    }

    pub async fn with_store(store: Arc<dyn TokenStore>) -> Self {
        let server = MockServer::start().await;
        let notifier = Arc::new(RecordingNotifier::new());

        let mut config = AppConfig::default();
        config.api.base_url = format!("{}{}", server.uri(), API_PREFIX);

        let state = AppState::with_store(config, store, notifier.clone())
            .expect("Failed to build application state");

        Self {
            server,
            state,
            notifier,
        }
    }

    pub fn client(&self) -> &ApiClient {
        &self.state.client
    }

    /// Full mock-server path for an API path
    pub fn api_path(p: &str) -> String {
        format!("{}{}", API_PREFIX, p)
    }

    /// Answer `GET /departments` with `body`
    pub async fn mock_departments(&self, body: Value) {
        Mock::given(method("GET"))
            .and(path(Self::api_path("/departments")))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// Answer `GET /users` with `body`
    pub async fn mock_users(&self, body: Value) {
        Mock::given(method("GET"))
            .and(path(Self::api_path("/users")))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// Requests received with the given method and API path
    pub async fn requests_to(&self, http_method: &str, api_path: &str) -> Vec<Request> {
        let full = Self::api_path(api_path);
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|r| r.method.as_str() == http_method && r.url.path() == full)
            .collect()
    }
}
