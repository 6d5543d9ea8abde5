//! HRMS backend HTTP client
//!
//! Translates CRUD intents into JSON requests against a single base URL.
//! Each operation performs exactly one request and resolves to either the
//! parsed JSON body or an [`ApiError`]; nothing is retried.

use std::error::Error as StdError;
use std::time::{Duration, Instant};

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Method};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::config::ApiConfig;
use crate::services::session::Session;
use crate::utils::error::{ApiError, ApiResult};
use crate::utils::validation::validate_resource_path;

/// Header carrying the per-request correlation id
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// HRMS backend API client
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    session: Session,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a new client from configuration, sharing `session` for auth
    pub fn new(config: &ApiConfig, session: Session) -> ApiResult<Self> {
        debug!("Initializing HRMS API client for {}", config.base_url);

        let mut default_headers = HeaderMap::new();
        default_headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut builder = Client::builder()
            .default_headers(default_headers)
            .user_agent(config.user_agent.clone());

        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        let client = builder
            .build()
            .map_err(|e| ApiError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    /// Create a client for `base_url` with default settings
    pub fn with_base_url(base_url: impl Into<String>, session: Session) -> ApiResult<Self> {
        let config = ApiConfig {
            base_url: base_url.into(),
            ..ApiConfig::default()
        };
        Self::new(&config, session)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    // ==================== Untyped operations ====================

    /// `GET {base}{path}`
    pub async fn get(&self, path: &str) -> ApiResult<Value> {
        self.send(Method::GET, path, None).await
    }

    /// `POST {base}{path}` with `body` as JSON
    pub async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ApiResult<Value> {
        let body = serde_json::to_value(body)?;
        self.send(Method::POST, path, Some(body)).await
    }

    /// `PUT {base}{path}` with `body` as JSON
    pub async fn put<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ApiResult<Value> {
        let body = serde_json::to_value(body)?;
        self.send(Method::PUT, path, Some(body)).await
    }

    /// `DELETE {base}{path}`
    pub async fn delete(&self, path: &str) -> ApiResult<Value> {
        self.send(Method::DELETE, path, None).await
    }

    // ==================== Typed operations ====================

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        decode(self.get(path).await?)
    }

    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        decode(self.post(path, body).await?)
    }

    pub async fn put_json<B, T>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        decode(self.put(path, body).await?)
    }

    pub async fn delete_json<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        decode(self.delete(path).await?)
    }

    // ==================== Transport ====================

    async fn send(&self, method: Method, path: &str, body: Option<Value>) -> ApiResult<Value> {
        if let Err(rule) = validate_resource_path(path) {
            return Err(ApiError::Validation(format!(
                "Invalid request path '{}': {}",
                path, rule
            )));
        }

        let url = format!("{}{}", self.base_url, path);
        let request_id = Uuid::new_v4().to_string();

        let mut request = self
            .client
            .request(method.clone(), &url)
            .header(REQUEST_ID_HEADER, &request_id);

        if let Some(token) = self.session.bearer().await {
            request = request.bearer_auth(token);
        }

        if let Some(ref body) = body {
            request = request.json(body);
        }

        debug!(request_id = %request_id, "{} {}", method, url);
        let started = Instant::now();

        let response = request.send().await.map_err(|e| {
            error!(request_id = %request_id, "{} {} failed: {}", method, url, e);
            if let Some(source) = e.source() {
                let mut current: &dyn StdError = source;
                debug!("Caused by: {}", current);
                while let Some(next) = current.source() {
                    debug!("Caused by: {}", next);
                    current = next;
                }
            }
            ApiError::from(e)
        })?;

        let status = response.status();
        debug!(
            request_id = %request_id,
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "{} {} completed",
            method,
            path
        );

        self.handle_response(response).await
    }

    /// Handle HTTP response and parse JSON
    async fn handle_response(&self, response: reqwest::Response) -> ApiResult<Value> {
        let status = response.status();

        if status.is_success() {
            let body = response.text().await.map_err(ApiError::from)?;
            if body.trim().is_empty() {
                return Ok(Value::Null);
            }
            match serde_json::from_str::<Value>(&body) {
                Ok(value) => Ok(value),
                Err(e) => {
                    warn!(
                        "Response with status {} was not JSON ({}), resolving to null: {}",
                        status,
                        e,
                        truncate(&body, 200)
                    );
                    Ok(Value::Null)
                }
            }
        } else {
            // A failure to read the error body is treated like an empty body
            let body = response.text().await.unwrap_or_default();
            let err = ApiError::from_response_body(status.as_u16(), &body);
            warn!("Request failed with status {}: {}", status, err);
            Err(err)
        }
    }
}

/// Decode a resolved JSON value into the expected type
fn decode<T: DeserializeOwned>(value: Value) -> ApiResult<T> {
    serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
}

fn truncate(body: &str, max: usize) -> String {
    if body.len() <= max {
        return body.to_string();
    }
    let mut end = max;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}... (truncated)", &body[..end])
}
