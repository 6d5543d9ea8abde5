//! Sign-in, registration and sign-out

use std::sync::Arc;

use tracing::{debug, info};
use validator::Validate;

use crate::controller::notify::Notifier;
use crate::models::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};
use crate::services::api_client::ApiClient;
use crate::services::session::{TokenStore, TOKEN_KEY};
use crate::utils::error::{ApiError, ApiResult};

/// Authentication flows against `/users`
pub struct AuthService {
    client: ApiClient,
    store: Arc<dyn TokenStore>,
    notifier: Arc<dyn Notifier>,
}

impl AuthService {
    pub fn new(client: ApiClient, store: Arc<dyn TokenStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            client,
            store,
            notifier,
        }
    }

    fn reject(&self, err: ApiError, fallback: &str) -> ApiError {
        self.notifier.error(&err.user_message(fallback));
        err
    }

    /// Sign in with e-mail and password.
    ///
    /// The returned token is persisted under [`TOKEN_KEY`] and installed in
    /// the client's session before success is reported, so every later
    /// request carries it.
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<LoginResponse> {
        let request = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        if let Err(e) = request.validate() {
            return Err(self.reject(e.into(), "Failed to login"));
        }

        let response: LoginResponse = match self.client.post_json("/users/login", &request).await {
            Ok(response) => response,
            Err(e) => return Err(self.reject(e, "Failed to login")),
        };

        if let Err(e) = self.store.set(TOKEN_KEY, &response.token) {
            return Err(self.reject(e, "Failed to login"));
        }
        self.client.session().set(response.token.clone()).await;

        info!("Signed in as {}", request.email);
        self.notifier
            .success(message_or(response.message.as_deref(), "Login successful"));
        Ok(response)
    }

    /// Create an account
    pub async fn register(&self, request: &RegisterRequest) -> ApiResult<RegisterResponse> {
        if let Err(e) = request.validate() {
            return Err(self.reject(e.into(), "Failed to register"));
        }

        let response: Option<RegisterResponse> =
            match self.client.post_json("/users", request).await {
                Ok(response) => response,
                Err(e) => return Err(self.reject(e, "Failed to register")),
            };
        let response = response.unwrap_or_default();

        info!("Registered {} as {}", request.email, request.role);
        self.notifier.success(message_or(
            response.message.as_deref(),
            "Registration successful",
        ));
        Ok(response)
    }

    /// Forget the credential both in memory and on disk
    pub async fn logout(&self) -> ApiResult<()> {
        self.client.session().clear().await;
        self.store.remove(TOKEN_KEY)?;
        debug!("Session cleared");
        Ok(())
    }

    /// Load a previously stored credential into the session
    pub async fn restore(&self) -> ApiResult<bool> {
        self.client.session().restore_from(self.store.as_ref()).await
    }
}

/// Server-provided message, unless it is missing or blank
fn message_or<'a>(message: Option<&'a str>, fallback: &'a str) -> &'a str {
    message.filter(|m| !m.trim().is_empty()).unwrap_or(fallback)
}
