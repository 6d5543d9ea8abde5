//! HRMS Portal client library
//!
//! This crate provides the client side of the HRMS Portal: a JSON client for
//! the HRMS backend, the department list screen controller, and the
//! sign-in/registration flows.

use std::sync::Arc;

pub mod config;
pub mod controller;
pub mod models;
pub mod services;
pub mod utils;

pub use config::AppConfig;
pub use controller::{Notifier, ResourceListController};
pub use services::{ApiClient, AuthService, FileTokenStore, Session, TokenStore, UserService};
pub use utils::error::{ApiError, ApiResult, FALLBACK_ERROR_MESSAGE};

use models::Department;

/// Application state shared by every command
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: AppConfig,
    /// Backend client, carrying the session credential
    pub client: ApiClient,
    /// Persisted client state
    pub store: Arc<dyn TokenStore>,
    /// Where user-facing notifications go
    pub notifier: Arc<dyn Notifier>,
}

impl AppState {
    /// Build the state from configuration with a file-backed token store
    pub fn new(config: AppConfig, notifier: Arc<dyn Notifier>) -> ApiResult<Self> {
        let store: Arc<dyn TokenStore> =
            Arc::new(FileTokenStore::new(config.session.store_path.clone()));
        Self::with_store(config, store, notifier)
    }

    pub fn with_store(
        config: AppConfig,
        store: Arc<dyn TokenStore>,
        notifier: Arc<dyn Notifier>,
    ) -> ApiResult<Self> {
        let client = ApiClient::new(&config.api, Session::new())?;
        Ok(Self {
            config,
            client,
            store,
            notifier,
        })
    }

    pub fn auth(&self) -> AuthService {
        AuthService::new(self.client.clone(), self.store.clone(), self.notifier.clone())
    }

    pub fn users(&self) -> UserService {
        UserService::new(self.client.clone())
    }

    /// Controller of the department screen, with users as manager candidates
    pub fn departments(&self) -> ResourceListController<Department> {
        ResourceListController::new(self.client.clone(), self.notifier.clone())
            .with_user_lookup("/users", "manager")
    }
}
