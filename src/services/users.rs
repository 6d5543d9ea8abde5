//! User directory lookups

use tracing::debug;

use crate::models::User;
use crate::services::api_client::ApiClient;
use crate::utils::error::ApiResult;

/// Read-only access to `GET /users`
#[derive(Debug, Clone)]
pub struct UserService {
    client: ApiClient,
}

impl UserService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// All users, in backend order
    pub async fn list(&self) -> ApiResult<Vec<User>> {
        let users: Vec<User> = self.client.get_json("/users").await?;
        debug!("Fetched {} users", users.len());
        Ok(users)
    }

    /// Users whose name or e-mail contains `term` (case-insensitive)
    pub async fn search(&self, term: &str) -> ApiResult<Vec<User>> {
        let term = term.to_lowercase();
        Ok(self
            .list()
            .await?
            .into_iter()
            .filter(|u| {
                u.name.to_lowercase().contains(&term)
                    || u
                        .email
                        .as_deref()
                        .is_some_and(|e| e.to_lowercase().contains(&term))
            })
            .collect())
    }
}
