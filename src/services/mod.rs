//! Backend-facing services

pub mod api_client;
pub mod auth;
pub mod session;
pub mod users;

pub use api_client::ApiClient;
pub use auth::AuthService;
pub use session::{Credential, FileTokenStore, MemoryTokenStore, Session, TokenStore, TOKEN_KEY};
pub use users::UserService;
