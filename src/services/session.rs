//! Session credential and persisted client state
//!
//! The [`Session`] is the single holder of the sign-in credential. It is
//! shared by every clone of the API client, which reads it when building the
//! `Authorization` header. The credential is persisted through a
//! [`TokenStore`] under the [`TOKEN_KEY`] key so a later run can restore it.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::utils::error::{ApiError, ApiResult};

/// Storage key the sign-in token is written under
pub const TOKEN_KEY: &str = "token";

/// A bearer credential obtained from sign-in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    token: String,
    expires_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
struct ExpiryClaim {
    exp: Option<i64>,
}

impl Credential {
    /// Wrap a raw token. If it is a JWT, its `exp` claim becomes the expiry.
    ///
    /// The signature is not checked: the backend owns verification, the
    /// client only needs to know when to stop sending a dead token.
    pub fn new(token: impl Into<String>) -> Self {
        let token = token.into();
        let expires_at = jwt_expiry(&token);
        Self { token, expires_at }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    /// Whether the credential expired at or before `now`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|exp| exp <= now)
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

/// Read the `exp` claim from the payload segment of a JWT
fn jwt_expiry(token: &str) -> Option<DateTime<Utc>> {
    let mut parts = token.split('.');
    let (_header, payload, _signature) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }

    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .ok()?;
    let claim: ExpiryClaim = serde_json::from_slice(&bytes).ok()?;
    DateTime::from_timestamp(claim.exp?, 0)
}

/// Shared holder of the current credential
#[derive(Debug, Clone, Default)]
pub struct Session {
    inner: Arc<RwLock<Option<Credential>>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a session with an already known token
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Some(Credential::new(token)))),
        }
    }

    /// Install a credential, replacing any previous one
    pub async fn set(&self, token: impl Into<String>) -> Credential {
        let credential = Credential::new(token);
        if let Some(exp) = credential.expires_at() {
            debug!("Session credential installed, expires at {}", exp);
        } else {
            debug!("Session credential installed without expiry claim");
        }
        *self.inner.write().await = Some(credential.clone());
        credential
    }

    /// Drop the current credential
    pub async fn clear(&self) {
        *self.inner.write().await = None;
    }

    pub async fn credential(&self) -> Option<Credential> {
        self.inner.read().await.clone()
    }

    /// Token to send as `Authorization: Bearer`, if a live credential exists
    pub async fn bearer(&self) -> Option<String> {
        match self.inner.read().await.as_ref() {
            Some(c) if c.is_expired() => {
                debug!("Session credential expired, not attaching Authorization header");
                None
            }
            Some(c) => Some(c.token().to_string()),
            None => None,
        }
    }

    pub async fn is_authenticated(&self) -> bool {
        self.bearer().await.is_some()
    }

    /// Load the persisted token into this session.
    ///
    /// Returns `true` when a live credential was restored. An expired token
    /// is removed from the store as well.
    pub async fn restore_from(&self, store: &dyn TokenStore) -> ApiResult<bool> {
        let Some(token) = store.get(TOKEN_KEY)? else {
            debug!("No stored session token");
            return Ok(false);
        };

        let credential = Credential::new(token);
        if credential.is_expired() {
            info!("Stored session token has expired, discarding it");
            store.remove(TOKEN_KEY)?;
            self.clear().await;
            return Ok(false);
        }

        *self.inner.write().await = Some(credential);
        Ok(true)
    }
}

/// Persistent key/value storage for client state
pub trait TokenStore: Send + Sync {
    fn get(&self, key: &str) -> ApiResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> ApiResult<()>;
    fn remove(&self, key: &str) -> ApiResult<()>;
}

/// Token store backed by a JSON object on disk
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> ApiResult<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let contents = std::fs::read_to_string(&self.path)?;
        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        match serde_json::from_str(&contents) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                warn!(
                    "Token store {} is corrupt ({}), treating it as empty",
                    self.path.display(),
                    e
                );
                Ok(BTreeMap::new())
            }
        }
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> ApiResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(entries)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;

        // The token is a bearer secret, keep it private to the user
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&tmp, std::fs::Permissions::from_mode(0o600))?;
        }

        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self, key: &str) -> ApiResult<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> ApiResult<()> {
        let mut entries = self.read_all()?;
        entries.insert(key.to_string(), value.to_string());
        self.write_all(&entries)?;
        debug!("Stored key '{}' in {}", key, self.path.display());
        Ok(())
    }

    fn remove(&self, key: &str) -> ApiResult<()> {
        let mut entries = self.read_all()?;
        if entries.remove(key).is_some() {
            self.write_all(&entries)?;
        }
        Ok(())
    }
}

/// In-memory token store
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> ApiResult<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| ApiError::Storage("token store lock poisoned".to_string()))
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self, key: &str) -> ApiResult<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> ApiResult<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> ApiResult<()> {
        self.lock()?.remove(key);
        Ok(())
    }
}
