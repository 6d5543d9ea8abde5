//! Mock collaborators for testing
//!
//! Provides stand-ins for the token store and the confirmation prompt so
//! failure paths can be exercised without touching the filesystem or a
//! terminal.

use std::sync::Mutex;

use async_trait::async_trait;

use hrms_portal::controller::Confirm;
use hrms_portal::{ApiError, ApiResult, TokenStore};

/// Token store whose writes always fail
#[derive(Debug, Default)]
pub struct FailingTokenStore;

impl TokenStore for FailingTokenStore {
    fn get(&self, _key: &str) -> ApiResult<Option<String>> {
        Ok(None)
    }

    fn set(&self, _key: &str, _value: &str) -> ApiResult<()> {
        Err(ApiError::Storage("disk full".to_string()))
    }

    fn remove(&self, _key: &str) -> ApiResult<()> {
        Err(ApiError::Storage("disk full".to_string()))
    }
}

/// Confirmation prompt that records what it was asked
#[derive(Debug)]
pub struct ScriptedConfirm {
    answer: bool,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedConfirm {
    pub fn answering(answer: bool) -> Self {
        Self {
            answer,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Confirm for ScriptedConfirm {
    async fn confirm(&self, prompt: &str) -> bool {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.answer
    }
}
