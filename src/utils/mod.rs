//! Utility modules

pub mod error;
pub mod validation;

pub use error::{ApiError, ApiResult, FALLBACK_ERROR_MESSAGE};
