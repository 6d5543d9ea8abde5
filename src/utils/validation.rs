//! Input validation utilities

use once_cell::sync::Lazy;
use regex::Regex;

/// Longest request path accepted, in bytes
pub const MAX_PATH_LEN: usize = 2048;

/// Whitespace or control characters, which never belong in a request path
static PATH_FORBIDDEN_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\s\p{Cc}]").unwrap());

/// Validate a request path relative to the API base URL.
///
/// On failure returns the rule that was broken.
pub fn validate_resource_path(path: &str) -> Result<(), &'static str> {
    if !path.starts_with('/') {
        return Err("must start with '/'");
    }
    if path.len() > MAX_PATH_LEN {
        return Err("must be at most 2048 bytes");
    }
    if PATH_FORBIDDEN_REGEX.is_match(path) {
        return Err("must not contain whitespace or control characters");
    }
    Ok(())
}

/// Validate an opaque record id before it is put into a path
pub fn validate_record_id(id: &str) -> bool {
    !id.trim().is_empty() && id.len() <= 255 && !id.chars().any(char::is_control)
}

/// Case-insensitive substring match used by list searches
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
