//! Request DTOs for the cache server API
//!
//! Defines the structure of incoming HTTP request bodies and query strings.

use serde::Deserialize;

/// Request body for the SET operation (POST /v1/set)
///
/// # Fields
/// - `key`: The cache key to store the value under
/// - `value`: The value to store
#[derive(Debug, Clone, Deserialize)]
pub struct SetRequest {
    /// The cache key
    pub key: String,
    /// The value to store
    #[serde(default)]
    pub value: String,
}

impl SetRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        validate_key(&self.key)
    }
}

/// Query string for the GET operation (GET /v1/get?key=...)
#[derive(Debug, Clone, Deserialize)]
pub struct GetQuery {
    /// The cache key, empty when absent from the query
    #[serde(default)]
    pub key: String,
}

impl GetQuery {
    /// Validates the query, see [`SetRequest::validate`].
    pub fn validate(&self) -> Option<String> {
        validate_key(&self.key)
    }
}

fn validate_key(key: &str) -> Option<String> {
    if key.is_empty() {
        return Some("missing key".to_string());
    }
    None
}
