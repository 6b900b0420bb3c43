//! Error bodies produced by the gateway itself

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// OAuth 2.0 error response (RFC 6749 section 5.2)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OAuthError {
    /// Error code
    pub error: String,
    /// Human-readable error description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_description: Option<String>,
}

impl OAuthError {
    pub fn new(error: &str, description: Option<&str>) -> Self {
        Self {
            error: error.to_string(),
            error_description: description.map(|d| d.to_string()),
        }
    }

    pub fn server_error(description: &str) -> Self {
        Self::new("server_error", Some(description))
    }
}
