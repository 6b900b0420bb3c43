use super::Property;
use serde::{Deserialize, Serialize};

/// Token request parameters plus the client credentials taken from the
/// `Authorization: Basic` header, if any
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenRequest {
    pub parameters: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
}

impl TokenRequest {
    pub fn new(parameters: impl Into<String>) -> Self {
        Self {
            parameters: parameters.into(),
            ..Default::default()
        }
    }

    pub fn with_client_credentials(mut self, credentials: Option<(String, String)>) -> Self {
        if let Some((id, secret)) = credentials {
            self.client_id = Some(id);
            self.client_secret = Some(secret);
        }
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenAction {
    InvalidClient,
    InternalServerError,
    BadRequest,
    Password,
    Ok,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub action: TokenAction,
    #[serde(default)]
    pub response_content: Option<String>,
    #[serde(default)]
    pub ticket: String,
    /// Resource owner credentials of a password grant
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenIssueRequest {
    pub ticket: String,
    pub subject: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<Vec<Property>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenIssueAction {
    InternalServerError,
    Ok,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenIssueResponse {
    pub action: TokenIssueAction,
    #[serde(default)]
    pub response_content: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenFailReason {
    Unknown,
    InvalidResourceOwnerCredentials,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenFailRequest {
    pub ticket: String,
    pub reason: TokenFailReason,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenFailAction {
    InternalServerError,
    BadRequest,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenFailResponse {
    pub action: TokenFailAction,
    #[serde(default)]
    pub response_content: Option<String>,
}
