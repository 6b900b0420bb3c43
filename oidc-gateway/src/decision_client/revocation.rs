use serde::{Deserialize, Serialize};

/// RFC 7009 revocation request parameters plus Basic client credentials
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevocationRequest {
    pub parameters: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
}

impl RevocationRequest {
    pub fn new(parameters: impl Into<String>, credentials: Option<(String, String)>) -> Self {
        let (client_id, client_secret) = credentials.unzip();
        Self {
            parameters: parameters.into(),
            client_id,
            client_secret,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RevocationAction {
    InvalidClient,
    InternalServerError,
    BadRequest,
    Ok,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevocationResponse {
    pub action: RevocationAction,
    #[serde(default)]
    pub response_content: Option<String>,
}
