use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfoRequest {
    pub token: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserInfoAction {
    InternalServerError,
    BadRequest,
    Unauthorized,
    Forbidden,
    Ok,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfoResponse {
    pub action: UserInfoAction,
    /// Value for the `WWW-Authenticate` header on error actions
    #[serde(default)]
    pub response_content: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    /// Claims the access token allows releasing
    #[serde(default)]
    pub claims: Option<Vec<String>>,
    #[serde(default)]
    pub claims_locales: Option<Vec<String>>,
    #[serde(default)]
    pub token: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfoIssueRequest {
    pub token: String,
    /// Claim values as a JSON object encoded in a string
    #[serde(skip_serializing_if = "Option::is_none")]
    pub claims: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserInfoIssueAction {
    InternalServerError,
    BadRequest,
    Unauthorized,
    Forbidden,
    Json,
    Jwt,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfoIssueResponse {
    pub action: UserInfoIssueAction,
    #[serde(default)]
    pub response_content: Option<String>,
}
