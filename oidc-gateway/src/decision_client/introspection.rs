use serde::{Deserialize, Serialize};

/// RFC 7662 introspection request parameters, forwarded untouched
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntrospectionRequest {
    pub parameters: String,
}

impl IntrospectionRequest {
    pub fn new(parameters: impl Into<String>) -> Self {
        Self {
            parameters: parameters.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IntrospectionAction {
    InternalServerError,
    BadRequest,
    Ok,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntrospectionResponse {
    pub action: IntrospectionAction,
    #[serde(default)]
    pub response_content: Option<String>,
}
