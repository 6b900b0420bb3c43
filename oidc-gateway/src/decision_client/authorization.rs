use super::Property;
use oidc_core::{AuthorizationContext, Claims, DenialReason};
use serde::{Deserialize, Serialize};

/// Raw authorization request parameters, forwarded untouched
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizationRequest {
    pub parameters: String,
}

impl AuthorizationRequest {
    pub fn new(parameters: impl Into<String>) -> Self {
        Self {
            parameters: parameters.into(),
        }
    }
}

/// What the gateway must do next with an authorization request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthorizationAction {
    InternalServerError,
    BadRequest,
    Location,
    Form,
    Interaction,
    NoInteraction,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientInfo {
    #[serde(default)]
    pub client_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scope {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizationResponse {
    pub action: AuthorizationAction,
    #[serde(default)]
    pub response_content: Option<String>,
    #[serde(default)]
    pub ticket: String,
    #[serde(default)]
    pub client: Option<ClientInfo>,
    #[serde(default)]
    pub scopes: Option<Vec<Scope>>,
    #[serde(default)]
    pub acrs: Option<Vec<String>>,
    #[serde(default)]
    pub acr_essential: bool,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub max_age: u64,
    #[serde(default)]
    pub claims: Option<Vec<String>>,
    #[serde(default)]
    pub claims_locales: Option<Vec<String>>,
    #[serde(default)]
    pub login_hint: Option<String>,
}

impl AuthorizationResponse {
    /// The parts of the response the no-interaction checks look at
    pub fn context(&self) -> AuthorizationContext {
        AuthorizationContext {
            ticket: self.ticket.clone(),
            requested_acrs: self.acrs.clone(),
            acr_essential: self.acr_essential,
            requested_subject: self.subject.clone(),
            max_age: self.max_age,
            claim_names: self.claims.clone(),
            claim_locales: self.claims_locales.clone(),
        }
    }

    pub fn client_name(&self) -> Option<&str> {
        self.client.as_ref().and_then(|c| c.client_name.as_deref())
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizationFailRequest {
    pub ticket: String,
    pub reason: DenialReason,
}

impl AuthorizationFailRequest {
    pub fn new(ticket: impl Into<String>, reason: DenialReason) -> Self {
        Self {
            ticket: ticket.into(),
            reason,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizationIssueRequest {
    pub ticket: String,
    pub subject: String,
    /// Seconds since the Unix epoch
    pub auth_time: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acr: Option<String>,
    /// Claims to embed in the ID token, as a JSON object encoded in a string
    #[serde(skip_serializing_if = "Option::is_none")]
    pub claims: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<Vec<Property>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scopes: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
}

impl AuthorizationIssueRequest {
    pub fn new(ticket: impl Into<String>, subject: impl Into<String>, auth_time: i64) -> Self {
        Self {
            ticket: ticket.into(),
            subject: subject.into(),
            auth_time,
            ..Default::default()
        }
    }

    pub fn with_acr(mut self, acr: Option<String>) -> Self {
        self.acr = acr;
        self
    }

    pub fn with_claims(mut self, claims: Option<&Claims>) -> Result<Self, serde_json::Error> {
        self.claims = claims.map(serde_json::to_string).transpose()?;
        Ok(self)
    }
}

/// Outcome of an authorization issue or fail call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthorizationResultAction {
    InternalServerError,
    BadRequest,
    Location,
    Form,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizationResultResponse {
    pub action: AuthorizationResultAction,
    #[serde(default)]
    pub response_content: Option<String>,
}
