use super::{AuthorizationPage, ServiceProvider};
use crate::decision_client::AuthorizationResponse;
use async_trait::async_trait;
use oidc_core::{ClaimProvider, ProviderError};
use serde_json::{json, Value};

/// Provider for deployments without an account store: nobody can log in and
/// no claims are released
#[derive(Debug, Clone, Copy)]
pub struct NullServiceProvider;

impl NullServiceProvider {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NullServiceProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ClaimProvider for NullServiceProvider {
    async fn claim_value(
        &self,
        _subject: &str,
        _claim_name: &str,
        _language_tag: Option<&str>,
    ) -> Result<Option<Value>, ProviderError> {
        Ok(None)
    }
}

#[async_trait]
impl ServiceProvider for NullServiceProvider {
    async fn authenticate_user(
        &self,
        _username: &str,
        _password: &str,
    ) -> Result<Option<String>, ProviderError> {
        Ok(None)
    }

    async fn authorization_page(
        &self,
        response: &AuthorizationResponse,
    ) -> Result<AuthorizationPage, ProviderError> {
        Ok(AuthorizationPage::Json(json!({
            "ticket": response.ticket,
            "decision_endpoint": "/api/authorization/decision",
        })))
    }
}
