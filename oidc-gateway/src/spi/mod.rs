//! Extension points the gateway calls into for everything the decision
//! service cannot know: who the end-users are and what they look like.

use crate::decision_client::{AuthorizationResponse, Property};
use async_trait::async_trait;
use oidc_core::{ClaimProvider, ProviderError};
use serde_json::Value;

pub mod accounts;
pub mod null;

pub use accounts::StaticAccounts;
pub use null::NullServiceProvider;

/// Page shown to the end-user when an authorization request needs interaction
#[derive(Debug, Clone, PartialEq)]
pub enum AuthorizationPage {
    Html(String),
    Json(Value),
}

#[async_trait]
pub trait ServiceProvider: ClaimProvider {
    /// Checks resource owner credentials and returns the subject on success
    async fn authenticate_user(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<String>, ProviderError>;

    /// Renders the login/consent page for an interactive authorization request
    async fn authorization_page(
        &self,
        response: &AuthorizationResponse,
    ) -> Result<AuthorizationPage, ProviderError>;

    /// Extra properties to attach to tokens issued for `subject`
    async fn properties(&self, _subject: &str) -> Result<Option<Vec<Property>>, ProviderError> {
        Ok(None)
    }

    /// Scopes replacing the requested ones
    async fn scopes(&self, _subject: &str) -> Result<Option<Vec<String>>, ProviderError> {
        Ok(None)
    }

    /// Value of the `sub` claim when it must differ from the subject
    async fn sub(&self, _subject: &str) -> Result<Option<String>, ProviderError> {
        Ok(None)
    }
}
