use crate::config::SessionConfig;
use crate::state::AppState;
use axum::extract::FromRequestParts;
use http::request::Parts;
use http::HeaderMap;
use oidc_core::{AuthenticationFacts, AuthenticationFactsSource};
use std::convert::Infallible;

/// Session state asserted by a trusted upstream login proxy through headers
struct HeaderSession<'a> {
    headers: &'a HeaderMap,
    config: &'a SessionConfig,
}

impl HeaderSession<'_> {
    fn header(&self, name: &str) -> Option<String> {
        if !self.config.trust_headers {
            return None;
        }
        self.headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    }
}

impl AuthenticationFactsSource for HeaderSession<'_> {
    fn is_authenticated(&self) -> bool {
        self.header(&self.config.subject_header).is_some()
    }

    fn authenticated_at(&self) -> i64 {
        self.header(&self.config.auth_time_header)
            .and_then(|value| value.parse().ok())
            .unwrap_or(0)
    }

    fn acr(&self) -> Option<String> {
        self.header(&self.config.acr_header)
    }

    fn subject(&self) -> Option<String> {
        self.header(&self.config.subject_header)
    }
}

/// Authentication facts of the current request's session. Anonymous unless
/// header trust is enabled.
#[derive(Debug, Clone)]
pub(crate) struct SessionFacts(pub AuthenticationFacts);

impl FromRequestParts<AppState> for SessionFacts {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = HeaderSession {
            headers: &parts.headers,
            config: &state.settings.session,
        };
        Ok(SessionFacts(AuthenticationFacts::capture(&session)))
    }
}
