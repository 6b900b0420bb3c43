use serde::{Deserialize, Serialize};

/// Supplies what the current session knows about the end-user.
///
/// Usually backed by a session store or an upstream identity layer.
pub trait AuthenticationFactsSource {
    fn is_authenticated(&self) -> bool;

    /// Time of authentication in seconds since the Unix epoch
    fn authenticated_at(&self) -> i64;

    fn acr(&self) -> Option<String>;

    fn subject(&self) -> Option<String>;
}

/// Snapshot of the session's authentication state for one request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticationFacts {
    pub is_authenticated: bool,
    pub authenticated_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acr: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
}

impl AuthenticationFacts {
    /// Facts of a session nobody has logged into
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Facts of a logged-in end-user
    pub fn authenticated(subject: impl Into<String>, authenticated_at: i64) -> Self {
        Self {
            is_authenticated: true,
            authenticated_at,
            acr: None,
            subject: Some(subject.into()),
        }
    }

    pub fn with_acr(mut self, acr: impl Into<String>) -> Self {
        self.acr = Some(acr.into());
        self
    }

    /// Reads every fact from `source` once
    pub fn capture<S: AuthenticationFactsSource + ?Sized>(source: &S) -> Self {
        Self {
            is_authenticated: source.is_authenticated(),
            authenticated_at: source.authenticated_at(),
            acr: source.acr(),
            subject: source.subject(),
        }
    }
}

impl AuthenticationFactsSource for AuthenticationFacts {
    fn is_authenticated(&self) -> bool {
        self.is_authenticated
    }

    fn authenticated_at(&self) -> i64 {
        self.authenticated_at
    }

    fn acr(&self) -> Option<String> {
        self.acr.clone()
    }

    fn subject(&self) -> Option<String> {
        self.subject.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedSession;

    impl AuthenticationFactsSource for FixedSession {
        fn is_authenticated(&self) -> bool {
            true
        }

        fn authenticated_at(&self) -> i64 {
            1_700_000_000
        }

        fn acr(&self) -> Option<String> {
            Some("urn:mace:incommon:iap:silver".to_string())
        }

        fn subject(&self) -> Option<String> {
            Some("1001".to_string())
        }
    }

    #[test]
    fn test_capture_reads_source() {
        let facts = AuthenticationFacts::capture(&FixedSession);
        assert_eq!(
            facts,
            AuthenticationFacts::authenticated("1001", 1_700_000_000)
                .with_acr("urn:mace:incommon:iap:silver")
        );
    }

    #[test]
    fn test_anonymous() {
        let facts = AuthenticationFacts::anonymous();
        assert!(!facts.is_authenticated);
        assert!(facts.subject.is_none());
        assert_eq!(AuthenticationFacts::capture(&facts), facts);
    }
}
