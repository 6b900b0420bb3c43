//! Eligibility of an authorization request for completion without user
//! interaction (`prompt=none` and friends).
//!
//! The checks form a strict AND-chain evaluated in a fixed order; the first
//! failure decides the denial reason and nothing after it runs.

use crate::claims::{ClaimCollector, ClaimProvider, Claims};
use crate::error::ProviderError;
use crate::facts::AuthenticationFacts;
use chrono::Utc;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why an authorization request cannot be completed for the current session.
///
/// The serialized form is the reason code the decision service expects on
/// its failure call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DenialReason {
    NotLoggedIn,
    ExceedsMaxAge,
    DifferentSubject,
    AcrNotSatisfied,
    Denied,
    NotAuthenticated,
}

impl DenialReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotLoggedIn => "NOT_LOGGED_IN",
            Self::ExceedsMaxAge => "EXCEEDS_MAX_AGE",
            Self::DifferentSubject => "DIFFERENT_SUBJECT",
            Self::AcrNotSatisfied => "ACR_NOT_SATISFIED",
            Self::Denied => "DENIED",
            Self::NotAuthenticated => "NOT_AUTHENTICATED",
        }
    }
}

impl fmt::Display for DenialReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the earlier authorization call told us about the request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthorizationContext {
    /// Correlation token for follow-up calls to the decision service
    pub ticket: String,
    /// Requested ACRs in preference order
    #[serde(default)]
    pub requested_acrs: Option<Vec<String>>,
    /// Whether the ACR request is essential (`"essential": true`)
    #[serde(default)]
    pub acr_essential: bool,
    /// Subject the client asked for, if any
    #[serde(default)]
    pub requested_subject: Option<String>,
    /// Maximum authentication age in seconds; 0 means unconstrained
    #[serde(default)]
    pub max_age: u64,
    #[serde(default)]
    pub claim_names: Option<Vec<String>>,
    #[serde(default)]
    pub claim_locales: Option<Vec<String>>,
}

/// Everything the issuance call needs once the request is eligible
#[derive(Debug, Clone, PartialEq)]
pub struct Eligibility {
    pub subject: String,
    pub auth_time: i64,
    pub acr: Option<String>,
    pub claims: Option<Claims>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    Eligible(Eligibility),
    Denied(DenialReason),
}

type Check = fn(&AuthorizationContext, &AuthenticationFacts, i64) -> Result<(), DenialReason>;

/// Checks in evaluation order.
const CHECKS: [(&str, Check); 4] = [
    ("authentication", check_authentication),
    ("max_age", check_max_age),
    ("subject", check_subject),
    ("acr", check_acr),
];

pub fn check_authentication(
    _context: &AuthorizationContext,
    facts: &AuthenticationFacts,
    _now: i64,
) -> Result<(), DenialReason> {
    if facts.is_authenticated && facts.subject.is_some() {
        Ok(())
    } else {
        Err(DenialReason::NotLoggedIn)
    }
}

pub fn check_max_age(
    context: &AuthorizationContext,
    facts: &AuthenticationFacts,
    now: i64,
) -> Result<(), DenialReason> {
    if context.max_age == 0 {
        return Ok(());
    }

    let max_age = i64::try_from(context.max_age).unwrap_or(i64::MAX);
    let expires_at = facts.authenticated_at.saturating_add(max_age);

    if now < expires_at {
        Ok(())
    } else {
        Err(DenialReason::ExceedsMaxAge)
    }
}

pub fn check_subject(
    context: &AuthorizationContext,
    facts: &AuthenticationFacts,
    _now: i64,
) -> Result<(), DenialReason> {
    match &context.requested_subject {
        None => Ok(()),
        Some(requested) if facts.subject.as_deref() == Some(requested.as_str()) => Ok(()),
        Some(_) => Err(DenialReason::DifferentSubject),
    }
}

pub fn check_acr(
    context: &AuthorizationContext,
    facts: &AuthenticationFacts,
    _now: i64,
) -> Result<(), DenialReason> {
    let requested = match &context.requested_acrs {
        Some(acrs) if !acrs.is_empty() => acrs,
        _ => return Ok(()),
    };

    let satisfied = facts
        .acr
        .as_ref()
        .is_some_and(|acr| requested.contains(acr));

    if satisfied || !context.acr_essential {
        Ok(())
    } else {
        Err(DenialReason::AcrNotSatisfied)
    }
}

/// Runs the no-interaction checks and, when they pass, collects the claims
/// to embed in the ID token.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoInteractionChecker;

impl NoInteractionChecker {
    pub fn new() -> Self {
        NoInteractionChecker
    }

    /// Runs only the policy checks, without touching the claim provider
    pub fn check(
        &self,
        context: &AuthorizationContext,
        facts: &AuthenticationFacts,
        now: i64,
    ) -> Result<(), DenialReason> {
        for (name, check) in CHECKS {
            if let Err(reason) = check(context, facts, now) {
                debug!(
                    "No-interaction check '{}' failed for ticket '{}': {}",
                    name, context.ticket, reason
                );
                return Err(reason);
            }
        }
        Ok(())
    }

    pub async fn evaluate<P: ClaimProvider + ?Sized>(
        &self,
        context: &AuthorizationContext,
        facts: &AuthenticationFacts,
        provider: &P,
    ) -> Result<Verdict, ProviderError> {
        self.evaluate_at(context, facts, provider, Utc::now().timestamp())
            .await
    }

    /// Same as [`Self::evaluate`] with an explicit current time (epoch seconds)
    pub async fn evaluate_at<P: ClaimProvider + ?Sized>(
        &self,
        context: &AuthorizationContext,
        facts: &AuthenticationFacts,
        provider: &P,
        now: i64,
    ) -> Result<Verdict, ProviderError> {
        if let Err(reason) = self.check(context, facts, now) {
            return Ok(Verdict::Denied(reason));
        }

        // check_authentication guarantees a subject
        let Some(subject) = facts.subject.clone() else {
            return Ok(Verdict::Denied(DenialReason::NotLoggedIn));
        };

        let claims = ClaimCollector::new(
            provider,
            &subject,
            context.claim_names.as_deref(),
            context.claim_locales.as_deref(),
        )
        .collect()
        .await?;

        Ok(Verdict::Eligible(Eligibility {
            subject,
            auth_time: facts.authenticated_at,
            acr: facts.acr.clone(),
            claims,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claims::tests::RecordingProvider;
    use serde_json::json;

    const NOW: i64 = 1_700_000_000;

    fn logged_in(authenticated_at: i64) -> AuthenticationFacts {
        AuthenticationFacts::authenticated("alice", authenticated_at)
    }

    fn context() -> AuthorizationContext {
        AuthorizationContext {
            ticket: "ticket-1".to_string(),
            ..Default::default()
        }
    }

    async fn evaluate(context: &AuthorizationContext, facts: &AuthenticationFacts) -> Verdict {
        NoInteractionChecker::new()
            .evaluate_at(context, facts, &RecordingProvider::default(), NOW)
            .await
            .expect("provider should not fail")
    }

    #[tokio::test]
    async fn test_not_logged_in_wins_over_everything() {
        let context = AuthorizationContext {
            requested_acrs: Some(vec!["urn:a".to_string()]),
            acr_essential: true,
            requested_subject: Some("bob".to_string()),
            max_age: 1,
            ..context()
        };
        let verdict = evaluate(&context, &AuthenticationFacts::anonymous()).await;
        assert_eq!(verdict, Verdict::Denied(DenialReason::NotLoggedIn));
    }

    #[tokio::test]
    async fn test_authenticated_without_subject_is_not_logged_in() {
        let facts = AuthenticationFacts {
            is_authenticated: true,
            authenticated_at: NOW,
            acr: None,
            subject: None,
        };
        let verdict = evaluate(&context(), &facts).await;
        assert_eq!(verdict, Verdict::Denied(DenialReason::NotLoggedIn));
    }

    #[tokio::test]
    async fn test_max_age() {
        let context = AuthorizationContext {
            max_age: 3600,
            ..context()
        };

        let verdict = evaluate(&context, &logged_in(NOW - 3601)).await;
        assert_eq!(verdict, Verdict::Denied(DenialReason::ExceedsMaxAge));

        // expires_at == now is already too old
        let verdict = evaluate(&context, &logged_in(NOW - 3600)).await;
        assert_eq!(verdict, Verdict::Denied(DenialReason::ExceedsMaxAge));

        let verdict = evaluate(&context, &logged_in(NOW - 3599)).await;
        assert!(matches!(verdict, Verdict::Eligible(_)));
    }

    #[tokio::test]
    async fn test_zero_max_age_is_unconstrained() {
        let verdict = evaluate(&context(), &logged_in(0)).await;
        assert!(matches!(verdict, Verdict::Eligible(_)));
    }

    #[tokio::test]
    async fn test_subject_must_match_exactly() {
        let context = AuthorizationContext {
            requested_subject: Some("Alice".to_string()),
            ..context()
        };
        let verdict = evaluate(&context, &logged_in(NOW)).await;
        assert_eq!(verdict, Verdict::Denied(DenialReason::DifferentSubject));

        let context = AuthorizationContext {
            requested_subject: Some("alice".to_string()),
            ..context
        };
        let verdict = evaluate(&context, &logged_in(NOW)).await;
        assert!(matches!(verdict, Verdict::Eligible(_)));
    }

    #[tokio::test]
    async fn test_essential_acr_not_satisfied() {
        let context = AuthorizationContext {
            requested_acrs: Some(vec!["urn:a".to_string()]),
            acr_essential: true,
            ..context()
        };
        let facts = logged_in(NOW).with_acr("urn:b");

        let verdict = evaluate(&context, &facts).await;
        assert_eq!(verdict, Verdict::Denied(DenialReason::AcrNotSatisfied));

        let context = AuthorizationContext {
            acr_essential: false,
            ..context
        };
        let verdict = evaluate(&context, &facts).await;
        assert!(matches!(verdict, Verdict::Eligible(_)));
    }

    #[tokio::test]
    async fn test_acr_membership() {
        let context = AuthorizationContext {
            requested_acrs: Some(vec!["urn:a".to_string(), "urn:b".to_string()]),
            acr_essential: true,
            ..context()
        };

        let verdict = evaluate(&context, &logged_in(NOW).with_acr("urn:b")).await;
        match verdict {
            Verdict::Eligible(eligibility) => assert_eq!(eligibility.acr.as_deref(), Some("urn:b")),
            other => panic!("expected eligibility, got {other:?}"),
        }

        // No ACR at all cannot satisfy an essential request
        let verdict = evaluate(&context, &logged_in(NOW)).await;
        assert_eq!(verdict, Verdict::Denied(DenialReason::AcrNotSatisfied));
    }

    #[test]
    fn test_checks_run_in_order() {
        // Every check fails; the first one in the chain decides
        let context = AuthorizationContext {
            requested_acrs: Some(vec!["urn:a".to_string()]),
            acr_essential: true,
            requested_subject: Some("bob".to_string()),
            max_age: 10,
            ..context()
        };
        let facts = logged_in(NOW - 60).with_acr("urn:b");
        let checker = NoInteractionChecker::new();

        assert_eq!(
            checker.check(&context, &facts, NOW),
            Err(DenialReason::ExceedsMaxAge)
        );

        let context = AuthorizationContext {
            max_age: 0,
            ..context
        };
        assert_eq!(
            checker.check(&context, &facts, NOW),
            Err(DenialReason::DifferentSubject)
        );
    }

    #[tokio::test]
    async fn test_eligible_bundles_collected_claims() {
        let provider = RecordingProvider::default()
            .with("email", None, json!("alice@example.com"))
            .with("name", Some("ja"), json!("アリス"));
        let context = AuthorizationContext {
            claim_names: Some(vec!["email".to_string(), "name".to_string()]),
            claim_locales: Some(vec!["ja".to_string()]),
            ..context()
        };
        let facts = logged_in(NOW - 5).with_acr("urn:a");

        let verdict = NoInteractionChecker::new()
            .evaluate_at(&context, &facts, &provider, NOW)
            .await
            .unwrap();

        let Verdict::Eligible(eligibility) = verdict else {
            panic!("expected eligibility");
        };
        assert_eq!(eligibility.subject, "alice");
        assert_eq!(eligibility.auth_time, NOW - 5);
        assert_eq!(eligibility.acr.as_deref(), Some("urn:a"));

        let claims = eligibility.claims.unwrap();
        assert_eq!(claims.get("email"), Some(&json!("alice@example.com")));
        assert_eq!(claims.get("name"), Some(&json!("アリス")));
    }

    #[tokio::test]
    async fn test_denied_request_never_queries_claims() {
        let provider = RecordingProvider::default();
        let context = AuthorizationContext {
            claim_names: Some(vec!["email".to_string()]),
            ..context()
        };

        let verdict = NoInteractionChecker::new()
            .evaluate_at(&context, &AuthenticationFacts::anonymous(), &provider, NOW)
            .await
            .unwrap();

        assert_eq!(verdict, Verdict::Denied(DenialReason::NotLoggedIn));
        assert!(provider.queries().is_empty());
    }

    #[test]
    fn test_denial_reason_wire_format() {
        assert_eq!(
            serde_json::to_value(DenialReason::AcrNotSatisfied).unwrap(),
            json!("ACR_NOT_SATISFIED")
        );
        for reason in [
            DenialReason::NotLoggedIn,
            DenialReason::ExceedsMaxAge,
            DenialReason::DifferentSubject,
            DenialReason::AcrNotSatisfied,
            DenialReason::Denied,
            DenialReason::NotAuthenticated,
        ] {
            assert_eq!(serde_json::to_value(reason).unwrap(), json!(reason.as_str()));
        }
    }
}
