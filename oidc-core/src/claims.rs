//! Claim collection with claim-language negotiation.
//!
//! A requested claim name may carry an explicit language tag after
//! [`LANGUAGE_TAG_SEPARATOR`] (`family_name#ja-Kana-JP`). Names without a tag
//! are resolved against the request-level `claims_locales` in preference
//! order, falling back to the unlocalized value.

use crate::error::ProviderError;
use async_trait::async_trait;
use log::debug;
use serde_json::{Map, Value};
use std::collections::HashSet;

/// Separates a claim name from its language tag.
pub const LANGUAGE_TAG_SEPARATOR: char = '#';

/// Collected claims, keyed by requested claim name in request order.
pub type Claims = Map<String, Value>;

/// Source of claim values for a subject.
///
/// Implementations must tolerate being asked for the same claim several
/// times with different language tags. `Ok(None)` (or a JSON `null`) means
/// the value is not available.
#[async_trait]
pub trait ClaimProvider: Send + Sync {
    async fn claim_value(
        &self,
        subject: &str,
        claim_name: &str,
        language_tag: Option<&str>,
    ) -> Result<Option<Value>, ProviderError>;
}

/// ClaimProvider that knows no claims at all.
#[derive(Clone, Debug, Default)]
pub struct NullClaimProvider;

impl NullClaimProvider {
    pub fn new() -> Self {
        NullClaimProvider
    }
}

#[async_trait]
impl ClaimProvider for NullClaimProvider {
    async fn claim_value(
        &self,
        _subject: &str,
        _claim_name: &str,
        _language_tag: Option<&str>,
    ) -> Result<Option<Value>, ProviderError> {
        Ok(None)
    }
}

/// Drops empty entries and case-insensitive duplicates, keeping the first
/// occurrence with its original casing. Returns `None` when nothing is left.
pub fn normalize_locales<S: AsRef<str>>(locales: &[S]) -> Option<Vec<String>> {
    let mut seen = HashSet::new();
    let normalized: Vec<String> = locales
        .iter()
        .map(AsRef::as_ref)
        .filter(|locale| !locale.is_empty())
        .filter(|locale| seen.insert(locale.to_lowercase()))
        .map(str::to_string)
        .collect();

    (!normalized.is_empty()).then_some(normalized)
}

/// Splits `name#tag` on the first separator. A trailing separator with
/// nothing after it yields no tag.
fn split_claim_name(claim_name: &str) -> (&str, Option<&str>) {
    match claim_name.split_once(LANGUAGE_TAG_SEPARATOR) {
        Some((name, tag)) if !tag.is_empty() => (name, Some(tag)),
        Some((name, _)) => (name, None),
        None => (claim_name, None),
    }
}

/// Resolves a list of requested claims for one subject.
pub struct ClaimCollector<'a, P: ClaimProvider + ?Sized> {
    provider: &'a P,
    subject: &'a str,
    claim_names: Option<&'a [String]>,
    claim_locales: Option<Vec<String>>,
}

impl<'a, P: ClaimProvider + ?Sized> ClaimCollector<'a, P> {
    pub fn new(
        provider: &'a P,
        subject: &'a str,
        claim_names: Option<&'a [String]>,
        claim_locales: Option<&[String]>,
    ) -> Self {
        Self {
            provider,
            subject,
            claim_names,
            claim_locales: claim_locales.and_then(normalize_locales),
        }
    }

    /// The normalized locale preference list
    pub fn claim_locales(&self) -> Option<&[String]> {
        self.claim_locales.as_deref()
    }

    /// Collects every requested claim that has a value.
    ///
    /// Returns `Ok(None)` when no claims were requested or none resolved.
    pub async fn collect(&self) -> Result<Option<Claims>, ProviderError> {
        let claim_names = match self.claim_names {
            Some(names) if !names.is_empty() => names,
            _ => return Ok(None),
        };

        let mut claims = Claims::new();

        for claim_name in claim_names {
            if claim_name.trim().is_empty() {
                continue;
            }

            let (name, tag) = split_claim_name(claim_name);
            if name.is_empty() {
                continue;
            }

            let Some(value) = self.resolve(name, tag).await? else {
                debug!(
                    "No value for claim '{}' of subject '{}'",
                    claim_name, self.subject
                );
                continue;
            };

            // `name#` is keyed by `name`; anything else keeps the requested form
            let key = if tag.is_some() { claim_name.as_str() } else { name };
            claims.insert(key.to_string(), value);
        }

        Ok((!claims.is_empty()).then_some(claims))
    }

    async fn resolve(&self, name: &str, tag: Option<&str>) -> Result<Option<Value>, ProviderError> {
        if tag.is_some() {
            return self.query(name, tag).await;
        }

        if let Some(locales) = &self.claim_locales {
            for locale in locales {
                if let Some(value) = self.query(name, Some(locale)).await? {
                    return Ok(Some(value));
                }
            }
        }

        self.query(name, None).await
    }

    async fn query(&self, name: &str, tag: Option<&str>) -> Result<Option<Value>, ProviderError> {
        let value = self.provider.claim_value(self.subject, name, tag).await?;
        Ok(value.filter(|value| !value.is_null()))
    }
}
