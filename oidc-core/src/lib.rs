//! # oidc-core
//!
//! The local decision logic of the OIDC gateway. Everything else the gateway
//! does is delegated to the remote decision service; this crate holds the two
//! pieces that carry business rules of their own.
//!
//! ## Components
//!
//! - **Claims:** Resolves requested claims through a pluggable [`ClaimProvider`],
//!   negotiating the claim language from `name#tag` suffixes and `claims_locales`.
//! - **No interaction:** Decides whether an authorization request can be
//!   completed without prompting the end-user, and bundles what the issuance
//!   call needs when it can.

pub mod claims;
pub mod error;
pub mod facts;
pub mod no_interaction;

pub use crate::claims::{
    normalize_locales, ClaimCollector, ClaimProvider, Claims, NullClaimProvider,
    LANGUAGE_TAG_SEPARATOR,
};
pub use crate::error::ProviderError;
pub use crate::facts::{AuthenticationFacts, AuthenticationFactsSource};
pub use crate::no_interaction::{
    AuthorizationContext, DenialReason, Eligibility, NoInteractionChecker, Verdict,
};
