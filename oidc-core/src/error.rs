use thiserror::Error;

/// Failure raised by a pluggable provider (claim source or facts source).
///
/// The core never handles these; they travel back to the caller unchanged.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Claim lookup failed for '{claim}': {message}")]
    ClaimLookup { claim: String, message: String },

    #[error("Backend unavailable: {0}")]
    Unavailable(String),

    #[error("Other error: {0}")]
    Other(String),
}

impl ProviderError {
    pub fn claim_lookup(claim: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ClaimLookup {
            claim: claim.into(),
            message: message.into(),
        }
    }
}
