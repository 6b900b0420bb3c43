//! Provider metadata served by the decision service.
//!
//! Both documents are passed through as text so the gateway never reorders
//! or reformats what the service publishes.

/// Whether a JWK Set document has no keys worth serving
pub fn is_empty_document(document: &str) -> bool {
    document.trim().is_empty()
}
