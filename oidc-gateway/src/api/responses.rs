//! Response builders shared by the endpoint handlers.
//!
//! The decision service hands back ready-made bodies (`responseContent`); the
//! handlers only pick the status, the media type and the headers. Everything
//! built here is marked as not cacheable.

use crate::errors::ApiError;
use crate::headers::presets;
use crate::models::OAuthError;
use axum::response::{IntoResponse, Response};
use axum::Json;
use http::header::{CONTENT_TYPE, LOCATION, WWW_AUTHENTICATE};
use http::{HeaderName, HeaderValue, StatusCode};
use log::error;

const JSON: &str = "application/json;charset=UTF-8";
const HTML: &str = "text/html;charset=UTF-8";
const JAVASCRIPT: &str = "application/javascript;charset=UTF-8";
const JWT: &str = "application/jwt";

fn no_store(mut response: Response) -> Response {
    presets::no_store().apply(&mut response);
    response
}

fn with_body(status: StatusCode, content_type: &'static str, body: Option<String>) -> Response {
    no_store((status, [(CONTENT_TYPE, content_type)], body.unwrap_or_default()).into_response())
}

/// Adds a header whose value came from the decision service
fn with_header(mut response: Response, name: HeaderName, value: &str) -> Response {
    match HeaderValue::from_str(value) {
        Ok(value) => {
            response.headers_mut().insert(name, value);
            response
        }
        Err(e) => {
            error!("Decision service returned an invalid {} header value: {}", name, e);
            ApiError::internal(format!("Invalid {name} header value")).into_response()
        }
    }
}

pub(crate) fn ok(content: Option<String>) -> Response {
    with_body(StatusCode::OK, JSON, content)
}

pub(crate) fn bad_request(content: Option<String>) -> Response {
    with_body(StatusCode::BAD_REQUEST, JSON, content)
}

pub(crate) fn internal_server_error(content: Option<String>) -> Response {
    with_body(StatusCode::INTERNAL_SERVER_ERROR, JSON, content)
}

/// 401 for a failed client authentication, with the given challenge
pub(crate) fn unauthorized(content: Option<String>, challenge: &str) -> Response {
    with_header(
        with_body(StatusCode::UNAUTHORIZED, JSON, content),
        WWW_AUTHENTICATE,
        challenge,
    )
}

/// 302 redirect back to the client
pub(crate) fn location(content: Option<String>) -> Response {
    let target = content.unwrap_or_default();
    with_header(
        no_store(StatusCode::FOUND.into_response()),
        LOCATION,
        &target,
    )
}

/// 200 with an HTML page, either the auto-posting form from the decision
/// service or a provider-rendered page
pub(crate) fn html(content: Option<String>) -> Response {
    with_body(StatusCode::OK, HTML, content)
}

pub(crate) fn json_value(value: serde_json::Value) -> Response {
    no_store((StatusCode::OK, Json(value)).into_response())
}

pub(crate) fn javascript(content: Option<String>) -> Response {
    with_body(StatusCode::OK, JAVASCRIPT, content)
}

pub(crate) fn jwt(content: Option<String>) -> Response {
    with_body(StatusCode::OK, JWT, content)
}

/// Bearer token error (RFC 6750 section 3) where the challenge is the only
/// payload
pub(crate) fn bearer_error(status: StatusCode, challenge: Option<String>) -> Response {
    let challenge = challenge.unwrap_or_else(|| "Bearer".to_string());
    with_header(
        no_store(status.into_response()),
        WWW_AUTHENTICATE,
        &challenge,
    )
}

/// 500 for an action this gateway does not know how to handle
pub(crate) fn unknown_action(endpoint: &str) -> Response {
    error!("Decision service returned an unknown action on the {} endpoint", endpoint);
    no_store(
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(OAuthError::server_error(&format!(
                "Unknown action returned from the {endpoint} API"
            ))),
        )
            .into_response(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::header::{CACHE_CONTROL, PRAGMA};
    use http_body_util::BodyExt;

    async fn body_string(response: Response) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_ok_is_not_cacheable() {
        let response = ok(Some("{\"active\":true}".to_string()));
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().get(CONTENT_TYPE).unwrap(), JSON);
        assert_eq!(
            response.headers().get(CACHE_CONTROL).unwrap(),
            "no-store, no-cache"
        );
        assert_eq!(response.headers().get(PRAGMA).unwrap(), "no-cache");
        assert_eq!(body_string(response).await, "{\"active\":true}");
    }

    #[tokio::test]
    async fn test_location() {
        let response = location(Some("https://client.example.org/cb?code=abc".to_string()));
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(
            response.headers().get(LOCATION).unwrap(),
            "https://client.example.org/cb?code=abc"
        );
        assert_eq!(body_string(response).await, "");
    }

    #[tokio::test]
    async fn test_invalid_header_value_is_internal_error() {
        let response = location(Some("https://client.example.org/\ncb".to_string()));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_unauthorized_challenge() {
        let response = unauthorized(
            Some("{\"error\":\"invalid_client\"}".to_string()),
            "Basic realm=\"token\"",
        );
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(WWW_AUTHENTICATE).unwrap(),
            "Basic realm=\"token\""
        );
        assert_eq!(body_string(response).await, "{\"error\":\"invalid_client\"}");
    }

    #[tokio::test]
    async fn test_bearer_error() {
        let challenge = "Bearer error=\"invalid_token\"".to_string();
        let response = bearer_error(StatusCode::UNAUTHORIZED, Some(challenge.clone()));
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(response.headers().get(WWW_AUTHENTICATE).unwrap(), &challenge);
        assert_eq!(body_string(response).await, "");
    }

    #[tokio::test]
    async fn test_unknown_action() {
        let response = unknown_action("token");
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: OAuthError = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body.error, "server_error");
    }
}
