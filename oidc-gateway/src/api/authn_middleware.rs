use crate::state::AppState;
use axum::{
    body::Body,
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use log::warn;

const FORBIDDEN_MESSAGE: &str =
    "You are not authorized to access this resource, please check your API key.";

/// Requires `Authorization: Bearer <api_key>` when an API key is configured
pub(super) async fn authentication_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let Some(expected) = state.settings.api_key.as_deref() else {
        return next.run(request).await;
    };

    let auth_header = match request.headers().get(http::header::AUTHORIZATION) {
        Some(header) => header,
        None => {
            warn!("Missing Authorization header");
            return (StatusCode::UNAUTHORIZED, "Missing Authorization header").into_response();
        }
    };

    let api_key = match auth_header.to_str() {
        Ok(header_str) if header_str.len() > 7 && header_str[..7].eq_ignore_ascii_case("bearer ") => {
            &header_str[7..]
        }
        Ok(_) => {
            warn!("Invalid Authorization header format, missing 'Bearer ' prefix");
            return (StatusCode::FORBIDDEN, FORBIDDEN_MESSAGE).into_response();
        }
        Err(e) => {
            warn!("Failed to parse Authorization header to string: {}", e);
            return (StatusCode::FORBIDDEN, FORBIDDEN_MESSAGE).into_response();
        }
    };

    if api_key != expected {
        warn!("Authentication failed: Invalid API key");
        return (StatusCode::FORBIDDEN, FORBIDDEN_MESSAGE).into_response();
    }
    next.run(request).await
}
