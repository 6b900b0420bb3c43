use crate::api::credentials::basic_credentials;
use crate::api::responses;
use crate::decision_client::{RevocationAction, RevocationRequest};
use crate::errors::ApiError;
use crate::openapi::TOKEN_TAG;
use crate::state::AppState;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use http::HeaderMap;
use log::error;

const REVOCATION_CHALLENGE: &str = "Basic realm=\"revocation\"";

/// Token revocation (RFC 7009)
#[utoipa::path(
    post,
    path = "/api/revocation",
    tag = TOKEN_TAG,
    request_body(content = String, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Token revoked or unknown"),
        (status = 400, description = "Invalid revocation request"),
        (status = 401, description = "Client authentication failed"),
        (status = 500, description = "Internal server error"),
        (status = 502, description = "Decision service unavailable")
    )
)]
pub(crate) async fn revocation_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> Response {
    let request = RevocationRequest::new(body, basic_credentials(&headers));
    let response = match state.decision_api.revocation(&request).await {
        Ok(response) => response,
        Err(err) => {
            error!("Failed to send revocation request: {}", err);
            return ApiError::from(err).into_response();
        }
    };

    let content = response.response_content;
    match response.action {
        RevocationAction::InvalidClient => responses::unauthorized(content, REVOCATION_CHALLENGE),
        RevocationAction::InternalServerError => responses::internal_server_error(content),
        RevocationAction::BadRequest => responses::bad_request(content),
        RevocationAction::Ok => responses::javascript(content),
        RevocationAction::Unknown => responses::unknown_action("revocation"),
    }
}
