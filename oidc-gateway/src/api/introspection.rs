use crate::api::responses;
use crate::decision_client::{IntrospectionAction, IntrospectionRequest};
use crate::errors::ApiError;
use crate::openapi::TOKEN_TAG;
use crate::state::AppState;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use log::error;

/// Token introspection (RFC 7662) for resource servers
#[utoipa::path(
    post,
    path = "/api/introspection",
    tag = TOKEN_TAG,
    request_body(content = String, content_type = "application/x-www-form-urlencoded"),
    params(
        ("Authorization" = String, Header, description = "Bearer API key of the gateway"),
    ),
    responses(
        (status = 200, description = "Introspection response"),
        (status = 400, description = "Invalid introspection request"),
        (status = 401, description = "Missing API key"),
        (status = 403, description = "Invalid API key"),
        (status = 500, description = "Internal server error"),
        (status = 502, description = "Decision service unavailable")
    )
)]
pub(crate) async fn introspection_handler(State(state): State<AppState>, body: String) -> Response {
    let request = IntrospectionRequest::new(body);
    let response = match state.decision_api.introspection(&request).await {
        Ok(response) => response,
        Err(err) => {
            error!("Failed to send introspection request: {}", err);
            return ApiError::from(err).into_response();
        }
    };

    let content = response.response_content;
    match response.action {
        IntrospectionAction::InternalServerError => responses::internal_server_error(content),
        IntrospectionAction::BadRequest => responses::bad_request(content),
        IntrospectionAction::Ok => responses::ok(content),
        IntrospectionAction::Unknown => responses::unknown_action("introspection"),
    }
}
