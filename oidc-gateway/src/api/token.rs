use crate::api::credentials::basic_credentials;
use crate::api::responses;
use crate::decision_client::{
    TokenAction, TokenFailAction, TokenFailReason, TokenFailRequest, TokenIssueAction,
    TokenIssueRequest, TokenRequest, TokenResponse,
};
use crate::errors::ApiError;
use crate::openapi::TOKEN_TAG;
use crate::state::AppState;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use http::HeaderMap;
use log::{debug, error};

pub(crate) const TOKEN_CHALLENGE: &str = "Basic realm=\"token\"";

/// Token endpoint (RFC 6749 section 3.2)
#[utoipa::path(
    post,
    path = "/api/token",
    tag = TOKEN_TAG,
    request_body(content = String, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Token response"),
        (status = 400, description = "Invalid token request"),
        (status = 401, description = "Client authentication failed"),
        (status = 500, description = "Internal server error"),
        (status = 502, description = "Decision service unavailable")
    )
)]
pub(crate) async fn token_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> Response {
    let request = TokenRequest::new(body).with_client_credentials(basic_credentials(&headers));
    let response = match state.decision_api.token(&request).await {
        Ok(response) => response,
        Err(err) => {
            error!("Failed to send token request: {}", err);
            return ApiError::from(err).into_response();
        }
    };

    let content = response.response_content.clone();
    match response.action {
        TokenAction::InvalidClient => responses::unauthorized(content, TOKEN_CHALLENGE),
        TokenAction::InternalServerError => responses::internal_server_error(content),
        TokenAction::BadRequest => responses::bad_request(content),
        TokenAction::Password => password_grant(&state, &response).await,
        TokenAction::Ok => responses::ok(content),
        TokenAction::Unknown => responses::unknown_action("token"),
    }
}

/// Resource owner password credentials flow (RFC 6749 section 4.3)
async fn password_grant(state: &AppState, response: &TokenResponse) -> Response {
    let username = response.username.as_deref().unwrap_or_default();
    let password = response.password.as_deref().unwrap_or_default();

    match state.provider.authenticate_user(username, password).await {
        Ok(Some(subject)) => token_issue(state, &response.ticket, subject).await,
        Ok(None) => {
            debug!("Rejected resource owner credentials for '{}'", username);
            token_fail(state, &response.ticket).await
        }
        Err(err) => {
            error!("Failed to authenticate resource owner: {}", err);
            ApiError::from(err).into_response()
        }
    }
}

async fn token_issue(state: &AppState, ticket: &str, subject: String) -> Response {
    let properties = match state.provider.properties(&subject).await {
        Ok(properties) => properties,
        Err(err) => return ApiError::from(err).into_response(),
    };
    let request = TokenIssueRequest {
        ticket: ticket.to_string(),
        subject,
        properties,
    };

    match state.decision_api.token_issue(&request).await {
        Ok(response) => match response.action {
            TokenIssueAction::InternalServerError => {
                responses::internal_server_error(response.response_content)
            }
            TokenIssueAction::Ok => responses::ok(response.response_content),
            TokenIssueAction::Unknown => responses::unknown_action("token issue"),
        },
        Err(err) => {
            error!("Failed to send token issue request: {}", err);
            ApiError::from(err).into_response()
        }
    }
}

async fn token_fail(state: &AppState, ticket: &str) -> Response {
    let request = TokenFailRequest {
        ticket: ticket.to_string(),
        reason: TokenFailReason::InvalidResourceOwnerCredentials,
    };

    match state.decision_api.token_fail(&request).await {
        Ok(response) => match response.action {
            TokenFailAction::InternalServerError => {
                responses::internal_server_error(response.response_content)
            }
            TokenFailAction::BadRequest => responses::bad_request(response.response_content),
            TokenFailAction::Unknown => responses::unknown_action("token fail"),
        },
        Err(err) => {
            error!("Failed to send token fail request: {}", err);
            ApiError::from(err).into_response()
        }
    }
}
