use crate::api::credentials::{bearer_token, form_parameter};
use crate::api::responses;
use crate::decision_client::{
    UserInfoAction, UserInfoIssueAction, UserInfoIssueRequest, UserInfoRequest, UserInfoResponse,
};
use crate::errors::ApiError;
use crate::openapi::USERINFO_TAG;
use crate::state::AppState;
use axum::extract::{RawQuery, State};
use axum::response::{IntoResponse, Response};
use http::{HeaderMap, StatusCode};
use log::error;
use oidc_core::ClaimCollector;

const MISSING_TOKEN_CHALLENGE: &str = "Bearer error=\"invalid_token\",\
error_description=\"An access token must be sent as a Bearer Token. \
See OpenID Connect Core 1.0, 5.3.1. UserInfo Request for details.\"";

/// UserInfo endpoint (OpenID Connect Core 1.0 section 5.3), GET variant
#[utoipa::path(
    get,
    path = "/api/userinfo",
    tag = USERINFO_TAG,
    params(
        ("Authorization" = Option<String>, Header, description = "Bearer access token"),
    ),
    responses(
        (status = 200, description = "Claims of the end-user, as JSON or a signed JWT"),
        (status = 400, description = "Missing or malformed access token"),
        (status = 401, description = "Invalid access token"),
        (status = 403, description = "Insufficient scope"),
        (status = 500, description = "Internal server error"),
        (status = 502, description = "Decision service unavailable")
    )
)]
pub(crate) async fn userinfo_get(
    State(state): State<AppState>,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
) -> Response {
    let token = bearer_token(&headers)
        .or_else(|| form_parameter(query.as_deref().unwrap_or_default(), "access_token"));
    handle_userinfo(&state, token).await
}

/// UserInfo endpoint (OpenID Connect Core 1.0 section 5.3), POST variant
#[utoipa::path(
    post,
    path = "/api/userinfo",
    tag = USERINFO_TAG,
    request_body(content = String, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Claims of the end-user, as JSON or a signed JWT"),
        (status = 400, description = "Missing or malformed access token"),
        (status = 401, description = "Invalid access token"),
        (status = 403, description = "Insufficient scope"),
        (status = 500, description = "Internal server error"),
        (status = 502, description = "Decision service unavailable")
    )
)]
pub(crate) async fn userinfo_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> Response {
    let token = bearer_token(&headers).or_else(|| form_parameter(&body, "access_token"));
    handle_userinfo(&state, token).await
}

async fn handle_userinfo(state: &AppState, token: Option<String>) -> Response {
    let Some(token) = token else {
        return responses::bearer_error(
            StatusCode::BAD_REQUEST,
            Some(MISSING_TOKEN_CHALLENGE.to_string()),
        );
    };

    let response = match state.decision_api.userinfo(&UserInfoRequest { token }).await {
        Ok(response) => response,
        Err(err) => {
            error!("Failed to send userinfo request: {}", err);
            return ApiError::from(err).into_response();
        }
    };

    let content = response.response_content.clone();
    match response.action {
        UserInfoAction::InternalServerError => {
            responses::bearer_error(StatusCode::INTERNAL_SERVER_ERROR, content)
        }
        UserInfoAction::BadRequest => responses::bearer_error(StatusCode::BAD_REQUEST, content),
        UserInfoAction::Unauthorized => responses::bearer_error(StatusCode::UNAUTHORIZED, content),
        UserInfoAction::Forbidden => responses::bearer_error(StatusCode::FORBIDDEN, content),
        UserInfoAction::Ok => userinfo_issue(state, response).await,
        UserInfoAction::Unknown => responses::unknown_action("userinfo"),
    }
}

async fn userinfo_issue(state: &AppState, response: UserInfoResponse) -> Response {
    let (Some(subject), Some(token)) = (response.subject, response.token) else {
        error!("Userinfo response is missing the subject or the token");
        return ApiError::internal("Incomplete userinfo response from the decision service")
            .into_response();
    };

    let provider = state.provider.as_ref();
    let claims = ClaimCollector::new(
        provider,
        &subject,
        response.claims.as_deref(),
        response.claims_locales.as_deref(),
    )
    .collect()
    .await;
    let claims = match claims {
        Ok(claims) => claims.map(|claims| serde_json::to_string(&claims)).transpose(),
        Err(err) => {
            error!("Failed to collect claims for '{}': {}", subject, err);
            return ApiError::from(err).into_response();
        }
    };
    let claims = match claims {
        Ok(claims) => claims,
        Err(e) => return ApiError::internal(format!("Failed to encode claims: {e}")).into_response(),
    };
    let sub = match provider.sub(&subject).await {
        Ok(sub) => sub,
        Err(err) => return ApiError::from(err).into_response(),
    };

    let request = UserInfoIssueRequest { token, claims, sub };
    let response = match state.decision_api.userinfo_issue(&request).await {
        Ok(response) => response,
        Err(err) => {
            error!("Failed to send userinfo issue request: {}", err);
            return ApiError::from(err).into_response();
        }
    };

    let content = response.response_content;
    match response.action {
        UserInfoIssueAction::InternalServerError => {
            responses::bearer_error(StatusCode::INTERNAL_SERVER_ERROR, content)
        }
        UserInfoIssueAction::BadRequest => {
            responses::bearer_error(StatusCode::BAD_REQUEST, content)
        }
        UserInfoIssueAction::Unauthorized => {
            responses::bearer_error(StatusCode::UNAUTHORIZED, content)
        }
        UserInfoIssueAction::Forbidden => responses::bearer_error(StatusCode::FORBIDDEN, content),
        UserInfoIssueAction::Json => responses::ok(content),
        UserInfoIssueAction::Jwt => responses::jwt(content),
        UserInfoIssueAction::Unknown => responses::unknown_action("userinfo issue"),
    }
}
