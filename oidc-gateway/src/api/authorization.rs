use crate::api::responses;
use crate::api::session::SessionFacts;
use crate::decision_client::{
    AuthorizationAction, AuthorizationFailRequest, AuthorizationIssueRequest,
    AuthorizationRequest, AuthorizationResponse, AuthorizationResultAction,
    AuthorizationResultResponse,
};
use crate::errors::ApiError;
use crate::openapi::AUTHORIZATION_TAG;
use crate::spi::AuthorizationPage;
use crate::state::AppState;
use axum::extract::{RawQuery, State};
use axum::response::{IntoResponse, Response};
use log::{debug, error};
use oidc_core::{AuthenticationFacts, DenialReason, Eligibility, NoInteractionChecker, Verdict};

/// Authorization endpoint (RFC 6749 section 3.1), GET variant
#[utoipa::path(
    get,
    path = "/api/authorization",
    tag = AUTHORIZATION_TAG,
    params(
        ("response_type" = String, Query, description = "OAuth 2.0 response type"),
        ("client_id" = String, Query, description = "Client identifier"),
    ),
    responses(
        (status = 200, description = "Interaction page or auto-posting form"),
        (status = 302, description = "Redirect back to the client"),
        (status = 400, description = "Malformed authorization request"),
        (status = 500, description = "Internal server error"),
        (status = 502, description = "Decision service unavailable")
    )
)]
pub(crate) async fn authorization_get(
    State(state): State<AppState>,
    SessionFacts(facts): SessionFacts,
    RawQuery(query): RawQuery,
) -> Response {
    handle_authorization(&state, facts, query.unwrap_or_default()).await
}

/// Authorization endpoint (RFC 6749 section 3.1), POST variant
#[utoipa::path(
    post,
    path = "/api/authorization",
    tag = AUTHORIZATION_TAG,
    request_body(content = String, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Interaction page or auto-posting form"),
        (status = 302, description = "Redirect back to the client"),
        (status = 400, description = "Malformed authorization request"),
        (status = 500, description = "Internal server error"),
        (status = 502, description = "Decision service unavailable")
    )
)]
pub(crate) async fn authorization_post(
    State(state): State<AppState>,
    SessionFacts(facts): SessionFacts,
    body: String,
) -> Response {
    handle_authorization(&state, facts, body).await
}

async fn handle_authorization(
    state: &AppState,
    facts: AuthenticationFacts,
    parameters: String,
) -> Response {
    let request = AuthorizationRequest::new(parameters);
    let response = match state.decision_api.authorization(&request).await {
        Ok(response) => response,
        Err(err) => {
            error!("Failed to send authorization request: {}", err);
            return ApiError::from(err).into_response();
        }
    };

    let content = response.response_content.clone();
    match response.action {
        AuthorizationAction::InternalServerError => responses::internal_server_error(content),
        AuthorizationAction::BadRequest => responses::bad_request(content),
        AuthorizationAction::Location => responses::location(content),
        AuthorizationAction::Form => responses::html(content),
        AuthorizationAction::Interaction => interaction(state, &response).await,
        AuthorizationAction::NoInteraction => no_interaction(state, &response, &facts).await,
        AuthorizationAction::Unknown => responses::unknown_action("authorization"),
    }
}

async fn interaction(state: &AppState, response: &AuthorizationResponse) -> Response {
    match state.provider.authorization_page(response).await {
        Ok(AuthorizationPage::Html(html)) => responses::html(Some(html)),
        Ok(AuthorizationPage::Json(value)) => responses::json_value(value),
        Err(err) => {
            error!("Failed to render authorization page: {}", err);
            ApiError::from(err).into_response()
        }
    }
}

async fn no_interaction(
    state: &AppState,
    response: &AuthorizationResponse,
    facts: &AuthenticationFacts,
) -> Response {
    let context = response.context();
    let verdict = NoInteractionChecker::new()
        .evaluate(&context, facts, state.provider.as_ref())
        .await;

    match verdict {
        Ok(Verdict::Denied(reason)) => fail(state, &context.ticket, reason).await,
        Ok(Verdict::Eligible(eligibility)) => issue(state, &context.ticket, eligibility).await,
        Err(err) => {
            error!("Failed to collect claims for ticket '{}': {}", context.ticket, err);
            ApiError::from(err).into_response()
        }
    }
}

/// Tells the decision service the request cannot be completed
pub(super) async fn fail(state: &AppState, ticket: &str, reason: DenialReason) -> Response {
    debug!("Failing authorization ticket '{}': {}", ticket, reason);
    let request = AuthorizationFailRequest::new(ticket, reason);
    match state.decision_api.authorization_fail(&request).await {
        Ok(response) => result_response(response, "authorization fail"),
        Err(err) => {
            error!("Failed to send authorization fail request: {}", err);
            ApiError::from(err).into_response()
        }
    }
}

/// Asks the decision service to issue the authorization response
pub(super) async fn issue(state: &AppState, ticket: &str, eligibility: Eligibility) -> Response {
    let request = match issue_request(state, ticket, eligibility).await {
        Ok(request) => request,
        Err(err) => return err.into_response(),
    };
    match state.decision_api.authorization_issue(&request).await {
        Ok(response) => result_response(response, "authorization issue"),
        Err(err) => {
            error!("Failed to send authorization issue request: {}", err);
            ApiError::from(err).into_response()
        }
    }
}

async fn issue_request(
    state: &AppState,
    ticket: &str,
    eligibility: Eligibility,
) -> Result<AuthorizationIssueRequest, ApiError> {
    let provider = state.provider.as_ref();
    let subject = eligibility.subject;

    let mut request = AuthorizationIssueRequest::new(ticket, subject.as_str(), eligibility.auth_time)
        .with_acr(eligibility.acr)
        .with_claims(eligibility.claims.as_ref())
        .map_err(|e| ApiError::internal(format!("Failed to encode claims: {e}")))?;
    request.properties = provider.properties(&subject).await?;
    request.scopes = provider.scopes(&subject).await?;
    request.sub = provider.sub(&subject).await?;
    Ok(request)
}

fn result_response(response: AuthorizationResultResponse, endpoint: &str) -> Response {
    let content = response.response_content;
    match response.action {
        AuthorizationResultAction::InternalServerError => responses::internal_server_error(content),
        AuthorizationResultAction::BadRequest => responses::bad_request(content),
        AuthorizationResultAction::Location => responses::location(content),
        AuthorizationResultAction::Form => responses::html(content),
        AuthorizationResultAction::Unknown => responses::unknown_action(endpoint),
    }
}
