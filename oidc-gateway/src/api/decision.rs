use crate::api::authorization::{fail, issue};
use crate::errors::ApiError;
use crate::openapi::AUTHORIZATION_TAG;
use crate::state::AppState;
use axum::extract::{Form, State};
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use log::error;
use oidc_core::{ClaimCollector, DenialReason, Eligibility};
use serde::Deserialize;
use utoipa::ToSchema;

/// End-user's answer on the authorization page
#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct DecisionForm {
    /// Ticket issued by the authorization call
    ticket: String,
    /// "true" when the end-user granted the request
    #[serde(default)]
    authorized: Option<String>,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    password: Option<String>,
    /// Space-separated claim names to embed in the ID token
    #[serde(default)]
    claims: Option<String>,
    /// Space-separated preferred locales for the claims
    #[serde(default)]
    claims_locales: Option<String>,
}

fn split_list(value: Option<&str>) -> Option<Vec<String>> {
    let items: Vec<String> = value?.split_whitespace().map(str::to_string).collect();
    (!items.is_empty()).then_some(items)
}

/// Completes an interactive authorization request
#[utoipa::path(
    post,
    path = "/api/authorization/decision",
    tag = AUTHORIZATION_TAG,
    request_body(content = DecisionForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Auto-posting form back to the client"),
        (status = 302, description = "Redirect back to the client"),
        (status = 400, description = "Invalid or expired ticket"),
        (status = 500, description = "Internal server error"),
        (status = 502, description = "Decision service unavailable")
    )
)]
pub(crate) async fn decision_handler(
    State(state): State<AppState>,
    Form(form): Form<DecisionForm>,
) -> Response {
    if form.authorized.as_deref() != Some("true") {
        return fail(&state, &form.ticket, DenialReason::Denied).await;
    }

    let username = form.username.as_deref().unwrap_or_default();
    let password = form.password.as_deref().unwrap_or_default();
    let subject = match state.provider.authenticate_user(username, password).await {
        Ok(Some(subject)) => subject,
        Ok(None) => return fail(&state, &form.ticket, DenialReason::NotAuthenticated).await,
        Err(err) => {
            error!("Failed to authenticate end-user: {}", err);
            return ApiError::from(err).into_response();
        }
    };

    let claim_names = split_list(form.claims.as_deref());
    let claim_locales = split_list(form.claims_locales.as_deref());
    let claims = ClaimCollector::new(
        state.provider.as_ref(),
        &subject,
        claim_names.as_deref(),
        claim_locales.as_deref(),
    )
    .collect()
    .await;
    let claims = match claims {
        Ok(claims) => claims,
        Err(err) => {
            error!("Failed to collect claims for '{}': {}", subject, err);
            return ApiError::from(err).into_response();
        }
    };

    let eligibility = Eligibility {
        subject,
        auth_time: Utc::now().timestamp(),
        acr: None,
        claims,
    };
    issue(&state, &form.ticket, eligibility).await
}
