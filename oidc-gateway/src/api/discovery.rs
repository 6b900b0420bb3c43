use crate::decision_client::service::is_empty_document;
use crate::errors::ApiError;
use crate::headers::presets;
use crate::openapi::DISCOVERY_TAG;
use crate::state::AppState;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use http::header::CONTENT_TYPE;
use http::StatusCode;
use log::error;

fn document(body: String, max_age: u32) -> Response {
    let mut response = (
        StatusCode::OK,
        [(CONTENT_TYPE, "application/json;charset=UTF-8")],
        body,
    )
        .into_response();
    presets::public_cache(max_age).apply(&mut response);
    response
}

/// OpenID Provider metadata (OpenID Connect Discovery 1.0 section 4)
#[utoipa::path(
    get,
    path = "/.well-known/openid-configuration",
    tag = DISCOVERY_TAG,
    responses(
        (status = 200, description = "OpenID Provider configuration document"),
        (status = 502, description = "Decision service unavailable")
    )
)]
pub(crate) async fn configuration_handler(State(state): State<AppState>) -> Response {
    match state
        .decision_api
        .service_configuration(state.settings.pretty)
        .await
    {
        Ok(body) => document(body, state.settings.metadata_max_age),
        Err(err) => {
            error!("Failed to fetch service configuration: {}", err);
            ApiError::from(err).into_response()
        }
    }
}

/// Public JWK Set used to verify tokens issued by the service
#[utoipa::path(
    get,
    path = "/api/jwks",
    tag = DISCOVERY_TAG,
    responses(
        (status = 200, description = "JWK Set document"),
        (status = 204, description = "The service has no keys"),
        (status = 502, description = "Decision service unavailable")
    )
)]
pub(crate) async fn jwks_handler(State(state): State<AppState>) -> Response {
    match state.decision_api.service_jwks(state.settings.pretty).await {
        Ok(body) if is_empty_document(&body) => StatusCode::NO_CONTENT.into_response(),
        Ok(body) => document(body, state.settings.metadata_max_age),
        Err(err) => {
            error!("Failed to fetch service JWK Set: {}", err);
            ApiError::from(err).into_response()
        }
    }
}
