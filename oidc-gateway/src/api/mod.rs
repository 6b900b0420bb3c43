mod authn_middleware;
pub(crate) mod authorization;
mod credentials;
pub(crate) mod decision;
pub(crate) mod discovery;
pub(crate) mod health;
pub(crate) mod introspection;
mod responses;
pub(crate) mod revocation;
mod session;
pub(crate) mod token;
pub(crate) mod userinfo;

use crate::api::authn_middleware::authentication_middleware;
use crate::state::AppState;
use axum::routing::{get, post};
use axum::{middleware, Router};

/// Combines all API routes into a single router
pub(super) fn router(state: &AppState) -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .route(
            "/.well-known/openid-configuration",
            get(discovery::configuration_handler),
        )
        .route("/api/jwks", get(discovery::jwks_handler))
        .route(
            "/api/authorization",
            get(authorization::authorization_get).post(authorization::authorization_post),
        )
        .route(
            "/api/authorization/decision",
            post(decision::decision_handler),
        )
        .route("/api/token", post(token::token_handler))
        .route("/api/revocation", post(revocation::revocation_handler))
        .route(
            "/api/userinfo",
            get(userinfo::userinfo_get).post(userinfo::userinfo_post),
        )
        .merge(protected_routes(state))
}

/// Routes for resource servers, guarded by the gateway API key
fn protected_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/api/introspection",
            post(introspection::introspection_handler),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            authentication_middleware,
        ))
}
