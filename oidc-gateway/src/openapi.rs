use utoipa::OpenApi;

pub(crate) const HEALTH_TAG: &str = "Health API";
pub(crate) const AUTHORIZATION_TAG: &str = "Authorization API";
pub(crate) const TOKEN_TAG: &str = "Token API";
pub(crate) const USERINFO_TAG: &str = "UserInfo API";
pub(crate) const DISCOVERY_TAG: &str = "Discovery API";

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::api::health::health_check,
        crate::api::authorization::authorization_get,
        crate::api::authorization::authorization_post,
        crate::api::decision::decision_handler,
        crate::api::token::token_handler,
        crate::api::introspection::introspection_handler,
        crate::api::revocation::revocation_handler,
        crate::api::userinfo::userinfo_get,
        crate::api::userinfo::userinfo_post,
        crate::api::discovery::configuration_handler,
        crate::api::discovery::jwks_handler,
    ),
    components(schemas(crate::models::OAuthError)),
    tags(
        (name = HEALTH_TAG, description = "Health check endpoints"),
        (name = AUTHORIZATION_TAG, description = "Authorization endpoint and end-user decisions"),
        (name = TOKEN_TAG, description = "Token, introspection and revocation endpoints"),
        (name = USERINFO_TAG, description = "UserInfo endpoint"),
        (name = DISCOVERY_TAG, description = "Provider metadata and public keys"),
    ),
    info(
        title = "OIDC Gateway API",
        description = "OAuth 2.0 and OpenID Connect endpoints backed by a remote authorization decision service",
        version = "0.1.0"
    )
)]
pub(crate) struct ApiDoc;
