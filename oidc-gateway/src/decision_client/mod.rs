//! Typed client for the remote service that makes every authorization
//! decision. The gateway forwards protocol requests verbatim and dispatches
//! on the `action` each response carries.

use crate::config::DecisionApiConfig;
use crate::errors::ApiError;
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use http::header::{InvalidHeaderValue, AUTHORIZATION, CONTENT_TYPE};
use http::{HeaderMap, HeaderValue, StatusCode};
use log::debug;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

pub mod authorization;
pub mod introspection;
pub mod revocation;
pub mod service;
pub mod token;
pub mod userinfo;

pub use authorization::{
    AuthorizationAction, AuthorizationFailRequest, AuthorizationIssueRequest,
    AuthorizationRequest, AuthorizationResponse, AuthorizationResultAction,
    AuthorizationResultResponse,
};
pub use introspection::{IntrospectionAction, IntrospectionRequest, IntrospectionResponse};
pub use revocation::{RevocationAction, RevocationRequest, RevocationResponse};
pub use token::{
    TokenAction, TokenFailAction, TokenFailReason, TokenFailRequest, TokenFailResponse,
    TokenIssueAction, TokenIssueRequest, TokenIssueResponse, TokenRequest, TokenResponse,
};
pub use userinfo::{
    UserInfoAction, UserInfoIssueAction, UserInfoIssueRequest, UserInfoIssueResponse,
    UserInfoRequest, UserInfoResponse,
};

/// Arbitrary key/value pair attached to an access token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub key: String,
    pub value: String,
    /// Hidden properties are not exposed by introspection
    #[serde(default)]
    pub hidden: bool,
}

/// Operations of the remote decision service used by the gateway
#[async_trait]
pub trait DecisionApi: Send + Sync {
    async fn authorization(
        &self,
        request: &AuthorizationRequest,
    ) -> Result<AuthorizationResponse, DecisionApiError>;

    async fn authorization_fail(
        &self,
        request: &AuthorizationFailRequest,
    ) -> Result<AuthorizationResultResponse, DecisionApiError>;

    async fn authorization_issue(
        &self,
        request: &AuthorizationIssueRequest,
    ) -> Result<AuthorizationResultResponse, DecisionApiError>;

    async fn token(&self, request: &TokenRequest) -> Result<TokenResponse, DecisionApiError>;

    async fn token_issue(
        &self,
        request: &TokenIssueRequest,
    ) -> Result<TokenIssueResponse, DecisionApiError>;

    async fn token_fail(
        &self,
        request: &TokenFailRequest,
    ) -> Result<TokenFailResponse, DecisionApiError>;

    async fn introspection(
        &self,
        request: &IntrospectionRequest,
    ) -> Result<IntrospectionResponse, DecisionApiError>;

    async fn revocation(
        &self,
        request: &RevocationRequest,
    ) -> Result<RevocationResponse, DecisionApiError>;

    async fn userinfo(&self, request: &UserInfoRequest)
        -> Result<UserInfoResponse, DecisionApiError>;

    async fn userinfo_issue(
        &self,
        request: &UserInfoIssueRequest,
    ) -> Result<UserInfoIssueResponse, DecisionApiError>;

    /// OpenID Provider metadata document, as JSON text
    async fn service_configuration(&self, pretty: bool) -> Result<String, DecisionApiError>;

    /// Public JWK Set of the service, as JSON text. Empty when the service
    /// has no keys.
    async fn service_jwks(&self, pretty: bool) -> Result<String, DecisionApiError>;
}

/// `DecisionApi` over HTTP
pub struct HttpDecisionApi {
    client: Client,
    config: DecisionApiConfig,
}

impl HttpDecisionApi {
    pub fn new(config: &DecisionApiConfig) -> Result<Self, DecisionApiError> {
        Ok(Self {
            client: Self::create_client(config)?,
            config: config.clone(),
        })
    }

    fn create_client(config: &DecisionApiConfig) -> Result<Client, DecisionApiError> {
        let credentials = STANDARD.encode(format!(
            "{}:{}",
            config.service_api_key, config.service_api_secret
        ));
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Basic {credentials}"))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        Client::builder()
            .timeout(Duration::from_secs(config.query_timeout))
            .connect_timeout(Duration::from_secs(config.connect_timeout))
            .default_headers(headers)
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Some(Duration::from_secs(90)))
            .build()
            .map_err(DecisionApiError::RequestError)
    }

    async fn post<B: Serialize + ?Sized, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<R, DecisionApiError> {
        let url = self.config.get_url(path);
        debug!("Sending request to decision service at: {}", url);

        let response = self.client.post(&url).json(body).send().await?;
        if !response.status().is_success() {
            return Err(DecisionApiError::InvalidStatus(response.status()));
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn get_document(&self, path: &str, pretty: bool) -> Result<String, DecisionApiError> {
        let url = self.config.get_url(path);
        debug!("Fetching document from decision service at: {}", url);

        let response = self
            .client
            .get(&url)
            .query(&[("pretty", pretty)])
            .send()
            .await?;
        let status = response.status();
        if status == StatusCode::NO_CONTENT {
            return Ok(String::new());
        }
        if !status.is_success() {
            return Err(DecisionApiError::InvalidStatus(status));
        }

        Ok(response.text().await?)
    }
}

#[async_trait]
impl DecisionApi for HttpDecisionApi {
    async fn authorization(
        &self,
        request: &AuthorizationRequest,
    ) -> Result<AuthorizationResponse, DecisionApiError> {
        self.post("/api/auth/authorization", request).await
    }

    async fn authorization_fail(
        &self,
        request: &AuthorizationFailRequest,
    ) -> Result<AuthorizationResultResponse, DecisionApiError> {
        self.post("/api/auth/authorization/fail", request).await
    }

    async fn authorization_issue(
        &self,
        request: &AuthorizationIssueRequest,
    ) -> Result<AuthorizationResultResponse, DecisionApiError> {
        self.post("/api/auth/authorization/issue", request).await
    }

    async fn token(&self, request: &TokenRequest) -> Result<TokenResponse, DecisionApiError> {
        self.post("/api/auth/token", request).await
    }

    async fn token_issue(
        &self,
        request: &TokenIssueRequest,
    ) -> Result<TokenIssueResponse, DecisionApiError> {
        self.post("/api/auth/token/issue", request).await
    }

    async fn token_fail(
        &self,
        request: &TokenFailRequest,
    ) -> Result<TokenFailResponse, DecisionApiError> {
        self.post("/api/auth/token/fail", request).await
    }

    async fn introspection(
        &self,
        request: &IntrospectionRequest,
    ) -> Result<IntrospectionResponse, DecisionApiError> {
        self.post("/api/auth/introspection/standard", request).await
    }

    async fn revocation(
        &self,
        request: &RevocationRequest,
    ) -> Result<RevocationResponse, DecisionApiError> {
        self.post("/api/auth/revocation", request).await
    }

    async fn userinfo(
        &self,
        request: &UserInfoRequest,
    ) -> Result<UserInfoResponse, DecisionApiError> {
        self.post("/api/auth/userinfo", request).await
    }

    async fn userinfo_issue(
        &self,
        request: &UserInfoIssueRequest,
    ) -> Result<UserInfoIssueResponse, DecisionApiError> {
        self.post("/api/auth/userinfo/issue", request).await
    }

    async fn service_configuration(&self, pretty: bool) -> Result<String, DecisionApiError> {
        self.get_document("/api/service/configuration", pretty).await
    }

    async fn service_jwks(&self, pretty: bool) -> Result<String, DecisionApiError> {
        self.get_document("/api/service/jwks/get", pretty).await
    }
}

/// Errors that can occur when calling the decision service
#[derive(Debug, Error)]
pub enum DecisionApiError {
    #[error("Failed to build request to the decision service: {0}")]
    BuildError(#[from] InvalidHeaderValue),
    #[error("Failed to send request to the decision service: {0}")]
    RequestError(#[from] reqwest::Error),
    #[error("Decision service request failed with status: {0}")]
    InvalidStatus(StatusCode),
    #[error("Failed to parse decision service response: {0}")]
    ParseError(#[from] serde_json::Error),
}

impl From<DecisionApiError> for ApiError {
    fn from(err: DecisionApiError) -> Self {
        match err {
            DecisionApiError::BuildError(_) => {
                ApiError::internal("Failed to build request to the decision service")
            }
            DecisionApiError::RequestError(_) => {
                ApiError::bad_gateway("Failed to send request to the decision service")
            }
            DecisionApiError::InvalidStatus(status) => ApiError::bad_gateway(format!(
                "Decision service request failed with status: {}",
                status
            )),
            DecisionApiError::ParseError(e) => ApiError::internal(format!(
                "Failed to parse decision service response: {}",
                e
            )),
        }
    }
}
