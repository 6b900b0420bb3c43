pub(crate) use crate::config::decision_api::DecisionApiConfig;
pub(crate) use crate::config::session::SessionConfig;
use confique::Config;
use std::path::Path;

pub mod decision_api;
pub mod session;

/// Default location of the optional configuration file
pub const DEFAULT_CONFIG_FILE: &str = "gateway.toml";

/// Main configuration structure for the OIDC gateway
#[derive(Debug, Config, Clone)]
pub struct Settings {
    /// The port the gateway will listen to (default: 8000)
    #[config(env = "GATEWAY_PORT", default = 8000)]
    pub port: u16,

    /// Bearer key resource servers must present to the introspection
    /// endpoint. Introspection is unprotected when unset.
    #[config(env = "GATEWAY_API_KEY")]
    pub api_key: Option<String>,

    /// Ask the decision service for pretty-printed discovery and JWKS documents
    #[config(env = "GATEWAY_PRETTY", default = false)]
    pub pretty: bool,

    /// Max age in seconds clients may cache the discovery and JWKS documents
    /// (default: 3600)
    #[config(env = "GATEWAY_METADATA_MAX_AGE", default = 3600)]
    pub metadata_max_age: u32,

    /// JSON file with the end-user accounts served by the gateway. Without it
    /// nobody can log in and no claims are released.
    #[config(env = "GATEWAY_ACCOUNTS_FILE")]
    pub accounts_file: Option<String>,

    /// Remote decision service configuration
    #[config(nested)]
    pub decision_api: DecisionApiConfig,

    /// Trusted session header configuration
    #[config(nested)]
    pub session: SessionConfig,
}

impl Settings {
    /// Loads the configuration from environment variables, falling back to
    /// `path` (if it exists) and then to the built-in defaults
    pub fn load(path: Option<&Path>) -> Result<Self, confique::Error> {
        let builder = Settings::builder().env();
        match path {
            Some(path) => builder.file(path).load(),
            None => builder.load(),
        }
    }

    #[cfg(test)]
    pub fn for_test_with_mocks(api_mock: &wiremock::MockServer) -> Self {
        Self {
            port: 0, // Let the OS choose a port
            api_key: Some("test_api_key".to_string()),
            pretty: false,
            metadata_max_age: 60,
            accounts_file: None,
            decision_api: DecisionApiConfig {
                base_url: api_mock.uri(),
                service_api_key: "test_service_key".to_string(),
                service_api_secret: "test_service_secret".to_string(),
                query_timeout: 5,
                connect_timeout: 2,
            },
            session: SessionConfig {
                trust_headers: true,
                ..SessionConfig::default()
            },
        }
    }
}
