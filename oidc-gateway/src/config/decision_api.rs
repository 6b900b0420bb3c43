use confique::Config;

/// Connection settings for the remote authorization decision service
#[derive(Debug, Config, Clone)]
pub struct DecisionApiConfig {
    /// Base URL of the decision service (default: http://localhost:8180)
    #[config(env = "GATEWAY_DECISION_API_BASE_URL", default = "http://localhost:8180")]
    pub base_url: String,

    /// API key of the service registered at the decision service
    #[config(env = "GATEWAY_DECISION_API_SERVICE_API_KEY", default = "")]
    pub service_api_key: String,

    /// API secret of the service registered at the decision service
    #[config(env = "GATEWAY_DECISION_API_SERVICE_API_SECRET", default = "")]
    pub service_api_secret: String,

    /// The timeout for decision service queries in seconds (default: 5)
    #[config(env = "GATEWAY_DECISION_API_QUERY_TIMEOUT", default = 5)]
    pub query_timeout: u64,

    /// The timeout for establishing connections in seconds (default: 2)
    #[config(env = "GATEWAY_DECISION_API_CONNECT_TIMEOUT", default = 2)]
    pub connect_timeout: u64,
}

impl DecisionApiConfig {
    /// Returns a URL to the decision service with the given path
    pub fn get_url<S: Into<String>>(&self, path: S) -> String {
        let path = path.into();
        let base = self.base_url.trim_end_matches('/');
        if path.starts_with('/') {
            format!("{base}{path}")
        } else {
            format!("{base}/{path}")
        }
    }

    /// Whether both halves of the service credentials are set
    pub fn has_credentials(&self) -> bool {
        !self.service_api_key.is_empty() && !self.service_api_secret.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(base_url: &str) -> DecisionApiConfig {
        DecisionApiConfig {
            base_url: base_url.to_string(),
            service_api_key: String::new(),
            service_api_secret: String::new(),
            query_timeout: 5,
            connect_timeout: 2,
        }
    }

    #[test]
    fn test_get_url() {
        let config = config("https://decisions.example.com/");
        assert_eq!(
            config.get_url("/api/auth/token"),
            "https://decisions.example.com/api/auth/token"
        );
        assert_eq!(
            config.get_url("api/auth/token"),
            "https://decisions.example.com/api/auth/token"
        );
    }

    #[test]
    fn test_has_credentials() {
        let mut config = config("http://localhost:8180");
        assert!(!config.has_credentials());
        config.service_api_key = "1234".to_string();
        assert!(!config.has_credentials());
        config.service_api_secret = "secret".to_string();
        assert!(config.has_credentials());
    }
}
