use confique::Config;

/// Request headers an upstream login layer uses to describe the end-user's
/// session. They are only read when `trust_headers` is enabled.
#[derive(Debug, Config, Clone)]
pub struct SessionConfig {
    /// Read authentication facts from the headers below (default: false)
    #[config(env = "GATEWAY_SESSION_TRUST_HEADERS", default = false)]
    pub trust_headers: bool,

    /// Header carrying the authenticated subject
    #[config(env = "GATEWAY_SESSION_SUBJECT_HEADER", default = "x-authenticated-subject")]
    pub subject_header: String,

    /// Header carrying the authentication time in seconds since the Unix epoch
    #[config(env = "GATEWAY_SESSION_AUTH_TIME_HEADER", default = "x-authenticated-at")]
    pub auth_time_header: String,

    /// Header carrying the ACR the end-user authenticated with
    #[config(env = "GATEWAY_SESSION_ACR_HEADER", default = "x-authenticated-acr")]
    pub acr_header: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            trust_headers: false,
            subject_header: "x-authenticated-subject".to_string(),
            auth_time_header: "x-authenticated-at".to_string(),
            acr_header: "x-authenticated-acr".to_string(),
        }
    }
}
