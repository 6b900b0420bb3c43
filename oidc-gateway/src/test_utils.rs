use crate::config::Settings;
use crate::create_app;
use crate::spi::StaticAccounts;
use crate::state::AppState;
use axum::body::Body;
use axum::Router;
use http::{HeaderMap, Method, Request, StatusCode};
use http_body_util::BodyExt;
use log::LevelFilter;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;
use wiremock::matchers;
use wiremock::Mock;
use wiremock::MockServer;
use wiremock::ResponseTemplate;

/// Accounts served by the fixture. Both passwords equal the username.
pub(crate) const TEST_ACCOUNTS_JSON: &str = r#"{
    "accounts": [
        {
            "subject": "1001",
            "username": "john",
            "password_sha256": "96d9632f363564cc3032521409cf22a852f2032eec099ed5967c0d000cec607a",
            "claims": {
                "name": "John Smith",
                "name#ja": "ジョン・スミス",
                "email": "john@example.com",
                "email_verified": true
            }
        },
        {
            "subject": "1002",
            "username": "jane",
            "password_sha256": "81f8f6dde88365f3928796ec7aa53f72820b06db8664f5fe76a7eb13e24546a2"
        }
    ]
}"#;

/// Test fixture for setting up a complete test environment with a mocked
/// decision service.
///
/// # Examples
///
/// ```rust
/// #[tokio::test]
/// async fn test_endpoint() {
///     let fixture = TestFixture::new().await;
///
///     fixture
///         .add_api_mock(
///             Method::POST,
///             "/api/auth/token",
///             json!({"action": "OK", "responseContent": "{}"}),
///             StatusCode::OK,
///             1,
///         )
///         .await;
///
///     let response = fixture.post_form("/api/token", "grant_type=client_credentials").await;
///     response.assert_ok();
/// }
/// ```
pub struct TestFixture {
    /// The application router
    pub app: Router,
    /// Configuration settings
    pub settings: Settings,
    /// Mock server for the decision service
    pub api_mock: MockServer,
}

impl TestFixture {
    /// Creates a new test fixture backed by [`TEST_ACCOUNTS_JSON`], with
    /// session header trust enabled.
    pub async fn new() -> Self {
        Self::setup_logger(LevelFilter::Debug);

        let api_mock = MockServer::start().await;
        let settings = Settings::for_test_with_mocks(&api_mock);

        let accounts =
            StaticAccounts::from_json(TEST_ACCOUNTS_JSON).expect("Failed to load test accounts");
        let state = AppState::for_testing(&settings, Arc::new(accounts));
        let app = create_app(state).await;

        Self {
            app,
            settings,
            api_mock,
        }
    }

    /// Initializes the test logger with the given level.
    ///
    /// Called by `TestFixture::new()`; only the first call in a test binary wins.
    pub fn setup_logger(level: LevelFilter) {
        let _ = env_logger::builder()
            .filter_level(level)
            .is_test(true)
            .try_init();
    }

    /// Sends a GET request to the specified URI.
    pub async fn get(&self, uri: impl AsRef<str>) -> TestResponse {
        self.get_with_headers(uri, &[]).await
    }

    /// Sends a GET request with custom headers.
    ///
    /// ```rust
    /// let response = fixture
    ///     .get_with_headers("/api/userinfo", &[("Authorization", "Bearer at")])
    ///     .await;
    /// ```
    pub async fn get_with_headers(
        &self,
        uri: impl AsRef<str>,
        headers: &[(&str, &str)],
    ) -> TestResponse {
        let mut builder = Request::builder().method(Method::GET).uri(uri.as_ref());
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }

        let request = builder
            .body(Body::empty())
            .expect("Failed to build request");

        self.send(request).await
    }

    /// Sends a POST request with a form-encoded body.
    pub async fn post_form(&self, uri: impl AsRef<str>, body: &str) -> TestResponse {
        self.post_form_with_headers(uri, body, &[]).await
    }

    /// Sends a POST request with a form-encoded body and custom headers.
    ///
    /// ```rust
    /// let response = fixture
    ///     .post_form_with_headers(
    ///         "/api/introspection",
    ///         "token=abc",
    ///         &[("Authorization", "Bearer test_api_key")],
    ///     )
    ///     .await;
    /// ```
    pub async fn post_form_with_headers(
        &self,
        uri: impl AsRef<str>,
        body: &str,
        headers: &[(&str, &str)],
    ) -> TestResponse {
        let mut builder = Request::builder()
            .method(Method::POST)
            .uri(uri.as_ref())
            .header("Content-Type", "application/x-www-form-urlencoded");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }

        let request = builder
            .body(Body::from(body.to_string()))
            .expect("Failed to build request");

        self.send(request).await
    }

    /// Sends a request and returns a TestResponse.
    ///
    /// Lower-level than `get()` and `post_form()`; use it when the request
    /// needs full control over method, headers and body.
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read response body")
            .to_bytes();
        let body = String::from_utf8_lossy(&bytes).into_owned();

        // Try to parse as JSON, defaulting to empty object if parsing fails or empty body
        let json = if !bytes.is_empty() {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| serde_json::json!({}))
        } else {
            serde_json::json!({})
        };

        TestResponse {
            status,
            headers,
            body,
            json,
        }
    }

    /// Adds a mock decision service route with the given method, path, and response.
    ///
    /// # Parameters
    ///
    /// - `method`: The HTTP method (e.g., Method::POST)
    /// - `path`: The API path to mock (e.g., "/api/auth/token")
    /// - `response_body`: The JSON response body to return
    /// - `status_code`: HTTP status code for the response
    /// - `expected_calls`: Number of expected calls to this mock
    pub async fn add_api_mock(
        &self,
        method: Method,
        path: impl Into<String>,
        response_body: impl Serialize,
        status_code: StatusCode,
        expected_calls: u64,
    ) {
        Mock::given(matchers::method(method.as_str()))
            .and(matchers::path(path.into()))
            .respond_with(ResponseTemplate::new(status_code.as_u16()).set_body_json(response_body))
            .expect(expected_calls)
            .mount(&self.api_mock)
            .await;
    }
}

/// Response from a test request that provides convenient access to status,
/// headers and body.
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Raw response body
    pub body: String,
    /// Response body as JSON (empty object if absent or not JSON)
    pub json: Value,
}

impl TestResponse {
    /// Asserts that the response has the expected status code.
    ///
    /// # Panics
    ///
    /// Panics if the status code doesn't match the expected value.
    pub fn assert_status(&self, expected: StatusCode) -> &Self {
        assert_eq!(
            self.status, expected,
            "Expected status {} but got {} with body: {}",
            expected, self.status, self.body
        );
        self
    }

    /// Asserts that the response status is OK (200).
    pub fn assert_ok(&self) -> &Self {
        self.assert_status(StatusCode::OK)
    }

    /// Asserts that header `name` is present with exactly `expected` as value.
    pub fn assert_header(&self, name: &str, expected: &str) -> &Self {
        let actual = self
            .headers
            .get(name)
            .unwrap_or_else(|| panic!("Missing header {name}"));
        assert_eq!(actual, expected, "Unexpected value for header {name}");
        self
    }

    /// Converts the JSON response body to the specified type.
    ///
    /// # Panics
    ///
    /// Panics if the body cannot be deserialized into `T`.
    pub fn json_as<T: DeserializeOwned>(&self) -> T {
        serde_json::from_value(self.json.clone()).expect("Failed to deserialize response body")
    }
}
