//! Authenticated API request pipeline
//!
//! Builds outbound requests from symbolic endpoint keys, attaches the stored
//! bearer token when one exists, enforces the configured timeout, and
//! normalizes every outcome into [`ApiError`]. Centralizing this here means
//! every domain service gets the same failure contract for free.

use std::sync::Arc;

use fieldtrace_domain::{ApiConfig, Endpoint};
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument, warn};
use url::Url;

use super::errors::ApiError;
use super::token::TokenProvider;
use crate::http::HttpClient;

/// HTTP pipeline shared by all domain services.
pub struct ApiClient {
    http: HttpClient,
    config: ApiConfig,
    tokens: Arc<dyn TokenProvider>,
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Config`] when the base URL does not parse or the
    /// underlying HTTP client cannot be constructed.
    pub fn new(config: ApiConfig, tokens: Arc<dyn TokenProvider>) -> Result<Self, ApiError> {
        Url::parse(&config.base_url)
            .map_err(|err| ApiError::Config(format!("Invalid base URL: {}", err)))?;

        let http = HttpClient::builder().timeout(config.timeout()).build()?;

        Ok(Self { http, config, tokens })
    }

    /// Execute a GET request against a symbolic endpoint.
    ///
    /// Query pairs, when given, are URL-encoded onto the resolved URL.
    #[instrument(skip(self, query), fields(endpoint = ?endpoint))]
    pub async fn get<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let mut request = self.request(Method::GET, endpoint).await;
        if !query.is_empty() {
            request = request.query(query);
        }

        let response = self.http.send(request).await?;
        Self::decode(response).await
    }

    /// Execute a POST request with a JSON body against a symbolic endpoint.
    #[instrument(skip(self, body), fields(endpoint = ?endpoint))]
    pub async fn post<T, R>(&self, endpoint: Endpoint, body: &T) -> Result<R, ApiError>
    where
        T: Serialize + Sync,
        R: DeserializeOwned,
    {
        let request = self.request(Method::POST, endpoint).await.json(body);

        let response = self.http.send(request).await?;
        Self::decode(response).await
    }

    fn url_for(&self, endpoint: Endpoint) -> String {
        let path = self.config.endpoints.path(endpoint);
        let base = self.config.base_url.trim_end_matches('/');
        if path.starts_with('/') {
            format!("{}{}", base, path)
        } else {
            format!("{}/{}", base, path)
        }
    }

    async fn request(&self, method: Method, endpoint: Endpoint) -> RequestBuilder {
        let url = self.url_for(endpoint);
        debug!(%method, %url, "building API request");

        let mut request = self
            .http
            .request(method, url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json");

        // Auth-header attachment is best-effort: a failed token lookup must
        // not fail the whole request.
        match self.tokens.token().await {
            Ok(Some(token)) => {
                request = request.header(AUTHORIZATION, format!("Bearer {}", token));
            }
            Ok(None) => {}
            Err(err) => {
                warn!(error = %err, "token lookup failed, sending without Authorization header");
            }
        }

        request
    }

    async fn decode<R: DeserializeOwned>(response: Response) -> Result<R, ApiError> {
        let status = response.status();
        let body = response.text().await.map_err(|err| ApiError::Network(err.to_string()))?;

        if !status.is_success() {
            return Err(ApiError::Http {
                status: status.as_u16(),
                message: Self::error_message(status, &body),
            });
        }

        serde_json::from_str(&body).map_err(|err| ApiError::MalformedResponse(err.to_string()))
    }

    /// Message for a non-success status: the body's `message`/`error` field
    /// when the body parses as JSON, else a generic status line.
    fn error_message(status: StatusCode, body: &str) -> String {
        serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|value| {
                value
                    .get("message")
                    .or_else(|| value.get("error"))
                    .and_then(Value::as_str)
                    .map(String::from)
            })
            .unwrap_or_else(|| format!("HTTP error, status={}", status.as_u16()))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use async_trait::async_trait;
    use fieldtrace_domain::LoginEnvelope;
    use serde::Deserialize;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::storage::StorageError;

    struct FixedTokenProvider(Option<String>);

    #[async_trait]
    impl TokenProvider for FixedTokenProvider {
        async fn token(&self) -> Result<Option<String>, StorageError> {
            Ok(self.0.clone())
        }
    }

    struct FailingTokenProvider;

    #[async_trait]
    impl TokenProvider for FailingTokenProvider {
        async fn token(&self) -> Result<Option<String>, StorageError> {
            Err(StorageError::Io("disk on fire".into()))
        }
    }

    fn client_for(server: &MockServer, tokens: Arc<dyn TokenProvider>) -> ApiClient {
        ApiClient::new(ApiConfig::new(server.uri()), tokens).expect("api client")
    }

    #[derive(Debug, Deserialize)]
    struct Pong {
        success: bool,
    }

    #[tokio::test]
    async fn post_sends_json_headers_and_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/save-location"))
            .and(header("Content-Type", "application/json"))
            .and(header("Accept", "application/json"))
            .and(header("Authorization", "Bearer tok_1"))
            .and(body_json(serde_json::json!({ "ping": true })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, Arc::new(FixedTokenProvider(Some("tok_1".into()))));
        let pong: Pong = client
            .post(Endpoint::SaveLocation, &serde_json::json!({ "ping": true }))
            .await
            .unwrap();
        assert!(pong.success);
    }

    #[tokio::test]
    async fn request_without_stored_token_omits_authorization() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true, "token": "t"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, Arc::new(FixedTokenProvider(None)));
        let envelope: LoginEnvelope =
            client.post(Endpoint::Login, &serde_json::json!({})).await.unwrap();
        assert!(envelope.success);

        let requests = server.received_requests().await.unwrap();
        assert!(requests[0].headers.get("Authorization").is_none());
    }

    #[tokio::test]
    async fn failed_token_lookup_still_sends_the_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, Arc::new(FailingTokenProvider));
        let result: Result<Pong, _> = client.post(Endpoint::Login, &serde_json::json!({})).await;
        assert!(result.is_ok());

        let requests = server.received_requests().await.unwrap();
        assert!(requests[0].headers.get("Authorization").is_none());
    }

    #[tokio::test]
    async fn get_appends_url_encoded_query_params() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/login"))
            .and(query_param("device", "dev 1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, Arc::new(FixedTokenProvider(None)));
        let pong: Pong = client.get(Endpoint::Login, &[("device", "dev 1")]).await.unwrap();
        assert!(pong.success);
    }

    #[tokio::test]
    async fn non_success_status_uses_body_message_field() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/login"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "success": false, "message": "bad credentials"
            })))
            .mount(&server)
            .await;

        let client = client_for(&server, Arc::new(FixedTokenProvider(None)));
        let err = client
            .post::<_, Pong>(Endpoint::Login, &serde_json::json!({}))
            .await
            .unwrap_err();

        match err {
            ApiError::Http { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "bad credentials");
            }
            other => panic!("expected Http error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn non_success_status_falls_back_to_error_field_then_generic() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/login"))
            .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
                "error": "database down"
            })))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/login"))
            .respond_with(ResponseTemplate::new(500).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let client = client_for(&server, Arc::new(FixedTokenProvider(None)));

        let err = client
            .post::<_, Pong>(Endpoint::Login, &serde_json::json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Http { message, .. } if message == "database down"));

        let err = client
            .post::<_, Pong>(Endpoint::Login, &serde_json::json!({}))
            .await
            .unwrap_err();
        assert!(
            matches!(err, ApiError::Http { message, .. } if message == "HTTP error, status=500")
        );
    }

    #[tokio::test]
    async fn success_status_with_unparseable_body_is_malformed_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/login"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = client_for(&server, Arc::new(FixedTokenProvider(None)));
        let err = client
            .post::<_, Pong>(Endpoint::Login, &serde_json::json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn request_past_the_bound_resolves_to_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/login"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "success": true }))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let config = ApiConfig { timeout_ms: 50, ..ApiConfig::new(server.uri()) };
        let client = ApiClient::new(config, Arc::new(FixedTokenProvider(None))).unwrap();

        let err = client
            .post::<_, Pong>(Endpoint::Login, &serde_json::json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Timeout(_)));
    }

    #[tokio::test]
    async fn unreachable_server_is_a_network_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let config = ApiConfig::new(format!("http://{}", addr));
        let client = ApiClient::new(config, Arc::new(FixedTokenProvider(None))).unwrap();

        let err = client
            .post::<_, Pong>(Endpoint::Login, &serde_json::json!({}))
            .await
            .unwrap_err();
        assert!(err.is_transport_failure());
    }

    #[tokio::test]
    async fn rejects_invalid_base_url_at_construction() {
        let result = ApiClient::new(
            ApiConfig::new("not a url"),
            Arc::new(FixedTokenProvider(None)) as Arc<dyn TokenProvider>,
        );
        assert!(matches!(result, Err(ApiError::Config(_))));
    }
}
