//! JSON:API client facade
//!
//! Owns the transport, the base URL, and the authenticated session. The
//! endpoint modules build on the typed `send`/`expect_status` helpers here;
//! they never touch reqwest directly.

use std::time::Duration;

use reqwest::Method;
use serde_json::Value;
use tagstream_domain::{ApiResponse, ConnectionConfig, Result, TagStreamError};
use tokio::sync::RwLock;
use tracing::debug;

use crate::http::HttpClient;

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const USER_AGENT: &str = concat!("tagstream-client/", env!("CARGO_PKG_VERSION"));

/// Client for one TagStream server.
///
/// The session is single-writer: one connect/disconnect lifecycle per
/// instance, and operations assume a stable, already-authenticated session.
pub struct TagStreamClient {
    http: HttpClient,
    base_url: String,
    pub(crate) session: RwLock<Option<String>>,
}

impl TagStreamClient {
    /// Build a client from explicit connection options.
    pub fn new(config: &ConnectionConfig) -> Result<Self> {
        if config.host.is_empty() {
            return Err(TagStreamError::Config("host must not be empty".into()));
        }

        // single attempt: tag uploads are not idempotent, and a silently
        // re-sent batch double-tags entities server-side
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .max_attempts(1)
            .user_agent(USER_AGENT)
            .connection(config)
            .build()?;

        Ok(Self {
            http,
            base_url: config.host.trim_end_matches('/').to_string(),
            session: RwLock::new(None),
        })
    }

    /// Base URL the client was configured with.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send one request and return its status plus parsed JSON body.
    ///
    /// Transport failures surface as `Network`; status codes are returned
    /// verbatim because several endpoints assign meaning beyond success
    /// (200 vs 202 on clear). An empty body parses to `Value::Null`.
    pub(crate) async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
        authenticated: bool,
    ) -> Result<ApiResponse> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self
            .http
            .request(method, &url)
            .header("Content-Type", "application/json");

        if authenticated {
            let token = self.require_session().await?;
            request = request.header("Authorization", format!("Token {token}"));
        }
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = self.http.send(request).await?;
        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|err| TagStreamError::Network(format!("failed to read response body: {err}")))?;

        let body = if text.is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(Value::String(text))
        };

        debug!(path, status, "API response");
        Ok(ApiResponse { status, body })
    }

    /// Require an exact status; anything else becomes an `Api` error with
    /// the raw body attached.
    pub(crate) fn expect_status(response: ApiResponse, expected: u16) -> Result<Value> {
        if response.status == expected {
            Ok(response.body)
        } else {
            Err(TagStreamError::Api { status: response.status, body: response.body.to_string() })
        }
    }

    /// Unwrap the JSON:API `data` member of a response body.
    pub(crate) fn data(body: Value) -> Result<Value> {
        match body {
            Value::Object(mut map) => map
                .remove("data")
                .ok_or_else(|| TagStreamError::Internal("response missing data member".into())),
            other => Err(TagStreamError::Internal(format!(
                "expected a JSON:API document, got: {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use tagstream_domain::ConnectionConfig;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::api::test_support::connected_client;

    #[test]
    fn rejects_empty_host() {
        let result = TagStreamClient::new(&ConnectionConfig::default());
        assert!(matches!(result, Err(TagStreamError::Config(_))));
    }

    #[tokio::test]
    async fn attaches_session_token_to_authenticated_requests() {
        let server = MockServer::start().await;
        let client = connected_client(&server).await;

        Mock::given(method("GET"))
            .and(path("/v2/users"))
            .and(header("Authorization", "Token test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": []
            })))
            .expect(1)
            .mount(&server)
            .await;

        let users = client.get_users().await.unwrap();
        assert!(users.is_empty());
    }

    #[tokio::test]
    async fn non_json_body_is_preserved_as_string() {
        let server = MockServer::start().await;
        let client = TagStreamClient::new(&ConnectionConfig::new(server.uri())).unwrap();

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500).set_body_string("gateway exploded"))
            .mount(&server)
            .await;

        let response = client.send(Method::GET, "/boom", &[], None, false).await.unwrap();
        assert_eq!(response.status, 500);
        assert_eq!(response.body, Value::String("gateway exploded".to_string()));
    }
}
