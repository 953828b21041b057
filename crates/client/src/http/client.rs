use std::time::Duration;

use reqwest::{Certificate, Client as ReqwestClient, Identity, Method, Proxy, RequestBuilder, Response};
use tagstream_domain::{ConnectionConfig, Result, TagStreamError};
use tracing::debug;

/// HTTP client with built-in retry and timeout support.
#[derive(Clone)]
pub struct HttpClient {
    client: ReqwestClient,
    max_attempts: usize,
    base_backoff: Duration,
}

impl HttpClient {
    /// Start building a new HTTP client.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Convenience constructor with default configuration.
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    /// Create a request builder using the underlying reqwest client.
    pub fn request<U>(&self, method: Method, url: U) -> RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        self.client.request(method, url)
    }

    /// Execute the provided request builder with retry semantics.
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response> {
        let attempts = self.max_attempts.max(1);

        for attempt in 0..attempts {
            let cloned_builder = builder.try_clone().ok_or_else(|| {
                TagStreamError::Internal(
                    "request body cannot be cloned; buffer the body to enable retries".into(),
                )
            })?;

            let request = cloned_builder
                .build()
                .map_err(|err| TagStreamError::Network(format!("invalid request: {err}")))?;

            let method = request.method().clone();
            let url = request.url().clone();
            debug!(attempt = attempt + 1, %method, %url, "sending HTTP request");

            match self.client.execute(request).await {
                Ok(response) => {
                    let status = response.status();
                    debug!(attempt = attempt + 1, %method, %url, %status, "received HTTP response");

                    if status.is_server_error() && attempt + 1 < attempts {
                        self.sleep_with_backoff(attempt + 1).await;
                        continue;
                    }

                    return Ok(response);
                }
                Err(err) => {
                    debug!(attempt = attempt + 1, %method, %url, error = %err, "HTTP request failed");

                    if attempt + 1 < attempts && should_retry_error(&err) {
                        self.sleep_with_backoff(attempt + 1).await;
                        continue;
                    }

                    return Err(TagStreamError::Network(format!("http request failed: {err}")));
                }
            }
        }

        Err(TagStreamError::Internal(
            "http client exhausted retries without producing a result".into(),
        ))
    }

    fn backoff_delay(&self, retry_number: usize) -> Duration {
        let shift = retry_number.saturating_sub(1).min(8) as u32;
        let multiplier = 1u32 << shift;
        self.base_backoff.saturating_mul(multiplier)
    }

    async fn sleep_with_backoff(&self, retry_number: usize) {
        let delay = self.backoff_delay(retry_number);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

/// Builder for [`HttpClient`].
#[derive(Debug, Default)]
pub struct HttpClientBuilder {
    timeout: Option<Duration>,
    max_attempts: Option<usize>,
    base_backoff: Option<Duration>,
    user_agent: Option<String>,
    connection: Option<ConnectionConfig>,
}

impl HttpClientBuilder {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Configure the total number of attempts (initial try + retries).
    pub fn max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = Some(attempts.max(1));
        self
    }

    pub fn base_backoff(mut self, backoff: Duration) -> Self {
        self.base_backoff = Some(backoff);
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Apply the TLS/proxy surface of a [`ConnectionConfig`].
    pub fn connection(mut self, config: &ConnectionConfig) -> Self {
        self.connection = Some(config.clone());
        self
    }

    pub fn build(self) -> Result<HttpClient> {
        let mut builder = ReqwestClient::builder()
            .timeout(self.timeout.unwrap_or(Duration::from_secs(30)))
            .no_proxy();

        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }

        if let Some(connection) = &self.connection {
            builder = apply_connection(builder, connection)?;
        }

        let client = builder
            .build()
            .map_err(|err| TagStreamError::Config(format!("failed to build http client: {err}")))?;

        Ok(HttpClient {
            client,
            max_attempts: self.max_attempts.unwrap_or(3).max(1),
            base_backoff: self.base_backoff.unwrap_or(Duration::from_millis(200)),
        })
    }
}

fn apply_connection(
    mut builder: reqwest::ClientBuilder,
    config: &ConnectionConfig,
) -> Result<reqwest::ClientBuilder> {
    if !config.tls_verify {
        builder = builder.danger_accept_invalid_certs(true);
    }

    if let Some(proxy_url) = &config.proxy_url {
        let proxy = Proxy::all(proxy_url)
            .map_err(|err| TagStreamError::Config(format!("invalid proxy url: {err}")))?;
        builder = builder.proxy(proxy);
    }

    if let Some(ca_bundle) = &config.ca_bundle {
        let certificate = Certificate::from_pem(ca_bundle)
            .map_err(|err| TagStreamError::Config(format!("invalid CA bundle: {err}")))?;
        builder = builder.add_root_certificate(certificate);
    }

    match (&config.client_cert, &config.client_key) {
        (Some(cert), Some(key)) => {
            // rustls cannot decrypt passphrase-protected keys; fail here
            // instead of with an opaque handshake error
            if config.key_passphrase.is_some() {
                return Err(TagStreamError::Config(
                    "encrypted client keys are not supported; decrypt the key first".into(),
                ));
            }
            let mut pem = cert.clone();
            pem.push(b'\n');
            pem.extend_from_slice(key);
            let identity = Identity::from_pem(&pem)
                .map_err(|err| TagStreamError::Config(format!("invalid client identity: {err}")))?;
            builder = builder.identity(identity);
        }
        (None, None) => {}
        _ => {
            return Err(TagStreamError::Config(
                "client_cert and client_key must be provided together".into(),
            ));
        }
    }

    Ok(builder)
}

fn should_retry_error(err: &reqwest::Error) -> bool {
    err.is_timeout() || err.is_request() || err.is_connect()
}
