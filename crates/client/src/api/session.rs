//! Session lifecycle
//!
//! The handshake exchanges credentials for a session token; every other
//! operation requires a live session and fails the precondition otherwise.

use reqwest::Method;
use serde_json::json;
use tagstream_domain::{Credentials, Result, TagStreamError};
use tracing::info;

use super::client::TagStreamClient;

impl TagStreamClient {
    /// Authenticate and store the session token.
    pub async fn connect(&self, credentials: &Credentials) -> Result<()> {
        let body = json!({
            "data": {
                "type": "sessions",
                "attributes": {
                    "username": credentials.username,
                    "password": credentials.password,
                }
            }
        });

        let response = self.send(Method::POST, "/v2/sessions", &[], Some(&body), false).await?;
        let body = Self::expect_status(response, 201)?;

        let token = body
            .pointer("/data/attributes/token")
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| {
                TagStreamError::Internal("session response missing token attribute".into())
            })?;

        *self.session.write().await = Some(token.to_string());
        info!(username = %credentials.username, "session established");
        Ok(())
    }

    /// Drop the session. Subsequent operations fail the precondition until
    /// the next `connect`.
    pub async fn disconnect(&self) {
        *self.session.write().await = None;
        info!("session closed");
    }

    /// Whether a session token is currently held.
    pub async fn is_connected(&self) -> bool {
        self.session.read().await.is_some()
    }

    /// Fetch the session token or fail the precondition.
    pub(crate) async fn require_session(&self) -> Result<String> {
        self.session.read().await.clone().ok_or_else(|| {
            TagStreamError::Precondition("not connected; call connect() first".into())
        })
    }
}
