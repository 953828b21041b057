//! Connection and operation configuration structures
//!
//! The connection surface is an explicit enumeration of the recognized
//! options; there is no pass-through of arbitrary transport settings.

use serde::{Deserialize, Serialize};

/// Connection options for a TagStream client instance.
///
/// Certificate and key material is carried as raw PEM bytes; loading from
/// files is the config loader's job, not the domain's.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// Base URL of the server, e.g. `https://tagstream.example.com`.
    pub host: String,
    /// Verify the server TLS certificate. Disable only for lab instances.
    pub tls_verify: bool,
    /// Optional HTTP(S) proxy URL.
    pub proxy_url: Option<String>,
    /// Client certificate (PEM) for mutual TLS.
    pub client_cert: Option<Vec<u8>>,
    /// Client private key (PEM) for mutual TLS.
    pub client_key: Option<Vec<u8>>,
    /// Passphrase for an encrypted client key. Not supported by the rustls
    /// backend; supplying one fails client construction.
    pub key_passphrase: Option<String>,
    /// Additional trusted root certificates (PEM bundle).
    pub ca_bundle: Option<Vec<u8>>,
}

impl ConnectionConfig {
    /// Minimal config for a host with default TLS verification.
    pub fn new(host: impl Into<String>) -> Self {
        Self { host: host.into(), ..Self::default() }
    }
}

/// Manual so that `tls_verify` defaults to `true`; disabling certificate
/// verification must always be an explicit opt-in, including through
/// struct-update syntax.
impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            tls_verify: true,
            proxy_url: None,
            client_cert: None,
            client_key: None,
            key_passphrase: None,
            ca_bundle: None,
        }
    }
}

/// Credentials for the session handshake.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Options controlling a bulk tag upload.
#[derive(Debug, Clone, Copy, Default)]
pub struct UploadOptions {
    /// Abort the whole operation on the first invalid entity or tag instead
    /// of skipping it. Already-submitted batches are never undone.
    pub stop_on_invalid_data: bool,
}
