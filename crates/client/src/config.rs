//! Connection configuration loader
//!
//! Builds a [`ConnectionConfig`] from environment variables or a config
//! file. Certificate and key entries in files are paths; the loader reads
//! them into PEM bytes so the domain config never touches the filesystem.
//!
//! ## Environment Variables
//! - `TAGSTREAM_HOST`: Base URL of the server (required)
//! - `TAGSTREAM_TLS_VERIFY`: Verify server certificates (true/false, default true)
//! - `TAGSTREAM_PROXY_URL`: HTTP(S) proxy URL
//! - `TAGSTREAM_CLIENT_CERT`: Path to a client certificate (PEM)
//! - `TAGSTREAM_CLIENT_KEY`: Path to the client private key (PEM)
//! - `TAGSTREAM_KEY_PASSPHRASE`: Passphrase for an encrypted client key
//! - `TAGSTREAM_CA_BUNDLE`: Path to additional trusted roots (PEM bundle)
//!
//! ## File Locations
//! When no explicit path is given the loader probes `./tagstream.toml` and
//! `./config.toml` in the current working directory, then the same names
//! next to the executable.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tagstream_domain::{ConnectionConfig, Result, TagStreamError};

/// On-disk shape of a connection config file.
///
/// Differs from [`ConnectionConfig`] in that certificate material is
/// referenced by path rather than carried inline.
#[derive(Debug, Deserialize)]
struct ConnectionConfigFile {
    host: String,
    #[serde(default = "default_tls_verify")]
    tls_verify: bool,
    proxy_url: Option<String>,
    client_cert_path: Option<PathBuf>,
    client_key_path: Option<PathBuf>,
    key_passphrase: Option<String>,
    ca_bundle_path: Option<PathBuf>,
}

const fn default_tls_verify() -> bool {
    true
}

/// Load connection configuration with automatic fallback.
///
/// Tries environment variables first; if `TAGSTREAM_HOST` is unset, falls
/// back to probing for a config file.
///
/// # Errors
/// Returns `TagStreamError::Config` if neither source yields a usable
/// configuration or a referenced certificate file cannot be read.
pub fn load() -> Result<ConnectionConfig> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("connection config loaded from environment");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "environment config incomplete, trying file");
            load_from_file(None)
        }
    }
}

/// Load connection configuration from environment variables.
///
/// # Errors
/// Returns `TagStreamError::Config` if `TAGSTREAM_HOST` is unset or a
/// referenced certificate file cannot be read.
pub fn load_from_env() -> Result<ConnectionConfig> {
    let host = std::env::var("TAGSTREAM_HOST").map_err(|_| {
        TagStreamError::Config("Missing required environment variable: TAGSTREAM_HOST".to_string())
    })?;

    Ok(ConnectionConfig {
        host,
        tls_verify: env_bool("TAGSTREAM_TLS_VERIFY", true),
        proxy_url: std::env::var("TAGSTREAM_PROXY_URL").ok(),
        client_cert: read_pem_env("TAGSTREAM_CLIENT_CERT")?,
        client_key: read_pem_env("TAGSTREAM_CLIENT_KEY")?,
        key_passphrase: std::env::var("TAGSTREAM_KEY_PASSPHRASE").ok(),
        ca_bundle: read_pem_env("TAGSTREAM_CA_BUNDLE")?,
    })
}

/// Load connection configuration from a TOML file.
///
/// If `path` is `None`, probes the standard locations.
///
/// # Errors
/// Returns `TagStreamError::Config` if the file is missing or malformed, or
/// a referenced certificate file cannot be read.
pub fn load_from_file(path: Option<PathBuf>) -> Result<ConnectionConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(TagStreamError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            TagStreamError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "loading connection config from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| TagStreamError::Config(format!("Failed to read config file: {e}")))?;

    let file: ConnectionConfigFile = toml::from_str(&contents)
        .map_err(|e| TagStreamError::Config(format!("Invalid TOML format: {e}")))?;

    resolve(file)
}

/// Resolve certificate paths in a parsed file into PEM bytes.
fn resolve(file: ConnectionConfigFile) -> Result<ConnectionConfig> {
    Ok(ConnectionConfig {
        host: file.host,
        tls_verify: file.tls_verify,
        proxy_url: file.proxy_url,
        client_cert: file.client_cert_path.as_deref().map(read_pem).transpose()?,
        client_key: file.client_key_path.as_deref().map(read_pem).transpose()?,
        key_passphrase: file.key_passphrase,
        ca_bundle: file.ca_bundle_path.as_deref().map(read_pem).transpose()?,
    })
}

/// Probe the standard locations for a config file.
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        candidates.push(cwd.join("tagstream.toml"));
        candidates.push(cwd.join("config.toml"));
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.push(exe_dir.join("tagstream.toml"));
            candidates.push(exe_dir.join("config.toml"));
        }
    }

    candidates.into_iter().find(|path| path.exists())
}

fn read_pem(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|e| {
        TagStreamError::Config(format!("Failed to read PEM file {}: {e}", path.display()))
    })
}

fn read_pem_env(key: &str) -> Result<Option<Vec<u8>>> {
    std::env::var(key).ok().map(|p| read_pem(Path::new(&p))).transpose()
}

/// Parse boolean from environment variable.
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}
