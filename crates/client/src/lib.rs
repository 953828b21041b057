//! # TagStream Client
//!
//! Infrastructure implementations of the core ports.
//!
//! This crate contains:
//! - The retrying reqwest-based HTTP transport
//! - Session lifecycle and per-endpoint request plumbing
//! - Configuration loading
//!
//! ## Architecture
//! - Implements traits defined in `tagstream-core`
//! - Depends on `tagstream-domain` and `tagstream-core`
//! - Contains all "impure" code (network I/O)

pub mod api;
pub mod config;
pub mod http;

// Re-export commonly used items
pub use api::TagStreamClient;
pub use http::HttpClient;
pub use tagstream_domain::{
    BulkUploadResult, ClearOutcome, ConnectionConfig, Credentials, Result, TagStreamError,
    UploadOptions,
};
