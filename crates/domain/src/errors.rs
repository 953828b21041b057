//! Error types used throughout the client

use thiserror::Error;

/// Main error type for TagStream operations
#[derive(Error, Debug)]
pub enum TagStreamError {
    /// Operation invoked while not authenticated/connected. Never retried.
    #[error("Precondition failed: {0}")]
    Precondition(String),

    /// A tag or entity value failed its length bounds.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Network-level failure reaching the server.
    #[error("Network error: {0}")]
    Network(String),

    /// Non-success status from the server, with the raw body attached.
    #[error("API error (HTTP {status}): {body}")]
    Api { status: u16, body: String },

    /// A batch upload failed after earlier batches already succeeded.
    /// Earlier batches are not rolled back; the caller must reconcile.
    #[error(
        "Partial upload: {batches_submitted} batch(es) already submitted, \
         failing batch held {pairs_in_failed_batch} pair(s): {source}"
    )]
    PartialUpload {
        batches_submitted: usize,
        pairs_in_failed_batch: usize,
        #[source]
        source: Box<TagStreamError>,
    },

    /// The channel-empty check failed while a clear was being polled. Carries
    /// the status and body of the original clear response for context.
    #[error("Channel clear status check failed (clear accepted with HTTP {status}): {source}")]
    ClearPoll {
        status: u16,
        body: String,
        #[source]
        source: Box<TagStreamError>,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for TagStream operations
pub type Result<T> = std::result::Result<T, TagStreamError>;
