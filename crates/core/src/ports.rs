//! Port interfaces implemented by the transport layer

use async_trait::async_trait;
use tagstream_domain::{ApiResponse, Result, TagUploadBatch};

/// Trait for submitting one tag-entity-pair batch to the server.
///
/// Implementations surface non-created statuses as errors; the uploader only
/// ever sees a response for an accepted batch.
#[async_trait]
pub trait TagUploadSink: Send + Sync {
    /// Upload a single batch. Success means the server returned 201.
    async fn upload_batch(&self, batch: &TagUploadBatch) -> Result<ApiResponse>;
}

/// Trait for the idempotent channel-empty check used while polling a clear.
#[async_trait]
pub trait ChannelEmptyProbe: Send + Sync {
    /// Whether the channel currently holds zero searchable entities.
    async fn is_empty(&self, channel_id: i64) -> Result<bool>;
}
