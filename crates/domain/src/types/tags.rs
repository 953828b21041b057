//! Tag upload domain types
//!
//! A bulk upload turns a sparse matrix of rows (entity followed by its tags)
//! into ordered, size-capped batches of tag-entity pairs. These types carry
//! the validated pairs and the accounting of what was accepted, submitted,
//! and rejected.

use serde::{Deserialize, Serialize};

use super::ApiResponse;

/// Classification of a tagged entity, derived from its value and never
/// supplied directly.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    /// IPv4/IPv6 address, CIDR block, or address range.
    Ip,
    /// Anything else (domain, hash, free-form string, ...).
    String,
}

/// One (entity, tag, channel-set) assertion to be uploaded.
///
/// Constructed transiently per validated cell, consumed by exactly one
/// upload call, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TagEntityPair {
    pub entity: String,
    pub tag: String,
    pub entity_type: EntityType,
    pub channel_ids: Vec<i64>,
}

/// An ordered group of tag-entity pairs submitted in one upload call.
///
/// Batches preserve the row/column traversal order of the input so partial
/// failures can be correlated back to input position. The builder never
/// emits an empty batch or one above `MAX_TAG_ENTITIES_PER_REQUEST`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TagUploadBatch {
    pub pairs: Vec<TagEntityPair>,
}

impl TagUploadBatch {
    pub fn new(pairs: Vec<TagEntityPair>) -> Self {
        Self { pairs }
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// A cell dropped by validation under the default (non-stop) policy.
///
/// `column` 0 is the entity; columns 1.. are the row's tags.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RejectedCell {
    pub row: usize,
    pub column: usize,
    pub value: String,
    pub reason: String,
}

/// Outcome of a bulk tag upload.
///
/// `last_response` retains only the final submitted batch's response, the
/// literal run-to-completion behavior of the API; the aggregate counters and
/// the rejected-cell list exist so callers can account for the whole run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BulkUploadResult {
    /// Response of the last successfully submitted batch; `None` when no
    /// batch was ever sent (empty valid input).
    pub last_response: Option<ApiResponse>,
    /// Number of batches submitted to the server.
    pub batches_submitted: usize,
    /// Total pairs across all submitted batches.
    pub pairs_uploaded: usize,
    /// Cells skipped by validation under the default policy.
    pub rejected: Vec<RejectedCell>,
}
