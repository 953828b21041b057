//! Channel domain types

use serde::{Deserialize, Serialize};

/// A server-side named container of tagged entities.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Channel {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

/// States of a clear-channel operation.
///
/// `Requested → (Completed | Pending → Polling → (Completed | Failed))`,
/// with `TimedOut` as the normal terminal state for callers that asked for a
/// non-blocking return on a 202. Once `Completed`, no further polling occurs
/// for that instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearState {
    Requested,
    Pending,
    Polling,
    Completed,
    TimedOut,
    Failed,
}

/// Terminal payload of a clear-channel operation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClearOutcome {
    /// `true` once the server reported the channel empty (or cleared it
    /// synchronously); `false` for a non-blocking return on a 202.
    pub clear_complete: bool,
    /// Deletion counters from the clear response when complete, or
    /// `{ "timeout": <ms> }` metadata for a non-blocking return.
    pub meta: serde_json::Value,
}
