//! Domain data types

pub mod channel;
pub mod tags;

pub use channel::*;
pub use tags::*;

use serde::{Deserialize, Serialize};

/// Status and parsed body of a single server response.
///
/// The client surfaces these for calls whose status code carries meaning
/// beyond success/failure (e.g. 200 vs 202 on a channel clear).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: serde_json::Value,
}
