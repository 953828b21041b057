//! # TagStream Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Entity/tag validation and IP classification
//! - The chunked bulk-tagging pipeline
//! - The clear-channel polling state machine
//! - Port/adapter interfaces (traits)
//!
//! ## Architecture Principles
//! - Only depends on `tagstream-domain`
//! - No HTTP or platform code
//! - All external dependencies via traits
//! - Pure, testable business logic

pub mod batch;
pub mod poll;
pub mod validation;

// Infrastructure ports
pub mod ports;

// Re-export specific items to avoid ambiguity
pub use batch::{BulkTagUploader, TagBatchBuilder};
pub use poll::ClearPoller;
pub use ports::{ChannelEmptyProbe, TagUploadSink};
pub use validation::address;
pub use validation::fields;
