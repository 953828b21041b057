//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! client.

// Field length bounds enforced before any payload is built
pub const MINIMUM_ENTITY_NAME_LENGTH: usize = 1;
pub const MAXIMUM_ENTITY_NAME_LENGTH: usize = 256;
pub const MINIMUM_TAG_NAME_LENGTH: usize = 1;
pub const MAXIMUM_TAG_NAME_LENGTH: usize = 2100;

// Server-side cap on tag-entity-pairs per upload request
pub const MAX_TAG_ENTITIES_PER_REQUEST: usize = 2000;

// Interval between channel-empty checks while a clear is in flight
pub const CLEAR_POLL_INTERVAL_MS: u64 = 30_000;

// Fan-out bound for the multi-integration search convenience
pub const MAX_CONCURRENT_INTEGRATION_LOOKUPS: usize = 10;
