//! Per-endpoint request plumbing for the TagStream REST API

pub mod channels;
pub mod client;
pub mod integrations;
pub mod session;
pub mod tags;
pub mod users;

pub use client::TagStreamClient;
pub use integrations::IntegrationSearchResult;
pub use users::User;
