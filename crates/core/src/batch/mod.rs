//! Bulk tag upload pipeline
//!
//! `TagBatchBuilder` validates rows and buckets the surviving pairs into
//! size-capped batches; `BulkTagUploader` drives the builder against a
//! `TagUploadSink`, one batch at a time, in strict input order.

pub mod builder;
pub mod uploader;

pub use builder::TagBatchBuilder;
pub use uploader::BulkTagUploader;
