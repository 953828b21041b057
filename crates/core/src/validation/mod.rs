//! Syntactic validators for entities, tags, and IP addressing forms

pub mod address;
pub mod fields;
