//! Length-bounded validators for tag and entity identifiers
//!
//! Independent of address classification; a value can be a valid length and
//! still classify as `string`, or vice versa.

use tagstream_domain::constants::{
    MAXIMUM_ENTITY_NAME_LENGTH, MAXIMUM_TAG_NAME_LENGTH, MINIMUM_ENTITY_NAME_LENGTH,
    MINIMUM_TAG_NAME_LENGTH,
};
use tagstream_domain::{Result, TagStreamError};

/// Enforce the entity length bounds, surfacing the offending value.
pub fn validate_entity_name(entity: &str) -> Result<()> {
    let length = entity.chars().count();
    if !(MINIMUM_ENTITY_NAME_LENGTH..=MAXIMUM_ENTITY_NAME_LENGTH).contains(&length) {
        return Err(TagStreamError::Validation(format!(
            "entity '{}' must be between {} and {} characters, got {}",
            entity, MINIMUM_ENTITY_NAME_LENGTH, MAXIMUM_ENTITY_NAME_LENGTH, length
        )));
    }
    Ok(())
}

/// Enforce the tag length bounds, surfacing the offending value.
pub fn validate_tag_name(tag: &str) -> Result<()> {
    let length = tag.chars().count();
    if !(MINIMUM_TAG_NAME_LENGTH..=MAXIMUM_TAG_NAME_LENGTH).contains(&length) {
        return Err(TagStreamError::Validation(format!(
            "tag '{}' must be between {} and {} characters, got {}",
            tag, MINIMUM_TAG_NAME_LENGTH, MAXIMUM_TAG_NAME_LENGTH, length
        )));
    }
    Ok(())
}
