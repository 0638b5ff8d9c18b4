//! Size Guard Module
//!
//! Serializes values to JSON text and enforces the absolute length ceiling.
//! Lengths are counted in characters, never bytes.

use serde::Serialize;

use crate::error::{CacheError, Result};

/// Serializes `value`, rejecting anything longer than `max_length`
/// characters. Returns the text and its character count.
pub(crate) fn serialize_storable<T>(value: &T, max_length: usize) -> Result<(String, usize)>
where
    T: Serialize + ?Sized,
{
    let text = serde_json::to_string(value).map_err(CacheError::Serialize)?;
    let length = text.chars().count();
    if length > max_length {
        return Err(CacheError::OversizedValue {
            length,
            max: max_length,
        });
    }
    Ok((text, length))
}

// == Is Storable ==
/// Whether `value` serializes within `max_length` characters.
pub fn is_storable<T>(value: &T, max_length: usize) -> bool
where
    T: Serialize + ?Sized,
{
    serialize_storable(value, max_length).is_ok()
}
