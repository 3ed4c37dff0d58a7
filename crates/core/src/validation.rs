//! Upload validation.
//!
//! Checks run before anything touches the blob store, so a rejected upload never leaves a file
//! behind.

use crate::constants::ALLOWED_MIME_TYPES;
use crate::{CoreError, CoreResult};

/// Returns true if `mime_type` is on the upload allow-list.
///
/// Matching is exact on the essence (type/subtype); parameters such as `; charset=utf-8` are
/// ignored and the comparison is case-insensitive.
pub fn is_allowed_mime_type(mime_type: &str) -> bool {
    let essence = mime_type.split(';').next().unwrap_or("").trim();
    ALLOWED_MIME_TYPES
        .iter()
        .any(|allowed| allowed.eq_ignore_ascii_case(essence))
}

/// Validates the declared type and size of an upload.
///
/// The type is checked first, so an oversized file of an unsupported type reports the type.
///
/// # Errors
///
/// Returns `CoreError::UnsupportedType` or `CoreError::TooLarge`.
pub fn validate_upload(mime_type: &str, size: u64, limit: u64) -> CoreResult<()> {
    if !is_allowed_mime_type(mime_type) {
        return Err(CoreError::UnsupportedType(if mime_type.is_empty() {
            "(none)".into()
        } else {
            mime_type.to_owned()
        }));
    }

    if size > limit {
        return Err(CoreError::TooLarge { size, limit });
    }

    Ok(())
}
