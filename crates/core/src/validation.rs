//! Form-layer validation for note and category input.
//!
//! Drafts are checked before any request is issued; the store does not
//! re-validate.

use crate::error::CoreError;
use crate::models::NoteDraft;

/// Validate a note draft: title and content must both be non-blank.
pub fn validate_note_draft(draft: &NoteDraft) -> Result<(), CoreError> {
    if draft.title.trim().is_empty() {
        return Err(CoreError::Validation("Note title cannot be empty".to_string()));
    }
    if draft.content.trim().is_empty() {
        return Err(CoreError::Validation(
            "Note content cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// Validate a category name: must be non-blank.
pub fn validate_category_name(name: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::Validation(
            "Category name cannot be empty".to_string(),
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
