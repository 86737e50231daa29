//! Pre-flight checks for creation-form drafts. Pure; nothing here touches
//! the network.

use crate::error::ValidationError;
use crate::types::{Author, Book};

pub const BOOK_DRAFT_INVALID: &str =
    "All fields are required and price must be greater than zero.";
pub const AUTHOR_DRAFT_INVALID: &str = "All fields are required.";

/// Name and description must be non-empty and price strictly positive.
/// A NaN price fails the `> 0` comparison and is rejected too.
pub fn validate_book_draft(draft: &Book) -> Result<(), ValidationError> {
    let price_ok = draft.price > 0.0;
    if draft.name.is_empty() || draft.description.is_empty() || !price_ok {
        return Err(ValidationError::new(BOOK_DRAFT_INVALID));
    }
    Ok(())
}

pub fn validate_author_draft(draft: &Author) -> Result<(), ValidationError> {
    if draft.name.is_empty() || draft.birth_date.is_empty() {
        return Err(ValidationError::new(AUTHOR_DRAFT_INVALID));
    }
    Ok(())
}
