//! Catalog domain model.
//!
//! # Responsibility
//! - Define the canonical book and shelf records used by core business logic.
//! - Provide pure field-level validation for write-side shapes.
//!
//! # Invariants
//! - Identifiers are store-assigned integers and never reused.
//! - A book references at most one shelf, by id only (no owning reference).
//! - A shelf's membership set is derived from `Book::shelf_id`, never stored.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod book;
pub mod shelf;

/// Inclusive publication year bounds accepted for books.
pub const YEAR_MIN: i32 = 0;
/// See [`YEAR_MIN`].
pub const YEAR_MAX: i32 = 2100;

/// Maximum shelf name length in characters.
pub const SHELF_NAME_MAX_CHARS: usize = 100;
/// Maximum shelf description length in characters.
pub const SHELF_DESCRIPTION_MAX_CHARS: usize = 500;

/// Field-level validation failure, naming the offending field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Title is missing or blank after trim.
    BlankTitle,
    /// Author is missing or blank after trim.
    BlankAuthor,
    /// Publication year outside `[YEAR_MIN, YEAR_MAX]`.
    YearOutOfRange(i32),
    /// Shelf name is missing or blank after trim.
    BlankShelfName,
    /// Shelf name longer than [`SHELF_NAME_MAX_CHARS`].
    ShelfNameTooLong(usize),
    /// Shelf description longer than [`SHELF_DESCRIPTION_MAX_CHARS`].
    ShelfDescriptionTooLong(usize),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankTitle => write!(f, "book title must not be blank"),
            Self::BlankAuthor => write!(f, "book author must not be blank"),
            Self::YearOutOfRange(year) => write!(
                f,
                "publication year {year} must be in range {YEAR_MIN}..={YEAR_MAX}"
            ),
            Self::BlankShelfName => write!(f, "shelf name must not be blank"),
            Self::ShelfNameTooLong(len) => write!(
                f,
                "shelf name has {len} characters, maximum is {SHELF_NAME_MAX_CHARS}"
            ),
            Self::ShelfDescriptionTooLong(len) => write!(
                f,
                "shelf description has {len} characters, maximum is {SHELF_DESCRIPTION_MAX_CHARS}"
            ),
        }
    }
}

impl Error for ValidationError {}

pub(crate) fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

pub(crate) fn validate_year(year: i32) -> Result<(), ValidationError> {
    if !(YEAR_MIN..=YEAR_MAX).contains(&year) {
        return Err(ValidationError::YearOutOfRange(year));
    }
    Ok(())
}
