//! Book domain model and write-side shapes.
//!
//! # Responsibility
//! - Define the canonical book record and its create/update inputs.
//! - Validate field invariants before any persistence attempt.
//!
//! # Invariants
//! - `shelf_id` is a weak reference by id; the shelf side is never stored.
//! - `shelf_id` is mutated only by shelf membership operations, never by
//!   book field updates.

use super::{is_blank, validate_year, ValidationError};
use crate::model::shelf::ShelfId;
use serde::{Deserialize, Serialize};

/// Store-assigned book identifier.
pub type BookId = i64;

/// Canonical catalog record for one book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// Stable store-assigned id.
    pub id: BookId,
    pub title: String,
    pub author: String,
    /// Publication year, bounded by `YEAR_MIN..=YEAR_MAX`.
    pub year: i32,
    /// Current shelf membership, if any.
    pub shelf_id: Option<ShelfId>,
}

/// Input shape for book creation. The year is structurally required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub year: i32,
    /// Optional initial shelf; the shelf must exist at creation time.
    pub shelf_id: Option<ShelfId>,
}

/// Partial update for book fields. `None` means "leave unchanged".
///
/// Membership is deliberately absent here; moving a book between shelves
/// goes through the shelf service operations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookPatch {
    pub title: Option<String>,
    pub author: Option<String>,
    pub year: Option<i32>,
}

impl NewBook {
    /// Creates an unshelved book input.
    pub fn new(title: impl Into<String>, author: impl Into<String>, year: i32) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            year,
            shelf_id: None,
        }
    }

    /// Checks create-time field invariants.
    ///
    /// # Errors
    /// - [`ValidationError::BlankTitle`] / [`ValidationError::BlankAuthor`]
    ///   for blank text fields.
    /// - [`ValidationError::YearOutOfRange`] for years outside bounds.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if is_blank(&self.title) {
            return Err(ValidationError::BlankTitle);
        }
        if is_blank(&self.author) {
            return Err(ValidationError::BlankAuthor);
        }
        validate_year(self.year)
    }
}

impl BookPatch {
    /// Checks update-time invariants on the fields actually supplied.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.as_deref().is_some_and(is_blank) {
            return Err(ValidationError::BlankTitle);
        }
        if self.author.as_deref().is_some_and(is_blank) {
            return Err(ValidationError::BlankAuthor);
        }
        if let Some(year) = self.year {
            validate_year(year)?;
        }
        Ok(())
    }

    /// Returns whether the patch changes anything at all.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.author.is_none() && self.year.is_none()
    }
}

impl Book {
    /// Returns a copy with the supplied patch fields applied.
    pub fn with_patch(&self, patch: &BookPatch) -> Book {
        Book {
            id: self.id,
            title: patch.title.clone().unwrap_or_else(|| self.title.clone()),
            author: patch.author.clone().unwrap_or_else(|| self.author.clone()),
            year: patch.year.unwrap_or(self.year),
            shelf_id: self.shelf_id,
        }
    }

    /// Returns a copy with the membership reference replaced.
    pub fn with_shelf(&self, shelf_id: Option<ShelfId>) -> Book {
        Book {
            shelf_id,
            ..self.clone()
        }
    }
}
