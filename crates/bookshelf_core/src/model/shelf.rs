//! Shelf domain model and write-side shapes.
//!
//! # Responsibility
//! - Define the canonical shelf record and its create/update inputs.
//! - Validate name/description bounds before persistence.
//!
//! # Invariants
//! - A shelf never stores its books; membership is derived from
//!   `Book::shelf_id` at read time.

use super::{
    is_blank, ValidationError, SHELF_DESCRIPTION_MAX_CHARS, SHELF_NAME_MAX_CHARS,
};
use serde::{Deserialize, Serialize};

/// Store-assigned shelf identifier.
pub type ShelfId = i64;

/// Canonical record for one shelf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shelf {
    /// Stable store-assigned id.
    pub id: ShelfId,
    pub name: String,
    pub description: Option<String>,
}

/// Input shape for shelf creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewShelf {
    pub name: String,
    pub description: Option<String>,
}

/// Partial update for shelf fields. `None` means "leave unchanged".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShelfPatch {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl NewShelf {
    /// Creates a shelf input without description.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }

    /// Checks create-time field invariants.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_name(&self.name)?;
        validate_description(self.description.as_deref())
    }
}

impl ShelfPatch {
    /// Checks update-time invariants on the fields actually supplied.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(name) = self.name.as_deref() {
            validate_name(name)?;
        }
        validate_description(self.description.as_deref())
    }
}

impl Shelf {
    /// Returns a copy with the supplied patch fields applied.
    pub fn with_patch(&self, patch: &ShelfPatch) -> Shelf {
        Shelf {
            id: self.id,
            name: patch.name.clone().unwrap_or_else(|| self.name.clone()),
            description: patch
                .description
                .clone()
                .or_else(|| self.description.clone()),
        }
    }
}

fn validate_name(name: &str) -> Result<(), ValidationError> {
    if is_blank(name) {
        return Err(ValidationError::BlankShelfName);
    }
    let chars = name.chars().count();
    if chars > SHELF_NAME_MAX_CHARS {
        return Err(ValidationError::ShelfNameTooLong(chars));
    }
    Ok(())
}

fn validate_description(description: Option<&str>) -> Result<(), ValidationError> {
    if let Some(description) = description {
        let chars = description.chars().count();
        if chars > SHELF_DESCRIPTION_MAX_CHARS {
            return Err(ValidationError::ShelfDescriptionTooLong(chars));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{NewShelf, ShelfPatch};
    use crate::model::ValidationError;

    #[test]
    fn shelf_name_bounds_are_enforced() {
        assert_eq!(
            NewShelf::new("  ").validate(),
            Err(ValidationError::BlankShelfName)
        );

        let long_name = "x".repeat(101);
        assert_eq!(
            NewShelf::new(long_name).validate(),
            Err(ValidationError::ShelfNameTooLong(101))
        );

        assert!(NewShelf::new("Science Fiction").validate().is_ok());
    }

    #[test]
    fn shelf_description_bound_is_enforced() {
        let shelf = NewShelf {
            name: "Classics".to_string(),
            description: Some("d".repeat(501)),
        };
        assert_eq!(
            shelf.validate(),
            Err(ValidationError::ShelfDescriptionTooLong(501))
        );
    }

    #[test]
    fn patch_ignores_absent_fields() {
        assert!(ShelfPatch::default().validate().is_ok());

        let patch = ShelfPatch {
            name: Some(String::new()),
            ..ShelfPatch::default()
        };
        assert_eq!(patch.validate(), Err(ValidationError::BlankShelfName));
    }
}
