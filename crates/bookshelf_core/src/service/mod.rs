//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Own the shared service error taxonomy the request layer maps to
//!   transport statuses.
//!
//! # Invariants
//! - Services never swallow an error into a generic success and never
//!   substitute defaults for missing entities.

use crate::model::book::BookId;
use crate::model::shelf::ShelfId;
use crate::model::ValidationError;
use crate::query::engine::QueryError;
use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod book_service;
pub mod shelf_service;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Typed outcome taxonomy for all catalog use-cases.
///
/// The request layer pattern-matches on this to pick a transport status:
/// `*NotFound` -> 404, `Validation`/`Query`/membership conflicts -> 400,
/// `Store` -> 500.
#[derive(Debug)]
pub enum ServiceError {
    BookNotFound(BookId),
    ShelfNotFound(ShelfId),
    /// Field-level validation failure before any store access.
    Validation(ValidationError),
    /// Query-argument validation failure before any filtering.
    Query(QueryError),
    /// Add rejected: the book already references a shelf (no implicit move).
    AlreadyOnShelf {
        book_id: BookId,
        shelf_id: ShelfId,
    },
    /// Remove rejected: the book is not currently on any shelf.
    NotOnShelf(BookId),
    /// Delete rejected: the shelf still has members.
    ShelfNotEmpty {
        shelf_id: ShelfId,
        book_count: usize,
    },
    /// Persistence-layer failure.
    Store(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BookNotFound(id) => write!(f, "book not found: {id}"),
            Self::ShelfNotFound(id) => write!(f, "shelf not found: {id}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Query(err) => write!(f, "{err}"),
            Self::AlreadyOnShelf { book_id, shelf_id } => write!(
                f,
                "book {book_id} is already on shelf {shelf_id}; remove it from its current shelf first"
            ),
            Self::NotOnShelf(book_id) => {
                write!(f, "book {book_id} is not currently on a shelf")
            }
            Self::ShelfNotEmpty {
                shelf_id,
                book_count,
            } => write!(
                f,
                "shelf {shelf_id} still holds {book_count} book(s); move or remove them first"
            ),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Query(err) => Some(err),
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::BookNotFound(id) => Self::BookNotFound(id),
            RepoError::ShelfNotFound(id) => Self::ShelfNotFound(id),
            other => Self::Store(other),
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<QueryError> for ServiceError {
    fn from(value: QueryError) -> Self {
        Self::Query(value)
    }
}
