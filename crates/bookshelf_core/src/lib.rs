//! Core domain logic for the bookshelf catalog.
//! This crate is the single source of truth for catalog business invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod query;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::book::{Book, BookId, BookPatch, NewBook};
pub use model::shelf::{NewShelf, Shelf, ShelfId, ShelfPatch};
pub use model::ValidationError;
pub use query::engine::{
    BookPage, PageRequest, QueryError, SortDirection, SortField, SortKey,
};
pub use repo::book_repo::{BookRepository, SqliteBookRepository};
pub use repo::shelf_repo::{ShelfRepository, SqliteShelfRepository};
pub use repo::{RepoError, RepoResult};
pub use service::book_service::BookService;
pub use service::shelf_service::ShelfService;
pub use service::{ServiceError, ServiceResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
