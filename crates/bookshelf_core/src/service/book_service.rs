//! Book use-case service.
//!
//! # Responsibility
//! - Provide book CRUD entry points with validation run before persistence.
//! - Feed the full collection through the in-memory query engine for list
//!   and search paths.
//!
//! # Invariants
//! - Create-time shelf references must name an existing shelf.
//! - Book update never changes the shelf reference; membership mutation is
//!   owned by the shelf service.
//! - Search arguments are validated before any filtering is attempted.

use crate::model::book::{Book, BookId, BookPatch, NewBook};
use crate::query::engine::{
    author_predicate, keyword_predicate, match_all, run_query, title_author_predicate,
    year_predicate, BookPage, PageRequest, SortKey,
};
use crate::repo::book_repo::BookRepository;
use crate::repo::shelf_repo::ShelfRepository;
use crate::service::{ServiceError, ServiceResult};
use log::info;

/// Use-case service for book CRUD and collection queries.
pub struct BookService<B: BookRepository, S: ShelfRepository> {
    books: B,
    shelves: S,
}

impl<B: BookRepository, S: ShelfRepository> BookService<B, S> {
    /// Creates a service using the provided repository implementations.
    pub fn new(books: B, shelves: S) -> Self {
        Self { books, shelves }
    }

    /// Validates and persists one new book.
    ///
    /// When an initial shelf reference is supplied, the shelf must already
    /// exist; a dangling reference is rejected before the insert.
    pub fn create_book(&self, book: &NewBook) -> ServiceResult<Book> {
        book.validate()?;

        if let Some(shelf_id) = book.shelf_id {
            self.shelves
                .get_shelf(shelf_id)?
                .ok_or(ServiceError::ShelfNotFound(shelf_id))?;
        }

        let id = self.books.create_book(book)?;
        info!(
            "event=book_create module=service status=ok book_id={id} shelved={}",
            book.shelf_id.is_some()
        );

        Ok(Book {
            id,
            title: book.title.clone(),
            author: book.author.clone(),
            year: book.year,
            shelf_id: book.shelf_id,
        })
    }

    /// Gets one book by id.
    pub fn get_book(&self, id: BookId) -> ServiceResult<Book> {
        self.books
            .get_book(id)?
            .ok_or(ServiceError::BookNotFound(id))
    }

    /// Applies a partial update to title/author/year.
    ///
    /// Absent fields are left unchanged. The membership reference is never
    /// written by this path.
    pub fn update_book(&self, id: BookId, patch: &BookPatch) -> ServiceResult<Book> {
        patch.validate()?;

        let current = self
            .books
            .get_book(id)?
            .ok_or(ServiceError::BookNotFound(id))?;
        let updated = current.with_patch(patch);
        self.books.update_book_fields(&updated)?;

        info!("event=book_update module=service status=ok book_id={id}");
        Ok(updated)
    }

    /// Deletes one book unconditionally.
    ///
    /// Membership never blocks this: the shelf side is derived, so it
    /// reflects the deletion automatically.
    pub fn delete_book(&self, id: BookId) -> ServiceResult<()> {
        let book = self
            .books
            .get_book(id)?
            .ok_or(ServiceError::BookNotFound(id))?;
        self.books.delete_book(book.id)?;

        info!("event=book_delete module=service status=ok book_id={id}");
        Ok(())
    }

    /// Lists the whole collection with optional sorting and pagination.
    pub fn list_books(&self, sort_keys: &[SortKey], page: PageRequest) -> ServiceResult<BookPage> {
        let books = self.books.list_books()?;
        Ok(run_query(books, match_all(), sort_keys, page)?)
    }

    /// Case-insensitive keyword search over title OR author.
    pub fn search_books(
        &self,
        keyword: &str,
        sort_keys: &[SortKey],
        page: PageRequest,
    ) -> ServiceResult<BookPage> {
        let predicate = keyword_predicate(keyword)?;
        let books = self.books.list_books()?;
        Ok(run_query(books, predicate, sort_keys, page)?)
    }

    /// Case-insensitive substring search over the author field.
    pub fn find_by_author(
        &self,
        author: &str,
        sort_keys: &[SortKey],
        page: PageRequest,
    ) -> ServiceResult<BookPage> {
        let predicate = author_predicate(author)?;
        let books = self.books.list_books()?;
        Ok(run_query(books, predicate, sort_keys, page)?)
    }

    /// Exact publication-year search.
    pub fn find_by_year(
        &self,
        year: i32,
        sort_keys: &[SortKey],
        page: PageRequest,
    ) -> ServiceResult<BookPage> {
        let predicate = year_predicate(year)?;
        let books = self.books.list_books()?;
        Ok(run_query(books, predicate, sort_keys, page)?)
    }

    /// Combined title+author search; a blank side matches vacuously.
    pub fn find_by_title_and_author(
        &self,
        title: Option<&str>,
        author: Option<&str>,
        sort_keys: &[SortKey],
        page: PageRequest,
    ) -> ServiceResult<BookPage> {
        let predicate = title_author_predicate(title, author)?;
        let books = self.books.list_books()?;
        Ok(run_query(books, predicate, sort_keys, page)?)
    }
}
