//! Shelf use-case service and membership manager.
//!
//! # Responsibility
//! - Provide shelf CRUD entry points with validation run before persistence.
//! - Enforce the one-shelf-per-book membership invariants across add,
//!   remove, clear, and delete operations.
//!
//! # Invariants
//! - A book on a shelf must be removed before it can be added elsewhere; no
//!   implicit move.
//! - A shelf is deletable only when its derived membership set is empty.
//! - Not-found failures surface before any mutation is attempted.

use crate::model::book::{Book, BookId};
use crate::model::shelf::{NewShelf, Shelf, ShelfId, ShelfPatch};
use crate::repo::book_repo::BookRepository;
use crate::repo::shelf_repo::ShelfRepository;
use crate::service::{ServiceError, ServiceResult};
use log::{debug, info};

/// Use-case service for shelf CRUD and book membership.
pub struct ShelfService<S: ShelfRepository, B: BookRepository> {
    shelves: S,
    books: B,
}

impl<S: ShelfRepository, B: BookRepository> ShelfService<S, B> {
    /// Creates a service using the provided repository implementations.
    pub fn new(shelves: S, books: B) -> Self {
        Self { shelves, books }
    }

    /// Validates and persists one new shelf.
    pub fn create_shelf(&self, shelf: &NewShelf) -> ServiceResult<Shelf> {
        shelf.validate()?;

        let id = self.shelves.create_shelf(shelf)?;
        info!("event=shelf_create module=service status=ok shelf_id={id}");

        Ok(Shelf {
            id,
            name: shelf.name.clone(),
            description: shelf.description.clone(),
        })
    }

    /// Gets one shelf by id.
    pub fn get_shelf(&self, id: ShelfId) -> ServiceResult<Shelf> {
        self.shelves
            .get_shelf(id)?
            .ok_or(ServiceError::ShelfNotFound(id))
    }

    /// Lists all shelves.
    pub fn list_shelves(&self) -> ServiceResult<Vec<Shelf>> {
        Ok(self.shelves.list_shelves()?)
    }

    /// Applies a partial update to name/description.
    pub fn update_shelf(&self, id: ShelfId, patch: &ShelfPatch) -> ServiceResult<Shelf> {
        patch.validate()?;

        let current = self
            .shelves
            .get_shelf(id)?
            .ok_or(ServiceError::ShelfNotFound(id))?;
        let updated = current.with_patch(patch);
        self.shelves.update_shelf(&updated)?;

        info!("event=shelf_update module=service status=ok shelf_id={id}");
        Ok(updated)
    }

    /// Deletes one shelf, returning its name.
    ///
    /// Rejected with [`ServiceError::ShelfNotEmpty`] while any book still
    /// references the shelf.
    pub fn delete_shelf(&self, id: ShelfId) -> ServiceResult<String> {
        let shelf = self
            .shelves
            .get_shelf(id)?
            .ok_or(ServiceError::ShelfNotFound(id))?;

        let book_count = self.shelves.count_books_on_shelf(id)?;
        if book_count > 0 {
            return Err(ServiceError::ShelfNotEmpty {
                shelf_id: id,
                book_count,
            });
        }

        self.shelves.delete_shelf(id)?;
        info!("event=shelf_delete module=service status=ok shelf_id={id}");
        Ok(shelf.name)
    }

    /// Lists the derived membership set of one shelf.
    pub fn books_on_shelf(&self, id: ShelfId) -> ServiceResult<Vec<Book>> {
        self.shelves
            .get_shelf(id)?
            .ok_or(ServiceError::ShelfNotFound(id))?;

        let books = self.books.list_books_on_shelf(id)?;
        debug!(
            "event=shelf_books module=service status=ok shelf_id={id} count={}",
            books.len()
        );
        Ok(books)
    }

    /// Puts an unshelved book onto a shelf.
    ///
    /// Fails fast when either entity is missing, and rejects the transition
    /// when the book already references any shelf, including the target
    /// shelf itself. Returns the updated book.
    pub fn add_book_to_shelf(&self, shelf_id: ShelfId, book_id: BookId) -> ServiceResult<Book> {
        self.shelves
            .get_shelf(shelf_id)?
            .ok_or(ServiceError::ShelfNotFound(shelf_id))?;

        let book = self
            .books
            .get_book(book_id)?
            .ok_or(ServiceError::BookNotFound(book_id))?;

        if let Some(current_shelf) = book.shelf_id {
            return Err(ServiceError::AlreadyOnShelf {
                book_id,
                shelf_id: current_shelf,
            });
        }

        self.books.set_book_shelf(book_id, Some(shelf_id))?;
        info!(
            "event=shelf_add_book module=service status=ok shelf_id={shelf_id} book_id={book_id}"
        );
        Ok(book.with_shelf(Some(shelf_id)))
    }

    /// Takes a book off whatever shelf it is on. Returns the updated book.
    pub fn remove_book_from_shelf(&self, book_id: BookId) -> ServiceResult<Book> {
        let book = self
            .books
            .get_book(book_id)?
            .ok_or(ServiceError::BookNotFound(book_id))?;

        let Some(shelf_id) = book.shelf_id else {
            return Err(ServiceError::NotOnShelf(book_id));
        };

        self.books.set_book_shelf(book_id, None)?;
        info!(
            "event=shelf_remove_book module=service status=ok shelf_id={shelf_id} book_id={book_id}"
        );
        Ok(book.with_shelf(None))
    }

    /// Detaches every book from the shelf. Returns the number detached.
    ///
    /// An already-empty shelf is a successful no-op. The detach itself is a
    /// single store statement, so external observers never see a partially
    /// cleared shelf.
    pub fn clear_shelf(&self, shelf_id: ShelfId) -> ServiceResult<usize> {
        self.shelves
            .get_shelf(shelf_id)?
            .ok_or(ServiceError::ShelfNotFound(shelf_id))?;

        let members = self.books.list_books_on_shelf(shelf_id)?;
        if members.is_empty() {
            info!("event=shelf_clear module=service status=noop shelf_id={shelf_id}");
            return Ok(0);
        }

        let detached = self.books.detach_all_from_shelf(shelf_id)?;
        info!(
            "event=shelf_clear module=service status=ok shelf_id={shelf_id} detached={detached}"
        );
        Ok(detached)
    }
}
