//! Book repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD APIs over `books` storage.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Field updates never write `shelf_id`; membership writes never touch the
//!   other fields. Each caller commits only what it changed.
//! - `detach_all_from_shelf` is one UPDATE statement and therefore atomic.

use crate::model::book::{Book, BookId, NewBook};
use crate::model::shelf::ShelfId;
use crate::repo::{ensure_schema_ready, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row};

const BOOK_SELECT_SQL: &str = "SELECT id, title, author, year, shelf_id FROM books";
const BOOK_COLUMNS: &[&str] = &["id", "title", "author", "year", "shelf_id"];

/// Repository interface for book persistence.
pub trait BookRepository {
    /// Inserts one book and returns its store-assigned id.
    fn create_book(&self, book: &NewBook) -> RepoResult<BookId>;
    /// Gets one book by id.
    fn get_book(&self, id: BookId) -> RepoResult<Option<Book>>;
    /// Lists the full collection ordered by id.
    fn list_books(&self) -> RepoResult<Vec<Book>>;
    /// Writes title/author/year for an existing book. Never writes `shelf_id`.
    fn update_book_fields(&self, book: &Book) -> RepoResult<()>;
    /// Writes only the membership reference for an existing book.
    fn set_book_shelf(&self, id: BookId, shelf_id: Option<ShelfId>) -> RepoResult<()>;
    /// Hard-deletes one book.
    fn delete_book(&self, id: BookId) -> RepoResult<()>;
    /// Lists the derived membership set of one shelf, ordered by id.
    fn list_books_on_shelf(&self, shelf_id: ShelfId) -> RepoResult<Vec<Book>>;
    /// Clears the membership reference of every book on the shelf in one
    /// atomic statement. Returns the number of books detached.
    fn detach_all_from_shelf(&self, shelf_id: ShelfId) -> RepoResult<usize>;
}

/// SQLite-backed book repository.
pub struct SqliteBookRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteBookRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema_ready(conn, "books", BOOK_COLUMNS)?;
        Ok(Self { conn })
    }
}

impl BookRepository for SqliteBookRepository<'_> {
    fn create_book(&self, book: &NewBook) -> RepoResult<BookId> {
        self.conn.execute(
            "INSERT INTO books (title, author, year, shelf_id) VALUES (?1, ?2, ?3, ?4);",
            params![
                book.title.as_str(),
                book.author.as_str(),
                book.year,
                book.shelf_id,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn get_book(&self, id: BookId) -> RepoResult<Option<Book>> {
        let book = self
            .conn
            .query_row(
                &format!("{BOOK_SELECT_SQL} WHERE id = ?1;"),
                [id],
                parse_book_row,
            )
            .optional()?;
        Ok(book)
    }

    fn list_books(&self) -> RepoResult<Vec<Book>> {
        let mut stmt = self.conn.prepare(&format!("{BOOK_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut books = Vec::new();
        while let Some(row) = rows.next()? {
            books.push(parse_book_row(row)?);
        }
        Ok(books)
    }

    fn update_book_fields(&self, book: &Book) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE books
             SET title = ?1, author = ?2, year = ?3
             WHERE id = ?4;",
            params![book.title.as_str(), book.author.as_str(), book.year, book.id],
        )?;

        if changed == 0 {
            return Err(RepoError::BookNotFound(book.id));
        }

        Ok(())
    }

    fn set_book_shelf(&self, id: BookId, shelf_id: Option<ShelfId>) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE books SET shelf_id = ?1 WHERE id = ?2;",
            params![shelf_id, id],
        )?;

        if changed == 0 {
            return Err(RepoError::BookNotFound(id));
        }

        Ok(())
    }

    fn delete_book(&self, id: BookId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM books WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(RepoError::BookNotFound(id));
        }

        Ok(())
    }

    fn list_books_on_shelf(&self, shelf_id: ShelfId) -> RepoResult<Vec<Book>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{BOOK_SELECT_SQL} WHERE shelf_id = ?1 ORDER BY id ASC;"))?;
        let mut rows = stmt.query([shelf_id])?;
        let mut books = Vec::new();
        while let Some(row) = rows.next()? {
            books.push(parse_book_row(row)?);
        }
        Ok(books)
    }

    fn detach_all_from_shelf(&self, shelf_id: ShelfId) -> RepoResult<usize> {
        let changed = self.conn.execute(
            "UPDATE books SET shelf_id = NULL WHERE shelf_id = ?1;",
            [shelf_id],
        )?;
        Ok(changed)
    }
}

fn parse_book_row(row: &Row<'_>) -> rusqlite::Result<Book> {
    Ok(Book {
        id: row.get("id")?,
        title: row.get("title")?,
        author: row.get("author")?,
        year: row.get("year")?,
        shelf_id: row.get("shelf_id")?,
    })
}
