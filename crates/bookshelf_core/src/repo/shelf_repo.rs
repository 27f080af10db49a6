//! Shelf repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD APIs over `shelves` storage.
//! - Expose the derived membership count used by delete gating.
//!
//! # Invariants
//! - Shelves never persist their book lists; counts are computed live from
//!   `books.shelf_id`.

use crate::model::shelf::{NewShelf, Shelf, ShelfId};
use crate::repo::{ensure_schema_ready, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row};

const SHELF_SELECT_SQL: &str = "SELECT id, name, description FROM shelves";
const SHELF_COLUMNS: &[&str] = &["id", "name", "description"];

/// Repository interface for shelf persistence.
pub trait ShelfRepository {
    /// Inserts one shelf and returns its store-assigned id.
    fn create_shelf(&self, shelf: &NewShelf) -> RepoResult<ShelfId>;
    /// Gets one shelf by id.
    fn get_shelf(&self, id: ShelfId) -> RepoResult<Option<Shelf>>;
    /// Lists all shelves ordered by id.
    fn list_shelves(&self) -> RepoResult<Vec<Shelf>>;
    /// Writes name/description for an existing shelf.
    fn update_shelf(&self, shelf: &Shelf) -> RepoResult<()>;
    /// Hard-deletes one shelf. Callers gate on the membership count first.
    fn delete_shelf(&self, id: ShelfId) -> RepoResult<()>;
    /// Counts books currently referencing the shelf.
    fn count_books_on_shelf(&self, id: ShelfId) -> RepoResult<usize>;
}

/// SQLite-backed shelf repository.
pub struct SqliteShelfRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteShelfRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema_ready(conn, "shelves", SHELF_COLUMNS)?;
        Ok(Self { conn })
    }
}

impl ShelfRepository for SqliteShelfRepository<'_> {
    fn create_shelf(&self, shelf: &NewShelf) -> RepoResult<ShelfId> {
        self.conn.execute(
            "INSERT INTO shelves (name, description) VALUES (?1, ?2);",
            params![shelf.name.as_str(), shelf.description.as_deref()],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn get_shelf(&self, id: ShelfId) -> RepoResult<Option<Shelf>> {
        let shelf = self
            .conn
            .query_row(
                &format!("{SHELF_SELECT_SQL} WHERE id = ?1;"),
                [id],
                parse_shelf_row,
            )
            .optional()?;
        Ok(shelf)
    }

    fn list_shelves(&self) -> RepoResult<Vec<Shelf>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{SHELF_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut shelves = Vec::new();
        while let Some(row) = rows.next()? {
            shelves.push(parse_shelf_row(row)?);
        }
        Ok(shelves)
    }

    fn update_shelf(&self, shelf: &Shelf) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE shelves SET name = ?1, description = ?2 WHERE id = ?3;",
            params![shelf.name.as_str(), shelf.description.as_deref(), shelf.id],
        )?;

        if changed == 0 {
            return Err(RepoError::ShelfNotFound(shelf.id));
        }

        Ok(())
    }

    fn delete_shelf(&self, id: ShelfId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM shelves WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(RepoError::ShelfNotFound(id));
        }

        Ok(())
    }

    fn count_books_on_shelf(&self, id: ShelfId) -> RepoResult<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM books WHERE shelf_id = ?1;",
            [id],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }
}

fn parse_shelf_row(row: &Row<'_>) -> rusqlite::Result<Shelf> {
    Ok(Shelf {
        id: row.get("id")?,
        name: row.get("name")?,
        description: row.get("description")?,
    })
}
