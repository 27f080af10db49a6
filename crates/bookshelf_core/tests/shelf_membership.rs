use bookshelf_core::db::open_db_in_memory;
use bookshelf_core::{
    BookId, BookService, NewBook, NewShelf, ServiceError, ShelfId, ShelfPatch, ShelfService,
    SqliteBookRepository, SqliteShelfRepository, ValidationError,
};
use rusqlite::Connection;

fn shelf_service(
    conn: &Connection,
) -> ShelfService<SqliteShelfRepository<'_>, SqliteBookRepository<'_>> {
    ShelfService::new(
        SqliteShelfRepository::try_new(conn).unwrap(),
        SqliteBookRepository::try_new(conn).unwrap(),
    )
}

fn create_book(conn: &Connection, title: &str) -> BookId {
    let service = BookService::new(
        SqliteBookRepository::try_new(conn).unwrap(),
        SqliteShelfRepository::try_new(conn).unwrap(),
    );
    service
        .create_book(&NewBook::new(title, "Author", 2000))
        .unwrap()
        .id
}

fn create_shelf(conn: &Connection, name: &str) -> ShelfId {
    shelf_service(conn)
        .create_shelf(&NewShelf::new(name))
        .unwrap()
        .id
}

#[test]
fn shelf_crud_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let service = shelf_service(&conn);

    let created = service
        .create_shelf(&NewShelf {
            name: "Science Fiction".to_string(),
            description: Some("paperbacks".to_string()),
        })
        .unwrap();

    let loaded = service.get_shelf(created.id).unwrap();
    assert_eq!(loaded, created);

    let updated = service
        .update_shelf(
            created.id,
            &ShelfPatch {
                name: Some("SF & Fantasy".to_string()),
                ..ShelfPatch::default()
            },
        )
        .unwrap();
    assert_eq!(updated.name, "SF & Fantasy");
    assert_eq!(updated.description.as_deref(), Some("paperbacks"));

    let all = service.list_shelves().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0], updated);
}

#[test]
fn shelf_validation_failure_blocks_create_and_update() {
    let conn = open_db_in_memory().unwrap();
    let service = shelf_service(&conn);

    let err = service.create_shelf(&NewShelf::new("   ")).unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Validation(ValidationError::BlankShelfName)
    ));

    let shelf_id = create_shelf(&conn, "SF");
    let err = service
        .update_shelf(
            shelf_id,
            &ShelfPatch {
                name: Some("x".repeat(101)),
                ..ShelfPatch::default()
            },
        )
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Validation(ValidationError::ShelfNameTooLong(101))
    ));
}

#[test]
fn add_book_to_shelf_sets_reference_and_returns_updated_book() {
    let conn = open_db_in_memory().unwrap();
    let shelf_id = create_shelf(&conn, "SF");
    let book_id = create_book(&conn, "Dune");

    let service = shelf_service(&conn);
    let book = service.add_book_to_shelf(shelf_id, book_id).unwrap();
    assert_eq!(book.shelf_id, Some(shelf_id));

    let members = service.books_on_shelf(shelf_id).unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].id, book_id);
}

#[test]
fn add_fails_fast_on_missing_entities() {
    let conn = open_db_in_memory().unwrap();
    let shelf_id = create_shelf(&conn, "SF");
    let book_id = create_book(&conn, "Dune");

    let service = shelf_service(&conn);
    assert!(matches!(
        service.add_book_to_shelf(404, book_id).unwrap_err(),
        ServiceError::ShelfNotFound(404)
    ));
    assert!(matches!(
        service.add_book_to_shelf(shelf_id, 404).unwrap_err(),
        ServiceError::BookNotFound(404)
    ));

    // Neither failure may leave a reference behind.
    assert!(service.books_on_shelf(shelf_id).unwrap().is_empty());
}

#[test]
fn double_add_is_rejected_and_keeps_original_reference() {
    let conn = open_db_in_memory().unwrap();
    let first_shelf = create_shelf(&conn, "SF");
    let second_shelf = create_shelf(&conn, "Classics");
    let book_id = create_book(&conn, "Dune");

    let service = shelf_service(&conn);
    service.add_book_to_shelf(first_shelf, book_id).unwrap();

    let err = service
        .add_book_to_shelf(second_shelf, book_id)
        .unwrap_err();
    match err {
        ServiceError::AlreadyOnShelf { shelf_id, .. } => assert_eq!(shelf_id, first_shelf),
        other => panic!("unexpected error: {other}"),
    }

    // Re-adding to the same shelf is no more valid than moving.
    assert!(matches!(
        service.add_book_to_shelf(first_shelf, book_id).unwrap_err(),
        ServiceError::AlreadyOnShelf { .. }
    ));

    let members = service.books_on_shelf(first_shelf).unwrap();
    assert_eq!(members.len(), 1);
    assert!(service.books_on_shelf(second_shelf).unwrap().is_empty());
}

#[test]
fn remove_clears_reference_and_rejects_unshelved_books() {
    let conn = open_db_in_memory().unwrap();
    let shelf_id = create_shelf(&conn, "SF");
    let book_id = create_book(&conn, "Dune");

    let service = shelf_service(&conn);
    service.add_book_to_shelf(shelf_id, book_id).unwrap();

    let removed = service.remove_book_from_shelf(book_id).unwrap();
    assert!(removed.shelf_id.is_none());
    assert!(service.books_on_shelf(shelf_id).unwrap().is_empty());

    let err = service.remove_book_from_shelf(book_id).unwrap_err();
    assert!(matches!(err, ServiceError::NotOnShelf(id) if id == book_id));
}

#[test]
fn clear_shelf_detaches_every_member() {
    let conn = open_db_in_memory().unwrap();
    let shelf_id = create_shelf(&conn, "SF");
    let book_a = create_book(&conn, "Dune");
    let book_b = create_book(&conn, "Foundation");

    let service = shelf_service(&conn);
    service.add_book_to_shelf(shelf_id, book_a).unwrap();
    service.add_book_to_shelf(shelf_id, book_b).unwrap();

    let detached = service.clear_shelf(shelf_id).unwrap();
    assert_eq!(detached, 2);

    let books = SqliteBookRepository::try_new(&conn).unwrap();
    let book_service = BookService::new(books, SqliteShelfRepository::try_new(&conn).unwrap());
    assert!(book_service.get_book(book_a).unwrap().shelf_id.is_none());
    assert!(book_service.get_book(book_b).unwrap().shelf_id.is_none());
    assert!(service.books_on_shelf(shelf_id).unwrap().is_empty());
}

#[test]
fn clear_on_empty_shelf_is_a_noop() {
    let conn = open_db_in_memory().unwrap();
    let shelf_id = create_shelf(&conn, "SF");

    let service = shelf_service(&conn);
    assert_eq!(service.clear_shelf(shelf_id).unwrap(), 0);
    assert!(matches!(
        service.clear_shelf(404).unwrap_err(),
        ServiceError::ShelfNotFound(404)
    ));
}

#[test]
fn delete_shelf_is_blocked_until_cleared() {
    let conn = open_db_in_memory().unwrap();
    let shelf_id = create_shelf(&conn, "SF");
    let book_id = create_book(&conn, "Dune");

    let service = shelf_service(&conn);
    service.add_book_to_shelf(shelf_id, book_id).unwrap();

    let err = service.delete_shelf(shelf_id).unwrap_err();
    match err {
        ServiceError::ShelfNotEmpty {
            shelf_id: id,
            book_count,
        } => {
            assert_eq!(id, shelf_id);
            assert_eq!(book_count, 1);
        }
        other => panic!("unexpected error: {other}"),
    }

    service.clear_shelf(shelf_id).unwrap();
    let name = service.delete_shelf(shelf_id).unwrap();
    assert_eq!(name, "SF");

    assert!(matches!(
        service.get_shelf(shelf_id).unwrap_err(),
        ServiceError::ShelfNotFound(_)
    ));
}

#[test]
fn membership_listing_requires_existing_shelf() {
    let conn = open_db_in_memory().unwrap();
    let service = shelf_service(&conn);

    assert!(matches!(
        service.books_on_shelf(404).unwrap_err(),
        ServiceError::ShelfNotFound(404)
    ));
}
