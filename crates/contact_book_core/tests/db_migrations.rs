use contact_book_core::db::migrations::latest_version;
use contact_book_core::db::{open_db, open_db_in_memory, provision_db, DbError};
use contact_book_core::{Contact, ContactRepository, SqliteContactRepository};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_provisions_contacts_table() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_eq!(
        column_names(&conn),
        vec!["Name", "Number", "Email", "Address"]
    );
}

#[test]
fn open_db_refuses_to_create_missing_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("contact_book.sqlite3");

    let err = open_db(&path).unwrap_err();
    assert!(matches!(err, DbError::NotProvisioned { .. }));
    assert!(!path.exists());
}

#[test]
fn open_db_takes_plain_paths_not_uris() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("contact_book.sqlite3");
    drop(provision_db(&path).unwrap());

    let uri = format!("file:{}", path.display());
    let err = open_db(&uri).unwrap_err();
    assert!(matches!(err, DbError::NotProvisioned { .. }));

    assert!(open_db(&path).is_ok());
}

#[test]
fn provisioning_twice_keeps_existing_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("contact_book.sqlite3");

    let conn = provision_db(&path).unwrap();
    SqliteContactRepository::new(&conn)
        .create(&Contact::new("Ann", 555, "a@x.com", "1 Rd"))
        .unwrap();
    drop(conn);

    let conn = provision_db(&path).unwrap();
    assert_eq!(schema_version(&conn), latest_version());
    drop(conn);

    let conn = open_db(&path).unwrap();
    let repo = SqliteContactRepository::new(&conn);
    assert!(repo.find_by_number(555).unwrap().is_some());
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.sqlite3");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    match open_db(&path).unwrap_err() {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn column_names(conn: &Connection) -> Vec<String> {
    let mut stmt = conn
        .prepare("SELECT name FROM pragma_table_info('contacts') ORDER BY cid;")
        .unwrap();
    let names = stmt
        .query_map([], |row| row.get::<_, String>(0))
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    names
}
