//! Contact repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide list/create/find/update/delete over the `contacts` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Every operation runs exactly one parameterized statement in
//!   auto-commit mode; the statement is dropped before the call returns.
//! - Write paths call `Contact::validate()` before any SQL runs.
//! - A missing row is never an error: lookups return `None`, mutations
//!   return `false`.

use crate::db::DbError;
use crate::model::contact::{Contact, ContactNumber, ContactValidationError};
use rusqlite::{params, Connection, ErrorCode, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const CONTACT_SELECT_SQL: &str = "SELECT Name, Number, Email, Address FROM contacts";

pub type StoreResult<T> = Result<T, StoreError>;

/// Failures surfaced by contact store operations.
#[derive(Debug)]
pub enum StoreError {
    /// Backing store is unreachable or the statement failed.
    Connection(DbError),
    /// Another contact already owns `number`.
    ConstraintViolation { number: ContactNumber },
    Validation(ContactValidationError),
    /// A persisted row could not be mapped back to a `Contact`.
    InvalidData(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Connection(err) => write!(f, "contact store unavailable: {err}"),
            Self::ConstraintViolation { number } => {
                write!(f, "a contact with number {number} already exists")
            }
            Self::Validation(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted contact data: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Connection(err) => Some(err),
            Self::Validation(err) => Some(err),
            Self::ConstraintViolation { .. } | Self::InvalidData(_) => None,
        }
    }
}

impl From<ContactValidationError> for StoreError {
    fn from(value: ContactValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Connection(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Connection(DbError::Sqlite(value))
    }
}

/// Repository interface for contact CRUD operations.
pub trait ContactRepository {
    /// Returns every contact in storage-native order.
    fn list_all(&self) -> StoreResult<Vec<Contact>>;
    /// Inserts a new contact.
    fn create(&self, contact: &Contact) -> StoreResult<()>;
    /// Looks up one contact by its number.
    fn find_by_number(&self, number: ContactNumber) -> StoreResult<Option<Contact>>;
    /// Overwrites the row keyed by `key` with all fields of `contact`.
    ///
    /// `contact.number` becomes the row's new number, so a differing `key`
    /// renumbers the row. Returns whether a row matched `key`.
    fn update(&self, key: ContactNumber, contact: &Contact) -> StoreResult<bool>;
    /// Removes the row keyed by `number`. Returns whether a row was removed.
    fn delete(&self, number: ContactNumber) -> StoreResult<bool>;
}

/// SQLite-backed contact repository borrowing a session-owned connection.
pub struct SqliteContactRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteContactRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ContactRepository for SqliteContactRepository<'_> {
    fn list_all(&self) -> StoreResult<Vec<Contact>> {
        let mut stmt = self.conn.prepare(CONTACT_SELECT_SQL)?;
        let mut rows = stmt.query([])?;
        let mut contacts = Vec::new();

        while let Some(row) = rows.next()? {
            contacts.push(parse_contact_row(row)?);
        }

        Ok(contacts)
    }

    fn create(&self, contact: &Contact) -> StoreResult<()> {
        contact.validate()?;

        self.conn
            .execute(
                "INSERT INTO contacts (Name, Number, Email, Address)
                 VALUES (?1, ?2, ?3, ?4);",
                params![
                    contact.name.as_str(),
                    contact.number,
                    contact.email.as_str(),
                    contact.address.as_str(),
                ],
            )
            .map_err(|err| map_write_error(err, contact.number))?;

        Ok(())
    }

    fn find_by_number(&self, number: ContactNumber) -> StoreResult<Option<Contact>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CONTACT_SELECT_SQL} WHERE Number = ?1;"))?;

        let mut rows = stmt.query(params![number])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_contact_row(row)?));
        }

        Ok(None)
    }

    fn update(&self, key: ContactNumber, contact: &Contact) -> StoreResult<bool> {
        contact.validate()?;

        let changed = self
            .conn
            .execute(
                "UPDATE contacts
                 SET
                    Name = ?1,
                    Number = ?2,
                    Email = ?3,
                    Address = ?4
                 WHERE Number = ?5;",
                params![
                    contact.name.as_str(),
                    contact.number,
                    contact.email.as_str(),
                    contact.address.as_str(),
                    key,
                ],
            )
            .map_err(|err| map_write_error(err, contact.number))?;

        Ok(changed > 0)
    }

    fn delete(&self, number: ContactNumber) -> StoreResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM contacts WHERE Number = ?1;", params![number])?;

        Ok(changed > 0)
    }
}

fn map_write_error(err: rusqlite::Error, number: ContactNumber) -> StoreError {
    match err.sqlite_error_code() {
        Some(ErrorCode::ConstraintViolation) => StoreError::ConstraintViolation { number },
        _ => err.into(),
    }
}

fn parse_contact_row(row: &Row<'_>) -> StoreResult<Contact> {
    let number = row.get::<_, ContactNumber>("Number").map_err(|err| {
        StoreError::InvalidData(format!("contacts.Number is not an integer: {err}"))
    })?;

    Ok(Contact {
        name: row.get("Name")?,
        number,
        email: row.get("Email")?,
        address: row.get("Address")?,
    })
}
