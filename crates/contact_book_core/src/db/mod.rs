//! SQLite storage bootstrap and schema provisioning entry points.
//!
//! # Responsibility
//! - Provision the contact book database and its `contacts` table.
//! - Open connections to an already provisioned database.
//!
//! # Invariants
//! - Schema version is tracked via `PRAGMA user_version`.
//! - `open_db` never creates a database file; only `provision_db` does.
//! - Core code must not touch `contacts` before the schema is applied.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory, provision_db};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// `open_db` was pointed at a path with no database behind it.
    NotProvisioned { path: PathBuf },
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::NotProvisioned { path } => write!(
                f,
                "no contact book database at `{}`; run provisioning first",
                path.display()
            ),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "database schema version {db_version} is newer than supported {latest_supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::NotProvisioned { .. } | Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
