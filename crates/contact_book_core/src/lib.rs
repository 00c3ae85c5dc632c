//! Core domain logic for the contact book.
//! This crate owns the `contacts` schema and every rule about its rows.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use db::{open_db, open_db_in_memory, provision_db, DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::contact::{parse_contact_number, Contact, ContactNumber, ContactValidationError};
pub use repo::contact_repo::{ContactRepository, SqliteContactRepository, StoreError, StoreResult};
pub use service::contact_service::ContactService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
