//! Contact domain model.
//!
//! # Responsibility
//! - Define the single record persisted in the `contacts` table.
//! - Enforce the required-field rule before anything reaches storage.
//!
//! # Invariants
//! - `number` is the primary key and is never shared by two contacts.
//! - `name`, `email` and `address` are non-empty after trimming.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Primary key of a contact, stored as `contacts.Number`.
pub type ContactNumber = i64;

/// Field names as shown to the user, used in validation messages.
pub const FIELD_NAME: &str = "Name";
pub const FIELD_NUMBER: &str = "Number";
pub const FIELD_EMAIL: &str = "Email";
pub const FIELD_ADDRESS: &str = "Address";

/// Validation failures for contact input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactValidationError {
    /// A required field is empty or whitespace only.
    EmptyField(&'static str),
    /// The Number field is not a valid integer.
    InvalidNumber(String),
}

impl Display for ContactValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyField(field) => write!(f, "{field} is required"),
            Self::InvalidNumber(raw) => write!(f, "`{raw}` is not a valid contact number"),
        }
    }
}

impl Error for ContactValidationError {}

/// One row of the contact book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub name: String,
    pub number: ContactNumber,
    pub email: String,
    pub address: String,
}

impl Contact {
    pub fn new(
        name: impl Into<String>,
        number: ContactNumber,
        email: impl Into<String>,
        address: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            number,
            email: email.into(),
            address: address.into(),
        }
    }

    /// Checks the required-field rule.
    ///
    /// Field contents are otherwise free-form; email shape is not checked.
    pub fn validate(&self) -> Result<(), ContactValidationError> {
        for (field, value) in [
            (FIELD_NAME, &self.name),
            (FIELD_EMAIL, &self.email),
            (FIELD_ADDRESS, &self.address),
        ] {
            if value.trim().is_empty() {
                return Err(ContactValidationError::EmptyField(field));
            }
        }
        Ok(())
    }
}

/// Parses user-entered Number text into a contact key.
///
/// Surrounding whitespace is ignored.
pub fn parse_contact_number(raw: &str) -> Result<ContactNumber, ContactValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ContactValidationError::EmptyField(FIELD_NUMBER));
    }
    trimmed
        .parse::<ContactNumber>()
        .map_err(|_| ContactValidationError::InvalidNumber(trimmed.to_string()))
}
