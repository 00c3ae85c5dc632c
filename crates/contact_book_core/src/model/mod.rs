//! Domain model for the contact book.
//!
//! # Invariants
//! - Every contact is identified by its `ContactNumber`.
//! - Deletion is a hard delete; there are no tombstones.

pub mod contact;
