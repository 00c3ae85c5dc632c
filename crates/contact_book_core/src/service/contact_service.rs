//! Contact use-case service.
//!
//! # Responsibility
//! - Provide stable CRUD entry points for adapter and CLI callers.
//! - Emit metadata-only diagnostic events around every use-case.
//!
//! # Invariants
//! - Service APIs never bypass repository validation.
//! - Log events carry contact numbers and counts, never field contents.

use crate::model::contact::{Contact, ContactNumber};
use crate::repo::contact_repo::{ContactRepository, StoreResult};
use log::{debug, info, warn};

/// Use-case service wrapper for contact CRUD operations.
pub struct ContactService<R: ContactRepository> {
    repo: R,
}

impl<R: ContactRepository> ContactService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Returns all stored contacts in storage-native order.
    pub fn list_contacts(&self) -> StoreResult<Vec<Contact>> {
        let contacts = self.repo.list_all();
        if let Ok(items) = &contacts {
            debug!(
                "event=contact_list module=service status=ok count={}",
                items.len()
            );
        }
        contacts
    }

    /// Adds a new contact.
    pub fn add_contact(&self, contact: &Contact) -> StoreResult<()> {
        log_outcome("contact_add", contact.number, self.repo.create(contact))
    }

    /// Finds a contact by number.
    pub fn find_contact(&self, number: ContactNumber) -> StoreResult<Option<Contact>> {
        let found = self.repo.find_by_number(number)?;
        debug!(
            "event=contact_find module=service status=ok number={} hit={}",
            number,
            found.is_some()
        );
        Ok(found)
    }

    /// Overwrites the contact stored under `key`.
    ///
    /// Returns `Ok(false)` when no contact is stored under `key`.
    pub fn edit_contact(&self, key: ContactNumber, contact: &Contact) -> StoreResult<bool> {
        let matched = log_outcome("contact_edit", key, self.repo.update(key, contact))?;
        if !matched {
            info!(
                "event=contact_edit module=service status=no_match number={}",
                key
            );
        }
        Ok(matched)
    }

    /// Deletes the contact stored under `number`.
    ///
    /// Returns `Ok(false)` when there was nothing to delete.
    pub fn delete_contact(&self, number: ContactNumber) -> StoreResult<bool> {
        let removed = log_outcome("contact_delete", number, self.repo.delete(number))?;
        if !removed {
            info!(
                "event=contact_delete module=service status=no_match number={}",
                number
            );
        }
        Ok(removed)
    }
}

fn log_outcome<T>(event: &str, number: ContactNumber, result: StoreResult<T>) -> StoreResult<T> {
    match &result {
        Ok(_) => info!("event={event} module=service status=ok number={number}"),
        Err(err) => warn!("event={event} module=service status=error number={number} error={err}"),
    }
    result
}
