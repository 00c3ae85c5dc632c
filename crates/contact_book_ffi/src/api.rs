//! UI-facing contact book session exposed to the desktop shell via FRB.
//!
//! # Responsibility
//! - Own the single database connection for the lifetime of the UI process.
//! - Hold the view model: four form fields, the contact list, the output text.
//! - Translate Add/Delete/Search/Edit/Exit actions into store calls.
//!
//! # Invariants
//! - Actions never panic; store failures are logged and returned as
//!   `ActionResponse { ok: false, .. }`.
//! - A failed action leaves the form and the contact list untouched.
//! - The contact list is reloaded in full after every applied mutation.

use contact_book_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, open_db,
    parse_contact_number, Contact, ContactNumber, ContactService, ContactValidationError, DbError,
    SqliteContactRepository, StoreError,
};
use log::{error, info, warn};
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

const DB_PATH_ENV: &str = "CONTACT_BOOK_DB_PATH";
const DEFAULT_DB_FILE_NAME: &str = "contact_book.sqlite3";
const NOT_FOUND_MESSAGE: &str = "Contact not found.";

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes core logging once per process.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Where the session finds its database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub db_path: PathBuf,
}

impl SessionConfig {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }

    /// Resolves the database path: explicit path, then `CONTACT_BOOK_DB_PATH`,
    /// then a file in the system temp directory.
    pub fn resolve(explicit: Option<PathBuf>) -> Self {
        if let Some(path) = explicit {
            return Self::new(path);
        }
        if let Ok(raw) = std::env::var(DB_PATH_ENV) {
            let trimmed = raw.trim();
            if !trimmed.is_empty() {
                return Self::new(trimmed);
            }
        }
        Self::new(std::env::temp_dir().join(DEFAULT_DB_FILE_NAME))
    }
}

/// Session lifecycle failures. Both are fatal for the session.
#[derive(Debug)]
pub enum SessionError {
    /// The database could not be opened at startup.
    Connection(DbError),
    /// The connection refused to close cleanly on exit.
    Close(rusqlite::Error),
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Connection(err) => write!(f, "cannot connect to contact book: {err}"),
            Self::Close(err) => write!(f, "cannot close contact book connection: {err}"),
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Connection(err) => Some(err),
            Self::Close(err) => Some(err),
        }
    }
}

/// Raw text of the four input fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactForm {
    pub name: String,
    pub number: String,
    pub email: String,
    pub address: String,
}

impl ContactForm {
    pub fn new(
        name: impl Into<String>,
        number: impl Into<String>,
        email: impl Into<String>,
        address: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            number: number.into(),
            email: email.into(),
            address: address.into(),
        }
    }

    /// Parses the Number field only.
    pub fn parse_number(&self) -> Result<ContactNumber, ContactValidationError> {
        parse_contact_number(&self.number)
    }

    /// Builds a validated contact from all four fields.
    ///
    /// Text fields are stored as typed; only the Number is trimmed.
    pub fn to_contact(&self) -> Result<Contact, ContactValidationError> {
        let contact = Contact::new(
            self.name.clone(),
            self.parse_number()?,
            self.email.clone(),
            self.address.clone(),
        );
        contact.validate()?;
        Ok(contact)
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// One line of the contact list view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactRow {
    pub name: String,
    pub number: ContactNumber,
    pub email: String,
    pub address: String,
}

impl From<Contact> for ContactRow {
    fn from(value: Contact) -> Self {
        Self {
            name: value.name,
            number: value.number,
            email: value.email,
            address: value.address,
        }
    }
}

/// Outcome envelope for one UI action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    /// Whether the action was carried out.
    pub ok: bool,
    /// Human-readable status line for the UI.
    pub message: String,
}

impl ActionResponse {
    fn success(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
        }
    }
}

/// Reasons an action can fail before or during the store call.
#[derive(Debug)]
enum ActionError {
    Input(ContactValidationError),
    Store(StoreError),
}

impl Display for ActionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Input(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl From<ContactValidationError> for ActionError {
    fn from(value: ContactValidationError) -> Self {
        Self::Input(value)
    }
}

impl From<StoreError> for ActionError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Live contact book bound to one open connection.
#[flutter_rust_bridge::frb(opaque)]
pub struct ContactBookSession {
    conn: Connection,
    form: ContactForm,
    contacts: Vec<ContactRow>,
    output: String,
}

impl ContactBookSession {
    /// Connects to the configured database and loads the contact list.
    ///
    /// # Errors
    /// - `SessionError::Connection` when the database is missing or
    ///   unreachable. Callers should treat this as fatal at startup.
    #[flutter_rust_bridge::frb(sync)]
    pub fn open(config: &SessionConfig) -> Result<Self, SessionError> {
        let conn = open_db(&config.db_path).map_err(|err| {
            error!(
                "event=session_open module=ffi status=error db_path={} error={}",
                config.db_path.display(),
                err
            );
            SessionError::Connection(err)
        })?;
        info!(
            "event=session_open module=ffi status=ok db_path={}",
            config.db_path.display()
        );
        Ok(Self::with_connection(conn))
    }

    /// Wraps an already opened and provisioned connection.
    pub fn with_connection(conn: Connection) -> Self {
        let mut session = Self {
            conn,
            form: ContactForm::default(),
            contacts: Vec::new(),
            output: String::new(),
        };
        session.refresh();
        session
    }

    #[flutter_rust_bridge::frb(sync)]
    pub fn form(&self) -> ContactForm {
        self.form.clone()
    }

    #[flutter_rust_bridge::frb(sync)]
    pub fn set_form(&mut self, form: ContactForm) {
        self.form = form;
    }

    #[flutter_rust_bridge::frb(sync)]
    pub fn contacts(&self) -> Vec<ContactRow> {
        self.contacts.clone()
    }

    /// Text shown in the search result display area.
    #[flutter_rust_bridge::frb(sync)]
    pub fn output(&self) -> String {
        self.output.clone()
    }

    /// Reloads the full contact list into the view model.
    ///
    /// On failure the previous list is kept.
    #[flutter_rust_bridge::frb(sync)]
    pub fn refresh(&mut self) -> ActionResponse {
        match self.service().list_contacts() {
            Ok(contacts) => {
                self.contacts = contacts.into_iter().map(ContactRow::from).collect();
                ActionResponse::success(format!("{} contact(s).", self.contacts.len()))
            }
            Err(err) => {
                warn!("event=ui_refresh module=ffi status=error error={err}");
                ActionResponse::failure(format!("refresh failed: {err}"))
            }
        }
    }

    /// Add button: inserts the contact described by the form.
    #[flutter_rust_bridge::frb(sync)]
    pub fn add(&mut self) -> ActionResponse {
        let result = self.form.to_contact().map_err(ActionError::from).and_then(|contact| {
            self.service()
                .add_contact(&contact)
                .map_err(ActionError::from)
        });

        match result {
            Ok(()) => self.after_mutation("Contact added."),
            Err(err) => Self::reject("add", err),
        }
    }

    /// Delete button: removes the contact named by the Number field.
    #[flutter_rust_bridge::frb(sync)]
    pub fn delete(&mut self) -> ActionResponse {
        let result = self.form.parse_number().map_err(ActionError::from).and_then(|number| {
            self.service()
                .delete_contact(number)
                .map(|removed| (number, removed))
                .map_err(ActionError::from)
        });

        match result {
            Ok((_, true)) => self.after_mutation("Contact deleted."),
            Ok((number, false)) => {
                self.after_mutation(format!("No contact matched number {number}."))
            }
            Err(err) => Self::reject("delete", err),
        }
    }

    /// Search button: shows the contact named by the Number field, then
    /// clears every input field.
    #[flutter_rust_bridge::frb(sync)]
    pub fn search(&mut self) -> ActionResponse {
        let result = self.form.parse_number().map_err(ActionError::from).and_then(|number| {
            self.service()
                .find_contact(number)
                .map_err(ActionError::from)
        });

        match result {
            Ok(found) => {
                let found_any = found.is_some();
                self.output = found.as_ref().map_or_else(
                    || NOT_FOUND_MESSAGE.to_string(),
                    format_search_result,
                );
                self.form.clear();
                if found_any {
                    ActionResponse::success("Contact found.")
                } else {
                    ActionResponse::success(NOT_FOUND_MESSAGE)
                }
            }
            Err(err) => Self::reject("search", err),
        }
    }

    /// Edit button: the Number field is both the lookup key and the new
    /// number, so changing it makes the edit miss the original row.
    #[flutter_rust_bridge::frb(sync)]
    pub fn edit(&mut self) -> ActionResponse {
        match self.form.parse_number() {
            Ok(key) => self.edit_with_key(key),
            Err(err) => Self::reject("edit", err.into()),
        }
    }

    /// Overwrites the contact stored under `key` with the form contents.
    #[flutter_rust_bridge::frb(sync)]
    pub fn edit_with_key(&mut self, key: ContactNumber) -> ActionResponse {
        let result = self.form.to_contact().map_err(ActionError::from).and_then(|contact| {
            self.service()
                .edit_contact(key, &contact)
                .map_err(ActionError::from)
        });

        match result {
            Ok(true) => self.after_mutation("Contact updated."),
            Ok(false) => self.after_mutation(format!("No contact matched number {key}.")),
            Err(err) => Self::reject("edit", err),
        }
    }

    /// Exit button: releases the connection. The host terminates afterwards.
    #[flutter_rust_bridge::frb(sync)]
    pub fn exit(self) -> Result<(), SessionError> {
        match self.conn.close() {
            Ok(()) => {
                info!("event=session_close module=ffi status=ok");
                Ok(())
            }
            Err((_, err)) => {
                error!("event=session_close module=ffi status=error error={err}");
                Err(SessionError::Close(err))
            }
        }
    }

    fn service(&self) -> ContactService<SqliteContactRepository<'_>> {
        ContactService::new(SqliteContactRepository::new(&self.conn))
    }

    fn after_mutation(&mut self, message: impl Into<String>) -> ActionResponse {
        let message = message.into();
        let refreshed = self.refresh();
        if refreshed.ok {
            ActionResponse::success(message)
        } else {
            ActionResponse::success(format!("{message} ({})", refreshed.message))
        }
    }

    fn reject(action: &str, err: ActionError) -> ActionResponse {
        warn!("event=ui_{action} module=ffi status=error error={err}");
        ActionResponse::failure(format!("{action} failed: {err}"))
    }
}

fn format_search_result(contact: &Contact) -> String {
    format!(
        "Contact found:\nName: {}\nNumber: {}\nEmail: {}\nAddress: {}",
        contact.name, contact.number, contact.email, contact.address
    )
}

#[cfg(test)]
mod tests {
    use super::{
        core_version, init_logging, ActionResponse, ContactBookSession, ContactForm, ContactRow,
        SessionConfig, SessionError,
    };
    use contact_book_core::{open_db_in_memory, provision_db};

    fn session() -> ContactBookSession {
        ContactBookSession::with_connection(open_db_in_memory().unwrap())
    }

    fn add(session: &mut ContactBookSession, name: &str, number: &str) -> ActionResponse {
        session.set_form(ContactForm::new(name, number, "a@x.com", "1 Rd"));
        session.add()
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_relative_dir_and_bad_level() {
        assert!(!init_logging("info".to_string(), "tmp/logs".to_string()).is_empty());
        assert!(!init_logging("verbose".to_string(), "/tmp".to_string()).is_empty());
    }

    #[test]
    fn open_fails_fatally_when_database_is_missing() {
        let dir = tempfile::tempdir().unwrap();
        let config = SessionConfig::new(dir.path().join("missing.sqlite3"));

        let err = ContactBookSession::open(&config).err().unwrap();
        assert!(matches!(err, SessionError::Connection(_)));
        assert!(!config.db_path.exists());
    }

    #[test]
    fn open_loads_existing_contacts_and_exit_closes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("book.sqlite3");
        {
            let mut seeded = ContactBookSession::with_connection(provision_db(&path).unwrap());
            assert!(add(&mut seeded, "Ann", "555").ok);
            seeded.exit().unwrap();
        }

        let session = ContactBookSession::open(&SessionConfig::new(&path)).unwrap();
        assert_eq!(session.contacts().len(), 1);
        session.exit().unwrap();
    }

    #[test]
    fn resolve_prefers_explicit_path() {
        let config = SessionConfig::resolve(Some("/data/book.sqlite3".into()));
        assert_eq!(config.db_path, std::path::PathBuf::from("/data/book.sqlite3"));
    }

    #[test]
    fn add_refreshes_list_and_keeps_form() {
        let mut session = session();
        let response = add(&mut session, "Ann", "555");

        assert!(response.ok, "{}", response.message);
        assert_eq!(
            session.contacts(),
            vec![ContactRow {
                name: "Ann".to_string(),
                number: 555,
                email: "a@x.com".to_string(),
                address: "1 Rd".to_string(),
            }]
        );
        assert_eq!(session.form().number, "555");
    }

    #[test]
    fn failed_add_leaves_form_and_list_unchanged() {
        let mut session = session();
        assert!(add(&mut session, "Ann", "555").ok);

        let duplicate = ContactForm::new("Bob", "555", "b@x.com", "2 Rd");
        session.set_form(duplicate.clone());
        let response = session.add();

        assert!(!response.ok);
        assert!(response.message.contains("already exists"));
        assert_eq!(session.form(), duplicate);
        assert_eq!(session.contacts().len(), 1);
        assert_eq!(session.contacts()[0].name, "Ann");
    }

    #[test]
    fn add_rejects_empty_required_field() {
        let mut session = session();
        session.set_form(ContactForm::new("Ann", "555", "", "1 Rd"));

        let response = session.add();
        assert!(!response.ok);
        assert!(response.message.contains("Email"));
        assert!(session.contacts().is_empty());
    }

    #[test]
    fn search_formats_hit_and_clears_form() {
        let mut session = session();
        assert!(add(&mut session, "Ann", "555").ok);

        session.set_form(ContactForm::new("", "555", "", ""));
        let response = session.search();

        assert!(response.ok);
        assert_eq!(
            session.output(),
            "Contact found:\nName: Ann\nNumber: 555\nEmail: a@x.com\nAddress: 1 Rd"
        );
        assert_eq!(session.form(), ContactForm::default());
    }

    #[test]
    fn search_miss_reports_not_found_and_clears_form() {
        let mut session = session();
        session.set_form(ContactForm::new("Ann", "404", "a@x.com", "1 Rd"));

        let response = session.search();
        assert!(response.ok);
        assert_eq!(session.output(), "Contact not found.");
        assert_eq!(session.form(), ContactForm::default());
    }

    #[test]
    fn search_with_invalid_number_keeps_form() {
        let mut session = session();
        let form = ContactForm::new("Ann", "five", "", "");
        session.set_form(form.clone());

        let response = session.search();
        assert!(!response.ok);
        assert_eq!(session.form(), form);
        assert_eq!(session.output(), "");
    }

    #[test]
    fn delete_uses_number_field_only() {
        let mut session = session();
        assert!(add(&mut session, "Ann", "555").ok);
        assert!(add(&mut session, "Bob", "556").ok);

        session.set_form(ContactForm::new("", "555", "", ""));
        let response = session.delete();
        assert!(response.ok);
        assert_eq!(session.contacts().len(), 1);
        assert_eq!(session.contacts()[0].number, 556);

        let again = session.delete();
        assert!(again.ok);
        assert!(again.message.contains("No contact matched"));
    }

    #[test]
    fn edit_updates_row_keyed_by_number_field() {
        let mut session = session();
        assert!(add(&mut session, "Ann", "555").ok);

        session.set_form(ContactForm::new("Ann Lee", "555", "ann@x.com", "9 Ave"));
        let response = session.edit();

        assert!(response.ok);
        assert_eq!(response.message, "Contact updated.");
        assert_eq!(session.contacts()[0].name, "Ann Lee");
        assert_eq!(session.contacts()[0].address, "9 Ave");
    }

    #[test]
    fn edit_with_changed_number_misses_original_row() {
        let mut session = session();
        assert!(add(&mut session, "Ann", "555").ok);

        session.set_form(ContactForm::new("Ann", "777", "a@x.com", "1 Rd"));
        let response = session.edit();

        assert!(response.ok);
        assert!(response.message.contains("No contact matched number 777"));
        assert_eq!(session.contacts().len(), 1);
        assert_eq!(session.contacts()[0].number, 555);
    }

    #[test]
    fn edit_with_explicit_key_renumbers_contact() {
        let mut session = session();
        assert!(add(&mut session, "Ann", "555").ok);

        session.set_form(ContactForm::new("Ann", "777", "a@x.com", "1 Rd"));
        let response = session.edit_with_key(555);

        assert!(response.ok);
        assert_eq!(session.contacts().len(), 1);
        assert_eq!(session.contacts()[0].number, 777);
    }

    fn drop_contacts_table(session: &ContactBookSession) {
        session
            .conn
            .execute_batch("DROP TABLE contacts;")
            .unwrap();
    }

    #[test]
    fn store_failure_during_add_is_reported_not_raised() {
        let mut session = session();
        assert!(add(&mut session, "Ann", "555").ok);
        drop_contacts_table(&session);

        let form = ContactForm::new("Bob", "556", "b@x.com", "2 Rd");
        session.set_form(form.clone());
        let response = session.add();

        assert!(!response.ok);
        assert!(response.message.starts_with("add failed"));
        assert_eq!(session.form(), form);
        assert_eq!(session.contacts().len(), 1);
    }

    #[test]
    fn store_failure_during_delete_search_and_edit_is_reported() {
        let mut session = session();
        assert!(add(&mut session, "Ann", "555").ok);
        drop_contacts_table(&session);

        let form = ContactForm::new("Ann", "555", "a@x.com", "1 Rd");
        for (action, response) in [
            ("delete", {
                session.set_form(form.clone());
                session.delete()
            }),
            ("search", {
                session.set_form(form.clone());
                session.search()
            }),
            ("edit", {
                session.set_form(form.clone());
                session.edit()
            }),
        ] {
            assert!(!response.ok, "{action} should fail");
            assert!(response.message.starts_with(action), "{}", response.message);
        }

        assert_eq!(session.form(), form);
        assert_eq!(session.output(), "");
        assert_eq!(session.contacts().len(), 1);
    }

    #[test]
    fn refresh_failure_after_mutation_keeps_previous_list() {
        let mut session = session();
        assert!(add(&mut session, "Ann", "555").ok);

        session
            .conn
            .execute_batch(
                "DROP TABLE contacts;
                 CREATE TABLE contacts (
                     Name TEXT NOT NULL,
                     Number NOT NULL,
                     Email TEXT NOT NULL,
                     Address TEXT NOT NULL
                 );
                 INSERT INTO contacts VALUES ('Ann', 555, 'a@x.com', '1 Rd');
                 INSERT INTO contacts VALUES ('Broken', 'n/a', 'x@x.com', '0 Rd');",
            )
            .unwrap();

        let response = add(&mut session, "Bob", "556");
        assert!(response.ok, "{}", response.message);
        assert!(response.message.starts_with("Contact added."));
        assert!(response.message.contains("refresh failed"));
        assert_eq!(session.contacts().len(), 1);
        assert_eq!(session.contacts()[0].number, 555);
    }

    #[test]
    fn delete_and_edit_reject_unparsable_number() {
        let mut session = session();
        assert!(add(&mut session, "Ann", "555").ok);

        let form = ContactForm::new("Ann", "5x5", "a@x.com", "1 Rd");
        session.set_form(form.clone());

        let deleted = session.delete();
        assert!(!deleted.ok);
        assert!(deleted.message.contains("not a valid contact number"));

        let edited = session.edit();
        assert!(!edited.ok);
        assert!(edited.message.contains("not a valid contact number"));

        assert_eq!(session.form(), form);
        assert_eq!(session.contacts().len(), 1);
    }
}
