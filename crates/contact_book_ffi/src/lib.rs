//! FFI surface of the contact book for the desktop shell.
//!
//! The shell drives one `ContactBookSession` per process; see `api`.

pub mod api;

pub use api::{
    ActionResponse, ContactBookSession, ContactForm, ContactRow, SessionConfig, SessionError,
};
