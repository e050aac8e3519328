//! Contact Book - a server-rendered address book.
//!
//! Lists, creates, edits, deletes, and shows contacts (name, mobile phone,
//! email), each of which must be unique across the book.
//!
//! # Architecture
//!
//! - **domain**: Validated value objects (contact id, email, phone)
//! - **models**: The contact record and submitted form values
//! - **store**: `ContactStore` trait and its SQLite implementation
//! - **services**: Format and uniqueness validation
//! - **session**: Session cookie and single-use flash messages
//! - **server**: Routes, form schemas, templates, method override
//! - **config**: Configuration from environment variables
//! - **error**: Error types

pub mod config;
pub mod domain;
pub mod error;
pub mod models;
pub mod server;
pub mod services;
pub mod session;
pub mod store;

pub use config::{Config, DatabaseLocation};
pub use error::{AppError, ConfigError, FieldError, FieldErrors, StoreError, ValidationFailure};
pub use models::{Contact, ContactFields, ContactInput, Field};
pub use server::{build_app, run_server, App, AppState};
pub use services::ContactValidator;
pub use session::FlashStore;
pub use store::{ContactFilter, ContactStore, SqliteContactStore};
