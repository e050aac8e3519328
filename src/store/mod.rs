//! Contact persistence.
//!
//! The [`ContactStore`] trait is the seam between route handlers and storage;
//! [`SqliteContactStore`] is the production implementation.

mod schema;
mod sqlite_contact_store;
mod traits;

pub use sqlite_contact_store::SqliteContactStore;
pub use traits::{ContactFilter, ContactStore};
