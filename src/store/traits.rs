use crate::domain::ContactId;
use crate::error::StoreResult;
use crate::models::{Contact, ContactFields, Field};
use async_trait::async_trait;

/// Single-field equality filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactFilter {
    pub field: Field,
    pub value: String,
}

impl ContactFilter {
    pub fn new(field: Field, value: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
        }
    }

    pub fn name(value: impl Into<String>) -> Self {
        Self::new(Field::Name, value)
    }

    pub fn phone(value: impl Into<String>) -> Self {
        Self::new(Field::Phone, value)
    }

    pub fn email(value: impl Into<String>) -> Self {
        Self::new(Field::Email, value)
    }

    /// Whether `contact` matches this filter.
    pub fn matches(&self, contact: &Contact) -> bool {
        contact.get(self.field) == self.value
    }
}

/// Storage for contact records.
///
/// Every call is independent; nothing spans more than one operation.
/// Implementations must reject writes that would give two contacts the same
/// name, phone, or email with `StoreError::Conflict`.
#[async_trait]
pub trait ContactStore: Send + Sync {
    /// Find the first contact matching `filter`.
    async fn find_one(&self, filter: &ContactFilter) -> StoreResult<Option<Contact>>;

    /// All contacts in insertion order.
    async fn find_all(&self) -> StoreResult<Vec<Contact>>;

    /// Store a new contact under a freshly generated identifier.
    async fn insert(&self, fields: &ContactFields) -> StoreResult<Contact>;

    /// Overwrite all fields of the contact with `id`.
    ///
    /// Returns `false` if no such contact exists.
    async fn update_by_id(&self, id: &ContactId, fields: &ContactFields) -> StoreResult<bool>;

    /// Delete the first contact matching `filter`.
    ///
    /// Returns `false` if nothing matched.
    async fn delete_one(&self, filter: &ContactFilter) -> StoreResult<bool>;
}
