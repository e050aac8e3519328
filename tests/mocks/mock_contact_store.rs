use async_trait::async_trait;
use contact_book::domain::ContactId;
use contact_book::error::{StoreError, StoreResult};
use contact_book::models::{Contact, ContactFields, Field};
use contact_book::store::{ContactFilter, ContactStore};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Mock contact store for testing.
///
/// Keeps contacts in insertion order, counts calls per method, and can be
/// told to fail in specific ways.
#[allow(dead_code)]
#[derive(Clone, Default)]
pub struct MockContactStore {
    contacts: Arc<Mutex<Vec<Contact>>>,
    call_counts: Arc<Mutex<HashMap<String, usize>>>,
    write_conflict: Arc<Mutex<Option<Field>>>,
    broken: Arc<Mutex<bool>>,
}

#[allow(dead_code)]
impl MockContactStore {
    /// Create a new empty MockContactStore.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a contact directly, bypassing all checks.
    pub fn add_contact(&self, id: &str, name: &str, phone: &str, email: &str) -> Contact {
        let contact = Contact {
            id: ContactId::new(id).unwrap(),
            name: name.to_string(),
            phone: phone.to_string(),
            email: email.to_string(),
        };
        self.contacts.lock().unwrap().push(contact.clone());
        contact
    }

    /// Snapshot of stored contacts.
    pub fn contacts(&self) -> Vec<Contact> {
        self.contacts.lock().unwrap().clone()
    }

    /// Make every insert and update fail with a conflict on `field`.
    ///
    /// Simulates a competing request winning the race after validation.
    pub fn conflict_on_write(&self, field: Field) {
        *self.write_conflict.lock().unwrap() = Some(field);
    }

    /// Make every call fail as if the database were unreachable.
    pub fn break_store(&self) {
        *self.broken.lock().unwrap() = true;
    }

    /// Get the number of times a method was called.
    pub fn get_call_count(&self, method: &str) -> usize {
        let counts = self.call_counts.lock().unwrap();
        *counts.get(method).unwrap_or(&0)
    }

    fn track_call(&self, method: &str) -> StoreResult<()> {
        let mut counts = self.call_counts.lock().unwrap();
        *counts.entry(method.to_string()).or_insert(0) += 1;

        if *self.broken.lock().unwrap() {
            return Err(StoreError::Task("mock store is broken".to_string()));
        }
        Ok(())
    }

    fn check_conflict(&self) -> StoreResult<()> {
        match *self.write_conflict.lock().unwrap() {
            Some(field) => Err(StoreError::Conflict(field)),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ContactStore for MockContactStore {
    async fn find_one(&self, filter: &ContactFilter) -> StoreResult<Option<Contact>> {
        self.track_call("find_one")?;

        let contacts = self.contacts.lock().unwrap();
        Ok(contacts.iter().find(|c| filter.matches(c)).cloned())
    }

    async fn find_all(&self) -> StoreResult<Vec<Contact>> {
        self.track_call("find_all")?;
        Ok(self.contacts())
    }

    async fn insert(&self, fields: &ContactFields) -> StoreResult<Contact> {
        self.track_call("insert")?;
        self.check_conflict()?;

        let contact = fields.clone().into_contact(ContactId::generate());
        self.contacts.lock().unwrap().push(contact.clone());
        Ok(contact)
    }

    async fn update_by_id(&self, id: &ContactId, fields: &ContactFields) -> StoreResult<bool> {
        self.track_call("update_by_id")?;
        self.check_conflict()?;

        let mut contacts = self.contacts.lock().unwrap();
        match contacts.iter_mut().find(|c| &c.id == id) {
            Some(slot) => {
                *slot = fields.clone().into_contact(id.clone());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_one(&self, filter: &ContactFilter) -> StoreResult<bool> {
        self.track_call("delete_one")?;

        let mut contacts = self.contacts.lock().unwrap();
        match contacts.iter().position(|c| filter.matches(c)) {
            Some(index) => {
                contacts.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
