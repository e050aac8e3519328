//! Contact model: the stored record, the raw submission, and the validated field set.

use crate::domain::{ContactId, EmailAddress, PhoneNumber};
use std::fmt;

/// One of the three user-editable contact attributes.
///
/// Used to tag validation errors, store filters, and unique-constraint
/// conflicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Phone,
    Email,
}

impl Field {
    /// Tag used in error lists and as the storage column name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Phone => "phone",
            Self::Email => "email",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored contact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contact {
    /// System-generated identifier
    pub id: ContactId,

    /// Display name, also the lookup key in URLs
    pub name: String,

    /// Mobile phone number as entered
    pub phone: String,

    /// Email address
    pub email: String,
}

impl Contact {
    /// Value of the given field.
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Phone => &self.phone,
            Field::Email => &self.email,
        }
    }
}

/// Raw, unvalidated contact values as they arrived in a form.
///
/// Also used to re-render a form with exactly what the user typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactInput {
    pub name: String,
    pub phone: String,
    pub email: String,
}

impl ContactInput {
    pub fn new(
        name: impl Into<String>,
        phone: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
            email: email.into(),
        }
    }

    /// Value of the given field.
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Phone => &self.phone,
            Field::Email => &self.email,
        }
    }
}

impl From<&Contact> for ContactInput {
    fn from(contact: &Contact) -> Self {
        Self {
            name: contact.name.clone(),
            phone: contact.phone.clone(),
            email: contact.email.clone(),
        }
    }
}

/// Contact values that passed every format rule, ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactFields {
    pub name: String,
    pub phone: PhoneNumber,
    pub email: EmailAddress,
}

impl ContactFields {
    /// Attach an identifier, producing the record as it will be stored.
    pub fn into_contact(self, id: ContactId) -> Contact {
        Contact {
            id,
            name: self.name,
            phone: self.phone.into_inner(),
            email: self.email.into_inner(),
        }
    }
}
