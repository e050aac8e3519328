//! Form schemas, one per mutating endpoint.
//!
//! Wire keys follow the HTML forms (`nama`, `noHp`, ...). Missing or
//! unknown keys are rejected before a handler runs.

use crate::models::ContactInput;
use serde::Deserialize;

/// `POST /contact`
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateContactForm {
    #[serde(rename = "nama")]
    pub name: String,
    #[serde(rename = "noHp")]
    pub phone: String,
    pub email: String,
}

impl From<CreateContactForm> for ContactInput {
    fn from(form: CreateContactForm) -> Self {
        ContactInput::new(form.name, form.phone, form.email)
    }
}

/// `PUT /contact`
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateContactForm {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "nama")]
    pub name: String,
    #[serde(rename = "noHp")]
    pub phone: String,
    pub email: String,
    #[serde(rename = "oldNama")]
    pub old_name: String,
    #[serde(rename = "oldNoHp")]
    pub old_phone: String,
    #[serde(rename = "oldEmail")]
    pub old_email: String,
}

impl UpdateContactForm {
    /// Split into the submitted values and the values the form was opened with.
    pub fn into_inputs(self) -> (String, ContactInput, ContactInput) {
        let current = ContactInput::new(self.name, self.phone, self.email);
        let previous = ContactInput::new(self.old_name, self.old_phone, self.old_email);
        (self.id, current, previous)
    }
}

/// `DELETE /contact`
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeleteContactForm {
    #[serde(rename = "nama")]
    pub name: String,
}
