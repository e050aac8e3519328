//! Validation rules for contact submissions.
//!
//! Format rules are local; uniqueness rules ask the store. Every rule runs
//! on every submission and each failure adds one tagged error, in a fixed
//! order, so the form can show all problems at once.

use crate::domain::{ContactId, EmailAddress, PhoneLocale, PhoneNumber};
use crate::error::{FieldErrors, StoreResult, ValidationFailure, ValidationResult};
use crate::models::{ContactFields, ContactInput, Field};
use crate::store::{ContactFilter, ContactStore};
use std::sync::Arc;
use tracing::debug;

pub const NAME_REQUIRED: &str = "Name is required!";
pub const EMAIL_INVALID: &str = "Email is not valid!";
pub const PHONE_INVALID: &str = "Phone number is not valid!";

/// Message shown when another contact already holds the value of `field`.
pub fn taken_message(field: Field) -> &'static str {
    match field {
        Field::Name => "Contact name is already taken!",
        Field::Phone => "Phone number is already taken!",
        Field::Email => "Email is already taken!",
    }
}

/// Checks contact submissions before they are written.
#[derive(Clone)]
pub struct ContactValidator {
    store: Arc<dyn ContactStore>,
    locale: PhoneLocale,
}

impl ContactValidator {
    pub fn new(store: Arc<dyn ContactStore>, locale: PhoneLocale) -> Self {
        Self { store, locale }
    }

    /// Validate a new contact.
    ///
    /// Rule order: name required, name unique, phone unique, email unique,
    /// email format, phone format.
    pub async fn validate_new(&self, input: &ContactInput) -> ValidationResult<ContactFields> {
        let mut errors = FieldErrors::new();
        Self::require_name(input, &mut errors);

        let (name_taken, phone_taken, email_taken) = futures::try_join!(
            self.is_taken(Field::Name, &input.name, None),
            self.is_taken(Field::Phone, &input.phone, None),
            self.is_taken(Field::Email, &input.email, None),
        )?;

        for (field, taken) in [
            (Field::Name, name_taken),
            (Field::Phone, phone_taken),
            (Field::Email, email_taken),
        ] {
            if taken {
                errors.push(field, taken_message(field));
            }
        }

        self.check_formats(input, errors)
    }

    /// Validate an edit of contact `id`.
    ///
    /// A value only has to be unique when it differs from `previous`, and a
    /// match on the edited contact itself never counts.
    ///
    /// Rule order: name required, name unique, email unique, phone unique,
    /// email format, phone format.
    pub async fn validate_edit(
        &self,
        id: &ContactId,
        input: &ContactInput,
        previous: &ContactInput,
    ) -> ValidationResult<ContactFields> {
        let mut errors = FieldErrors::new();
        Self::require_name(input, &mut errors);

        let (name_taken, email_taken, phone_taken) = futures::try_join!(
            self.is_changed_and_taken(Field::Name, id, input, previous),
            self.is_changed_and_taken(Field::Email, id, input, previous),
            self.is_changed_and_taken(Field::Phone, id, input, previous),
        )?;

        for (field, taken) in [
            (Field::Name, name_taken),
            (Field::Email, email_taken),
            (Field::Phone, phone_taken),
        ] {
            if taken {
                errors.push(field, taken_message(field));
            }
        }

        self.check_formats(input, errors)
    }

    fn require_name(input: &ContactInput, errors: &mut FieldErrors) {
        if input.name.trim().is_empty() {
            errors.push(Field::Name, NAME_REQUIRED);
        }
    }

    async fn is_changed_and_taken(
        &self,
        field: Field,
        id: &ContactId,
        input: &ContactInput,
        previous: &ContactInput,
    ) -> StoreResult<bool> {
        let candidate = input.get(field);
        if candidate == previous.get(field) {
            return Ok(false);
        }
        self.is_taken(field, candidate, Some(id)).await
    }

    /// Whether a contact other than `exclude` already holds `value`.
    async fn is_taken(
        &self,
        field: Field,
        value: &str,
        exclude: Option<&ContactId>,
    ) -> StoreResult<bool> {
        let holder = self
            .store
            .find_one(&ContactFilter::new(field, value))
            .await?;

        Ok(match holder {
            Some(contact) => exclude != Some(&contact.id),
            None => false,
        })
    }

    /// Run the format rules and build the writable fields if nothing failed.
    fn check_formats(
        &self,
        input: &ContactInput,
        mut errors: FieldErrors,
    ) -> ValidationResult<ContactFields> {
        let email = match EmailAddress::new(input.email.as_str()) {
            Ok(email) => Some(email),
            Err(_) => {
                errors.push(Field::Email, EMAIL_INVALID);
                None
            }
        };

        let phone = match PhoneNumber::parse(input.phone.as_str(), self.locale) {
            Ok(phone) => Some(phone),
            Err(_) => {
                errors.push(Field::Phone, PHONE_INVALID);
                None
            }
        };

        match (email, phone) {
            (Some(email), Some(phone)) if errors.is_empty() => Ok(ContactFields {
                name: input.name.clone(),
                phone,
                email,
            }),
            _ => {
                debug!(%errors, "contact submission rejected");
                Err(ValidationFailure::Rejected(errors))
            }
        }
    }
}

impl std::fmt::Debug for ContactValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContactValidator")
            .field("locale", &self.locale)
            .finish_non_exhaustive()
    }
}
