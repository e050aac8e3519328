//! Application service layer.
//!
//! Business rules that sit between the route handlers and the store.

mod contact_validator;

pub use contact_validator::{
    taken_message, ContactValidator, EMAIL_INVALID, NAME_REQUIRED, PHONE_INVALID,
};
