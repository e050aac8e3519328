//! Error types for the contact book.
//!
//! This module defines custom error types using `thiserror` for precise error handling.

use crate::models::Field;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use std::fmt;
use thiserror::Error;
use tracing::error;

/// Errors that can occur when talking to the contact store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// A unique constraint rejected the write
    #[error("{0} is already used by another contact")]
    Conflict(Field),

    /// The underlying database reported an error
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A stored row could not be turned back into a contact
    #[error("corrupt record: {0}")]
    Corrupt(String),

    /// The connection lock was poisoned by a panicking writer
    #[error("database connection lock poisoned")]
    Poisoned,

    /// The blocking worker task failed
    #[error("store task failed: {0}")]
    Task(String),

    /// Could not prepare the database location
    #[error("failed to open database at {path}: {reason}")]
    Open { path: String, reason: String },
}

/// Errors that can occur during configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Environment variable has invalid value
    #[error("Invalid value for {var}: {reason}")]
    InvalidValue { var: String, reason: String },
}

/// One failed rule: which field, and the message shown next to the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: Field,
    pub message: String,
}

impl FieldError {
    pub fn new(field: Field, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Ordered list of failed rules for one submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: Field, message: impl Into<String>) {
        self.0.push(FieldError::new(field, message));
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldError> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a FieldErrors {
    type Item = &'a FieldError;
    type IntoIter = std::slice::Iter<'a, FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<&str> = self.0.iter().map(|e| e.field.as_str()).collect();
        write!(f, "{} rule(s) failed: {}", self.0.len(), fields.join(", "))
    }
}

/// Why a submission could not be turned into writable contact fields.
#[derive(Error, Debug)]
pub enum ValidationFailure {
    /// One or more rules failed
    #[error("validation failed: {0}")]
    Rejected(FieldErrors),

    /// A uniqueness lookup could not be performed
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Errors surfaced by route handlers.
#[derive(Error, Debug)]
pub enum AppError {
    /// The requested contact does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// The submitted form did not match the endpoint's schema
    #[error("malformed form: {0}")]
    BadRequest(String),

    /// Store failure
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A template failed to render
    #[error("template error: {0}")]
    Render(#[from] askama::Error),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Store(_) | Self::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match &self {
            Self::NotFound(what) => {
                return crate::server::views::not_found_page(what).into_response();
            }
            Self::BadRequest(reason) => {
                tracing::debug!(%reason, "rejected malformed form");
            }
            Self::Store(e) => error!(error = %e, "store operation failed"),
            Self::Render(e) => error!(error = %e, "template rendering failed"),
        }

        let body = match status {
            StatusCode::BAD_REQUEST => "<h1>400 Bad Request</h1>",
            _ => "<h1>500 Internal Server Error</h1>",
        };
        (status, Html(body)).into_response()
    }
}

/// Convenience type alias for Results with StoreError
pub type StoreResult<T> = Result<T, StoreError>;

/// Convenience type alias for Results with ConfigError
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Convenience type alias for Results with ValidationFailure
pub type ValidationResult<T> = Result<T, ValidationFailure>;

/// Convenience type alias for handler Results
pub type AppResult<T> = Result<T, AppError>;
