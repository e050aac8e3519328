//! Page templates and the helpers that turn them into responses.
//!
//! Every page extends `templates/layouts/main.html`, which reads `title`
//! from the page struct.

use crate::error::{AppResult, FieldErrors};
use crate::models::{Contact, ContactInput};
use askama::Template;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use tracing::error;

/// Someone listed on the home page.
#[derive(Debug, Clone, Copy)]
pub struct RosterEntry {
    pub name: &'static str,
    pub email: &'static str,
}

/// Fixed roster shown on the home page.
pub const ROSTER: &[RosterEntry] = &[
    RosterEntry {
        name: "Deva",
        email: "deva@gmail.com",
    },
    RosterEntry {
        name: "Pande",
        email: "pande@gmail.com",
    },
    RosterEntry {
        name: "Sari",
        email: "sari@gmail.com",
    },
];

#[derive(Template)]
#[template(path = "index.html")]
pub struct HomeView {
    pub title: &'static str,
    pub greeting: &'static str,
    pub roster: Vec<RosterEntry>,
}

impl Default for HomeView {
    fn default() -> Self {
        Self {
            title: HOME_TITLE,
            greeting: "Deva",
            roster: ROSTER.to_vec(),
        }
    }
}

#[derive(Template)]
#[template(path = "about.html")]
pub struct AboutView {
    pub title: &'static str,
}

#[derive(Template)]
#[template(path = "contact.html")]
pub struct ContactListView {
    pub title: &'static str,
    pub contacts: Vec<Contact>,
    pub msg: Option<String>,
}

#[derive(Template)]
#[template(path = "add-contact.html")]
pub struct AddContactView {
    pub title: &'static str,
    pub form: ContactInput,
    pub errors: FieldErrors,
}

/// Values behind the edit form.
///
/// `previous` round-trips through hidden fields so the next submission can
/// tell which values the user actually changed.
#[derive(Debug, Clone, Default)]
pub struct EditFormValues {
    pub id: String,
    pub current: ContactInput,
    pub previous: ContactInput,
}

impl From<&Contact> for EditFormValues {
    fn from(contact: &Contact) -> Self {
        let values = ContactInput::from(contact);
        Self {
            id: contact.id.as_str().to_owned(),
            current: values.clone(),
            previous: values,
        }
    }
}

#[derive(Template)]
#[template(path = "edit-contact.html")]
pub struct EditContactView {
    pub title: &'static str,
    pub form: EditFormValues,
    pub errors: FieldErrors,
}

#[derive(Template)]
#[template(path = "detail.html")]
pub struct DetailView {
    pub title: &'static str,
    pub contact: Contact,
}

#[derive(Template)]
#[template(path = "not-found.html")]
pub struct NotFoundView {
    pub title: &'static str,
    pub message: String,
}

pub const HOME_TITLE: &str = "Home";
pub const ABOUT_TITLE: &str = "About";
pub const LIST_TITLE: &str = "Contacts";
pub const ADD_TITLE: &str = "Add Contact";
pub const EDIT_TITLE: &str = "Edit Contact";
pub const DETAIL_TITLE: &str = "Contact Detail";
pub const NOT_FOUND_TITLE: &str = "Not Found";

/// Render `view` as an HTML response with `status`.
pub fn render<T: Template>(status: StatusCode, view: &T) -> AppResult<Response> {
    let html = view.render()?;
    Ok((status, Html(html)).into_response())
}

/// The 404 page for `what`.
///
/// Falls back to a bare heading if the template itself fails.
pub fn not_found_page(what: &str) -> Response {
    let view = NotFoundView {
        title: NOT_FOUND_TITLE,
        message: format!("{} was not found.", what),
    };

    match view.render() {
        Ok(html) => (StatusCode::NOT_FOUND, Html(html)).into_response(),
        Err(e) => {
            error!(error = %e, "failed to render not-found page");
            (StatusCode::NOT_FOUND, Html("<h1>404 Not Found!</h1>")).into_response()
        }
    }
}
