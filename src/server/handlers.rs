//! Route handlers.
//!
//! Each handler maps one endpoint to at most one store write and then
//! either renders a page or redirects back to the contact list with a
//! flash message.

use crate::domain::{ContactId, PhoneLocale};
use crate::error::{AppError, AppResult, FieldErrors, StoreError, ValidationFailure};
use crate::models::{ContactInput, Field};
use crate::server::forms::{CreateContactForm, DeleteContactForm, UpdateContactForm};
use crate::server::views::{
    self, AboutView, AddContactView, DetailView, EditContactView, EditFormValues, HomeView,
    ContactListView,
};
use crate::services::{taken_message, ContactValidator};
use crate::session::{current_session, ensure_session, FlashStore};
use crate::store::{ContactFilter, ContactStore};
use axum::extract::rejection::FormRejection;
use axum::extract::{Path, State};
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Redirect, Response};
use axum::Form;
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;
use tracing::{debug, info};

pub const CONTACT_ADDED: &str = "Contact added!";
pub const CONTACT_UPDATED: &str = "Contact updated!";
pub const CONTACT_DELETED: &str = "Contact deleted!";

const LIST_PATH: &str = "/contact";

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ContactStore>,
    pub validator: ContactValidator,
    pub flash: FlashStore,
}

impl AppState {
    pub fn new(store: Arc<dyn ContactStore>, flash: FlashStore, locale: PhoneLocale) -> Self {
        let validator = ContactValidator::new(Arc::clone(&store), locale);
        Self {
            store,
            validator,
            flash,
        }
    }
}

fn parse_form<T>(form: Result<Form<T>, FormRejection>) -> AppResult<T> {
    form.map(|Form(value)| value)
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
}

/// Store `message` for the session and send the client back to the list.
fn redirect_with_flash(state: &AppState, jar: CookieJar, message: &str) -> Response {
    let (jar, session) = ensure_session(jar);
    state.flash.set(&session, message);
    (jar, Redirect::to(LIST_PATH)).into_response()
}

fn conflict_errors(field: Field) -> FieldErrors {
    let mut errors = FieldErrors::new();
    errors.push(field, taken_message(field));
    errors
}

fn contact_not_found(name: &str) -> AppError {
    AppError::NotFound(format!("Contact \"{}\"", name))
}

fn add_form_with_errors(form: ContactInput, errors: FieldErrors) -> AppResult<Response> {
    views::render(
        StatusCode::UNPROCESSABLE_ENTITY,
        &AddContactView {
            title: views::ADD_TITLE,
            form,
            errors,
        },
    )
}

fn edit_form_with_errors(form: EditFormValues, errors: FieldErrors) -> AppResult<Response> {
    views::render(
        StatusCode::UNPROCESSABLE_ENTITY,
        &EditContactView {
            title: views::EDIT_TITLE,
            form,
            errors,
        },
    )
}

/// `GET /`
pub async fn home() -> AppResult<Response> {
    views::render(StatusCode::OK, &HomeView::default())
}

/// `GET /about`
pub async fn about() -> AppResult<Response> {
    views::render(
        StatusCode::OK,
        &AboutView {
            title: views::ABOUT_TITLE,
        },
    )
}

/// `GET /contact`
///
/// Consumes the session's pending flash message, if any.
pub async fn list_contacts(State(state): State<AppState>, jar: CookieJar) -> AppResult<Response> {
    let contacts = state.store.find_all().await?;
    let msg = current_session(&jar).and_then(|session| state.flash.take(&session));

    views::render(
        StatusCode::OK,
        &ContactListView {
            title: views::LIST_TITLE,
            contacts,
            msg,
        },
    )
}

/// `GET /contact/add`
pub async fn add_contact_form() -> AppResult<Response> {
    views::render(
        StatusCode::OK,
        &AddContactView {
            title: views::ADD_TITLE,
            form: ContactInput::default(),
            errors: FieldErrors::new(),
        },
    )
}

/// `POST /contact`
pub async fn create_contact(
    State(state): State<AppState>,
    jar: CookieJar,
    form: Result<Form<CreateContactForm>, FormRejection>,
) -> AppResult<Response> {
    let input = ContactInput::from(parse_form(form)?);

    let fields = match state.validator.validate_new(&input).await {
        Ok(fields) => fields,
        Err(ValidationFailure::Rejected(errors)) => return add_form_with_errors(input, errors),
        Err(ValidationFailure::Store(e)) => return Err(e.into()),
    };

    match state.store.insert(&fields).await {
        Ok(contact) => info!(id = %contact.id, name = %contact.name, "contact created"),
        Err(StoreError::Conflict(field)) => {
            debug!(%field, "insert lost a uniqueness race");
            return add_form_with_errors(input, conflict_errors(field));
        }
        Err(e) => return Err(e.into()),
    }

    Ok(redirect_with_flash(&state, jar, CONTACT_ADDED))
}

/// `GET /contact/edit/{name}`
pub async fn edit_contact_form(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AppResult<Response> {
    let contact = state
        .store
        .find_one(&ContactFilter::name(name.as_str()))
        .await?
        .ok_or_else(|| contact_not_found(&name))?;

    views::render(
        StatusCode::OK,
        &EditContactView {
            title: views::EDIT_TITLE,
            form: EditFormValues::from(&contact),
            errors: FieldErrors::new(),
        },
    )
}

/// `PUT /contact`
pub async fn update_contact(
    State(state): State<AppState>,
    jar: CookieJar,
    form: Result<Form<UpdateContactForm>, FormRejection>,
) -> AppResult<Response> {
    let (raw_id, current, previous) = parse_form(form)?.into_inputs();
    let id = ContactId::new(raw_id.as_str()).map_err(|e| AppError::BadRequest(e.to_string()))?;

    let submitted = EditFormValues {
        id: raw_id,
        current: current.clone(),
        previous: previous.clone(),
    };

    let fields = match state.validator.validate_edit(&id, &current, &previous).await {
        Ok(fields) => fields,
        Err(ValidationFailure::Rejected(errors)) => {
            return edit_form_with_errors(submitted, errors)
        }
        Err(ValidationFailure::Store(e)) => return Err(e.into()),
    };

    match state.store.update_by_id(&id, &fields).await {
        Ok(true) => info!(%id, name = %fields.name, "contact updated"),
        Ok(false) => return Err(AppError::NotFound(format!("Contact with id {}", id))),
        Err(StoreError::Conflict(field)) => {
            debug!(%field, "update lost a uniqueness race");
            return edit_form_with_errors(submitted, conflict_errors(field));
        }
        Err(e) => return Err(e.into()),
    }

    Ok(redirect_with_flash(&state, jar, CONTACT_UPDATED))
}

/// `DELETE /contact`
///
/// Deleting a name that does not exist still counts as success.
pub async fn delete_contact(
    State(state): State<AppState>,
    jar: CookieJar,
    form: Result<Form<DeleteContactForm>, FormRejection>,
) -> AppResult<Response> {
    let DeleteContactForm { name } = parse_form(form)?;

    let removed = state
        .store
        .delete_one(&ContactFilter::name(name.as_str()))
        .await?;
    if removed {
        info!(%name, "contact deleted");
    } else {
        debug!(%name, "delete matched no contact");
    }

    Ok(redirect_with_flash(&state, jar, CONTACT_DELETED))
}

/// `GET /contact/{name}`
pub async fn contact_detail(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AppResult<Response> {
    let contact = state
        .store
        .find_one(&ContactFilter::name(name.as_str()))
        .await?
        .ok_or_else(|| contact_not_found(&name))?;

    views::render(
        StatusCode::OK,
        &DetailView {
            title: views::DETAIL_TITLE,
            contact,
        },
    )
}

/// Any path without a route.
pub async fn fallback(uri: Uri) -> Response {
    views::not_found_page(&format!("Page {}", uri.path()))
}
