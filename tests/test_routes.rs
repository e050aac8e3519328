//! End-to-end route tests.
//!
//! Requests go through the complete service (method override, router,
//! handlers, templates) via `tower::ServiceExt::oneshot`.

mod mocks;

use axum::body::Body;
use axum::http::{header, HeaderMap, Method, Request, StatusCode};
use contact_book::domain::PhoneLocale;
use contact_book::models::Field;
use contact_book::{build_app, App, AppState, ContactStore, FlashStore, SqliteContactStore};
use http_body_util::BodyExt;
use mocks::MockContactStore;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

const ARI: &str = "nama=Ari&noHp=081234567890&email=ari%40x.com";
const BUDI: &str = "nama=Budi&noHp=081234567891&email=budi%40x.com";

struct Response {
    status: StatusCode,
    headers: HeaderMap,
    body: String,
}

impl Response {
    fn location(&self) -> Option<&str> {
        self.headers
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
    }

    /// `name=value` part of the session cookie, ready for a Cookie header.
    fn session_cookie(&self) -> Option<String> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find(|v| v.starts_with("sid="))
            .and_then(|v| v.split(';').next())
            .map(str::to_owned)
    }
}

fn app_with(store: Arc<dyn ContactStore>) -> App {
    let flash = FlashStore::new(Duration::from_secs(60));
    build_app(AppState::new(store, flash, PhoneLocale::IdId))
}

fn sqlite_app() -> (App, Arc<SqliteContactStore>) {
    let store = Arc::new(SqliteContactStore::open_in_memory().unwrap());
    (app_with(store.clone()), store)
}

async fn send(app: &App, request: Request<Body>) -> Response {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    Response {
        status,
        headers,
        body: String::from_utf8(bytes.to_vec()).unwrap(),
    }
}

fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(Method::GET).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

fn post_form(uri: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_owned())).unwrap()
}

fn edit_body(id: &str, new: (&str, &str, &str), old: (&str, &str, &str)) -> String {
    format!(
        "_id={}&nama={}&email={}&noHp={}&oldNama={}&oldEmail={}&oldNoHp={}",
        id, new.0, new.1, new.2, old.0, old.1, old.2
    )
}

#[tokio::test]
async fn test_static_pages() {
    let (app, _) = sqlite_app();

    let home = send(&app, get("/", None)).await;
    assert_eq!(home.status, StatusCode::OK);
    assert!(home.body.contains("<title>Home</title>"));
    assert!(home.body.contains("deva@gmail.com"));

    let about = send(&app, get("/about", None)).await;
    assert_eq!(about.status, StatusCode::OK);
    assert!(about.body.contains("<title>About</title>"));

    let add = send(&app, get("/contact/add", None)).await;
    assert_eq!(add.status, StatusCode::OK);
    assert!(add.body.contains(r#"action="/contact""#));
}

#[tokio::test]
async fn test_create_redirects_and_flashes_once() {
    let (app, store) = sqlite_app();

    let created = send(&app, post_form("/contact", ARI, None)).await;
    assert_eq!(created.status, StatusCode::SEE_OTHER);
    assert_eq!(created.location(), Some("/contact"));

    let stored = store.find_all().await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].name, "Ari");
    assert_eq!(stored[0].phone, "081234567890");
    assert_eq!(stored[0].email, "ari@x.com");

    let cookie = created.session_cookie().expect("session cookie set");

    let list = send(&app, get("/contact", Some(&cookie))).await;
    assert_eq!(list.status, StatusCode::OK);
    assert!(list.body.contains("Ari"));
    assert!(list.body.contains("Contact added!"));

    let again = send(&app, get("/contact", Some(&cookie))).await;
    assert!(again.body.contains("Ari"));
    assert!(!again.body.contains("Contact added!"));
}

#[tokio::test]
async fn test_flash_is_not_visible_to_other_sessions() {
    let (app, _) = sqlite_app();

    let created = send(&app, post_form("/contact", ARI, None)).await;
    assert!(created.session_cookie().is_some());

    let stranger = send(&app, get("/contact", Some("sid=someoneelse"))).await;
    assert!(!stranger.body.contains("Contact added!"));

    let anonymous = send(&app, get("/contact", None)).await;
    assert!(!anonymous.body.contains("Contact added!"));
}

#[tokio::test]
async fn test_duplicate_name_rerenders_form_without_insert() {
    let (app, store) = sqlite_app();
    send(&app, post_form("/contact", ARI, None)).await;

    let duplicate = send(
        &app,
        post_form("/contact", "nama=Ari&noHp=081299999999&email=other%40x.com", None),
    )
    .await;

    assert_eq!(duplicate.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(duplicate.body.contains(r#"data-field="name""#));
    assert!(duplicate.body.contains("Contact name is already taken!"));
    assert!(duplicate.body.contains(r#"value="other@x.com""#));
    assert!(duplicate.session_cookie().is_none());
    assert_eq!(store.find_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_invalid_formats_are_reported() {
    let (app, store) = sqlite_app();

    let response = send(
        &app,
        post_form("/contact", "nama=Ari&noHp=12345&email=not-an-email", None),
    )
    .await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.body.contains("Email is not valid!"));
    assert!(response.body.contains("Phone number is not valid!"));
    assert!(store.find_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_detail_is_idempotent_and_missing_is_404() {
    let (app, _) = sqlite_app();
    send(&app, post_form("/contact", ARI, None)).await;

    let first = send(&app, get("/contact/Ari", None)).await;
    let second = send(&app, get("/contact/Ari", None)).await;
    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.body, second.body);
    assert!(first.body.contains("ari@x.com"));
    assert!(first.body.contains(r#"action="/contact?_method=DELETE""#));

    let missing = send(&app, get("/contact/Nobody", None)).await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert!(missing.body.contains("404 Not Found!"));
}

#[tokio::test]
async fn test_names_with_spaces_resolve() {
    let (app, _) = sqlite_app();
    send(
        &app,
        post_form("/contact", "nama=Ari+Wibowo&noHp=081234567890&email=ari%40x.com", None),
    )
    .await;

    let list = send(&app, get("/contact", None)).await;
    assert!(list.body.contains("/contact/Ari%20Wibowo"));

    let detail = send(&app, get("/contact/Ari%20Wibowo", None)).await;
    assert_eq!(detail.status, StatusCode::OK);
    assert!(detail.body.contains("Ari Wibowo"));
}

#[tokio::test]
async fn test_edit_form_prefills_contact() {
    let (app, store) = sqlite_app();
    send(&app, post_form("/contact", ARI, None)).await;
    let ari = store.find_all().await.unwrap().remove(0);

    let form = send(&app, get("/contact/edit/Ari", None)).await;
    assert_eq!(form.status, StatusCode::OK);
    assert!(form.body.contains(&format!(r#"name="_id" value="{}""#, ari.id)));
    assert!(form.body.contains(r#"name="oldNoHp" value="081234567890""#));
    assert!(form.body.contains(r#"action="/contact?_method=PUT""#));

    let missing = send(&app, get("/contact/edit/Nobody", None)).await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_edit_changes_email() {
    let (app, store) = sqlite_app();
    send(&app, post_form("/contact", ARI, None)).await;
    let ari = store.find_all().await.unwrap().remove(0);

    let body = edit_body(
        ari.id.as_str(),
        ("Ari", "ari2%40x.com", "081234567890"),
        ("Ari", "ari%40x.com", "081234567890"),
    );
    let updated = send(&app, post_form("/contact?_method=PUT", &body, None)).await;

    assert_eq!(updated.status, StatusCode::SEE_OTHER);
    assert_eq!(updated.location(), Some("/contact"));

    let stored = store.find_all().await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].id, ari.id);
    assert_eq!(stored[0].email, "ari2@x.com");

    let cookie = updated.session_cookie().unwrap();
    let list = send(&app, get("/contact", Some(&cookie))).await;
    assert!(list.body.contains("Contact updated!"));
}

#[tokio::test]
async fn test_edit_with_unchanged_values_succeeds() {
    let (app, store) = sqlite_app();
    send(&app, post_form("/contact", ARI, None)).await;
    let ari = store.find_all().await.unwrap().remove(0);

    let same = ("Ari", "ari%40x.com", "081234567890");
    let body = edit_body(ari.id.as_str(), same, same);
    let response = send(&app, post_form("/contact?_method=PUT", &body, None)).await;

    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(store.find_all().await.unwrap()[0], ari);
}

#[tokio::test]
async fn test_edit_taking_other_email_fails() {
    let (app, store) = sqlite_app();
    send(&app, post_form("/contact", ARI, None)).await;
    send(&app, post_form("/contact", BUDI, None)).await;
    let before = store.find_all().await.unwrap();
    let ari = &before[0];

    let body = edit_body(
        ari.id.as_str(),
        ("Ari", "budi%40x.com", "081234567890"),
        ("Ari", "ari%40x.com", "081234567890"),
    );
    let response = send(&app, post_form("/contact?_method=PUT", &body, None)).await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.body.contains(r#"data-field="email""#));
    // Submitted value is shown again; the old value still rides along.
    assert!(response.body.contains(r#"value="budi@x.com""#));
    assert!(response.body.contains(r#"name="oldEmail" value="ari@x.com""#));
    assert_eq!(store.find_all().await.unwrap(), before);
}

#[tokio::test]
async fn test_edit_of_unknown_id_is_404() {
    let (app, _) = sqlite_app();
    let body = edit_body(
        "no-such-id",
        ("Ghost", "ghost%40x.com", "081234567890"),
        ("Ghost", "ghost%40x.com", "081234567890"),
    );

    let response = send(&app, post_form("/contact?_method=PUT", &body, None)).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_is_idempotent() {
    let (app, store) = sqlite_app();
    send(&app, post_form("/contact", ARI, None)).await;
    send(&app, post_form("/contact", BUDI, None)).await;

    let first = send(&app, post_form("/contact?_method=DELETE", "nama=Ari", None)).await;
    assert_eq!(first.status, StatusCode::SEE_OTHER);
    assert_eq!(first.location(), Some("/contact"));

    let remaining = store.find_all().await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].name, "Budi");

    let second = send(&app, post_form("/contact?_method=DELETE", "nama=Ari", None)).await;
    assert_eq!(second.status, StatusCode::SEE_OTHER);
    assert_eq!(store.find_all().await.unwrap(), remaining);

    let cookie = second.session_cookie().unwrap();
    let list = send(&app, get("/contact", Some(&cookie))).await;
    assert!(list.body.contains("Contact deleted!"));
}

#[tokio::test]
async fn test_override_header_and_native_verbs() {
    let (app, store) = sqlite_app();
    send(&app, post_form("/contact", ARI, None)).await;

    let mut request = post_form("/contact", "nama=Ari", None);
    request
        .headers_mut()
        .insert("x-http-method-override", "DELETE".parse().unwrap());
    let response = send(&app, request).await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert!(store.find_all().await.unwrap().is_empty());

    send(&app, post_form("/contact", BUDI, None)).await;
    let mut native = post_form("/contact", "nama=Budi", None);
    *native.method_mut() = Method::DELETE;
    assert_eq!(send(&app, native).await.status, StatusCode::SEE_OTHER);
    assert!(store.find_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_percent_encoded_override_reaches_update() {
    let (app, store) = sqlite_app();
    send(&app, post_form("/contact", ARI, None)).await;
    let ari = store.find_all().await.unwrap().remove(0);

    let body = edit_body(
        ari.id.as_str(),
        ("Ari", "ari2%40x.com", "081234567890"),
        ("Ari", "ari%40x.com", "081234567890"),
    );
    let response = send(&app, post_form("/contact?%5Fmethod=PUT", &body, None)).await;

    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(store.find_all().await.unwrap()[0].email, "ari2@x.com");
}

#[tokio::test]
async fn test_malformed_forms_are_rejected() {
    let (app, store) = sqlite_app();

    let missing = send(&app, post_form("/contact", "nama=Ari&email=ari%40x.com", None)).await;
    assert_eq!(missing.status, StatusCode::BAD_REQUEST);

    let unknown = send(
        &app,
        post_form("/contact", &format!("{}&admin=true", ARI), None),
    )
    .await;
    assert_eq!(unknown.status, StatusCode::BAD_REQUEST);

    let empty_id = edit_body(
        "",
        ("Ari", "ari%40x.com", "081234567890"),
        ("Ari", "ari%40x.com", "081234567890"),
    );
    let response = send(&app, post_form("/contact?_method=PUT", &empty_id, None)).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    assert!(store.find_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_path_is_404() {
    let (app, _) = sqlite_app();
    let response = send(&app, get("/nowhere", None)).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_lost_uniqueness_race_rerenders_form() {
    let store = MockContactStore::new();
    store.conflict_on_write(Field::Email);
    let app = app_with(Arc::new(store.clone()));

    let response = send(&app, post_form("/contact", ARI, None)).await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.body.contains(r#"data-field="email""#));
    assert!(response.body.contains("Email is already taken!"));
    assert_eq!(store.get_call_count("insert"), 1);
    assert!(store.contacts().is_empty());
}

#[tokio::test]
async fn test_store_failure_is_500() {
    let store = MockContactStore::new();
    store.break_store();
    let app = app_with(Arc::new(store));

    let list = send(&app, get("/contact", None)).await;
    assert_eq!(list.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!list.body.contains("mock store is broken"));

    let create = send(&app, post_form("/contact", ARI, None)).await;
    assert_eq!(create.status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_concurrent_duplicate_creates_store_one_record() {
    let (app, store) = sqlite_app();

    let requests = (0..8).map(|_| {
        let app = app.clone();
        tokio::spawn(async move { send(&app, post_form("/contact", ARI, None)).await.status })
    });
    let statuses: Vec<StatusCode> = futures::future::join_all(requests)
        .await
        .into_iter()
        .map(|r| r.unwrap())
        .collect();

    assert_eq!(
        statuses.iter().filter(|s| **s == StatusCode::SEE_OTHER).count(),
        1
    );
    assert!(statuses
        .iter()
        .all(|s| *s == StatusCode::SEE_OTHER || *s == StatusCode::UNPROCESSABLE_ENTITY));
    assert_eq!(store.find_all().await.unwrap().len(), 1);
}
