//! Cookie-identified sessions carrying flash messages.
//!
//! The cookie only holds an opaque id; message text stays server-side in a
//! [`FlashStore`].

pub mod flash;

pub use flash::FlashStore;

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use std::fmt;
use uuid::Uuid;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "sid";

const MAX_ID_LENGTH: usize = 64;

/// Opaque session identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    /// Fresh random id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    /// Accept an id presented by a client.
    ///
    /// Anything empty, overlong, or containing characters we never issue is
    /// ignored.
    pub fn from_cookie(value: &str) -> Option<Self> {
        let plausible = !value.is_empty()
            && value.len() <= MAX_ID_LENGTH
            && value.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');
        plausible.then(|| Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The session a request belongs to, if its cookie names one.
pub fn current_session(jar: &CookieJar) -> Option<SessionId> {
    jar.get(SESSION_COOKIE)
        .and_then(|cookie| SessionId::from_cookie(cookie.value()))
}

/// The request's session, starting a new one when there is none.
///
/// The returned jar carries the cookie for a new session and must be part
/// of the response.
pub fn ensure_session(jar: CookieJar) -> (CookieJar, SessionId) {
    if let Some(session) = current_session(&jar) {
        return (jar, session);
    }

    let session = SessionId::generate();
    let cookie = Cookie::build((SESSION_COOKIE, session.as_str().to_owned()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax);
    (jar.add(cookie), session)
}
