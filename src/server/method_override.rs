//! Method override for HTML forms.
//!
//! Browsers only submit GET and POST, so an edit form posts to
//! `/contact?_method=PUT`. The rewrite must happen before routing, so it
//! wraps the whole router as a `tower` request map.

use axum::extract::Request;
use axum::http::Method;
use tracing::debug;

/// Query parameter naming the intended method.
pub const OVERRIDE_PARAM: &str = "_method";

/// Header naming the intended method, for non-browser clients.
pub const OVERRIDE_HEADER: &str = "x-http-method-override";

/// Rewrite a POST into the method it asks for.
///
/// Only POST is ever rewritten, and only to PUT or DELETE.
pub fn apply_method_override(mut req: Request) -> Request {
    if req.method() != Method::POST {
        return req;
    }

    if let Some(method) = requested_method(&req) {
        debug!(path = %req.uri().path(), %method, "method override");
        *req.method_mut() = method;
    }
    req
}

fn requested_method(req: &Request) -> Option<Method> {
    let from_query = req.uri().query().and_then(|query| {
        form_urlencoded::parse(query.as_bytes())
            .find(|(key, _)| key == OVERRIDE_PARAM)
            .map(|(_, value)| value.into_owned())
    });

    let raw = from_query.or_else(|| {
        req.headers()
            .get(OVERRIDE_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned)
    })?;

    match raw.trim().to_ascii_uppercase().as_str() {
        "PUT" => Some(Method::PUT),
        "DELETE" => Some(Method::DELETE),
        _ => None,
    }
}
