//! HTTP server for the contact book.
//!
//! [`build_app`] assembles the router, request logging, and the method
//! override; [`run_server`] binds it to a socket.

pub mod forms;
pub mod handlers;
pub mod method_override;
pub mod views;

pub use handlers::AppState;

use crate::session::FlashStore;
use anyhow::{Context, Result};
use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::get;
use axum::{Router, ServiceExt};
use std::net::SocketAddr;
use std::time::{Duration, Instant};
use tower::util::{MapRequest, MapRequestLayer};
use tower::Layer;
use tracing::{debug, info};

/// The full application service: router behind the method override.
pub type App = MapRequest<Router, fn(Request) -> Request>;

/// Routes with logging, without the method override.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::home))
        .route("/about", get(handlers::about))
        .route(
            "/contact",
            get(handlers::list_contacts)
                .post(handlers::create_contact)
                .put(handlers::update_contact)
                .delete(handlers::delete_contact),
        )
        .route("/contact/add", get(handlers::add_contact_form))
        .route("/contact/edit/{name}", get(handlers::edit_contact_form))
        .route("/contact/{name}", get(handlers::contact_detail))
        .fallback(handlers::fallback)
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}

/// Build the application service.
pub fn build_app(state: AppState) -> App {
    let override_method: fn(Request) -> Request = method_override::apply_method_override;
    MapRequestLayer::new(override_method).layer(router(state))
}

/// Log one line per request once the response is ready.
async fn log_request(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_owned();
    let started = Instant::now();

    let response = next.run(req).await;

    info!(
        %method,
        %path,
        status = response.status().as_u16(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "request handled"
    );
    response
}

/// Purge expired flash messages every `interval` until the runtime stops.
pub fn spawn_flash_purger(flash: FlashStore, interval: Duration) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            let purged = flash.purge_expired();
            if purged > 0 {
                debug!(purged, "expired flash messages dropped");
            }
        }
    })
}

/// Serve `app` on `addr` until Ctrl-C.
pub async fn run_server(app: App, addr: SocketAddr) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    info!(%addr, "Contact book listening at http://{}", addr);

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        // Without a signal handler, keep serving.
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
