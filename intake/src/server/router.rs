//! Session HTTP router.
//!
//! Composes all session handlers into a single Axum router.

use crate::server::handlers;
use crate::server::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

/// Create the session router with all endpoints.
///
/// # Routes
///
/// - `GET /health` - Liveness probe
/// - `POST /api/sessions` - Create a session
/// - `GET /api/sessions/:id` - Current session view
/// - `DELETE /api/sessions/:id` - Discard a session
/// - `POST /api/sessions/:id/login` - Present credentials
/// - `POST /api/sessions/:id/lookup` - Resolve an address
/// - `POST /api/sessions/:id/submit` - Validate and freeze the form
/// - `POST /api/sessions/:id/edit` - Back to input, fields re-seeded
/// - `POST /api/sessions/:id/confirm` - Persist the frozen draft
/// - `POST /api/sessions/:id/new-order` - Start a fresh order
pub fn session_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/sessions", post(handlers::create_session))
        .route(
            "/api/sessions/:id",
            get(handlers::get_session).delete(handlers::delete_session),
        )
        .route("/api/sessions/:id/login", post(handlers::login))
        .route("/api/sessions/:id/lookup", post(handlers::lookup_address))
        .route("/api/sessions/:id/submit", post(handlers::submit))
        .route("/api/sessions/:id/edit", post(handlers::edit))
        .route("/api/sessions/:id/confirm", post(handlers::confirm))
        .route("/api/sessions/:id/new-order", post(handlers::new_order))
        .with_state(state)
}
