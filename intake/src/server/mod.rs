//! JSON HTTP surface over the order session.
//!
//! The web layer owns the sessions (one store per user) and renders the
//! phase as a [`handlers::SessionView`]; the core state machine never
//! reaches into rendering state.

pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use error::AppError;
pub use router::session_router;
pub use state::{AppState, SessionStore};
