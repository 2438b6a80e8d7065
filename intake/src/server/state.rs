//! Shared application state for the web layer.
//!
//! The web layer owns one session store per concurrent user; the core never
//! sees more than its own session. Stores are created on demand and dropped
//! when the client discards its session.

use crate::catalog::Catalog;
use crate::session::{SessionAction, SessionEnvironment, SessionPhase, SessionReducer};
use intake_runtime::Store;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Store runtime specialized to the order session
pub type SessionStore = Store<SessionPhase, SessionAction, SessionEnvironment, SessionReducer>;

/// Shared state handed to every handler
pub struct AppState {
    environment: SessionEnvironment,
    sessions: RwLock<HashMap<Uuid, Arc<SessionStore>>>,
}

impl AppState {
    /// Create the shared state around one environment
    #[must_use]
    pub fn new(environment: SessionEnvironment) -> Self {
        Self {
            environment,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// The catalog the sessions run against
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.environment.catalog
    }

    /// Create a fresh session in its initial phase
    pub async fn create_session(&self) -> (Uuid, Arc<SessionStore>) {
        let id = Uuid::new_v4();
        let store = Arc::new(Store::new(
            SessionPhase::initial(self.environment.gated(), &self.environment.catalog),
            SessionReducer::new(),
            self.environment.clone(),
        ));
        self.sessions.write().await.insert(id, Arc::clone(&store));
        tracing::info!(session_id = %id, "session created");
        (id, store)
    }

    /// Look up an existing session
    pub async fn session(&self, id: Uuid) -> Option<Arc<SessionStore>> {
        self.sessions.read().await.get(&id).cloned()
    }

    /// Discard a session; returns whether it existed
    pub async fn remove_session(&self, id: Uuid) -> bool {
        let removed = self.sessions.write().await.remove(&id).is_some();
        if removed {
            tracing::info!(session_id = %id, "session discarded");
        }
        removed
    }

    /// Number of live sessions
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}
