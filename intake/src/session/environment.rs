//! Environment for the session reducer.
//!
//! All collaborators the reducer needs are injected here behind traits, so
//! tests swap in deterministic doubles.

use crate::catalog::Catalog;
use crate::lookup::AddressLookup;
use crate::orders::OrderStore;
use intake_core::environment::Clock;
use std::sync::Arc;

/// The fixed credential pair gating access to the input phase.
///
/// Not a security boundary; simply a phase gate checked once per session.
#[derive(Clone, Debug)]
pub struct Credentials {
    user_id: String,
    password: String,
}

impl Credentials {
    /// Create a credential pair
    #[must_use]
    pub const fn new(user_id: String, password: String) -> Self {
        Self { user_id, password }
    }

    /// Whether the presented pair matches
    #[must_use]
    pub fn verify(&self, user_id: &str, password: &str) -> bool {
        self.user_id == user_id && self.password == password
    }
}

/// Injected dependencies for the session reducer
#[derive(Clone)]
pub struct SessionEnvironment {
    /// Postal-code to address resolution
    pub lookup: Arc<dyn AddressLookup>,
    /// Order persistence
    pub orders: Arc<dyn OrderStore>,
    /// Time source for completion timestamps
    pub clock: Arc<dyn Clock>,
    /// Product catalog (static configuration)
    pub catalog: Arc<Catalog>,
    /// Login gate; `None` disables gating entirely
    pub credentials: Option<Credentials>,
}

impl SessionEnvironment {
    /// Assemble an environment from its collaborators
    #[must_use]
    pub fn new(
        lookup: Arc<dyn AddressLookup>,
        orders: Arc<dyn OrderStore>,
        clock: Arc<dyn Clock>,
        catalog: Arc<Catalog>,
        credentials: Option<Credentials>,
    ) -> Self {
        Self {
            lookup,
            orders,
            clock,
            catalog,
            credentials,
        }
    }

    /// Whether sessions start behind the login gate
    #[must_use]
    pub const fn gated(&self) -> bool {
        self.credentials.is_some()
    }
}
