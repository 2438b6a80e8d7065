//! # Intake
//!
//! Order-intake service: a customer enters contact details and quantities
//! for a small fixed catalog, reviews the computed total, confirms, and the
//! order is persisted with a generated receipt identifier.
//!
//! # Architecture
//!
//! The workflow is one session-scoped state machine driven by a reducer:
//!
//! ```text
//! ┌──────────┐  LogIn(ok)   ┌─────────┐  Submit(valid)  ┌──────────┐
//! │  Login   │─────────────▶│  Input  │────────────────▶│ Confirm  │
//! └──────────┘              └─────────┘                 └────┬─────┘
//!      ▲                      ▲   ▲                          │ Commit
//!      │ LogOut               │   │ Edit (fields re-seeded)  ▼
//!      └──────────────────────┤   └─────────────────── one insert
//!                             │                              │
//!                             │ StartNewOrder          ┌─────┴────┐
//!                             └─────────────────────── │ Complete │
//!                                                      └──────────┘
//! ```
//!
//! Two collaborators stay behind narrow traits: the postal-code
//! [`lookup::AddressLookup`] (advisory address pre-fill) and the
//! [`orders::OrderStore`] (persistence, assigns the receipt id). The reducer
//! never performs I/O - it returns effect descriptions which the store
//! runtime executes, feeding outcomes back in as actions. In-flight flags on
//! the lookup and the commit make repeated requests no-ops, so a rapid
//! double click cannot persist two records.
//!
//! # Key Concepts Demonstrated
//!
//! - **State Machine**: phases own exactly the data meaningful in them
//! - **Explicit Effects**: adapter calls described, not hidden
//! - **Dependency Injection**: adapters, clock, and catalog via environment
//! - **Exactly-once commit**: guard flags instead of hope
//!
//! # Usage
//!
//! ```ignore
//! use intake::prelude::*;
//! use intake_runtime::Store;
//! use std::sync::Arc;
//!
//! # async fn example() {
//! let catalog = Arc::new(Catalog::standard());
//! let env = SessionEnvironment::new(
//!     Arc::new(StaticAddressLookup::new()),
//!     Arc::new(InMemoryOrderStore::new()),
//!     Arc::new(intake_core::environment::SystemClock::new()),
//!     Arc::clone(&catalog),
//!     None,
//! );
//!
//! let store = Store::new(
//!     SessionPhase::initial(env.gated(), &catalog),
//!     SessionReducer::new(),
//!     env,
//! );
//!
//! store.send(SessionAction::LookupAddress {
//!     postal_code: "6008001".to_string(),
//! }).await;
//! # }
//! ```

pub mod catalog;
pub mod config;
pub mod lookup;
pub mod orders;
pub mod server;
pub mod session;

/// Commonly used items in one import
pub mod prelude {
    pub use crate::catalog::{Catalog, Money, ProductKind, ProductSpec};
    pub use crate::config::Config;
    pub use crate::lookup::{AddressLookup, LookupOutcome, StaticAddressLookup, ZipcloudClient};
    pub use crate::orders::{
        InMemoryOrderStore, OrderRecord, OrderStore, ReceiptId, RestOrderStore, StoreError,
    };
    pub use crate::session::{
        Credentials, OrderDraft, SessionAction, SessionEnvironment, SessionPhase, SessionReducer,
    };
}
