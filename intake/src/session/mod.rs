//! The order session: a phase machine over input → confirm → commit →
//! complete.
//!
//! # Architecture
//!
//! ```text
//! Login ──LogIn(ok)──▶ Input ──Submit(valid)──▶ Confirm ──Commit──▶ insert
//!                        ▲  ▲                     │  ▲                │
//!                        │  └──────Edit───────────┘  └─CommitFailed───┤
//!                        │        (fields re-seeded)   (draft kept)   │
//!                        │                                            ▼
//!                        └──────────StartNewOrder────────────── Complete
//! ```
//!
//! The session owns no I/O: the reducer returns effect descriptions and the
//! adapters injected through [`SessionEnvironment`] perform the calls. While
//! a call is outstanding the phase does not change; only the feedback event
//! advances it, and the in-flight flags make repeated lookup or commit
//! requests no-ops.

pub mod actions;
pub mod environment;
pub mod reducer;
#[cfg(test)]
mod tests;
pub mod types;
pub mod validate;

pub use actions::SessionAction;
pub use environment::{Credentials, SessionEnvironment};
pub use reducer::SessionReducer;
pub use types::{
    ConfirmState, InputState, ItemDetails, LineItem, LookupNotice, LookupState, MAX_QUANTITY,
    OrderDraft, SessionPhase,
};
pub use validate::{ValidationFailure, normalize_postal_code, validate};
