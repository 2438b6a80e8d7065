//! Actions processed by the session reducer.
//!
//! Commands (user-initiated) and events (effect feedback) share one enum:
//! the reducer validates commands against the current phase and effects feed
//! the resulting events back in.

use crate::lookup::LookupOutcome;
use crate::orders::ReceiptId;
use crate::session::types::OrderDraft;
use serde::{Deserialize, Serialize};

/// All inputs to the session state machine
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum SessionAction {
    /// Command: present the fixed credential pair
    LogIn {
        /// Entered user id
        user_id: String,
        /// Entered password
        password: String,
    },

    /// Command: resolve an address for a postal code.
    ///
    /// Issued once per explicit user request, never automatically. Ignored
    /// while a lookup is already outstanding.
    LookupAddress {
        /// Postal code as typed; normalized before the call
        postal_code: String,
    },

    /// Event: the lookup adapter answered
    LookupCompleted {
        /// Adapter outcome
        outcome: LookupOutcome,
    },

    /// Command: validate the candidate form and freeze it for confirmation
    Submit {
        /// Candidate field values
        form: OrderDraft,
    },

    /// Command: return from confirmation to input, re-seeding every field
    Edit,

    /// Command: persist the frozen draft (exactly one insert per request)
    Commit,

    /// Event: the order store accepted the record
    CommitSucceeded {
        /// Identifier assigned by the store
        receipt_id: ReceiptId,
    },

    /// Event: the order store rejected the record or was unreachable
    CommitFailed {
        /// User-facing failure description
        reason: String,
    },

    /// Command: discard the completed order and start a fresh one
    StartNewOrder,

    /// Command: end the session and return to the login gate
    LogOut,
}
