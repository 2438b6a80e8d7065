//! Order persistence.
//!
//! The session hands a finalized, flattened [`OrderRecord`] to the
//! [`OrderStore`] collaborator, which persists it and answers with the
//! assigned [`ReceiptId`]. Exactly one insert is attempted per confirm
//! request; a failure leaves the session free to retry.

mod memory;
mod record;
mod rest;

pub use memory::{FailingOrderStore, InMemoryOrderStore};
pub use record::OrderRecord;
pub use rest::RestOrderStore;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Identifier the store assigns to a persisted order.
///
/// Opaque text: backends hand out integers or strings, and the session only
/// ever displays it. Authoritative once assigned, never regenerated.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReceiptId(String);

impl ReceiptId {
    /// Wrap a backend-assigned identifier
    #[must_use]
    pub const fn new(id: String) -> Self {
        Self(id)
    }

    /// The identifier as text
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReceiptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Failure inserting an order record
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// The store could not be reached
    #[error("order store request failed: {0}")]
    Connection(String),

    /// The store answered but refused the record
    #[error("order store rejected the record (status {status}): {message}")]
    Rejected {
        /// HTTP status or backend error code
        status: u16,
        /// Backend-provided detail
        message: String,
    },

    /// The store accepted the record but returned no identifier
    #[error("order store returned no record identifier")]
    MissingId,
}

/// Order persistence collaborator.
///
/// Implementations own their I/O; the returned future must be `'static`, so
/// they clone what they need from `self` before going async.
pub trait OrderStore: Send + Sync {
    /// Persist one flattened order record, returning the assigned identifier
    fn insert(
        &self,
        record: OrderRecord,
    ) -> Pin<Box<dyn Future<Output = Result<ReceiptId, StoreError>> + Send>>;
}
