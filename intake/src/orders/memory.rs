//! In-memory order store for development and testing.

use crate::orders::{OrderRecord, OrderStore, ReceiptId, StoreError};
use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// Order store backed by a vector, assigning sequential identifiers.
///
/// Useful for development runs and for asserting exactly how many inserts a
/// scenario performed.
#[derive(Debug, Default)]
pub struct InMemoryOrderStore {
    records: Mutex<Vec<OrderRecord>>,
    next_id: AtomicU64,
}

impl InMemoryOrderStore {
    /// An empty store; the first insert is assigned id `1`
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything inserted so far
    #[must_use]
    pub fn records(&self) -> Vec<OrderRecord> {
        self.records
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    /// Number of inserted records
    #[must_use]
    pub fn len(&self) -> usize {
        self.records
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .len()
    }

    /// Whether nothing has been inserted
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl OrderStore for InMemoryOrderStore {
    fn insert(
        &self,
        record: OrderRecord,
    ) -> Pin<Box<dyn Future<Output = Result<ReceiptId, StoreError>> + Send>> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        self.records
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(record);

        tracing::debug!(id, "order stored in memory");
        Box::pin(async move { Ok(ReceiptId::new(id.to_string())) })
    }
}

/// Order store that refuses every insert, for failure-path tests.
///
/// Counts attempts so tests can assert the one-insert-per-confirm contract.
#[derive(Debug, Default)]
pub struct FailingOrderStore {
    attempts: AtomicUsize,
}

impl FailingOrderStore {
    /// A fresh failing store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// How many inserts have been attempted
    #[must_use]
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl OrderStore for FailingOrderStore {
    fn insert(
        &self,
        _record: OrderRecord,
    ) -> Pin<Box<dyn Future<Output = Result<ReceiptId, StoreError>> + Send>> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Box::pin(async {
            Err(StoreError::Connection(
                "connection refused".to_string(),
            ))
        })
    }
}
