//! Postal-code to address resolution.
//!
//! The session consumes this collaborator through the narrow
//! [`AddressLookup`] trait: one call per explicit user request, answering
//! with a [`LookupOutcome`] value. Failures are outcomes, not errors - the
//! user can always type an address manually and proceed.

mod zipcloud;

pub use zipcloud::ZipcloudClient;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Result of one lookup call
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LookupOutcome {
    /// The code resolved; the full address text to pre-fill
    Resolved(String),
    /// The service knows no address for this code
    NotFound,
    /// The service could not be reached or answered garbage
    TransientError,
}

/// Address lookup collaborator.
///
/// Implementations own their I/O; the returned future must be `'static`, so
/// they clone what they need from `self` and the argument.
pub trait AddressLookup: Send + Sync {
    /// Resolve a normalized seven-digit postal code to an address fragment
    fn lookup(&self, postal_code: &str) -> Pin<Box<dyn Future<Output = LookupOutcome> + Send>>;
}

/// Fixed-table lookup for development and testing.
///
/// Resolves only the codes it was seeded with and counts how often it is
/// called, so tests can assert the at-most-once contract.
#[derive(Debug, Default)]
pub struct StaticAddressLookup {
    addresses: HashMap<String, String>,
    calls: AtomicUsize,
}

impl StaticAddressLookup {
    /// An empty table; every lookup answers `NotFound`
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed one code → address pair
    #[must_use]
    pub fn with_entry(mut self, postal_code: impl Into<String>, address: impl Into<String>) -> Self {
        self.addresses.insert(postal_code.into(), address.into());
        self
    }

    /// How many lookups have been performed
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl AddressLookup for StaticAddressLookup {
    fn lookup(&self, postal_code: &str) -> Pin<Box<dyn Future<Output = LookupOutcome> + Send>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let outcome = self
            .addresses
            .get(postal_code)
            .cloned()
            .map_or(LookupOutcome::NotFound, LookupOutcome::Resolved);
        Box::pin(async move { outcome })
    }
}

/// Lookup double that is always unreachable, for failure-path tests
#[derive(Debug, Default, Clone, Copy)]
pub struct UnreachableAddressLookup;

impl AddressLookup for UnreachableAddressLookup {
    fn lookup(&self, _postal_code: &str) -> Pin<Box<dyn Future<Output = LookupOutcome> + Send>> {
        Box::pin(async { LookupOutcome::TransientError })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn static_lookup_resolves_seeded_codes_and_counts_calls() {
        let lookup = StaticAddressLookup::new().with_entry("6008001", "京都府京都市下京区");

        assert_eq!(
            lookup.lookup("6008001").await,
            LookupOutcome::Resolved("京都府京都市下京区".to_string())
        );
        assert_eq!(lookup.lookup("0000000").await, LookupOutcome::NotFound);
        assert_eq!(lookup.calls(), 2);
    }

    #[tokio::test]
    async fn unreachable_lookup_reports_transient_error() {
        let lookup = UnreachableAddressLookup;
        assert_eq!(lookup.lookup("6008001").await, LookupOutcome::TransientError);
    }
}
