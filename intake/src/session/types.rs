//! Core types for the order session.
//!
//! The session is a phase machine in the data-carrying enum style: each
//! phase owns exactly the data that is meaningful in it. The draft lives in
//! [`SessionPhase::Input`] while editable and moves into
//! [`SessionPhase::Confirm`] when frozen; the receipt identifier exists only
//! in [`SessionPhase::Complete`].

use crate::catalog::{Catalog, Money, ProductKind};
use crate::orders::ReceiptId;
use crate::session::validate::ValidationFailure;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Largest orderable quantity per line item
pub const MAX_QUANTITY: u8 = 10;

/// Variant-specific attributes of a line item.
///
/// The variant is selected by the catalog's [`ProductKind`], never by
/// comparing product keys at the call site.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemDetails {
    /// Simple product: one size attribute
    Simple {
        /// Chosen or typed size (may be empty)
        size: String,
        /// Optional free-text note
        memo: String,
    },
    /// Trousers: waist selection plus free-text inseam length
    Trousers {
        /// Chosen waist in centimetres, if any
        waist: Option<u8>,
        /// Free-text inseam length (may be empty)
        length: String,
        /// Optional free-text note
        memo: String,
    },
}

impl ItemDetails {
    /// The free-text note shared by all variants
    #[must_use]
    pub fn memo(&self) -> &str {
        match self {
            Self::Simple { memo, .. } | Self::Trousers { memo, .. } => memo,
        }
    }
}

/// One product's quantity and attributes within an order
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Ordered quantity, clamped to `0..=MAX_QUANTITY`
    pub quantity: u8,
    /// Variant-specific attributes
    pub details: ItemDetails,
}

impl LineItem {
    /// Creates a line item, clamping the quantity to the allowed range
    #[must_use]
    pub fn new(quantity: u8, details: ItemDetails) -> Self {
        Self {
            quantity: quantity.min(MAX_QUANTITY),
            details,
        }
    }

    /// An untouched line item of the shape the catalog prescribes
    #[must_use]
    pub fn empty_for(kind: &ProductKind) -> Self {
        let details = match kind {
            ProductKind::Simple { .. } => ItemDetails::Simple {
                size: String::new(),
                memo: String::new(),
            },
            ProductKind::Trousers { .. } => ItemDetails::Trousers {
                waist: None,
                length: String::new(),
                memo: String::new(),
            },
        };
        Self {
            quantity: 0,
            details,
        }
    }
}

/// The order record while still editable (and, frozen, while awaiting
/// confirmation).
///
/// The total price is never stored; it is derived from the line items on
/// every use.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDraft {
    /// Customer name (required)
    pub name: String,
    /// Postal code; normalized to seven digits when the draft freezes
    pub postal_code: String,
    /// Street address; may be pre-filled by lookup, always user-editable
    pub address: String,
    /// Phone number (optional free text)
    pub phone: String,
    /// E-mail address (optional; must contain `@` when present)
    pub email: String,
    /// Line items keyed by product key
    pub items: HashMap<String, LineItem>,
}

impl OrderDraft {
    /// An empty draft with one zero-quantity line item per catalog product
    #[must_use]
    pub fn empty(catalog: &Catalog) -> Self {
        let items = catalog
            .iter()
            .map(|(key, spec)| (key.to_string(), LineItem::empty_for(&spec.kind)))
            .collect();
        Self {
            name: String::new(),
            postal_code: String::new(),
            address: String::new(),
            phone: String::new(),
            email: String::new(),
            items,
        }
    }

    /// Total price: sum over catalog entries of quantity × unit price.
    ///
    /// Products absent from the draft contribute nothing; items for unknown
    /// products are ignored.
    #[must_use]
    pub fn total_price(&self, catalog: &Catalog) -> Money {
        let yen = catalog
            .iter()
            .filter_map(|(key, spec)| {
                self.items
                    .get(key)
                    .map(|item| u64::from(item.quantity) * spec.unit_price.yen())
            })
            .sum();
        Money::from_yen(yen)
    }
}

/// Outcome notices from the postal-code lookup, surfaced to the user.
///
/// None of these block manual address entry or validation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LookupNotice {
    /// Lookup requested with a code that is not seven digits
    BadPostalCode,
    /// Address resolved and pre-filled
    AddressFound,
    /// The service knows no address for this code
    NotFound,
    /// The service could not be reached
    ServiceUnavailable,
}

impl LookupNotice {
    /// Display severity for the UI layer
    #[must_use]
    pub const fn level(&self) -> &'static str {
        match self {
            Self::AddressFound => "success",
            Self::NotFound => "info",
            Self::BadPostalCode => "warning",
            Self::ServiceUnavailable => "error",
        }
    }
}

impl fmt::Display for LookupNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            Self::BadPostalCode => "郵便番号は7桁の数字で入力してください（例：6008001）。",
            Self::AddressFound => "住所を取得しました。住所欄をご確認ください。",
            Self::NotFound => "該当する住所が見つかりませんでした。郵便番号をご確認ください。",
            Self::ServiceUnavailable => "住所検索に失敗しました。時間をおいて再度お試しください。",
        };
        f.write_str(message)
    }
}

/// Transient lookup state carried by the input phase.
///
/// `resolved` re-seeds the address field when the user returns from the
/// confirmation screen; `in_flight` guards against overlapping lookups.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LookupState {
    /// Last address the lookup resolved (or the previously confirmed one)
    pub resolved: Option<String>,
    /// Outcome of the last lookup attempt, if any
    pub notice: Option<LookupNotice>,
    /// Whether a lookup call is currently outstanding
    pub in_flight: bool,
}

/// Editable state of the input phase
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InputState {
    /// Current field values (pre-populated when returning from confirm)
    pub form: OrderDraft,
    /// Failures from the last rejected submit, all reported together
    pub errors: Vec<ValidationFailure>,
    /// Transient lookup state
    pub lookup: LookupState,
}

impl InputState {
    /// A blank input phase for the given catalog
    #[must_use]
    pub fn blank(catalog: &Catalog) -> Self {
        Self {
            form: OrderDraft::empty(catalog),
            errors: Vec::new(),
            lookup: LookupState::default(),
        }
    }
}

/// Frozen state of the confirmation phase
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfirmState {
    /// The validated draft; immutable until edit or commit resolution
    pub draft: OrderDraft,
    /// Message from the last failed persistence attempt, if any
    pub store_error: Option<String>,
    /// Whether an insert is currently outstanding (double-submit guard)
    pub commit_in_flight: bool,
}

impl ConfirmState {
    /// Wrap a freshly validated draft
    #[must_use]
    pub const fn new(draft: OrderDraft) -> Self {
        Self {
            draft,
            store_error: None,
            commit_in_flight: false,
        }
    }
}

/// The session phase machine.
///
/// There is no terminal phase: `Complete` always offers a path back to a
/// blank `Input`.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionPhase {
    /// Awaiting the fixed credential pair (only when gating is configured)
    Login {
        /// Whether the last attempt was rejected
        failed: bool,
    },
    /// Collecting and editing order fields
    Input(InputState),
    /// Reviewing the frozen draft
    Confirm(ConfirmState),
    /// Order persisted; the assigned identifier is authoritative
    Complete {
        /// Identifier assigned by the order store
        receipt_id: ReceiptId,
        /// When the store accepted the order
        completed_at: DateTime<Utc>,
    },
}

impl SessionPhase {
    /// Initial phase for a new session: `Login` when gated, otherwise a
    /// blank `Input`
    #[must_use]
    pub fn initial(gated: bool, catalog: &Catalog) -> Self {
        if gated {
            Self::Login { failed: false }
        } else {
            Self::Input(InputState::blank(catalog))
        }
    }

    /// Short phase name for logs
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Login { .. } => "login",
            Self::Input(_) => "input",
            Self::Confirm(_) => "confirm",
            Self::Complete { .. } => "complete",
        }
    }
}
