//! Field validation for the order draft.
//!
//! Rules are evaluated independently, never short-circuited, so a rejected
//! submit reports every violation at once.

use crate::catalog::Catalog;
use crate::session::types::OrderDraft;
use thiserror::Error;

/// A single validation rule violation.
///
/// Display strings are the user-facing messages shown next to the form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationFailure {
    /// A required text field is empty
    #[error("{label}（必須）を入力してください。")]
    RequiredFieldMissing {
        /// Machine-readable field name
        field: &'static str,
        /// Display label used in the message
        label: &'static str,
    },

    /// The postal code does not normalize to exactly seven digits
    #[error("郵便番号（必須）は7桁の数字で入力してください（例：6008001）。")]
    InvalidPostalCode,

    /// A non-empty e-mail address without an `@`
    #[error("メールアドレスの形式が正しくありません。")]
    InvalidEmailFormat,

    /// Every line item has quantity zero
    #[error("商品数量を入力してください。")]
    EmptyOrder,
}

impl ValidationFailure {
    /// The form field this failure anchors to
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::RequiredFieldMissing { field, .. } => field,
            Self::InvalidPostalCode => "postal_code",
            Self::InvalidEmailFormat => "email",
            Self::EmptyOrder => "items",
        }
    }
}

/// Strip every non-ASCII-digit character from a postal code.
///
/// `"600-8001"` becomes `"6008001"`; full-width or other decorations are
/// dropped the same way.
#[must_use]
pub fn normalize_postal_code(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// Check a draft against every rule and collect all violations.
///
/// An empty result means the draft may advance to confirmation.
#[must_use]
pub fn validate(draft: &OrderDraft, catalog: &Catalog) -> Vec<ValidationFailure> {
    let mut failures = Vec::new();

    if draft.name.trim().is_empty() {
        failures.push(ValidationFailure::RequiredFieldMissing {
            field: "name",
            label: "お名前",
        });
    }

    if normalize_postal_code(&draft.postal_code).len() != 7 {
        failures.push(ValidationFailure::InvalidPostalCode);
    }

    if draft.address.is_empty() {
        failures.push(ValidationFailure::RequiredFieldMissing {
            field: "address",
            label: "住所",
        });
    }

    if !draft.email.is_empty() && !draft.email.contains('@') {
        failures.push(ValidationFailure::InvalidEmailFormat);
    }

    if draft.total_price(catalog).is_zero() {
        failures.push(ValidationFailure::EmptyOrder);
    }

    failures
}
