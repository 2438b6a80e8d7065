//! Static product catalog and currency type.
//!
//! The catalog is configuration: an ordered mapping from product key to
//! display label, unit price, and the variant shape of its line item. It is
//! never mutated at runtime. Which fields a line item carries (a size, or a
//! waist and an inseam length) is decided here, by [`ProductKind`], not by
//! string comparison at the call sites.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Money amount in whole yen.
///
/// Prices in this system are integer yen; there is no sub-unit.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(u64);

impl Money {
    /// Creates a new money amount from whole yen
    #[must_use]
    pub const fn from_yen(yen: u64) -> Self {
        Self(yen)
    }

    /// Returns the value in whole yen
    #[must_use]
    pub const fn yen(&self) -> u64 {
        self.0
    }

    /// Whether the amount is zero
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Render with thousands separators: 2000 -> "2,000円"
        let digits = self.0.to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 3);
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(c);
        }
        write!(f, "{grouped}円")
    }
}

/// Variant shape of a product's line item.
///
/// Simple products carry a size (chosen from `sizes` when non-empty, free
/// text otherwise). Trousers carry a waist measurement picked from a fixed
/// range plus a free-text inseam length.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProductKind {
    /// One size attribute
    Simple {
        /// Offered size choices; empty means free-text entry
        sizes: &'static [&'static str],
    },
    /// Waist selection plus free-text inseam length
    Trousers {
        /// Smallest offered waist in centimetres
        waist_min: u8,
        /// Largest offered waist in centimetres
        waist_max: u8,
        /// Step between offered waists
        waist_step: u8,
    },
}

impl ProductKind {
    /// Offered waist values for trousers products (empty for simple products)
    #[must_use]
    pub fn waist_options(&self) -> Vec<u8> {
        match self {
            Self::Simple { .. } => Vec::new(),
            Self::Trousers {
                waist_min,
                waist_max,
                waist_step,
            } => (*waist_min..=*waist_max)
                .step_by(usize::from(*waist_step))
                .collect(),
        }
    }
}

/// One catalog entry: display label, unit price, and line-item shape
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProductSpec {
    /// Display label shown to the customer
    pub label: &'static str,
    /// Price per unit
    pub unit_price: Money,
    /// Which attributes a line item for this product carries
    pub kind: ProductKind,
}

/// Ordered, immutable product catalog
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Catalog {
    entries: Vec<(&'static str, ProductSpec)>,
}

impl Catalog {
    /// Build a catalog from explicit entries
    #[must_use]
    pub const fn new(entries: Vec<(&'static str, ProductSpec)>) -> Self {
        Self { entries }
    }

    /// The standard three-product catalog: shirt, trousers, socks
    #[must_use]
    pub fn standard() -> Self {
        Self::new(vec![
            (
                "shirt",
                ProductSpec {
                    label: "シャツ",
                    unit_price: Money::from_yen(2000),
                    kind: ProductKind::Simple {
                        sizes: &["S", "M", "L", "XL"],
                    },
                },
            ),
            (
                "pants",
                ProductSpec {
                    label: "ズボン",
                    unit_price: Money::from_yen(3000),
                    kind: ProductKind::Trousers {
                        waist_min: 61,
                        waist_max: 109,
                        waist_step: 3,
                    },
                },
            ),
            (
                "socks",
                ProductSpec {
                    label: "靴下",
                    unit_price: Money::from_yen(500),
                    kind: ProductKind::Simple { sizes: &[] },
                },
            ),
        ])
    }

    /// Iterate entries in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &ProductSpec)> {
        self.entries.iter().map(|(key, spec)| (*key, spec))
    }

    /// Look up a product by key
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ProductSpec> {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, spec)| spec)
    }

    /// Number of products
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog has no products
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code
mod tests {
    use super::*;

    #[test]
    fn money_display_groups_thousands() {
        assert_eq!(Money::from_yen(0).to_string(), "0円");
        assert_eq!(Money::from_yen(500).to_string(), "500円");
        assert_eq!(Money::from_yen(2000).to_string(), "2,000円");
        assert_eq!(Money::from_yen(1_234_567).to_string(), "1,234,567円");
    }

    #[test]
    fn standard_catalog_order_and_prices() {
        let catalog = Catalog::standard();
        let keys: Vec<_> = catalog.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["shirt", "pants", "socks"]);

        assert_eq!(catalog.get("shirt").unwrap().unit_price, Money::from_yen(2000));
        assert_eq!(catalog.get("pants").unwrap().unit_price, Money::from_yen(3000));
        assert_eq!(catalog.get("socks").unwrap().unit_price, Money::from_yen(500));
        assert!(catalog.get("hat").is_none());
    }

    #[test]
    fn trousers_waist_options_step_by_three() {
        let catalog = Catalog::standard();
        let options = catalog.get("pants").unwrap().kind.waist_options();
        assert_eq!(options.first(), Some(&61));
        assert_eq!(options.last(), Some(&109));
        assert!(options.windows(2).all(|w| w[1] - w[0] == 3));

        let shirt = catalog.get("shirt").unwrap();
        assert!(shirt.kind.waist_options().is_empty());
    }
}
