//! Flattened order record for the store boundary.
//!
//! The external store's schema is columnar: top-level customer fields plus
//! independently named per-product columns, not nested structures. This
//! module is the single place where the typed draft is flattened into that
//! shape.

use crate::catalog::{Catalog, ProductKind};
use crate::session::types::{ItemDetails, LineItem, OrderDraft};
use serde::Serialize;
use serde_json::{Map, Value, json};

/// A flat column → value map ready for insertion
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct OrderRecord(Map<String, Value>);

impl OrderRecord {
    /// Flatten a finalized draft into store columns.
    ///
    /// Customer fields keep their names; each catalog product contributes
    /// `{key}` (quantity) and `{key}_memo`, plus `{key}_size` for simple
    /// products or `{key}_waist` and `{key}_length` for trousers. Products
    /// the draft has no item for are written with the empty shape the
    /// catalog prescribes.
    #[must_use]
    pub fn from_draft(draft: &OrderDraft, catalog: &Catalog) -> Self {
        let mut columns = Map::new();
        columns.insert("name".to_string(), json!(draft.name));
        columns.insert("zipcode".to_string(), json!(draft.postal_code));
        columns.insert("address".to_string(), json!(draft.address));
        columns.insert("phone".to_string(), json!(draft.phone));
        columns.insert("email".to_string(), json!(draft.email));

        for (key, spec) in catalog.iter() {
            let fallback = LineItem::empty_for(&spec.kind);
            let item = draft.items.get(key).unwrap_or(&fallback);

            columns.insert(key.to_string(), json!(item.quantity));
            columns.insert(format!("{key}_memo"), json!(item.details.memo()));

            match &item.details {
                ItemDetails::Simple { size, .. } => {
                    columns.insert(format!("{key}_size"), json!(size));
                }
                ItemDetails::Trousers { waist, length, .. } => {
                    columns.insert(
                        format!("{key}_waist"),
                        waist.map_or(Value::Null, |w| json!(w)),
                    );
                    columns.insert(format!("{key}_length"), json!(length));
                }
            }
        }

        Self(columns)
    }

    /// The flat columns
    #[must_use]
    pub const fn columns(&self) -> &Map<String, Value> {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code
mod tests {
    use super::*;
    use crate::session::types::{ItemDetails, LineItem};

    #[test]
    fn standard_catalog_column_set() {
        let catalog = Catalog::standard();
        let mut draft = OrderDraft::empty(&catalog);
        draft.name = "山田太郎".to_string();
        draft.postal_code = "6008001".to_string();
        draft.address = "京都府京都市下京区".to_string();
        draft.items.insert(
            "shirt".to_string(),
            LineItem::new(
                2,
                ItemDetails::Simple {
                    size: "M".to_string(),
                    memo: "プレゼント包装".to_string(),
                },
            ),
        );
        draft.items.insert(
            "pants".to_string(),
            LineItem::new(
                1,
                ItemDetails::Trousers {
                    waist: Some(76),
                    length: "95".to_string(),
                    memo: String::new(),
                },
            ),
        );

        let record = OrderRecord::from_draft(&draft, &catalog);
        let columns = record.columns();

        let mut keys: Vec<_> = columns.keys().cloned().collect();
        keys.sort();
        assert_eq!(
            keys,
            vec![
                "address",
                "email",
                "name",
                "pants",
                "pants_length",
                "pants_memo",
                "pants_waist",
                "phone",
                "shirt",
                "shirt_memo",
                "shirt_size",
                "socks",
                "socks_memo",
                "socks_size",
                "zipcode",
            ]
        );

        assert_eq!(columns["shirt"], json!(2));
        assert_eq!(columns["shirt_size"], json!("M"));
        assert_eq!(columns["shirt_memo"], json!("プレゼント包装"));
        assert_eq!(columns["pants"], json!(1));
        assert_eq!(columns["pants_waist"], json!(76));
        assert_eq!(columns["pants_length"], json!("95"));
        assert_eq!(columns["socks"], json!(0));
        assert_eq!(columns["name"], json!("山田太郎"));
        assert_eq!(columns["zipcode"], json!("6008001"));
    }

    #[test]
    fn unchosen_waist_is_null() {
        let catalog = Catalog::standard();
        let draft = OrderDraft::empty(&catalog);

        let record = OrderRecord::from_draft(&draft, &catalog);
        assert_eq!(record.columns()["pants_waist"], Value::Null);
    }
}
