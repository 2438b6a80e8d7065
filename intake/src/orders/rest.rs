//! REST order store speaking the `PostgREST` insert protocol.
//!
//! Hosted Postgres backends (Supabase among them) expose tables at
//! `/rest/v1/{table}`; an insert is a POST of the flat record with
//! `Prefer: return=representation`, answered with the inserted rows so the
//! assigned `id` can be read back.

use crate::config::OrdersConfig;
use crate::orders::{OrderRecord, OrderStore, ReceiptId, StoreError};
use reqwest::Client;
use serde_json::Value;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

/// Order store backed by a `PostgREST`-compatible HTTP endpoint
#[derive(Clone, Debug)]
pub struct RestOrderStore {
    client: Client,
    base_url: String,
    api_key: String,
    table: String,
}

impl RestOrderStore {
    /// Create a store against an explicit endpoint
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        table: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            base_url: base_url.into(),
            api_key: api_key.into(),
            table: table.into(),
        })
    }

    /// Create a store from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn from_config(config: &OrdersConfig) -> Result<Self, reqwest::Error> {
        Self::new(
            &config.base_url,
            &config.api_key,
            &config.table,
            Duration::from_secs(config.timeout_secs),
        )
    }

    fn identifier_from_rows(rows: &[Value]) -> Result<ReceiptId, StoreError> {
        let id = rows
            .first()
            .and_then(|row| row.get("id"))
            .ok_or(StoreError::MissingId)?;

        let text = match id {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        Ok(ReceiptId::new(text))
    }
}

impl OrderStore for RestOrderStore {
    fn insert(
        &self,
        record: OrderRecord,
    ) -> Pin<Box<dyn Future<Output = Result<ReceiptId, StoreError>> + Send>> {
        let client = self.client.clone();
        let url = format!("{}/rest/v1/{}", self.base_url, self.table);
        let api_key = self.api_key.clone();

        Box::pin(async move {
            let response = client
                .post(&url)
                .header("apikey", &api_key)
                .bearer_auth(&api_key)
                .header("Prefer", "return=representation")
                .json(&record)
                .send()
                .await
                .map_err(|error| StoreError::Connection(error.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                let message = response.text().await.unwrap_or_default();
                tracing::warn!(status = %status, %message, "order store rejected insert");
                return Err(StoreError::Rejected {
                    status: status.as_u16(),
                    message,
                });
            }

            let rows: Vec<Value> = response
                .json()
                .await
                .map_err(|error| StoreError::Connection(error.to_string()))?;

            let receipt_id = Self::identifier_from_rows(&rows)?;
            tracing::info!(%receipt_id, "order stored");
            Ok(receipt_id)
        })
    }
}
