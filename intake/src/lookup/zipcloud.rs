//! Zipcloud postal-code search client.
//!
//! Speaks the zipcloud `search` API: a GET with the code, answered by a JSON
//! body whose `results` list carries prefecture, city, and remainder parts.

use crate::config::LookupConfig;
use crate::lookup::{AddressLookup, LookupOutcome};
use reqwest::Client;
use serde::Deserialize;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

/// HTTP client for the zipcloud address search service
#[derive(Clone, Debug)]
pub struct ZipcloudClient {
    client: Client,
    base_url: String,
}

/// Wire shape of a zipcloud search response
#[derive(Debug, Deserialize)]
struct SearchResponse {
    /// `null` when the code is unknown
    results: Option<Vec<SearchEntry>>,
}

/// One resolved address, split the way the service splits it
#[derive(Debug, Deserialize)]
struct SearchEntry {
    /// Prefecture
    address1: String,
    /// City
    address2: String,
    /// Remainder
    address3: String,
}

impl ZipcloudClient {
    /// Create a client against an explicit base URL with the given timeout
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            base_url: base_url.into(),
        })
    }

    /// Create a client from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn from_config(config: &LookupConfig) -> Result<Self, reqwest::Error> {
        Self::new(&config.base_url, Duration::from_secs(config.timeout_secs))
    }
}

impl AddressLookup for ZipcloudClient {
    fn lookup(&self, postal_code: &str) -> Pin<Box<dyn Future<Output = LookupOutcome> + Send>> {
        let client = self.client.clone();
        let url = format!("{}/search", self.base_url);
        let code = postal_code.to_string();

        Box::pin(async move {
            let response = match client.get(&url).query(&[("zipcode", &code)]).send().await {
                Ok(response) => response,
                Err(error) => {
                    tracing::warn!(%error, zipcode = %code, "address lookup request failed");
                    return LookupOutcome::TransientError;
                }
            };

            if !response.status().is_success() {
                tracing::warn!(status = %response.status(), zipcode = %code, "address lookup bad status");
                return LookupOutcome::TransientError;
            }

            let body: SearchResponse = match response.json().await {
                Ok(body) => body,
                Err(error) => {
                    tracing::warn!(%error, zipcode = %code, "address lookup response unparsable");
                    return LookupOutcome::TransientError;
                }
            };

            match body.results.as_deref() {
                Some([entry, ..]) => {
                    let address =
                        format!("{}{}{}", entry.address1, entry.address2, entry.address3);
                    tracing::debug!(zipcode = %code, %address, "address resolved");
                    LookupOutcome::Resolved(address)
                }
                Some([]) | None => {
                    tracing::debug!(zipcode = %code, "no address for code");
                    LookupOutcome::NotFound
                }
            }
        })
    }
}
