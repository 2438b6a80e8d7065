//! Configuration management for the intake application.
//!
//! Loads configuration from environment variables with sensible defaults.

use serde::{Deserialize, Serialize};
use std::env;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application server configuration
    pub server: ServerConfig,
    /// Postal-code lookup service configuration
    pub lookup: LookupConfig,
    /// Order store configuration
    pub orders: OrdersConfig,
    /// Login gate configuration
    pub gate: GateConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,
    /// Port to bind to
    pub port: u16,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Graceful shutdown timeout in seconds
    pub shutdown_timeout: u64,
}

/// Postal-code lookup service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupConfig {
    /// Base URL of the zipcloud-compatible search API
    pub base_url: String,
    /// Request timeout in seconds; expiry is treated as a transient error
    pub timeout_secs: u64,
}

/// Which order store backend to run against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrdersBackend {
    /// In-process store; orders vanish with the process
    Memory,
    /// `PostgREST`-compatible HTTP endpoint
    Rest,
}

/// Order store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrdersConfig {
    /// Selected backend
    pub backend: OrdersBackend,
    /// Base URL of the REST endpoint (REST backend only)
    pub base_url: String,
    /// API key sent as both `apikey` header and bearer token
    pub api_key: String,
    /// Table receiving order rows
    pub table: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

/// Login gate configuration.
///
/// The gate is enabled only when both values are present; otherwise sessions
/// start directly in the input phase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateConfig {
    /// Fixed user id
    pub user_id: Option<String>,
    /// Fixed password
    pub password: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            server: ServerConfig {
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: env::var("PORT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(8080),
                log_level: env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
                shutdown_timeout: env::var("SHUTDOWN_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(30),
            },
            lookup: LookupConfig {
                base_url: env::var("LOOKUP_BASE_URL")
                    .unwrap_or_else(|_| "https://zipcloud.ibsnet.co.jp/api".to_string()),
                timeout_secs: env::var("LOOKUP_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(5),
            },
            orders: OrdersConfig {
                backend: match env::var("ORDERS_BACKEND").as_deref() {
                    Ok("rest") => OrdersBackend::Rest,
                    _ => OrdersBackend::Memory,
                },
                base_url: env::var("ORDERS_BASE_URL").unwrap_or_default(),
                api_key: env::var("ORDERS_API_KEY").unwrap_or_default(),
                table: env::var("ORDERS_TABLE").unwrap_or_else(|_| "orders".to_string()),
                timeout_secs: env::var("ORDERS_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(10),
            },
            gate: GateConfig {
                user_id: env::var("GATE_USER_ID").ok(),
                password: env::var("GATE_PASSWORD").ok(),
            },
        }
    }
}

impl GateConfig {
    /// The credential pair, when the gate is fully configured
    #[must_use]
    pub fn credentials(&self) -> Option<(String, String)> {
        match (&self.user_id, &self.password) {
            (Some(user_id), Some(password)) => Some((user_id.clone(), password.clone())),
            _ => None,
        }
    }
}
