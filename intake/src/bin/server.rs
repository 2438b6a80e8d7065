//! Intake HTTP server.
//!
//! Binds the session API and serves it until interrupted.
//!
//! # Usage
//!
//! ```bash
//! # In-memory store, no login gate
//! cargo run --bin server
//!
//! # Against a hosted Postgres REST endpoint with gating
//! ORDERS_BACKEND=rest \
//! ORDERS_BASE_URL=https://project.supabase.co \
//! ORDERS_API_KEY=... \
//! GATE_USER_ID=tenant GATE_PASSWORD=... \
//! cargo run --bin server
//! ```

use intake::catalog::Catalog;
use intake::config::{Config, OrdersBackend};
use intake::lookup::{AddressLookup, ZipcloudClient};
use intake::orders::{InMemoryOrderStore, OrderStore, RestOrderStore};
use intake::server::{AppState, session_router};
use intake::session::{Credentials, SessionEnvironment};
use intake_core::environment::SystemClock;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,intake=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();

    let lookup: Arc<dyn AddressLookup> = Arc::new(ZipcloudClient::from_config(&config.lookup)?);

    let orders: Arc<dyn OrderStore> = match config.orders.backend {
        OrdersBackend::Memory => {
            tracing::warn!("using in-memory order store; orders are not durable");
            Arc::new(InMemoryOrderStore::new())
        }
        OrdersBackend::Rest => Arc::new(RestOrderStore::from_config(&config.orders)?),
    };

    let credentials = config
        .gate
        .credentials()
        .map(|(user_id, password)| Credentials::new(user_id, password));
    if credentials.is_none() {
        tracing::info!("login gate disabled; sessions start in the input phase");
    }

    let environment = SessionEnvironment::new(
        lookup,
        orders,
        Arc::new(SystemClock::new()),
        Arc::new(Catalog::standard()),
        credentials,
    );

    let state = Arc::new(AppState::new(environment));
    let app = session_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "intake server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}
