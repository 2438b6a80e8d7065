//! Order Intake Demo
//!
//! Scripted walk through the order workflow against in-process doubles:
//! login, address lookup, a rejected submit, the edit round-trip, and the
//! final commit with its receipt identifier.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin demo
//! ```

use intake::catalog::Catalog;
use intake::lookup::{AddressLookup, StaticAddressLookup};
use intake::orders::{InMemoryOrderStore, OrderStore};
use intake::session::types::{ItemDetails, LineItem};
use intake::session::{
    Credentials, OrderDraft, SessionAction, SessionEnvironment, SessionPhase, SessionReducer,
};
use intake_core::environment::SystemClock;
use intake_runtime::Store;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!("\n🧾 ============================================");
    println!("   Order Intake - Live Demo");
    println!("============================================\n");

    let catalog = Arc::new(Catalog::standard());
    let lookup = Arc::new(
        StaticAddressLookup::new().with_entry("6008001", "京都府京都市下京区観喜寺町"),
    );
    let orders = Arc::new(InMemoryOrderStore::new());

    let environment = SessionEnvironment::new(
        Arc::clone(&lookup) as Arc<dyn AddressLookup>,
        Arc::clone(&orders) as Arc<dyn OrderStore>,
        Arc::new(SystemClock::new()),
        Arc::clone(&catalog),
        Some(Credentials::new("tenant".to_string(), "demo".to_string())),
    );

    let store = Store::new(
        SessionPhase::initial(environment.gated(), &catalog),
        SessionReducer::new(),
        environment,
    );

    // Step 1: login
    println!("1️⃣  Logging in...");
    store
        .send(SessionAction::LogIn {
            user_id: "tenant".to_string(),
            password: "demo".to_string(),
        })
        .await;
    println!("   ✓ Phase: {}\n", store.state(SessionPhase::name).await);

    // Step 2: postal-code lookup pre-fills the address
    println!("2️⃣  Looking up postal code 600-8001...");
    store
        .send(SessionAction::LookupAddress {
            postal_code: "600-8001".to_string(),
        })
        .await;
    let address = store
        .state(|phase| match phase {
            SessionPhase::Input(input) => input.form.address.clone(),
            _ => String::new(),
        })
        .await;
    println!("   ✓ Address pre-filled: {address}\n");

    // Step 3: a submit with no quantities is rejected with every failure
    println!("3️⃣  Submitting an empty form (rejected on purpose)...");
    store
        .send(SessionAction::Submit {
            form: OrderDraft::empty(&catalog),
        })
        .await;
    let messages = store
        .state(|phase| match phase {
            SessionPhase::Input(input) => {
                input.errors.iter().map(ToString::to_string).collect::<Vec<_>>()
            }
            _ => Vec::new(),
        })
        .await;
    for message in &messages {
        println!("   ✗ {message}");
    }
    println!();

    // Step 4: a complete form advances to confirmation
    println!("4️⃣  Submitting the filled form...");
    let mut form = store
        .state(|phase| match phase {
            SessionPhase::Input(input) => input.form.clone(),
            _ => OrderDraft::empty(&catalog),
        })
        .await;
    form.name = "山田太郎".to_string();
    form.postal_code = "6008001".to_string();
    form.address = address;
    form.email = "taro@example.com".to_string();
    form.items.insert(
        "shirt".to_string(),
        LineItem::new(
            1,
            ItemDetails::Simple {
                size: "M".to_string(),
                memo: String::new(),
            },
        ),
    );
    store.send(SessionAction::Submit { form }).await;

    let total = store
        .state(|phase| match phase {
            SessionPhase::Confirm(confirm) => confirm.draft.total_price(&catalog).to_string(),
            _ => String::new(),
        })
        .await;
    println!("   ✓ Phase: {}", store.state(SessionPhase::name).await);
    println!("   ✓ 合計金額: {total}\n");

    // Step 5: edit round-trip keeps every field
    println!("5️⃣  Edit round-trip (confirm → input → confirm)...");
    store.send(SessionAction::Edit).await;
    let reseeded = store
        .state(|phase| match phase {
            SessionPhase::Input(input) => input.form.clone(),
            _ => OrderDraft::empty(&catalog),
        })
        .await;
    println!("   ✓ Name re-seeded: {}", reseeded.name);
    store.send(SessionAction::Submit { form: reseeded }).await;
    println!("   ✓ Phase: {}\n", store.state(SessionPhase::name).await);

    // Step 6: confirm triggers exactly one insert
    println!("6️⃣  Confirming the order...");
    store.send(SessionAction::Commit).await;
    match store.state(std::clone::Clone::clone).await {
        SessionPhase::Complete { receipt_id, .. } => {
            println!("   ✓ 注文完了 - 受付番号: {receipt_id}");
            println!("   ✓ Orders persisted: {}\n", orders.len());
        }
        other => println!("   ✗ unexpected phase: {}\n", other.name()),
    }

    println!("✨ Demo completed");
    println!("\n📝 What happened:");
    println!("   1. The fixed credential pair opened the input phase");
    println!("   2. The lookup adapter resolved 6008001 and pre-filled the address");
    println!("   3. An invalid submit reported every failing rule at once");
    println!("   4. A valid submit froze the draft for confirmation");
    println!("   5. Edit re-seeded the form and resubmitting reproduced the draft");
    println!("   6. Confirm performed exactly one insert and assigned receipt #1");
}
