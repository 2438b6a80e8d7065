//! Unit tests for the session reducer.
//!
//! These drive the reducer directly with deterministic doubles and verify:
//! - the login gate
//! - lookup request/answer handling, including the in-flight guard
//! - the validation gate into confirm, with edits preserved on rejection
//! - the edit round-trip re-seeding every field
//! - commit success, failure, and the double-submit guard
//! - session reset from complete

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code

use super::*;
use crate::catalog::Catalog;
use crate::lookup::{LookupOutcome, StaticAddressLookup};
use crate::orders::{FailingOrderStore, InMemoryOrderStore, ReceiptId};
use crate::session::types::{ItemDetails, LineItem};
use intake_core::environment::Clock;
use intake_core::reducer::Reducer;
use intake_testing::test_clock;
use std::sync::Arc;

const KYOTO: &str = "京都府京都市下京区四条通";

fn test_env() -> (SessionEnvironment, Arc<InMemoryOrderStore>, Arc<StaticAddressLookup>) {
    let lookup = Arc::new(StaticAddressLookup::new().with_entry("6008001", KYOTO));
    let orders = Arc::new(InMemoryOrderStore::new());
    let env = SessionEnvironment::new(
        Arc::clone(&lookup) as Arc<dyn crate::lookup::AddressLookup>,
        Arc::clone(&orders) as Arc<dyn crate::orders::OrderStore>,
        Arc::new(test_clock()),
        Arc::new(Catalog::standard()),
        Some(Credentials::new("tenant".to_string(), "hunter2".to_string())),
    );
    (env, orders, lookup)
}

fn filled_form(catalog: &Catalog) -> OrderDraft {
    let mut form = OrderDraft::empty(catalog);
    form.name = "山田太郎".to_string();
    form.postal_code = "6008001".to_string();
    form.address = KYOTO.to_string();
    form.phone = "0751234567".to_string();
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
    form
}

fn input_state(state: &SessionPhase) -> &InputState {
    match state {
        SessionPhase::Input(input) => input,
        other => panic!("expected input phase, got {}", other.name()),
    }
}

fn confirm_state(state: &SessionPhase) -> &ConfirmState {
    match state {
        SessionPhase::Confirm(confirm) => confirm,
        other => panic!("expected confirm phase, got {}", other.name()),
    }
}

// ============================================================================
// Login gate
// ============================================================================

#[test]
fn login_with_correct_credentials_reaches_blank_input() {
    let (env, _, _) = test_env();
    let reducer = SessionReducer::new();
    let mut state = SessionPhase::initial(env.gated(), &env.catalog);
    assert!(matches!(state, SessionPhase::Login { failed: false }));

    reducer.reduce(
        &mut state,
        SessionAction::LogIn {
            user_id: "tenant".to_string(),
            password: "hunter2".to_string(),
        },
        &env,
    );

    let input = input_state(&state);
    assert_eq!(input.form, OrderDraft::empty(&env.catalog));
    assert!(input.errors.is_empty());
}

#[test]
fn login_with_wrong_credentials_stays_gated() {
    let (env, _, _) = test_env();
    let reducer = SessionReducer::new();
    let mut state = SessionPhase::Login { failed: false };

    reducer.reduce(
        &mut state,
        SessionAction::LogIn {
            user_id: "tenant".to_string(),
            password: "wrong".to_string(),
        },
        &env,
    );

    assert_eq!(state, SessionPhase::Login { failed: true });
}

#[test]
fn ungated_sessions_start_in_input() {
    let (mut env, _, _) = test_env();
    env.credentials = None;
    let state = SessionPhase::initial(env.gated(), &env.catalog);
    assert!(matches!(state, SessionPhase::Input(_)));
}

// ============================================================================
// Address lookup
// ============================================================================

#[test]
fn lookup_request_marks_in_flight_and_returns_one_effect() {
    let (env, _, _) = test_env();
    let reducer = SessionReducer::new();
    let mut state = SessionPhase::Input(InputState::blank(&env.catalog));

    let effects = reducer.reduce(
        &mut state,
        SessionAction::LookupAddress {
            postal_code: "600-8001".to_string(),
        },
        &env,
    );

    let input = input_state(&state);
    assert!(input.lookup.in_flight);
    assert_eq!(input.form.postal_code, "6008001", "code stored normalized");
    assert_eq!(effects.len(), 1);
    assert!(!effects[0].is_none());
}

#[test]
fn malformed_code_notices_without_calling_the_adapter() {
    let (env, _, lookup) = test_env();
    let reducer = SessionReducer::new();
    let mut state = SessionPhase::Input(InputState::blank(&env.catalog));

    let effects = reducer.reduce(
        &mut state,
        SessionAction::LookupAddress {
            postal_code: "12345".to_string(),
        },
        &env,
    );

    let input = input_state(&state);
    assert_eq!(input.lookup.notice, Some(LookupNotice::BadPostalCode));
    assert!(!input.lookup.in_flight);
    assert!(effects[0].is_none());
    assert_eq!(lookup.calls(), 0, "no network call for a malformed code");
}

#[test]
fn second_lookup_while_outstanding_is_ignored() {
    let (env, _, _) = test_env();
    let reducer = SessionReducer::new();
    let mut state = SessionPhase::Input(InputState::blank(&env.catalog));

    reducer.reduce(
        &mut state,
        SessionAction::LookupAddress {
            postal_code: "6008001".to_string(),
        },
        &env,
    );
    let effects = reducer.reduce(
        &mut state,
        SessionAction::LookupAddress {
            postal_code: "6008001".to_string(),
        },
        &env,
    );

    assert!(effects[0].is_none(), "repeat request produced no effect");
}

#[test]
fn resolved_lookup_prefills_the_address() {
    let (env, _, _) = test_env();
    let reducer = SessionReducer::new();
    let mut state = SessionPhase::Input(InputState::blank(&env.catalog));
    reducer.reduce(
        &mut state,
        SessionAction::LookupAddress {
            postal_code: "6008001".to_string(),
        },
        &env,
    );

    reducer.reduce(
        &mut state,
        SessionAction::LookupCompleted {
            outcome: LookupOutcome::Resolved(KYOTO.to_string()),
        },
        &env,
    );

    let input = input_state(&state);
    assert_eq!(input.form.address, KYOTO);
    assert_eq!(input.lookup.resolved.as_deref(), Some(KYOTO));
    assert_eq!(input.lookup.notice, Some(LookupNotice::AddressFound));
    assert!(!input.lookup.in_flight);
}

#[test]
fn not_found_leaves_address_editable_and_format_validation_untouched() {
    let (env, _, _) = test_env();
    let reducer = SessionReducer::new();
    let mut state = SessionPhase::Input(InputState::blank(&env.catalog));
    reducer.reduce(
        &mut state,
        SessionAction::LookupAddress {
            postal_code: "0000000".to_string(),
        },
        &env,
    );

    reducer.reduce(
        &mut state,
        SessionAction::LookupCompleted {
            outcome: LookupOutcome::NotFound,
        },
        &env,
    );

    let input = input_state(&state);
    assert_eq!(input.lookup.notice, Some(LookupNotice::NotFound));
    assert!(input.form.address.is_empty());

    // A manually typed address still validates: the well-formed code passes
    let mut form = filled_form(&env.catalog);
    form.postal_code = "0000000".to_string();
    let failures = validate(&form, &env.catalog);
    assert!(failures.is_empty(), "format validity is independent of lookup success");
}

#[test]
fn stale_lookup_result_is_dropped() {
    let (env, _, _) = test_env();
    let reducer = SessionReducer::new();
    let mut state = SessionPhase::Input(InputState::blank(&env.catalog));

    reducer.reduce(
        &mut state,
        SessionAction::LookupCompleted {
            outcome: LookupOutcome::Resolved(KYOTO.to_string()),
        },
        &env,
    );

    let input = input_state(&state);
    assert!(input.form.address.is_empty(), "no lookup outstanding, result dropped");
    assert!(input.lookup.notice.is_none());
}

// ============================================================================
// Submit and the validation gate
// ============================================================================

#[test]
fn valid_submit_freezes_the_draft_with_normalized_code() {
    let (env, _, _) = test_env();
    let reducer = SessionReducer::new();
    let mut state = SessionPhase::Input(InputState::blank(&env.catalog));

    let mut form = filled_form(&env.catalog);
    form.postal_code = "600-8001".to_string();
    reducer.reduce(&mut state, SessionAction::Submit { form: form.clone() }, &env);

    let confirm = confirm_state(&state);
    assert_eq!(confirm.draft.postal_code, "6008001");
    assert_eq!(confirm.draft.name, form.name);
    assert!(!confirm.commit_in_flight);
    assert!(confirm.store_error.is_none());
}

#[test]
fn rejected_submit_keeps_the_entered_values_and_reports_everything() {
    let (env, _, _) = test_env();
    let reducer = SessionReducer::new();
    let mut state = SessionPhase::Input(InputState::blank(&env.catalog));

    let mut form = filled_form(&env.catalog);
    form.name = String::new();
    form.postal_code = "123".to_string();
    form.phone = "0751234567".to_string();
    reducer.reduce(&mut state, SessionAction::Submit { form: form.clone() }, &env);

    let input = input_state(&state);
    assert_eq!(input.form, form, "edits survive a rejected submit");
    assert_eq!(input.errors.len(), 2);
    let fields: Vec<_> = input.errors.iter().map(ValidationFailure::field).collect();
    assert!(fields.contains(&"name"));
    assert!(fields.contains(&"postal_code"));
}

// ============================================================================
// Edit round-trip
// ============================================================================

#[test]
fn edit_reseeds_every_field_from_the_frozen_draft() {
    let (env, _, _) = test_env();
    let reducer = SessionReducer::new();
    let mut state = SessionPhase::Input(InputState::blank(&env.catalog));

    let form = filled_form(&env.catalog);
    reducer.reduce(&mut state, SessionAction::Submit { form: form.clone() }, &env);
    let frozen = confirm_state(&state).draft.clone();

    reducer.reduce(&mut state, SessionAction::Edit, &env);

    let input = input_state(&state);
    assert_eq!(input.form, frozen, "every field reproduced exactly");
    assert_eq!(
        input.lookup.resolved.as_deref(),
        Some(KYOTO),
        "address transient re-seeded"
    );

    // Resubmitting unchanged reproduces the same frozen draft
    let resubmitted = input.form.clone();
    reducer.reduce(&mut state, SessionAction::Submit { form: resubmitted }, &env);
    assert_eq!(confirm_state(&state).draft, frozen);
}

// ============================================================================
// Commit
// ============================================================================

#[test]
fn commit_marks_in_flight_and_issues_one_insert_effect() {
    let (env, _, _) = test_env();
    let reducer = SessionReducer::new();
    let mut state = SessionPhase::Confirm(ConfirmState::new(filled_form(&env.catalog)));

    let effects = reducer.reduce(&mut state, SessionAction::Commit, &env);

    assert!(confirm_state(&state).commit_in_flight);
    assert_eq!(effects.len(), 1);
    assert!(!effects[0].is_none());
}

#[test]
fn repeated_commit_while_outstanding_is_ignored() {
    let (env, _, _) = test_env();
    let reducer = SessionReducer::new();
    let mut state = SessionPhase::Confirm(ConfirmState::new(filled_form(&env.catalog)));

    reducer.reduce(&mut state, SessionAction::Commit, &env);
    let effects = reducer.reduce(&mut state, SessionAction::Commit, &env);

    assert!(effects[0].is_none(), "double click produces no second insert");
}

#[test]
fn commit_success_completes_with_the_assigned_identifier() {
    let (env, _, _) = test_env();
    let reducer = SessionReducer::new();
    let mut state = SessionPhase::Confirm(ConfirmState::new(filled_form(&env.catalog)));
    reducer.reduce(&mut state, SessionAction::Commit, &env);

    reducer.reduce(
        &mut state,
        SessionAction::CommitSucceeded {
            receipt_id: ReceiptId::new("17".to_string()),
        },
        &env,
    );

    match &state {
        SessionPhase::Complete {
            receipt_id,
            completed_at,
        } => {
            assert_eq!(receipt_id.as_str(), "17");
            assert_eq!(*completed_at, test_clock().now());
        }
        other => panic!("expected complete phase, got {}", other.name()),
    }
}

#[test]
fn commit_failure_keeps_the_draft_and_allows_retry() {
    let (env, _, _) = test_env();
    let reducer = SessionReducer::new();
    let draft = filled_form(&env.catalog);
    let mut state = SessionPhase::Confirm(ConfirmState::new(draft.clone()));
    reducer.reduce(&mut state, SessionAction::Commit, &env);

    reducer.reduce(
        &mut state,
        SessionAction::CommitFailed {
            reason: "order store request failed: connection refused".to_string(),
        },
        &env,
    );

    let confirm = confirm_state(&state);
    assert_eq!(confirm.draft, draft, "draft unchanged after failure");
    assert!(confirm.store_error.is_some());
    assert!(!confirm.commit_in_flight, "retry is possible");

    // An explicit retry issues a fresh insert effect
    let effects = reducer.reduce(&mut state, SessionAction::Commit, &env);
    assert!(!effects[0].is_none());
}

// ============================================================================
// Reset and logout
// ============================================================================

#[test]
fn new_order_resets_to_a_blank_input() {
    let (env, _, _) = test_env();
    let reducer = SessionReducer::new();
    let mut state = SessionPhase::Complete {
        receipt_id: ReceiptId::new("17".to_string()),
        completed_at: test_clock().now(),
    };

    reducer.reduce(&mut state, SessionAction::StartNewOrder, &env);

    let input = input_state(&state);
    assert_eq!(input.form, OrderDraft::empty(&env.catalog));
    assert!(input.lookup.resolved.is_none());
}

#[test]
fn logout_returns_to_the_gate_from_any_phase() {
    let (env, _, _) = test_env();
    let reducer = SessionReducer::new();

    let mut state = SessionPhase::Confirm(ConfirmState::new(filled_form(&env.catalog)));
    reducer.reduce(&mut state, SessionAction::LogOut, &env);
    assert_eq!(state, SessionPhase::Login { failed: false });
}

#[test]
fn logout_is_a_noop_when_ungated() {
    let (mut env, _, _) = test_env();
    env.credentials = None;
    let reducer = SessionReducer::new();

    let mut state = SessionPhase::Input(InputState::blank(&env.catalog));
    reducer.reduce(&mut state, SessionAction::LogOut, &env);
    assert!(matches!(state, SessionPhase::Input(_)));
}

// ============================================================================
// Invalid transitions
// ============================================================================

#[test]
fn actions_outside_their_phase_are_ignored() {
    let (env, _, _) = test_env();
    let reducer = SessionReducer::new();

    let mut state = SessionPhase::Login { failed: false };
    reducer.reduce(&mut state, SessionAction::Commit, &env);
    assert_eq!(state, SessionPhase::Login { failed: false });

    let mut state = SessionPhase::Input(InputState::blank(&env.catalog));
    reducer.reduce(&mut state, SessionAction::StartNewOrder, &env);
    assert!(matches!(state, SessionPhase::Input(_)));
}
