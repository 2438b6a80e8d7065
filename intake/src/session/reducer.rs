//! Reducer for the order session state machine.
//!
//! Drives the input → confirm → commit → complete workflow:
//!
//! - `Input --Submit--> Confirm` only when every validation rule passes; a
//!   rejected submit keeps the entered values and reports all failures.
//! - `Confirm --Edit--> Input` re-seeds every field from the frozen draft.
//! - `Confirm --Commit--> Complete` goes through exactly one store insert;
//!   while the insert is outstanding the phase stays `Confirm` and repeated
//!   commits are ignored, so a double click cannot produce two records.
//! - `Complete --StartNewOrder--> Input` starts over blank.
//!
//! Invalid (phase, action) pairs fall through to a no-op, in the state
//! machine style of matching on the pair.

use crate::lookup::{AddressLookup, LookupOutcome};
use crate::orders::{OrderRecord, OrderStore};
use crate::session::actions::SessionAction;
use crate::session::environment::SessionEnvironment;
use crate::session::types::{
    ConfirmState, InputState, LookupNotice, LookupState, OrderDraft, SessionPhase,
};
use crate::session::validate::{normalize_postal_code, validate};
use intake_core::environment::Clock;
use intake_core::{SmallVec, effect::Effect, reducer::Reducer, smallvec};
use std::sync::Arc;

/// Reducer implementing the order session workflow
#[derive(Clone, Copy, Debug, Default)]
pub struct SessionReducer;

impl SessionReducer {
    /// Creates a new session reducer
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Rebuild the input phase from a frozen draft.
    ///
    /// Every field is copied back, and the lookup transient is re-seeded so
    /// the address field shows the previously confirmed address instead of
    /// reverting to empty.
    #[must_use]
    pub fn restore(draft: &OrderDraft) -> InputState {
        let resolved = if draft.address.is_empty() {
            None
        } else {
            Some(draft.address.clone())
        };
        InputState {
            form: draft.clone(),
            errors: Vec::new(),
            lookup: LookupState {
                resolved,
                notice: None,
                in_flight: false,
            },
        }
    }
}

impl Reducer for SessionReducer {
    type State = SessionPhase;
    type Action = SessionAction;
    type Environment = SessionEnvironment;

    #[allow(clippy::too_many_lines)] // One arm per transition of the phase machine
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match (state.clone(), action) {
            // Login gate
            (SessionPhase::Login { .. }, SessionAction::LogIn { user_id, password }) => {
                let accepted = env
                    .credentials
                    .as_ref()
                    .is_some_and(|c| c.verify(&user_id, &password));

                if accepted {
                    tracing::info!(%user_id, "login accepted");
                    *state = SessionPhase::Input(InputState::blank(&env.catalog));
                } else {
                    tracing::warn!(%user_id, "login rejected");
                    *state = SessionPhase::Login { failed: true };
                }
                smallvec![Effect::None]
            }

            // User-initiated address lookup
            (SessionPhase::Input(mut input), SessionAction::LookupAddress { postal_code }) => {
                if input.lookup.in_flight {
                    tracing::debug!("lookup already outstanding, ignoring request");
                    return smallvec![Effect::None];
                }

                let normalized = normalize_postal_code(&postal_code);
                input.form.postal_code.clone_from(&normalized);

                if normalized.len() != 7 {
                    input.lookup.notice = Some(LookupNotice::BadPostalCode);
                    *state = SessionPhase::Input(input);
                    return smallvec![Effect::None];
                }

                input.lookup.in_flight = true;
                input.lookup.notice = None;
                *state = SessionPhase::Input(input);

                let lookup = Arc::clone(&env.lookup);
                smallvec![Effect::Future(Box::pin(async move {
                    let outcome = lookup.lookup(&normalized).await;
                    Some(SessionAction::LookupCompleted { outcome })
                }))]
            }

            // Lookup answer; stale answers (no lookup outstanding) are dropped
            (SessionPhase::Input(mut input), SessionAction::LookupCompleted { outcome }) => {
                if !input.lookup.in_flight {
                    tracing::debug!("dropping stale lookup result");
                    return smallvec![Effect::None];
                }

                input.lookup.in_flight = false;
                match outcome {
                    LookupOutcome::Resolved(address) => {
                        input.form.address.clone_from(&address);
                        input.lookup.resolved = Some(address);
                        input.lookup.notice = Some(LookupNotice::AddressFound);
                    }
                    LookupOutcome::NotFound => {
                        input.lookup.notice = Some(LookupNotice::NotFound);
                    }
                    LookupOutcome::TransientError => {
                        input.lookup.notice = Some(LookupNotice::ServiceUnavailable);
                    }
                }
                *state = SessionPhase::Input(input);
                smallvec![Effect::None]
            }

            // Validation gate into the confirmation phase
            (SessionPhase::Input(input), SessionAction::Submit { form }) => {
                let failures = validate(&form, &env.catalog);

                if failures.is_empty() {
                    let mut draft = form;
                    draft.postal_code = normalize_postal_code(&draft.postal_code);
                    tracing::info!(
                        total = draft.total_price(&env.catalog).yen(),
                        "draft validated, advancing to confirm"
                    );
                    *state = SessionPhase::Confirm(ConfirmState::new(draft));
                } else {
                    tracing::debug!(count = failures.len(), "submit rejected");
                    // The entered values survive a rejected submit
                    *state = SessionPhase::Input(InputState {
                        form,
                        errors: failures,
                        lookup: LookupState {
                            in_flight: false,
                            notice: None,
                            ..input.lookup
                        },
                    });
                }
                smallvec![Effect::None]
            }

            // Back to input with every field re-seeded
            (SessionPhase::Confirm(confirm), SessionAction::Edit) => {
                if confirm.commit_in_flight {
                    tracing::debug!("commit outstanding, ignoring edit");
                    return smallvec![Effect::None];
                }
                *state = SessionPhase::Input(Self::restore(&confirm.draft));
                smallvec![Effect::None]
            }

            // The single persistence attempt for this confirm request
            (SessionPhase::Confirm(mut confirm), SessionAction::Commit) => {
                if confirm.commit_in_flight {
                    tracing::debug!("commit already outstanding, ignoring repeat");
                    return smallvec![Effect::None];
                }

                confirm.commit_in_flight = true;
                confirm.store_error = None;
                let record = OrderRecord::from_draft(&confirm.draft, &env.catalog);
                *state = SessionPhase::Confirm(confirm);

                let orders = Arc::clone(&env.orders);
                smallvec![Effect::Future(Box::pin(async move {
                    match orders.insert(record).await {
                        Ok(receipt_id) => Some(SessionAction::CommitSucceeded { receipt_id }),
                        Err(error) => {
                            tracing::warn!(%error, "order insert failed");
                            Some(SessionAction::CommitFailed {
                                reason: error.to_string(),
                            })
                        }
                    }
                }))]
            }

            (SessionPhase::Confirm(confirm), SessionAction::CommitSucceeded { receipt_id }) => {
                if !confirm.commit_in_flight {
                    tracing::debug!("dropping stale commit result");
                    return smallvec![Effect::None];
                }
                tracing::info!(%receipt_id, "order committed");
                *state = SessionPhase::Complete {
                    receipt_id,
                    completed_at: env.clock.now(),
                };
                smallvec![Effect::None]
            }

            (SessionPhase::Confirm(mut confirm), SessionAction::CommitFailed { reason }) => {
                if !confirm.commit_in_flight {
                    tracing::debug!("dropping stale commit failure");
                    return smallvec![Effect::None];
                }
                // Draft preserved; the user may retry explicitly
                confirm.commit_in_flight = false;
                confirm.store_error = Some(reason);
                *state = SessionPhase::Confirm(confirm);
                smallvec![Effect::None]
            }

            (SessionPhase::Complete { .. }, SessionAction::StartNewOrder) => {
                *state = SessionPhase::Input(InputState::blank(&env.catalog));
                smallvec![Effect::None]
            }

            // Logout from anywhere, only meaningful when gated
            (_, SessionAction::LogOut) => {
                if env.gated() {
                    tracing::info!("session logged out");
                    *state = SessionPhase::Login { failed: false };
                }
                smallvec![Effect::None]
            }

            // Invalid transitions
            (phase, action) => {
                tracing::debug!(phase = phase.name(), ?action, "ignoring action in this phase");
                smallvec![Effect::None]
            }
        }
    }
}
