//! # Intake Runtime
//!
//! Runtime implementation for the intake order-session architecture.
//!
//! This crate provides the Store runtime that coordinates reducer execution
//! and effect handling.
//!
//! ## Core Components
//!
//! - **Store**: The runtime that manages state and executes effects
//! - **Event Loop**: Manages the action → reducer → effects → action feedback loop
//!
//! ## Execution Model
//!
//! A session processes one user interaction at a time: each action runs to
//! completion (including the effects it triggers and the feedback actions
//! those produce) before [`Store::send`] returns. The state lock is only held
//! while the reducer runs, never across an effect await, so the state remains
//! readable while an adapter call is outstanding.
//!
//! ## Example
//!
//! ```ignore
//! use intake_runtime::Store;
//!
//! let store = Store::new(initial_state, my_reducer, environment);
//!
//! // Send an action; effects have completed when this returns
//! store.send(Action::DoSomething).await;
//!
//! // Read state
//! let value = store.state(|s| s.some_field).await;
//! ```

use intake_core::{effect::Effect, reducer::Reducer};
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::RwLock;

/// The Store - runtime coordinator for a reducer
///
/// The Store manages:
/// 1. State (behind `RwLock` for concurrent access)
/// 2. Reducer (business logic)
/// 3. Environment (injected dependencies)
/// 4. Effect execution (with feedback loop)
///
/// # Type Parameters
///
/// - `S`: State type
/// - `A`: Action type
/// - `E`: Environment type
/// - `R`: Reducer implementation
pub struct Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    state: Arc<RwLock<S>>,
    reducer: R,
    environment: E,
}

impl<S, A, E, R> Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E> + Send + Sync,
    S: Send + Sync,
    A: Send + std::fmt::Debug,
    E: Send + Sync,
{
    /// Create a new store with initial state, reducer, and environment
    #[must_use]
    pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
        Self {
            state: Arc::new(RwLock::new(initial_state)),
            reducer,
            environment,
        }
    }

    /// Send an action to the store
    ///
    /// This is the primary way to interact with the store:
    /// 1. Acquires the write lock on state
    /// 2. Calls the reducer with (state, action, environment)
    /// 3. Executes the returned effects, feeding produced actions back into
    ///    the reducer until the queue drains
    ///
    /// When `send` returns, every effect triggered by the action (and by its
    /// feedback actions) has completed and its state changes are applied. The
    /// write lock is released while effects are awaited, so concurrent
    /// readers observe the pre-effect state until the feedback action lands.
    pub async fn send(&self, action: A) {
        let mut queue = VecDeque::new();
        queue.push_back(action);

        while let Some(action) = queue.pop_front() {
            tracing::debug!(?action, "store processing action");
            metrics::counter!("store.actions").increment(1);

            let effects = {
                let mut state = self.state.write().await;
                self.reducer.reduce(&mut state, action, &self.environment)
            };

            for effect in effects {
                match effect {
                    Effect::None => {}
                    Effect::Future(future) => {
                        metrics::counter!("store.effects").increment(1);
                        if let Some(feedback) = future.await {
                            queue.push_back(feedback);
                        }
                    }
                }
            }
        }
    }

    /// Read the current state through a closure
    ///
    /// The closure runs under the read lock; keep it short and return owned
    /// data.
    pub async fn state<T>(&self, f: impl FnOnce(&S) -> T) -> T {
        let state = self.state.read().await;
        f(&state)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)] // Test code
mod tests {
    use super::*;
    use intake_core::{SmallVec, smallvec};

    #[derive(Debug, Clone, PartialEq, Eq, Default)]
    struct CounterState {
        value: i64,
        echoes: usize,
    }

    #[derive(Debug)]
    enum CounterAction {
        Increment,
        EchoAfterIncrement,
        Echoed,
    }

    struct CounterReducer;

    impl Reducer for CounterReducer {
        type State = CounterState;
        type Action = CounterAction;
        type Environment = ();

        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            _env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]> {
            match action {
                CounterAction::Increment => {
                    state.value += 1;
                    smallvec![Effect::None]
                }
                CounterAction::EchoAfterIncrement => {
                    state.value += 1;
                    smallvec![Effect::Future(Box::pin(async {
                        Some(CounterAction::Echoed)
                    }))]
                }
                CounterAction::Echoed => {
                    state.echoes += 1;
                    smallvec![Effect::None]
                }
            }
        }
    }

    #[tokio::test]
    async fn send_applies_state_changes() {
        let store = Store::new(CounterState::default(), CounterReducer, ());

        store.send(CounterAction::Increment).await;
        store.send(CounterAction::Increment).await;

        let value = store.state(|s| s.value).await;
        assert_eq!(value, 2);
    }

    #[tokio::test]
    async fn effects_feed_actions_back_before_send_returns() {
        let store = Store::new(CounterState::default(), CounterReducer, ());

        store.send(CounterAction::EchoAfterIncrement).await;

        let state = store.state(Clone::clone).await;
        assert_eq!(state.value, 1);
        assert_eq!(state.echoes, 1, "feedback action applied inline");
    }
}
