//! Guard predicates for gating table entries.
//!
//! Guards are pure boolean functions evaluated before a handler runs. A
//! failing guard makes the action inert: the engine treats the entry as if
//! it were absent from the table.

use super::state::{Action, State};

/// Pure predicate that decides whether a table entry may handle an action.
///
/// Guards must be deterministic and side-effect free; they only read the
/// current state and the incoming action.
///
/// # Example
///
/// ```rust
/// use gearshift::core::Guard;
/// use gearshift::tags_for;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
/// enum CounterState {
///     Counting { value: u32 },
/// }
///
/// tags_for! {
///     State for CounterState {
///         Counting => "COUNTING",
///     }
/// }
///
/// #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
/// enum CounterAction {
///     Increment,
/// }
///
/// tags_for! {
///     Action for CounterAction {
///         Increment => "INCREMENT",
///     }
/// }
///
/// let below_limit = Guard::new(|state: &CounterState, _action: &CounterAction| {
///     let CounterState::Counting { value } = state;
///     *value < 10
/// });
///
/// assert!(below_limit.check(&CounterState::Counting { value: 3 }, &CounterAction::Increment));
/// assert!(!below_limit.check(&CounterState::Counting { value: 10 }, &CounterAction::Increment));
/// ```
pub struct Guard<S: State, A: Action> {
    predicate: Box<dyn Fn(&S, &A) -> bool + Send + Sync>,
}

impl<S: State, A: Action> Guard<S, A> {
    /// Create a guard from a pure predicate function.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&S, &A) -> bool + Send + Sync + 'static,
    {
        Guard {
            predicate: Box::new(predicate),
        }
    }

    /// Evaluate the predicate against the current state and action.
    pub fn check(&self, state: &S, action: &A) -> bool {
        (self.predicate)(state, action)
    }
}
