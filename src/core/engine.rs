//! The transition evaluator.
//!
//! `transition` is the whole engine: pure, synchronous, deterministic for a
//! given (state tag, action kind, handler). It performs no I/O and holds no
//! globals; the optional report hook on the envelope observes the result but
//! never changes it.

use super::state::{Action, State};
use super::step::{Envelope, Step};
use super::table::TransitionTable;
use std::sync::Arc;
use tracing::trace;

/// Result of evaluating one action against a table.
#[derive(Clone, Debug)]
pub enum Transitioned<S: State, A: Action, C> {
    /// No handler matched. The caller's current [`Step`] stays untouched,
    /// which is the cheap "nothing happened" signal — repeating the same
    /// action yields `Ignored` again, any number of times.
    Ignored,
    /// A handler ran. `step` carries the new value and its bookkeeping;
    /// `command` is the side effect the host must perform after committing
    /// the state.
    Next {
        step: Step<S, A>,
        command: Option<C>,
    },
}

impl<S: State, A: Action, C> Transitioned<S, A, C> {
    /// True when the action was a no-op.
    pub fn is_ignored(&self) -> bool {
        matches!(self, Transitioned::Ignored)
    }
}

/// Evaluate one action against the current step and the transition table.
///
/// Lookup is `table[step.value.tag()][action.kind()]`, filtered by guards.
/// When nothing matches, the action is inert: the original step is left
/// untouched and the envelope's report hook (if any) is told `ignored: true`.
///
/// When a handler matches, it runs with `(&state, &action)` and its outcome
/// is normalized to `(new state, optional command)`. The returned [`Step`]
/// is stamped with the triggering action and the previous value; a debug
/// identifier on the old step is propagated, and the readable table spec is
/// refreshed on the new step for inspection. The report hook is told
/// `ignored: false` only when the new value actually differs from the old
/// one — a handler returning an equal value transitions silently.
///
/// A panicking handler propagates to the caller; the engine attempts no
/// recovery. Handlers must not dispatch back into the same machine.
///
/// # Example
///
/// ```rust
/// use gearshift::core::{transition, Envelope, Step, TableBuilder, Transitioned};
/// use gearshift::tags_for;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
/// enum ToggleState { On, Off }
///
/// tags_for! {
///     State for ToggleState {
///         On => "ON",
///         Off => "OFF",
///     }
/// }
///
/// #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
/// enum ToggleAction { Flip }
///
/// tags_for! {
///     Action for ToggleAction {
///         Flip => "FLIP",
///     }
/// }
///
/// enum NoCommand {}
///
/// let table = TableBuilder::<ToggleState, ToggleAction, NoCommand>::new()
///     .on("OFF", "FLIP", |_, _| ToggleState::On)
///     .on("ON", "FLIP", |_, _| ToggleState::Off)
///     .build()
///     .unwrap();
///
/// let step = Step::initial(ToggleState::Off);
/// let Transitioned::Next { step, command } =
///     transition(&step, &ToggleAction::Flip.into(), &table)
/// else {
///     panic!("FLIP is handled in OFF");
/// };
///
/// assert_eq!(step.value(), &ToggleState::On);
/// assert_eq!(step.previous(), Some(&ToggleState::Off));
/// assert!(command.is_none());
/// ```
pub fn transition<S: State, A: Action, C>(
    step: &Step<S, A>,
    envelope: &Envelope<A>,
    table: &TransitionTable<S, A, C>,
) -> Transitioned<S, A, C> {
    let action = envelope.action();

    let Some(handler) = table.handler_for(&step.value, action) else {
        trace!(
            tag = step.value.tag(),
            kind = action.kind(),
            "action ignored, no handler"
        );
        envelope.report(true);
        return Transitioned::Ignored;
    };

    let (next_value, command) = handler(&step.value, action).into_parts();
    let changed = next_value != step.value;

    trace!(
        from = step.value.tag(),
        to = next_value.tag(),
        kind = action.kind(),
        changed,
        "transition taken"
    );

    // The table spec is only stamped for debug-identified machines; plain
    // machines skip the materialization cost entirely.
    let table_spec = step
        .debug_id
        .is_some()
        .then(|| Arc::new(table.spec()));

    let next = Step {
        value: next_value,
        action: Some(action.clone()),
        previous: Some(step.value.clone()),
        debug_id: step.debug_id.clone(),
        table: table_spec,
    };

    if changed {
        envelope.report(false);
    }

    Transitioned::Next {
        step: next,
        command,
    }
}
