//! Transition tables: (state tag → action kind → handler).
//!
//! A table is declared once per machine through [`TableBuilder`] and is
//! immutable after `build()`. Handlers produce the next state and an
//! optional command; the engine does not restrict which tag a handler
//! transitions to.

use super::guard::Guard;
use super::state::{Action, State};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur when building a transition table.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("No handlers defined. Add at least one entry with .on()")]
    NoHandlers,

    #[error("Duplicate handler for state '{state}' and action '{action}'")]
    DuplicateHandler { state: String, action: String },
}

/// What a handler returns: the next state, with or without a command.
///
/// A bare state converts via `From`, so handlers returning `Next(s)` and
/// handlers returning a plain `s` are observably equivalent to callers.
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome<S, C> {
    /// Move to the new state, no side effect requested.
    Next(S),
    /// Move to the new state and ask the host to perform a command.
    NextWith(S, C),
}

impl<S, C> Outcome<S, C> {
    /// Split into the new state and the optional command.
    pub fn into_parts(self) -> (S, Option<C>) {
        match self {
            Outcome::Next(state) => (state, None),
            Outcome::NextWith(state, command) => (state, Some(command)),
        }
    }
}

impl<S, C> From<S> for Outcome<S, C> {
    fn from(state: S) -> Self {
        Outcome::Next(state)
    }
}

/// Handler invoked for a matched (state tag, action kind) pair.
pub type Handler<S, A, C> = Arc<dyn Fn(&S, &A) -> Outcome<S, C> + Send + Sync>;

struct Entry<S: State, A: Action, C> {
    guard: Option<Guard<S, A>>,
    handler: Handler<S, A, C>,
}

/// Human-readable description of a transition table.
///
/// Maps each state tag to the sorted list of action kinds it handles. This
/// is what the devtools registry stores and the inspector view displays;
/// it is cheap to clone and serializable, unlike the table itself.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSpec {
    entries: BTreeMap<String, Vec<String>>,
}

impl TableSpec {
    /// True when no state handles any action.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// State tags with at least one handler, in sorted order.
    pub fn states(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Sorted action kinds handled in the given state, if any.
    pub fn kinds_for(&self, tag: &str) -> Option<&[String]> {
        self.entries.get(tag).map(Vec::as_slice)
    }

    /// The full tag → kinds mapping.
    pub fn entries(&self) -> &BTreeMap<String, Vec<String>> {
        &self.entries
    }
}

/// Immutable transition table for one machine definition.
///
/// # Example
///
/// ```rust
/// use gearshift::core::{Outcome, TableBuilder};
/// use gearshift::tags_for;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
/// enum LightState { Red, Green }
///
/// tags_for! {
///     State for LightState {
///         Red => "RED",
///         Green => "GREEN",
///     }
/// }
///
/// #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
/// enum LightAction { Advance }
///
/// tags_for! {
///     Action for LightAction {
///         Advance => "ADVANCE",
///     }
/// }
///
/// enum NoCommand {}
///
/// let table = TableBuilder::<LightState, LightAction, NoCommand>::new()
///     .on("RED", "ADVANCE", |_, _| LightState::Green)
///     .on("GREEN", "ADVANCE", |_, _| LightState::Red)
///     .build()
///     .unwrap();
///
/// assert_eq!(table.spec().kinds_for("RED"), Some(&["ADVANCE".to_string()][..]));
/// ```
pub struct TransitionTable<S: State, A: Action, C> {
    entries: HashMap<&'static str, HashMap<&'static str, Entry<S, A, C>>>,
}

impl<S: State, A: Action, C> TransitionTable<S, A, C> {
    /// Resolve the handler for the current state and action.
    ///
    /// Returns `None` when the state tag has no entry, the entry has no
    /// handler for this action kind, or a guard rejects the pair. All three
    /// cases make the action a no-op for the engine.
    pub fn handler_for(&self, state: &S, action: &A) -> Option<&Handler<S, A, C>> {
        let entry = self.entries.get(state.tag())?.get(action.kind())?;
        if let Some(guard) = &entry.guard {
            if !guard.check(state, action) {
                return None;
            }
        }
        Some(&entry.handler)
    }

    /// True when the table would handle this (state, action) pair.
    pub fn handles(&self, state: &S, action: &A) -> bool {
        self.handler_for(state, action).is_some()
    }

    /// Build the readable description of this table.
    pub fn spec(&self) -> TableSpec {
        let mut entries = BTreeMap::new();
        for (tag, handlers) in &self.entries {
            let mut kinds: Vec<String> = handlers.keys().map(|k| k.to_string()).collect();
            kinds.sort();
            entries.insert(tag.to_string(), kinds);
        }
        TableSpec { entries }
    }
}

/// Fluent builder for [`TransitionTable`].
///
/// Entries are added with [`on`](TableBuilder::on) or
/// [`on_guarded`](TableBuilder::on_guarded); `build()` validates that the
/// table is non-empty and that no (tag, kind) slot is bound twice.
pub struct TableBuilder<S: State, A: Action, C> {
    rows: Vec<(&'static str, &'static str, Entry<S, A, C>)>,
}

impl<S: State, A: Action, C> TableBuilder<S, A, C> {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    /// Bind a handler to a (state tag, action kind) pair.
    ///
    /// The handler may return a bare state or an [`Outcome`]; both forms
    /// normalize to the same thing.
    pub fn on<F, O>(mut self, tag: &'static str, kind: &'static str, handler: F) -> Self
    where
        F: Fn(&S, &A) -> O + Send + Sync + 'static,
        O: Into<Outcome<S, C>>,
    {
        self.rows.push((
            tag,
            kind,
            Entry {
                guard: None,
                handler: Arc::new(move |s, a| handler(s, a).into()),
            },
        ));
        self
    }

    /// Bind a guarded handler: the entry only matches when the guard passes.
    pub fn on_guarded<F, O>(
        mut self,
        tag: &'static str,
        kind: &'static str,
        guard: Guard<S, A>,
        handler: F,
    ) -> Self
    where
        F: Fn(&S, &A) -> O + Send + Sync + 'static,
        O: Into<Outcome<S, C>>,
    {
        self.rows.push((
            tag,
            kind,
            Entry {
                guard: Some(guard),
                handler: Arc::new(move |s, a| handler(s, a).into()),
            },
        ));
        self
    }

    /// Finalize the table.
    pub fn build(self) -> Result<TransitionTable<S, A, C>, BuildError> {
        if self.rows.is_empty() {
            return Err(BuildError::NoHandlers);
        }

        let mut entries: HashMap<&'static str, HashMap<&'static str, Entry<S, A, C>>> =
            HashMap::new();
        for (tag, kind, entry) in self.rows {
            let slot = entries.entry(tag).or_default();
            if slot.insert(kind, entry).is_some() {
                return Err(BuildError::DuplicateHandler {
                    state: tag.to_string(),
                    action: kind.to_string(),
                });
            }
        }

        Ok(TransitionTable { entries })
    }
}

impl<S: State, A: Action, C> Default for TableBuilder<S, A, C> {
    fn default() -> Self {
        Self::new()
    }
}
