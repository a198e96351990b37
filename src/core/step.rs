//! Bookkeeping wrappers threaded through the engine.
//!
//! The engine never mutates hidden fields on state values. Everything it
//! records about a transition — the triggering action, the previous value,
//! the debug identity, the readable table — lives in an explicit [`Step`]
//! wrapper returned alongside the new state. Holding the previous *value*
//! rather than the previous `Step` keeps the chain exactly one step deep,
//! so stale references cannot accumulate.

use super::state::{Action, State};
use super::table::TableSpec;
use std::fmt;
use std::sync::Arc;

/// A state value plus the transition bookkeeping attached to it.
#[derive(Clone, Debug)]
pub struct Step<S: State, A: Action> {
    pub(crate) value: S,
    pub(crate) action: Option<A>,
    pub(crate) previous: Option<S>,
    pub(crate) debug_id: Option<String>,
    pub(crate) table: Option<Arc<TableSpec>>,
}

impl<S: State, A: Action> Step<S, A> {
    /// Wrap an initial state. No action or previous value yet.
    pub fn initial(value: S) -> Self {
        Self {
            value,
            action: None,
            previous: None,
            debug_id: None,
            table: None,
        }
    }

    /// Attach a stable debug identifier, propagated across transitions.
    pub fn with_debug_id(mut self, id: impl Into<String>) -> Self {
        self.debug_id = Some(id.into());
        self
    }

    /// The current state value.
    pub fn value(&self) -> &S {
        &self.value
    }

    /// The action that produced this state, if any transition has run.
    pub fn action(&self) -> Option<&A> {
        self.action.as_ref()
    }

    /// The state value this one transitioned from.
    pub fn previous(&self) -> Option<&S> {
        self.previous.as_ref()
    }

    /// The debug identifier, if one was attached.
    pub fn debug_id(&self) -> Option<&str> {
        self.debug_id.as_deref()
    }

    /// The readable table stamped by the last transition.
    pub fn table_spec(&self) -> Option<&Arc<TableSpec>> {
        self.table.as_ref()
    }

    /// Consume the wrapper and take the bare state value.
    pub fn into_value(self) -> S {
        self.value
    }
}

/// Report delivered to an action's debug hook after evaluation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DispatchReport {
    /// The dispatched action's kind.
    pub kind: String,
    /// True when the table had no matching handler and the action was a no-op.
    pub ignored: bool,
}

/// Hook invoked with a [`DispatchReport`] after the engine evaluates an action.
///
/// Hooks observe; they must never steer control flow.
pub type ReportHook = Arc<dyn Fn(DispatchReport) + Send + Sync>;

/// An action optionally annotated with a debug-report hook.
///
/// Plain dispatches convert from the bare action via `From`, so callers that
/// do not care about reporting never see this type.
pub struct Envelope<A: Action> {
    action: A,
    report: Option<ReportHook>,
}

impl<A: Action> Envelope<A> {
    /// Wrap a bare action.
    pub fn new(action: A) -> Self {
        Self {
            action,
            report: None,
        }
    }

    /// Attach a report hook invoked once per evaluation.
    pub fn with_report<F>(mut self, hook: F) -> Self
    where
        F: Fn(DispatchReport) + Send + Sync + 'static,
    {
        self.report = Some(Arc::new(hook));
        self
    }

    /// The wrapped action.
    pub fn action(&self) -> &A {
        &self.action
    }

    pub(crate) fn report(&self, ignored: bool) {
        if let Some(hook) = &self.report {
            hook(DispatchReport {
                kind: self.action.kind().to_string(),
                ignored,
            });
        }
    }
}

impl<A: Action> From<A> for Envelope<A> {
    fn from(action: A) -> Self {
        Envelope::new(action)
    }
}

impl<A: Action> Clone for Envelope<A> {
    fn clone(&self) -> Self {
        Self {
            action: self.action.clone(),
            report: self.report.clone(),
        }
    }
}

impl<A: Action> fmt::Debug for Envelope<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Envelope")
            .field("action", &self.action)
            .field("report", &self.report.as_ref().map(|_| "<hook>"))
            .finish()
    }
}
