//! A running machine: one (id, state, table) triple.
//!
//! `Machine` is the host-binding layer over the pure engine. It owns the
//! current [`Step`], runs `transition` once per dispatched action, and
//! returns the emitted command to the caller — commands are performed by
//! the host strictly after it has observed the new state, never here.
//! With a [`Devtools`] attached, every dispatch and committed state is
//! forwarded to the registry.

use crate::core::{
    transition, Action, Command, Envelope, State, Step, TransitionTable, Transitioned,
};
use crate::devtools::{Devtools, DispatchEvent, Message, Snapshot};
use std::sync::Arc;
use tracing::debug;

/// One live state machine instance, identified by a string id.
pub struct Machine<S: State + 'static, A: Action + 'static, C: Command + 'static> {
    id: String,
    step: Step<S, A>,
    table: Arc<TransitionTable<S, A, C>>,
    devtools: Option<Arc<Devtools>>,
}

impl<S: State + 'static, A: Action + 'static, C: Command + 'static> Machine<S, A, C> {
    /// Create a machine in its initial state.
    ///
    /// The id doubles as the step's debug identifier, so transitions stamp
    /// the readable table for inspection.
    pub fn new(id: impl Into<String>, initial: S, table: Arc<TransitionTable<S, A, C>>) -> Self {
        let id = id.into();
        Self {
            step: Step::initial(initial).with_debug_id(&id),
            id,
            table,
            devtools: None,
        }
    }

    /// Attach a devtools session and send the bootstrap state snapshot.
    pub fn attach(&mut self, devtools: Arc<Devtools>) {
        devtools.on_message(&self.id, self.state_message());
        self.devtools = Some(devtools);
    }

    /// Detach from devtools, marking this machine unmounted in the registry.
    pub fn detach(&mut self) {
        if let Some(devtools) = self.devtools.take() {
            devtools.dispose(&self.id);
        }
    }

    /// Dispatch one action.
    ///
    /// Returns the command the handler requested, if any; the caller runs
    /// it after this method returns. An unhandled action leaves the state
    /// untouched and returns `None`.
    pub fn dispatch(&mut self, action: A) -> Option<C> {
        debug!(id = %self.id, kind = action.kind(), "dispatch");

        let envelope = match &self.devtools {
            Some(devtools) => {
                let devtools = Arc::clone(devtools);
                let id = self.id.clone();
                let payload = action.payload();
                Envelope::new(action).with_report(move |report| {
                    devtools.on_message(
                        &id,
                        Message::Dispatch {
                            event: DispatchEvent {
                                kind: report.kind,
                                payload: payload.clone(),
                                ignored: report.ignored,
                                at: chrono::Utc::now(),
                            },
                        },
                    );
                })
            }
            None => Envelope::new(action),
        };

        match transition(&self.step, &envelope, &self.table) {
            Transitioned::Ignored => None,
            Transitioned::Next { step, command } => {
                self.step = step;
                if let Some(devtools) = &self.devtools {
                    devtools.on_message(&self.id, self.state_message());
                }
                command
            }
        }
    }

    /// Push the materialized readable table to devtools.
    ///
    /// Meant to be called when an inspector view opens, so the table is
    /// computed once on demand rather than on every transition.
    pub fn publish_transitions(&self) {
        if let Some(devtools) = &self.devtools {
            devtools.on_message(
                &self.id,
                Message::Transitions {
                    spec: self.table.spec(),
                },
            );
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// The current state value.
    pub fn state(&self) -> &S {
        self.step.value()
    }

    /// The current step, bookkeeping included.
    pub fn step(&self) -> &Step<S, A> {
        &self.step
    }

    fn state_message(&self) -> Message {
        let table = Arc::clone(&self.table);
        Message::State {
            snapshot: Snapshot::of(self.step.value()),
            materialize: Arc::new(move || table.spec()),
        }
    }
}

impl<S: State + 'static, A: Action + 'static, C: Command + 'static> Drop for Machine<S, A, C> {
    fn drop(&mut self) {
        self.detach();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Outcome, TableBuilder};
    use crate::tags_for;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
    enum FetchState {
        Idle,
        Loading,
        Loaded { items: Vec<u32> },
    }

    tags_for! {
        State for FetchState {
            Idle => "IDLE",
            Loading => "LOADING",
            Loaded => "LOADED",
        }
    }

    #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
    enum FetchAction {
        Fetch,
        FetchSuccess { items: Vec<u32> },
    }

    tags_for! {
        Action for FetchAction {
            Fetch => "FETCH",
            FetchSuccess => "FETCH_SUCCESS",
        }
    }

    #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
    enum FetchCommand {
        LoadRecords,
    }

    tags_for! {
        Command for FetchCommand {
            LoadRecords => "LOAD_RECORDS",
        }
    }

    fn table() -> Arc<TransitionTable<FetchState, FetchAction, FetchCommand>> {
        Arc::new(
            TableBuilder::new()
                .on("IDLE", "FETCH", |_s, _a| {
                    Outcome::NextWith(FetchState::Loading, FetchCommand::LoadRecords)
                })
                .on("LOADING", "FETCH_SUCCESS", |_s, a: &FetchAction| {
                    let FetchAction::FetchSuccess { items } = a else {
                        unreachable!("routed by kind");
                    };
                    FetchState::Loaded {
                        items: items.clone(),
                    }
                })
                .build()
                .unwrap(),
        )
    }

    #[test]
    fn dispatch_commits_state_and_returns_command() {
        let mut machine = Machine::new("fetcher", FetchState::Idle, table());

        let command = machine.dispatch(FetchAction::Fetch);
        assert_eq!(command, Some(FetchCommand::LoadRecords));
        assert_eq!(machine.state(), &FetchState::Loading);

        let command = machine.dispatch(FetchAction::FetchSuccess { items: vec![1] });
        assert!(command.is_none());
        assert_eq!(machine.state(), &FetchState::Loaded { items: vec![1] });
    }

    #[test]
    fn unhandled_dispatch_is_inert() {
        let mut machine = Machine::new("fetcher", FetchState::Idle, table());
        machine.dispatch(FetchAction::Fetch);
        machine.dispatch(FetchAction::FetchSuccess { items: vec![1] });

        // No handler for LOADED + FETCH.
        let command = machine.dispatch(FetchAction::Fetch);
        assert!(command.is_none());
        assert_eq!(machine.state(), &FetchState::Loaded { items: vec![1] });
    }

    #[test]
    fn attach_sends_bootstrap_snapshot() {
        let devtools = Arc::new(Devtools::new());
        let mut machine = Machine::new("fetcher", FetchState::Idle, table());
        machine.attach(Arc::clone(&devtools));

        let registry = devtools.registry();
        let entry = &registry["fetcher"];
        assert_eq!(entry.history().len(), 1);
        assert_eq!(entry.history().entries()[0].label(), "IDLE");
    }

    #[test]
    fn dispatch_records_event_then_state_newest_first() {
        let devtools = Arc::new(Devtools::new());
        let mut machine = Machine::new("fetcher", FetchState::Idle, table());
        machine.attach(Arc::clone(&devtools));

        machine.dispatch(FetchAction::Fetch);

        let registry = devtools.registry();
        let labels: Vec<&str> = registry["fetcher"]
            .history()
            .iter()
            .map(|e| e.label())
            .collect();
        assert_eq!(labels, vec!["LOADING", "FETCH", "IDLE"]);
    }

    #[test]
    fn ignored_dispatch_is_recorded_with_ignored_flag() {
        let devtools = Arc::new(Devtools::new());
        let mut machine = Machine::new("fetcher", FetchState::Loading, table());
        machine.attach(Arc::clone(&devtools));

        machine.dispatch(FetchAction::Fetch); // unhandled in LOADING

        let registry = devtools.registry();
        let entries = registry["fetcher"].history().entries();
        let crate::devtools::HistoryEntry::Event(event) = &entries[0] else {
            panic!("dispatch was recorded");
        };
        assert!(event.ignored);
        assert_eq!(event.kind, "FETCH");
    }

    #[test]
    fn publish_transitions_stores_the_spec() {
        let devtools = Arc::new(Devtools::new());
        let mut machine = Machine::new("fetcher", FetchState::Idle, table());
        machine.attach(Arc::clone(&devtools));

        machine.publish_transitions();

        let registry = devtools.registry();
        let spec = registry["fetcher"].transitions();
        assert_eq!(
            spec.kinds_for("IDLE"),
            Some(&["FETCH".to_string()][..])
        );
    }

    #[test]
    fn drop_disposes_the_registry_entry() {
        let devtools = Arc::new(Devtools::new());
        {
            let mut machine = Machine::new("fetcher", FetchState::Idle, table());
            machine.attach(Arc::clone(&devtools));
            machine.dispatch(FetchAction::Fetch);
        }

        let registry = devtools.registry();
        let entry = &registry["fetcher"];
        assert!(!entry.is_mounted());
        // History survives disposal.
        assert_eq!(entry.history().len(), 3);
    }

    #[test]
    fn detach_then_drop_disposes_once() {
        let devtools = Arc::new(Devtools::new());
        let mut machine = Machine::new("fetcher", FetchState::Idle, table());
        machine.attach(Arc::clone(&devtools));
        machine.detach();

        // Dispatches after detach stay local.
        machine.dispatch(FetchAction::Fetch);
        drop(machine);

        let registry = devtools.registry();
        assert_eq!(registry["fetcher"].history().len(), 1);
    }
}
