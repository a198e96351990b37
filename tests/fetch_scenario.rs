//! End-to-end scenario: a fetch machine with devtools attached and a fake
//! command runner feeding results back as actions.

use gearshift::core::{Outcome, TableBuilder, TransitionTable};
use gearshift::devtools::{Devtools, HistoryEntry};
use gearshift::effects::{CommandRunner, Emitter};
use gearshift::machine::Machine;
use gearshift::tags_for;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::{Arc, Mutex};

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
enum FetchState {
    Idle,
    Loading,
    Loaded { items: Vec<Record> },
}

tags_for! {
    State for FetchState {
        Idle => "IDLE",
        Loading => "LOADING",
        Loaded => "LOADED",
    }
}

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
struct Record {
    id: u32,
}

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
enum FetchAction {
    Fetch,
    FetchSuccess { items: Vec<Record> },
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

fn fetch_table() -> Arc<TransitionTable<FetchState, FetchAction, FetchCommand>> {
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
            .expect("table is well-formed"),
    )
}

/// Test stand-in for the I/O environment: resolves loads synchronously.
struct FakeStore;

impl CommandRunner<FetchCommand, FetchAction> for FakeStore {
    fn run(&self, command: FetchCommand, emit: &Emitter<FetchAction>) {
        match command {
            FetchCommand::LoadRecords => emit.emit(FetchAction::FetchSuccess {
                items: vec![Record { id: 1 }],
            }),
        }
    }
}

#[test]
fn fetch_then_success_reaches_loaded() {
    let mut machine = Machine::new("fetcher", FetchState::Idle, fetch_table());

    let command = machine.dispatch(FetchAction::Fetch);
    assert_eq!(command, Some(FetchCommand::LoadRecords));
    assert_eq!(machine.state(), &FetchState::Loading);

    machine.dispatch(FetchAction::FetchSuccess {
        items: vec![Record { id: 1 }],
    });
    assert_eq!(
        machine.state(),
        &FetchState::Loaded {
            items: vec![Record { id: 1 }]
        }
    );

    // FETCH while LOADED has no handler: same state, no command.
    let command = machine.dispatch(FetchAction::Fetch);
    assert!(command.is_none());
    assert_eq!(
        machine.state(),
        &FetchState::Loaded {
            items: vec![Record { id: 1 }]
        }
    );
}

#[test]
fn runner_closes_the_loop_through_emitted_actions() {
    // Queue instead of re-dispatching from inside the emitter: commands run
    // after the state commit, and their results are dispatched next turn.
    let queue: Arc<Mutex<Vec<FetchAction>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&queue);
    let emitter = Emitter::new(move |action| sink.lock().unwrap().push(action));

    let mut machine = Machine::new("fetcher", FetchState::Idle, fetch_table());
    let store = FakeStore;

    let command = machine.dispatch(FetchAction::Fetch);
    gearshift::effects::perform(&store, command, &emitter);

    let queued: Vec<FetchAction> = queue.lock().unwrap().drain(..).collect();
    for action in queued {
        machine.dispatch(action);
    }

    assert_eq!(
        machine.state(),
        &FetchState::Loaded {
            items: vec![Record { id: 1 }]
        }
    );
}

#[test]
fn devtools_sees_the_full_story() {
    let devtools = Arc::new(Devtools::new());

    let notifications = Arc::new(Mutex::new(0usize));
    let counter = Arc::clone(&notifications);
    let _sub = devtools.subscribe(move |_| {
        *counter.lock().unwrap() += 1;
    });

    let mut machine = Machine::new("fetcher", FetchState::Idle, fetch_table());
    machine.attach(Arc::clone(&devtools));

    machine.dispatch(FetchAction::Fetch);
    machine.dispatch(FetchAction::FetchSuccess {
        items: vec![Record { id: 1 }],
    });
    machine.dispatch(FetchAction::Fetch); // ignored in LOADED

    let registry = devtools.registry();
    let entry = &registry["fetcher"];

    // Newest-first, bootstrap snapshot at the tail.
    let labels: Vec<&str> = entry.history().iter().map(|e| e.label()).collect();
    assert_eq!(
        labels,
        vec![
            "FETCH",
            "LOADED",
            "FETCH_SUCCESS",
            "LOADING",
            "FETCH",
            "IDLE"
        ]
    );

    let HistoryEntry::Event(ignored_fetch) = &entry.history().entries()[0] else {
        panic!("latest entry is the ignored dispatch");
    };
    assert!(ignored_fetch.ignored);

    let HistoryEntry::State(loaded) = &entry.history().entries()[1] else {
        panic!("second entry is the LOADED snapshot");
    };
    assert_eq!(loaded.payload, json!({ "items": [{ "id": 1 }] }));

    // attach + 3 dispatch events + 2 state commits = 6 mutations.
    assert_eq!(*notifications.lock().unwrap(), 6);
}

#[test]
fn lazy_table_materialization_and_disposal() {
    let devtools = Arc::new(Devtools::new());
    let mut machine = Machine::new("fetcher", FetchState::Idle, fetch_table());
    machine.attach(Arc::clone(&devtools));
    machine.dispatch(FetchAction::Fetch);

    let registry = devtools.registry();
    let entry = &registry["fetcher"];

    // Nothing materialized yet; triggering computes the readable table.
    assert!(entry.transitions().is_empty());
    let spec = entry.trigger_transitions().expect("materializer stored");
    assert_eq!(spec.kinds_for("IDLE"), Some(&["FETCH".to_string()][..]));

    let before = entry.history().len();
    drop(machine);

    let registry = devtools.registry();
    assert!(!registry["fetcher"].is_mounted());
    assert_eq!(registry["fetcher"].history().len(), before);
}
