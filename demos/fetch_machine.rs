//! Fetch workflow demo: a machine that loads records through a command
//! runner, with a devtools session watching every step.
//!
//! Run with: cargo run --example fetch_machine

use gearshift::core::{Outcome, TableBuilder, TransitionTable};
use gearshift::devtools::Devtools;
use gearshift::effects::{perform, CommandRunner, Emitter};
use gearshift::inspect::Inspector;
use gearshift::machine::Machine;
use gearshift::tags_for;
use serde::{Deserialize, Serialize};
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
    name: String,
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

/// The injected environment: here a canned in-memory store.
struct DemoStore;

impl CommandRunner<FetchCommand, FetchAction> for DemoStore {
    fn run(&self, command: FetchCommand, emit: &Emitter<FetchAction>) {
        match command {
            FetchCommand::LoadRecords => emit.emit(FetchAction::FetchSuccess {
                items: vec![
                    Record {
                        id: 1,
                        name: "first".into(),
                    },
                    Record {
                        id: 2,
                        name: "second".into(),
                    },
                ],
            }),
        }
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
            .expect("table is well-formed"),
    )
}

fn main() {
    let devtools = Arc::new(Devtools::new());
    let _sub = devtools.subscribe(|registry| {
        for (id, entry) in registry.iter() {
            println!(
                "[devtools] {id}: mounted={} history={}",
                entry.is_mounted(),
                entry.history().len()
            );
        }
    });

    let mut machine = Machine::new("fetcher", FetchState::Idle, table());
    machine.attach(Arc::clone(&devtools));

    // Host loop: dispatch, run the emitted command, feed results back.
    let queue: Arc<Mutex<Vec<FetchAction>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&queue);
    let emitter = Emitter::new(move |action| sink.lock().unwrap().push(action));
    let store = DemoStore;

    let command = machine.dispatch(FetchAction::Fetch);
    println!("state after FETCH: {:?}", machine.state());
    perform(&store, command, &emitter);

    let pending: Vec<FetchAction> = queue.lock().unwrap().drain(..).collect();
    for action in pending {
        machine.dispatch(action);
    }
    println!("state after load: {:?}", machine.state());

    // Inspect the final snapshot the way a devtools panel would.
    let registry = devtools.registry();
    let entry = &registry["fetcher"];
    let mut inspector = Inspector::new();
    if let Some(gearshift::devtools::HistoryEntry::State(snapshot)) =
        entry.history().entries().front()
    {
        println!("--- latest snapshot ({}) ---", snapshot.tag);
        for line in inspector.render(&snapshot.payload) {
            println!("{}{}", "  ".repeat(line.depth), line.text);
        }
        inspector.toggle("items");
        println!("--- with items expanded ---");
        for line in inspector.render(&snapshot.payload) {
            println!("{}{}", "  ".repeat(line.depth), line.text);
        }
    }
}
