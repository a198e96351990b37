//! Per-machine history: state snapshots and dispatched-event records.
//!
//! History is newest-first for display, with one deliberate exception: the
//! very first snapshot for a machine is appended instead of prepended. The
//! initial mount can race with dispatches already recorded before the
//! devtools attached, and the bootstrap snapshot must not jump ahead of
//! them. The result is a newest-first sequence with exactly one oldest
//! bootstrap entry at the tail.

use crate::core::{Action, State};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::VecDeque;

/// Upper bound on retained entries per machine. Oldest entries are dropped
/// first once the bound is reached.
pub const MAX_HISTORY: usize = 256;

/// A recorded state: tag plus full payload at a point in time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub tag: String,
    pub payload: Value,
    pub at: DateTime<Utc>,
}

impl Snapshot {
    /// Capture the given state.
    pub fn of<S: State>(state: &S) -> Self {
        Self {
            tag: state.tag().to_string(),
            payload: state.payload(),
            at: Utc::now(),
        }
    }
}

/// A recorded dispatch: action kind plus payload, and whether the table
/// had a matching handler.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DispatchEvent {
    pub kind: String,
    pub payload: Value,
    pub ignored: bool,
    pub at: DateTime<Utc>,
}

impl DispatchEvent {
    /// Capture the given action.
    pub fn of<A: Action>(action: &A, ignored: bool) -> Self {
        Self {
            kind: action.kind().to_string(),
            payload: action.payload(),
            ignored,
            at: Utc::now(),
        }
    }
}

/// One history line: either a state snapshot or a dispatch record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum HistoryEntry {
    State(Snapshot),
    Event(DispatchEvent),
}

impl HistoryEntry {
    pub fn is_state(&self) -> bool {
        matches!(self, HistoryEntry::State(_))
    }

    pub fn is_event(&self) -> bool {
        matches!(self, HistoryEntry::Event(_))
    }

    /// The entry's discriminant: the state tag or the action kind.
    pub fn label(&self) -> &str {
        match self {
            HistoryEntry::State(snapshot) => &snapshot.tag,
            HistoryEntry::Event(event) => &event.kind,
        }
    }
}

/// Bounded, ordered entry log for one machine.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct History {
    entries: VecDeque<HistoryEntry>,
    bootstrapped: bool,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a state snapshot.
    ///
    /// The first snapshot ever recorded is appended (see the module docs);
    /// every later snapshot is prepended.
    pub fn record_snapshot(&mut self, snapshot: Snapshot) {
        if self.bootstrapped {
            self.entries.push_front(HistoryEntry::State(snapshot));
        } else {
            self.entries.push_back(HistoryEntry::State(snapshot));
            self.bootstrapped = true;
        }
        self.trim();
    }

    /// Record a dispatch event. Always prepended.
    pub fn record_event(&mut self, event: DispatchEvent) {
        self.entries.push_front(HistoryEntry::Event(event));
        self.trim();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries, newest-first (bootstrap snapshot last).
    pub fn entries(&self) -> &VecDeque<HistoryEntry> {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    fn trim(&mut self) {
        while self.entries.len() > MAX_HISTORY {
            self.entries.pop_back();
        }
    }
}
