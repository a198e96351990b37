//! The devtools registry: machine id → entry, with publish/subscribe.
//!
//! One `Devtools` instance belongs to one debugging session. Producers
//! (machines) and consumers (inspector views) all hold a reference to the
//! same instance; there is no module-level singleton. The registry map is
//! replaced wholesale on every message, so the snapshot handed to
//! subscribers is effectively immutable.

use super::history::{DispatchEvent, History, Snapshot};
use crate::core::TableSpec;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex, Weak};
use tracing::debug;

/// Callback that lazily computes the readable transition table for a
/// machine. Stored on the entry so the inspector view can materialize the
/// table only when it is actually opened, instead of on every transition.
pub type Materializer = Arc<dyn Fn() -> TableSpec + Send + Sync>;

/// Callback invoked with the full registry snapshot on every mutation.
pub type RegistryListener = Arc<dyn Fn(&RegistrySnapshot) + Send + Sync>;

/// The immutable-in-effect registry view passed to subscribers.
pub type RegistrySnapshot = Arc<BTreeMap<String, MachineEntry>>;

/// A message from a machine to the registry.
pub enum Message {
    /// A new state was committed. Records a snapshot and stores the lazy
    /// table materializer for later inspection.
    State {
        snapshot: Snapshot,
        materialize: Materializer,
    },
    /// Replace the stored readable table (sent when the inspector view
    /// opens and the caller has materialized it).
    Transitions { spec: TableSpec },
    /// An action was dispatched, handled or not.
    Dispatch { event: DispatchEvent },
}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Message::State { snapshot, .. } => f
                .debug_struct("State")
                .field("snapshot", snapshot)
                .finish_non_exhaustive(),
            Message::Transitions { spec } => {
                f.debug_struct("Transitions").field("spec", spec).finish()
            }
            Message::Dispatch { event } => {
                f.debug_struct("Dispatch").field("event", event).finish()
            }
        }
    }
}

/// Registry state for one machine id.
///
/// Created lazily on the first message for the id; never removed. Disposal
/// only flips `is_mounted`, keeping the history around for inspection after
/// unmount — acceptable for an attached debugging aid, not a production
/// memory budget.
pub struct MachineEntry {
    is_mounted: bool,
    history: History,
    transitions: TableSpec,
    trigger_transitions: Option<Materializer>,
}

impl MachineEntry {
    fn new() -> Self {
        Self {
            is_mounted: true,
            history: History::new(),
            transitions: TableSpec::default(),
            trigger_transitions: None,
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.is_mounted
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// The stored readable table. Empty until a `Transitions` message
    /// arrives or a materializer is triggered.
    pub fn transitions(&self) -> &TableSpec {
        &self.transitions
    }

    /// Force-materialize the full table via the stored callback, if one
    /// has been supplied.
    pub fn trigger_transitions(&self) -> Option<TableSpec> {
        self.trigger_transitions.as_ref().map(|f| f())
    }
}

impl Clone for MachineEntry {
    fn clone(&self) -> Self {
        Self {
            is_mounted: self.is_mounted,
            history: self.history.clone(),
            transitions: self.transitions.clone(),
            trigger_transitions: self.trigger_transitions.clone(),
        }
    }
}

impl fmt::Debug for MachineEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MachineEntry")
            .field("is_mounted", &self.is_mounted)
            .field("history_len", &self.history.len())
            .field("transitions", &self.transitions)
            .finish_non_exhaustive()
    }
}

struct Listener {
    id: u64,
    callback: RegistryListener,
}

struct Inner {
    registry: RegistrySnapshot,
    listeners: Vec<Listener>,
    next_listener: u64,
}

/// A process-visible registry of live machines for one debugging session.
///
/// Message handling never fails: unknown ids create their entry on first
/// contact. Subscribers are notified synchronously, in subscription order,
/// after every mutation. A panicking subscriber aborts the remaining
/// notifications for that mutation — isolation between subscribers is
/// deliberately not provided.
///
/// Subscribers may subscribe or unsubscribe from inside a callback, but
/// must not synchronously send a new message (re-entrant notification is
/// caller indiscipline, not something the registry defends against).
pub struct Devtools {
    inner: Mutex<Inner>,
}

impl Devtools {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                registry: Arc::new(BTreeMap::new()),
                listeners: Vec::new(),
                next_listener: 0,
            }),
        }
    }

    /// Ingest one message for the given machine id.
    pub fn on_message(&self, id: &str, message: Message) {
        debug!(id, ?message, "devtools message");
        self.mutate(|registry| {
            let entry = registry
                .entry(id.to_string())
                .or_insert_with(MachineEntry::new);
            match message {
                Message::State {
                    snapshot,
                    materialize,
                } => {
                    entry.history.record_snapshot(snapshot);
                    entry.trigger_transitions = Some(materialize);
                }
                Message::Transitions { spec } => {
                    entry.transitions = spec;
                }
                Message::Dispatch { event } => {
                    entry.history.record_event(event);
                }
            }
        });
    }

    /// Mark the machine unmounted. The entry and its history are retained.
    pub fn dispose(&self, id: &str) {
        debug!(id, "devtools dispose");
        self.mutate(|registry| {
            let entry = registry
                .entry(id.to_string())
                .or_insert_with(MachineEntry::new);
            entry.is_mounted = false;
        });
    }

    /// Register a listener for registry mutations.
    ///
    /// The returned [`Subscription`] removes exactly this listener when
    /// unsubscribed; listeners registered earlier are notified earlier.
    pub fn subscribe<F>(self: &Arc<Self>, callback: F) -> Subscription
    where
        F: Fn(&RegistrySnapshot) + Send + Sync + 'static,
    {
        let mut inner = self.lock();
        let id = inner.next_listener;
        inner.next_listener += 1;
        inner.listeners.push(Listener {
            id,
            callback: Arc::new(callback),
        });
        Subscription {
            id,
            devtools: Arc::downgrade(self),
        }
    }

    /// The current registry snapshot.
    pub fn registry(&self) -> RegistrySnapshot {
        Arc::clone(&self.lock().registry)
    }

    fn mutate<F>(&self, apply: F)
    where
        F: FnOnce(&mut BTreeMap<String, MachineEntry>),
    {
        let (snapshot, listeners) = {
            let mut inner = self.lock();
            let mut registry = (*inner.registry).clone();
            apply(&mut registry);
            inner.registry = Arc::new(registry);
            let listeners: Vec<RegistryListener> = inner
                .listeners
                .iter()
                .map(|l| Arc::clone(&l.callback))
                .collect();
            (Arc::clone(&inner.registry), listeners)
        };
        // Lock released: a listener may subscribe or unsubscribe from
        // inside its callback.
        for listener in listeners {
            listener(&snapshot);
        }
    }

    fn remove_listener(&self, id: u64) {
        let mut inner = self.lock();
        inner.listeners.retain(|l| l.id != id);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        // A poisoned lock only means a listener panicked mid-notification;
        // the registry map itself is replaced atomically and stays valid.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for Devtools {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle for one registered listener.
///
/// Dropping the handle does not unsubscribe; removal is explicit.
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    devtools: Weak<Devtools>,
}

impl Subscription {
    /// Remove the listener this handle was returned for.
    pub fn unsubscribe(self) {
        if let Some(devtools) = self.devtools.upgrade() {
            devtools.remove_listener(self.id);
        }
    }
}
