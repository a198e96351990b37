//! Runtime inspection support: a registry of live machines and their
//! transition/dispatch history.
//!
//! The registry is a mutable, subscribable read model driven by messages
//! from running machines. It depends on the engine's output shapes
//! (snapshots, dispatch events, table specs) but not on the engine itself.

mod history;
mod registry;

pub use history::{DispatchEvent, History, HistoryEntry, Snapshot, MAX_HISTORY};
pub use registry::{
    Devtools, MachineEntry, Materializer, Message, RegistryListener, RegistrySnapshot,
    Subscription,
};
