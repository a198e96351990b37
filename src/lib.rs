//! Gearshift: typed state machine tables with an attachable devtools registry.
//!
//! The core is a pure transition engine: a table maps (state tag, action
//! kind) pairs to handlers producing the next state and an optional command
//! descriptor. The engine never performs effects; the host runs the command
//! after committing the new state. A [`devtools`] registry ingests
//! transition and dispatch events from running machines and exposes an
//! ordered history to inspector views, and [`inspect`] turns arbitrary
//! JSON-like values into a renderable tree.
//!
//! # Core Concepts
//!
//! - **State / Action / Command**: tagged unions with string discriminants,
//!   declared via the traits in [`core`] (or the [`tags_for!`] macro)
//! - **Transition table**: immutable (tag, kind) → handler map; unhandled
//!   actions are inert, not errors
//! - **Step**: explicit bookkeeping wrapper carrying the triggering action,
//!   previous value and debug identity alongside the state
//! - **Devtools**: per-session registry with bounded per-machine history
//!   and synchronous publish/subscribe
//!
//! # Example
//!
//! ```rust
//! use gearshift::core::{Outcome, TableBuilder};
//! use gearshift::machine::Machine;
//! use gearshift::tags_for;
//! use serde::{Deserialize, Serialize};
//! use std::sync::Arc;
//!
//! #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
//! enum FetchState {
//!     Idle,
//!     Loading,
//!     Loaded { items: Vec<u32> },
//! }
//!
//! tags_for! {
//!     State for FetchState {
//!         Idle => "IDLE",
//!         Loading => "LOADING",
//!         Loaded => "LOADED",
//!     }
//! }
//!
//! #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
//! enum FetchAction {
//!     Fetch,
//!     FetchSuccess { items: Vec<u32> },
//! }
//!
//! tags_for! {
//!     Action for FetchAction {
//!         Fetch => "FETCH",
//!         FetchSuccess => "FETCH_SUCCESS",
//!     }
//! }
//!
//! #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
//! enum FetchCommand {
//!     LoadRecords,
//! }
//!
//! tags_for! {
//!     Command for FetchCommand {
//!         LoadRecords => "LOAD_RECORDS",
//!     }
//! }
//!
//! let table = Arc::new(
//!     TableBuilder::new()
//!         .on("IDLE", "FETCH", |_s, _a| {
//!             Outcome::NextWith(FetchState::Loading, FetchCommand::LoadRecords)
//!         })
//!         .on("LOADING", "FETCH_SUCCESS", |_s, a: &FetchAction| {
//!             let FetchAction::FetchSuccess { items } = a else {
//!                 unreachable!("routed by kind");
//!             };
//!             FetchState::Loaded { items: items.clone() }
//!         })
//!         .build()
//!         .unwrap(),
//! );
//!
//! let mut machine = Machine::new("fetcher", FetchState::Idle, table);
//! let command = machine.dispatch(FetchAction::Fetch);
//! assert_eq!(command, Some(FetchCommand::LoadRecords));
//! assert_eq!(machine.state(), &FetchState::Loading);
//! ```

pub mod core;
pub mod devtools;
pub mod effects;
pub mod inspect;
pub mod machine;

// Re-export commonly used types
pub use crate::core::{
    match_field, match_tag, transition, Action, Command, Envelope, Outcome, State, Step,
    TableBuilder, TableSpec, TransitionTable, Transitioned,
};
pub use crate::devtools::Devtools;
pub use crate::machine::Machine;
