//! The transition engine: tagged-union traits, tables and the evaluator.
//!
//! Everything here is pure and synchronous. The engine computes
//! `(next state, optional command)` from `(state, action, table)` and
//! records bookkeeping in an explicit [`Step`] wrapper; it never performs
//! the commands it emits and never touches global state.

mod engine;
mod guard;
pub mod macros;
mod matcher;
mod state;
mod step;
mod table;

pub use engine::{transition, Transitioned};
pub use guard::Guard;
pub use matcher::{match_field, match_tag, MatchError};
pub use state::{Action, Command, State};
pub use step::{DispatchReport, Envelope, ReportHook, Step};
pub use table::{BuildError, Handler, Outcome, TableBuilder, TableSpec, TransitionTable};
