//! Generic value-tree inspection.
//!
//! A host-agnostic view model over JSON-like values: the devtools panel
//! feeds it snapshots, table specs and history payloads, and draws the
//! returned rows however it likes.

mod path;
mod render;

pub use path::{NodePath, SEPARATOR};
pub use render::{Inspector, Line};
