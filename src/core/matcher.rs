//! Tag-dispatch utilities.
//!
//! `match_tag` is the table-driven cousin of a `match` expression: handlers
//! are keyed by state tag, with an optional fallback for everything else.
//! `match_field` is a lightweight capability probe over the payload.

use super::state::State;
use serde_json::Value;
use thiserror::Error;

/// Errors from tag dispatch.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MatchError {
    /// No handler matched the state's tag and no fallback was supplied.
    /// Callers must provide either exhaustive handlers or a fallback.
    #[error("No handler for tag '{tag}' and no fallback supplied")]
    UnhandledTag { tag: String },
}

/// Dispatch on the state's tag over a handler table.
///
/// The matching handler is called with the state. When no handler matches
/// and a fallback is given, the fallback runs instead; when neither exists
/// the call is a configuration error and returns
/// [`MatchError::UnhandledTag`].
///
/// # Example
///
/// ```rust
/// use gearshift::core::match_tag;
/// use gearshift::tags_for;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
/// enum Shape { Foo, Bar }
///
/// tags_for! {
///     State for Shape {
///         Foo => "FOO",
///         Bar => "BAR",
///     }
/// }
///
/// let hit = match_tag(&Shape::Foo, &[("FOO", &|_: &Shape| "foo")], None);
/// assert_eq!(hit.unwrap(), "foo");
///
/// let fell_back = match_tag(
///     &Shape::Bar,
///     &[("FOO", &|_: &Shape| "foo")],
///     Some(&|_: &Shape| "bar"),
/// );
/// assert_eq!(fell_back.unwrap(), "bar");
/// ```
pub fn match_tag<S: State, T>(
    state: &S,
    handlers: &[(&str, &dyn Fn(&S) -> T)],
    fallback: Option<&dyn Fn(&S) -> T>,
) -> Result<T, MatchError> {
    let tag = state.tag();
    for (candidate, handler) in handlers {
        if *candidate == tag {
            return Ok(handler(state));
        }
    }
    match fallback {
        Some(handler) => Ok(handler(state)),
        None => Err(MatchError::UnhandledTag {
            tag: tag.to_string(),
        }),
    }
}

/// Probe the state's payload for a field.
///
/// Returns the field's value when present; `None` is the explicit
/// "not present" sentinel. This is a capability check, not a pattern
/// match — use it to ask "does the current variant carry `items`?"
/// without naming the variant.
pub fn match_field<S: State>(state: &S, key: &str) -> Option<Value> {
    state.payload().get(key).cloned()
}
