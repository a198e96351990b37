//! Discriminant traits for tagged-union states, actions and commands.
//!
//! Every value flowing through the engine carries a string discriminant:
//! states have a `tag`, actions and commands have a `kind`. The transition
//! table is keyed on `(tag, kind)` pairs, so these traits are the only
//! contract a user type needs to satisfy.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::Debug;

/// Trait for state machine states.
///
/// Exactly one variant of the implementing enum is active at a time; `tag`
/// returns its discriminant. The discriminant set is static — a state's tag
/// must always be one of the declared variant tags.
///
/// # Required Traits
///
/// - `Clone`: states are cloned into bookkeeping slots and snapshots
/// - `PartialEq`: the engine compares old and new values to report no-op
///   transitions
/// - `Debug`: diagnostics
/// - `Serialize` + `Deserialize`: devtools snapshots capture the payload
///
/// # Example
///
/// ```rust
/// use gearshift::core::State;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
/// enum FetchState {
///     Idle,
///     Loading,
///     Loaded { items: Vec<u32> },
/// }
///
/// impl State for FetchState {
///     fn tag(&self) -> &'static str {
///         match self {
///             Self::Idle => "IDLE",
///             Self::Loading => "LOADING",
///             Self::Loaded { .. } => "LOADED",
///         }
///     }
/// }
///
/// assert_eq!(FetchState::Loading.tag(), "LOADING");
/// ```
pub trait State:
    Clone + PartialEq + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync
{
    /// The active variant's discriminant.
    fn tag(&self) -> &'static str;

    /// Capture the active variant's payload as a JSON value.
    ///
    /// Used by devtools snapshots and [`match_field`](crate::core::match_field).
    /// The default implementation serializes the state and unwraps serde's
    /// externally-tagged enum representation, so only the payload fields
    /// remain. Unit variants yield `Value::Null`.
    fn payload(&self) -> Value {
        variant_payload(self)
    }
}

/// Trait for actions: external events requesting a transition.
///
/// Actions are ephemeral — consumed once by the engine. `kind` is the
/// discriminant the transition table routes on.
///
/// # Example
///
/// ```rust
/// use gearshift::core::Action;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
/// enum FetchAction {
///     Fetch,
///     FetchSuccess { items: Vec<u32> },
/// }
///
/// impl Action for FetchAction {
///     fn kind(&self) -> &'static str {
///         match self {
///             Self::Fetch => "FETCH",
///             Self::FetchSuccess { .. } => "FETCH_SUCCESS",
///         }
///     }
/// }
/// ```
pub trait Action:
    Clone + PartialEq + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync
{
    /// The action's discriminant.
    fn kind(&self) -> &'static str;

    /// Capture the action's payload as a JSON value.
    fn payload(&self) -> Value {
        variant_payload(self)
    }
}

/// Trait for commands: side-effect descriptors emitted alongside a new state.
///
/// At most one command is emitted per transition. The engine only returns
/// commands; it never executes them — interpretation belongs to the host,
/// after the state update is committed.
pub trait Command:
    Clone + PartialEq + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync
{
    /// The command's discriminant.
    fn kind(&self) -> &'static str;
}

/// Serialize a tagged value and strip the variant wrapper.
///
/// serde's externally-tagged representation nests payload fields under a
/// single key named after the variant; that single-key object is unwrapped.
/// Unit variants serialize to a bare string and map to `Value::Null`.
pub(crate) fn variant_payload<T: Serialize>(value: &T) -> Value {
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) if map.len() == 1 => {
            map.into_iter().next().map(|(_, v)| v).unwrap_or(Value::Null)
        }
        Ok(Value::String(_)) => Value::Null,
        Ok(other) => other,
        Err(_) => Value::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
    enum TestState {
        Idle,
        Loading,
        Loaded { items: Vec<u32> },
    }

    impl State for TestState {
        fn tag(&self) -> &'static str {
            match self {
                Self::Idle => "IDLE",
                Self::Loading => "LOADING",
                Self::Loaded { .. } => "LOADED",
            }
        }
    }

    #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
    enum TestAction {
        Fetch,
        FetchSuccess { items: Vec<u32> },
    }

    impl Action for TestAction {
        fn kind(&self) -> &'static str {
            match self {
                Self::Fetch => "FETCH",
                Self::FetchSuccess { .. } => "FETCH_SUCCESS",
            }
        }
    }

    #[test]
    fn tag_names_the_active_variant() {
        assert_eq!(TestState::Idle.tag(), "IDLE");
        assert_eq!(TestState::Loading.tag(), "LOADING");
        assert_eq!(TestState::Loaded { items: vec![] }.tag(), "LOADED");
    }

    #[test]
    fn tag_is_stable_across_calls() {
        let state = TestState::Loading;
        assert_eq!(state.tag(), state.tag());
    }

    #[test]
    fn unit_variant_payload_is_null() {
        assert_eq!(TestState::Idle.payload(), Value::Null);
    }

    #[test]
    fn struct_variant_payload_keeps_fields() {
        let state = TestState::Loaded { items: vec![1, 2] };
        assert_eq!(state.payload(), json!({ "items": [1, 2] }));
    }

    #[test]
    fn action_payload_mirrors_state_payload() {
        assert_eq!(TestAction::Fetch.payload(), Value::Null);
        assert_eq!(
            TestAction::FetchSuccess { items: vec![7] }.payload(),
            json!({ "items": [7] })
        );
    }

    #[test]
    fn state_roundtrips_through_serde() {
        let state = TestState::Loaded { items: vec![3] };
        let json = serde_json::to_string(&state).unwrap();
        let back: TestState = serde_json::from_str(&json).unwrap();
        assert_eq!(state, back);
    }
}
