//! Macros for implementing discriminant traits on existing enums.

/// Implement [`State`](crate::core::State), [`Action`](crate::core::Action)
/// or [`Command`](crate::core::Command) for an enum from a variant → tag
/// listing.
///
/// Variants with payload are matched with `{ .. }`, so the listing covers
/// unit, tuple and struct variants alike.
///
/// # Example
///
/// ```rust
/// use gearshift::tags_for;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
/// enum LightState {
///     Red,
///     Green,
///     Yellow,
/// }
///
/// tags_for! {
///     State for LightState {
///         Red => "RED",
///         Green => "GREEN",
///         Yellow => "YELLOW",
///     }
/// }
/// ```
#[macro_export]
macro_rules! tags_for {
    (
        State for $name:ident {
            $($variant:ident => $tag:literal),* $(,)?
        }
    ) => {
        impl $crate::core::State for $name {
            fn tag(&self) -> &'static str {
                match self {
                    $(Self::$variant { .. } => $tag),*
                }
            }
        }
    };
    (
        Action for $name:ident {
            $($variant:ident => $tag:literal),* $(,)?
        }
    ) => {
        impl $crate::core::Action for $name {
            fn kind(&self) -> &'static str {
                match self {
                    $(Self::$variant { .. } => $tag),*
                }
            }
        }
    };
    (
        Command for $name:ident {
            $($variant:ident => $tag:literal),* $(,)?
        }
    ) => {
        impl $crate::core::Command for $name {
            fn kind(&self) -> &'static str {
                match self {
                    $(Self::$variant { .. } => $tag),*
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::core::{Action, Command, State};
    use serde::{Deserialize, Serialize};

    #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
    enum TestState {
        Idle,
        Loaded { items: Vec<u32> },
    }

    tags_for! {
        State for TestState {
            Idle => "IDLE",
            Loaded => "LOADED",
        }
    }

    #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
    enum TestAction {
        Fetch,
        FetchSuccess(Vec<u32>),
    }

    tags_for! {
        Action for TestAction {
            Fetch => "FETCH",
            FetchSuccess => "FETCH_SUCCESS",
        }
    }

    #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
    enum TestCommand {
        Persist,
    }

    tags_for! {
        Command for TestCommand {
            Persist => "PERSIST",
        }
    }

    #[test]
    fn macro_covers_unit_and_payload_variants() {
        assert_eq!(TestState::Idle.tag(), "IDLE");
        assert_eq!(TestState::Loaded { items: vec![1] }.tag(), "LOADED");
        assert_eq!(TestAction::Fetch.kind(), "FETCH");
        assert_eq!(TestAction::FetchSuccess(vec![]).kind(), "FETCH_SUCCESS");
        assert_eq!(TestCommand::Persist.kind(), "PERSIST");
    }
}
