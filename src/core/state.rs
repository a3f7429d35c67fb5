//! Core State trait for machine states.
//!
//! A state is a named value. The name is the registry key used by the
//! engine and never changes for the lifetime of the state.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Trait for state machine states.
///
/// All methods are pure. States carry no data of their own beyond their
/// identity; everything mutable lives in the machine context.
///
/// # Required Traits
///
/// - `Clone`: states are copied into the registry and the history
/// - `PartialEq`: states must be comparable for transition logic
/// - `Debug`: states must be debuggable for diagnostics
/// - `Serialize` + `Deserialize`: states appear in snapshots
///
/// # Example
///
/// ```rust
/// use coinop::core::State;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
/// enum DoorState {
///     Closed,
///     Opening,
///     Open,
/// }
///
/// impl State for DoorState {
///     fn name(&self) -> &str {
///         match self {
///             Self::Closed => "closed",
///             Self::Opening => "opening",
///             Self::Open => "open",
///         }
///     }
///
///     fn is_transient(&self) -> bool {
///         matches!(self, Self::Opening)
///     }
/// }
///
/// assert_eq!(DoorState::Open.name(), "open");
/// assert!(DoorState::Opening.is_transient());
/// ```
pub trait State:
    Clone + PartialEq + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync
{
    /// Get the state's name, used as its registry key and in logs.
    fn name(&self) -> &str;

    /// Check if this state is only ever passed through.
    ///
    /// Transient states do all of their work in their entry hook and leave
    /// before control returns to the event source. Events are not expected
    /// to arrive while one is current.
    ///
    /// Default implementation returns `false`.
    fn is_transient(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
    enum TestState {
        Idle,
        Working,
        Done,
    }

    impl State for TestState {
        fn name(&self) -> &str {
            match self {
                Self::Idle => "idle",
                Self::Working => "working",
                Self::Done => "done",
            }
        }

        fn is_transient(&self) -> bool {
            matches!(self, Self::Working)
        }
    }

    #[test]
    fn state_name_returns_correct_value() {
        assert_eq!(TestState::Idle.name(), "idle");
        assert_eq!(TestState::Working.name(), "working");
        assert_eq!(TestState::Done.name(), "done");
    }

    #[test]
    fn is_transient_identifies_pass_through_states() {
        assert!(!TestState::Idle.is_transient());
        assert!(TestState::Working.is_transient());
        assert!(!TestState::Done.is_transient());
    }

    #[test]
    fn state_serializes_correctly() {
        let state = TestState::Working;
        let json = serde_json::to_string(&state).unwrap();
        let deserialized: TestState = serde_json::from_str(&json).unwrap();
        assert_eq!(state, deserialized);
    }
}
