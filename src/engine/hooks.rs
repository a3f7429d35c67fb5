//! State hooks and the directives they return.

use crate::core::State;

/// What a hook asks the engine to do next.
#[derive(Clone, Debug, PartialEq)]
pub enum Directive<S: State> {
    /// The event was handled and the state does not change
    Stay,

    /// The event means nothing to this state
    Ignore,

    /// Leave the current state for the given one
    GoTo(S),
}

/// Errors raised by the engine itself.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("State '{name}' is not registered")]
    UnknownState { name: String },

    #[error("No initial state configured")]
    NoInitialState,

    #[error("Entry hooks chained more than {limit} transitions from '{from}'")]
    TransitionLoop { from: String, limit: usize },
}

/// Context the engine reads while dispatching.
pub trait Context {
    /// Id of the event being dispatched, recorded as the transition trigger.
    fn event(&self) -> Option<&str>;
}

/// Behaviour of a state against a context `C`.
///
/// Implemented once for a closed state enum, matching on `self` in each
/// hook. Every hook defaults to doing nothing.
pub trait StateHooks<C>: State {
    type Error: From<EngineError>;

    /// Runs after the state becomes current. May chain a further transition.
    fn on_entry(&self, _ctx: &mut C) -> Result<Directive<Self>, Self::Error> {
        Ok(Directive::Stay)
    }

    /// Runs once per dispatched event while the state is current.
    fn update(&self, _ctx: &mut C) -> Result<Directive<Self>, Self::Error> {
        Ok(Directive::Ignore)
    }

    /// Runs before the state stops being current.
    fn on_exit(&self, _ctx: &mut C) -> Result<(), Self::Error> {
        Ok(())
    }
}
