//! Builder for constructing state machines.

use crate::builder::error::BuildError;
use crate::core::{State, DEFAULT_HISTORY_LIMIT};
use crate::engine::StateMachine;

/// Builder for constructing state machines with a fluent API.
pub struct StateMachineBuilder<S: State> {
    initial: Option<S>,
    states: Vec<S>,
    history_limit: usize,
}

impl<S: State> StateMachineBuilder<S> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            initial: None,
            states: Vec::new(),
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }

    /// Set the initial state (required).
    pub fn initial(mut self, state: S) -> Self {
        self.initial = Some(state);
        self
    }

    /// Register a state.
    pub fn state(mut self, state: S) -> Self {
        self.states.push(state);
        self
    }

    /// Register several states at once.
    pub fn states(mut self, states: impl IntoIterator<Item = S>) -> Self {
        self.states.extend(states);
        self
    }

    /// Bound the transition history.
    pub fn history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    /// Build the state machine.
    ///
    /// The machine is not started: call
    /// [`StateMachine::start`] with a context to enter the initial state.
    pub fn build(self) -> Result<StateMachine<S>, BuildError> {
        let initial = self.initial.ok_or(BuildError::MissingInitialState)?;

        if self.states.is_empty() {
            return Err(BuildError::NoStates);
        }

        let mut machine = StateMachine::new().with_history_limit(self.history_limit);
        for state in self.states {
            machine.register_state(state);
        }

        if !machine.is_registered(initial.name()) {
            return Err(BuildError::UnregisteredInitial {
                name: initial.name().to_string(),
            });
        }
        machine.set_initial(initial);

        Ok(machine)
    }
}

impl<S: State> Default for StateMachineBuilder<S> {
    fn default() -> Self {
        Self::new()
    }
}
