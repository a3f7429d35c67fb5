//! Build errors for machine builders.

use thiserror::Error;

/// Errors that can occur when building state machines.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("Initial state not specified. Call .initial(state) before .build()")]
    MissingInitialState,

    #[error("No states registered. Add at least one state")]
    NoStates,

    #[error("Initial state '{name}' is not among the registered states")]
    UnregisteredInitial { name: String },

    #[error("Dispenser not specified. Call .dispenser(d) before .build()")]
    MissingDispenser,
}
