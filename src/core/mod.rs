//! Core state machine types.
//!
//! This module contains the pure pieces the engine is built from:
//! - State definitions via the `State` trait
//! - Bounded transition history
//!
//! Nothing in here performs side effects.

mod history;
mod state;

pub use history::{StateHistory, StateTransition, DEFAULT_HISTORY_LIMIT};
pub use state::State;
