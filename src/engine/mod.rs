//! Generic state machine engine.
//!
//! Holds a registry of named states and the current one, and drives
//! entry/update/exit hooks against a caller-owned context.
//!
//! # Key Concepts
//!
//! - **Hooks**: states implement [`StateHooks`] by matching on themselves
//! - **Directives**: hooks return [`Directive`] instead of transitioning
//!   directly, so the engine alone mutates the current state
//! - **Dispatch**: [`StateMachine::update`] runs one event to completion,
//!   including any chain of entry-triggered transitions

mod hooks;
mod machine;

pub use hooks::{Context, Directive, EngineError, StateHooks};
pub use machine::{DispatchStatus, StateMachine, MAX_CHAINED_TRANSITIONS};
