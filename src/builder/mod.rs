//! Builder API for machine construction.
//!
//! [`StateMachineBuilder`] assembles a generic engine; [`VendingMachineBuilder`]
//! wires that engine to a catalog and collaborators. [`state_enum!`](crate::state_enum)
//! declares closed state enums.

pub mod error;
pub mod machine;
pub mod macros;
pub mod vending;

pub use error::BuildError;
pub use machine::StateMachineBuilder;
pub use vending::VendingMachineBuilder;
