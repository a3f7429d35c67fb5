//! Vending machine controller.
//!
//! The machine context (credit, change owed, last event), the four concrete
//! states, and the collaborator interfaces the states call out to.

mod collaborators;
mod context;
mod machine;
mod notice;
mod states;

pub use collaborators::{
    Dispenser, LogSink, MemorySink, NoopDispenser, SimulatedDispenser, TracingSink,
};
pub use context::{MachineContext, Receipt};
pub use machine::{MachineSnapshot, VendingMachine};
pub use notice::Notice;
pub use states::VendState;
