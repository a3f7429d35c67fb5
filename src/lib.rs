//! Coinop: a coin-operated vending machine as a finite state machine
//!
//! The machine accepts coin events, tracks credit, lets a product be chosen
//! once the credit covers it, triggers a dispense action, and hands back
//! change using greedy change making. Physical hardware and any GUI sit
//! outside the crate behind the [`Dispenser`] and [`LogSink`] traits.
//!
//! # Core Concepts
//!
//! - **Catalog**: immutable coin and product tables, validated on load
//! - **Engine**: named state registry with entry/update/exit hooks
//! - **Vending states**: `Waiting`, `AddCoins`, `DeliverProduct`, `CountChange`
//! - **Change**: greedy breakdown over the catalog's denominations
//!
//! All money is in cents.
//!
//! # Example
//!
//! ```rust
//! use coinop::{MemorySink, VendState, VendingMachine};
//!
//! let sink = MemorySink::new();
//! let mut machine = VendingMachine::builder()
//!     .dispenser(|| {})
//!     .log_sink(sink.clone())
//!     .build()
//!     .unwrap();
//!
//! machine.dispatch("200").unwrap();
//! machine.dispatch("pop").unwrap();
//! assert_eq!(machine.state(), Some(VendState::CountChange));
//! assert_eq!(machine.change_due(), 75);
//!
//! machine.tick().unwrap();
//! assert_eq!(machine.state(), Some(VendState::Waiting));
//! assert_eq!(machine.last_change().unwrap().parts(), &[(25, 3)]);
//! ```

pub mod builder;
pub mod catalog;
pub mod change;
pub mod config;
pub mod core;
pub mod engine;
pub mod error;
pub mod service;
pub mod vending;

// Re-export commonly used types
pub use builder::{BuildError, VendingMachineBuilder};
pub use catalog::{Catalog, CatalogError, RETURN_EVENT};
pub use change::{make_change, ChangeBreakdown, ChangeError};
pub use config::MachineConfig;
pub use engine::{DispatchStatus, EngineError};
pub use error::MachineError;
pub use vending::{
    Dispenser, LogSink, MemorySink, NoopDispenser, Notice, VendState, VendingMachine,
};
