//! Builder for a ready-to-run vending machine.

use crate::builder::error::BuildError;
use crate::builder::machine::StateMachineBuilder;
use crate::catalog::Catalog;
use crate::config::MachineConfig;
use crate::core::DEFAULT_HISTORY_LIMIT;
use crate::error::MachineError;
use crate::vending::{
    Dispenser, LogSink, MachineContext, TracingSink, VendState, VendingMachine,
};
use std::time::Duration;

/// Assembles the catalog, collaborators and engine, then starts the machine
/// in `Waiting`.
pub struct VendingMachineBuilder {
    catalog: Catalog,
    dispenser: Option<Box<dyn Dispenser>>,
    sink: Option<Box<dyn LogSink>>,
    idle_timeout: Option<Duration>,
    history_limit: usize,
}

impl VendingMachineBuilder {
    pub fn new() -> Self {
        Self {
            catalog: Catalog::standard(),
            dispenser: None,
            sink: None,
            idle_timeout: None,
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }

    /// Use a catalog other than [`Catalog::standard`].
    pub fn catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Set the vend action (required).
    pub fn dispenser(mut self, dispenser: impl Dispenser + 'static) -> Self {
        self.dispenser = Some(Box::new(dispenser));
        self
    }

    /// Set where display notices go. Defaults to [`TracingSink`].
    pub fn log_sink(mut self, sink: impl LogSink + 'static) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    /// Refund credit left idle in `AddCoins` for this long.
    pub fn idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = Some(timeout);
        self
    }

    pub fn history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    /// Apply catalog, idle timeout and history limit from a config.
    pub fn config(mut self, config: &MachineConfig) -> Self {
        self.catalog = config.catalog.clone();
        self.idle_timeout = config.idle_timeout();
        self.history_limit = config.history_limit;
        self
    }

    /// Register the four states and enter `Waiting`.
    pub fn build(self) -> Result<VendingMachine, MachineError> {
        let dispenser = self.dispenser.ok_or(BuildError::MissingDispenser)?;
        let sink = self.sink.unwrap_or_else(|| Box::new(TracingSink));

        let engine = StateMachineBuilder::new()
            .states(VendState::ALL.iter().copied())
            .initial(VendState::Waiting)
            .history_limit(self.history_limit)
            .build()?;
        let ctx = MachineContext::new(self.catalog, dispenser, sink);

        VendingMachine::start(engine, ctx, self.idle_timeout)
    }
}

impl Default for VendingMachineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
