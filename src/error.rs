//! Error type returned by state hooks and the controller.

use crate::builder::BuildError;
use crate::catalog::CatalogError;
use crate::change::ChangeError;
use crate::engine::EngineError;
use thiserror::Error;

/// Everything that can go wrong while building or driving a machine.
///
/// Unknown event ids are not errors; they are ignored. What does reach
/// this type is a configuration or programming fault and should halt the
/// machine rather than be retried.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MachineError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Money owed cannot be paid out with the configured coins
    #[error(transparent)]
    Change(#[from] ChangeError),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error("Credit of {amount}¢ does not cover price of {price}¢")]
    InsufficientCredit { amount: u32, price: u32 },
}
