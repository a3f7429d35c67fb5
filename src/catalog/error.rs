//! Catalog error types.

use thiserror::Error;

/// A single problem found while validating a catalog.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CatalogViolation {
    #[error("Catalog defines no coins")]
    NoCoins,

    #[error("Coin '{id}' has a value of zero")]
    ZeroCoinValue { id: String },

    #[error("Product '{id}' has a price of zero")]
    ZeroPrice { id: String },

    #[error("Id '{id}' is defined more than once")]
    DuplicateId { id: String },

    #[error("Id '{id}' is reserved for the return control")]
    ReservedId { id: String },

    #[error("Id '{id}' names both a coin and a product")]
    SharedId { id: String },
}

/// Errors raised by catalog lookups and construction.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Unknown coin '{0}'")]
    UnknownCoin(String),

    #[error("Unknown product '{0}'")]
    UnknownProduct(String),

    /// Every violation found, not just the first
    #[error("Invalid catalog ({} violation(s)): {}", .0.len(), describe(.0))]
    Invalid(Vec<CatalogViolation>),
}

fn describe(violations: &[CatalogViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
