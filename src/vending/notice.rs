//! Status notices sent to the display sink.

use crate::catalog::format_cents;
use serde::Serialize;
use std::fmt;

/// One human-readable status line. Each event kind produces exactly one.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notice {
    CoinInserted { label: String, value: u32 },
    InsufficientFunds { product: String, shortfall: u32 },
    ProductSelected { product: String },
    Refund { amount: u32 },
    Dispensing { product: String },
    NoChange,
    ChangeDue { amount: u32 },
    CoinReturned { value: u32 },
    TransactionComplete,
    IdleTimeout { amount: u32 },
}

impl Notice {
    /// Stable short name, for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::CoinInserted { .. } => "coin_inserted",
            Self::InsufficientFunds { .. } => "insufficient_funds",
            Self::ProductSelected { .. } => "product_selected",
            Self::Refund { .. } => "refund",
            Self::Dispensing { .. } => "dispensing",
            Self::NoChange => "no_change",
            Self::ChangeDue { .. } => "change_due",
            Self::CoinReturned { .. } => "coin_returned",
            Self::TransactionComplete => "transaction_complete",
            Self::IdleTimeout { .. } => "idle_timeout",
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CoinInserted { label, .. } => write!(f, "Coin inserted: {label}"),
            Self::InsufficientFunds { product, shortfall } => {
                write!(f, "Need {} more for {product}", format_cents(*shortfall))
            }
            Self::ProductSelected { product } => write!(f, "Selected: {product}"),
            Self::Refund { amount } => write!(f, "Returning all coins: {}", format_cents(*amount)),
            Self::Dispensing { product } => write!(f, "Dispensing: {product}..."),
            Self::NoChange => f.write_str("Thank you! No change."),
            Self::ChangeDue { amount } => write!(f, "Change due: {}", format_cents(*amount)),
            Self::CoinReturned { value } => write!(f, "Returning {value}¢"),
            Self::TransactionComplete => f.write_str("Transaction complete. Returning to idle."),
            Self::IdleTimeout { amount } => {
                write!(f, "No activity, refunding {}", format_cents(*amount))
            }
        }
    }
}
