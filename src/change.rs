//! Greedy change making.
//!
//! Pure functions only. The caller supplies denominations in descending
//! order, as produced by [`Catalog::denominations`](crate::catalog::Catalog::denominations).

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ChangeError {
    /// The denominations cannot cover the amount, so money cannot be returned.
    #[error("Cannot make exact change for {amount}¢ ({remainder}¢ left over)")]
    ExactChangeImpossible { amount: u32, remainder: u32 },
}

/// Coins to hand back, as `(denomination, count)` pairs largest first.
///
/// Every count is at least one and the pairs sum to the amount requested.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeBreakdown {
    parts: Vec<(u32, u32)>,
}

impl ChangeBreakdown {
    pub fn parts(&self) -> &[(u32, u32)] {
        &self.parts
    }

    /// Total value in cents.
    pub fn total(&self) -> u32 {
        self.parts.iter().map(|(denom, count)| denom * count).sum()
    }

    /// Number of coins of a denomination.
    pub fn count_of(&self, denomination: u32) -> u32 {
        self.parts
            .iter()
            .find(|(denom, _)| *denom == denomination)
            .map_or(0, |(_, count)| *count)
    }

    /// One item per coin, in the order the coins are returned.
    pub fn coins(&self) -> impl Iterator<Item = u32> + '_ {
        self.parts
            .iter()
            .flat_map(|&(denom, count)| std::iter::repeat(denom).take(count as usize))
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

/// Break `amount_due` into coins, always taking the largest denomination
/// that still fits.
///
/// # Example
///
/// ```rust
/// use coinop::change::make_change;
///
/// let change = make_change(75, &[200, 100, 25, 10, 5]).unwrap();
/// assert_eq!(change.parts(), &[(25, 3)]);
/// ```
pub fn make_change(amount_due: u32, denominations: &[u32]) -> Result<ChangeBreakdown, ChangeError> {
    let mut remaining = amount_due;
    let mut parts = Vec::new();

    for &denom in denominations {
        if denom == 0 || remaining < denom {
            continue;
        }
        let count = remaining / denom;
        remaining -= denom * count;
        parts.push((denom, count));
        if remaining == 0 {
            break;
        }
    }

    if remaining > 0 {
        return Err(ChangeError::ExactChangeImpossible {
            amount: amount_due,
            remainder: remaining,
        });
    }

    Ok(ChangeBreakdown { parts })
}

#[cfg(test)]
mod tests {
    use super::*;

    const STANDARD: [u32; 5] = [200, 100, 25, 10, 5];

    #[test]
    fn zero_needs_no_coins() {
        let change = make_change(0, &STANDARD).unwrap();
        assert!(change.is_empty());
        assert_eq!(change.total(), 0);
    }

    #[test]
    fn seventy_five_is_three_quarters() {
        let change = make_change(75, &STANDARD).unwrap();
        assert_eq!(change.parts(), &[(25, 3)]);
        assert_eq!(change.coins().collect::<Vec<_>>(), vec![25, 25, 25]);
    }

    #[test]
    fn full_refunds_use_largest_coins_first() {
        let change = make_change(125, &STANDARD).unwrap();
        assert_eq!(change.parts(), &[(100, 1), (25, 1)]);

        let change = make_change(150, &STANDARD).unwrap();
        assert_eq!(change.parts(), &[(100, 1), (25, 2)]);
        assert_eq!(change.count_of(25), 2);
        assert_eq!(change.count_of(10), 0);
    }

    #[test]
    fn mixed_amount() {
        let change = make_change(340, &STANDARD).unwrap();
        assert_eq!(change.parts(), &[(200, 1), (100, 1), (25, 1), (10, 1), (5, 1)]);
        assert_eq!(change.total(), 340);
    }

    #[test]
    fn leftover_remainder_is_reported() {
        let result = make_change(7, &STANDARD);
        assert_eq!(
            result,
            Err(ChangeError::ExactChangeImpossible {
                amount: 7,
                remainder: 2
            })
        );
    }

    #[test]
    fn empty_denominations_only_cover_zero() {
        assert!(make_change(0, &[]).is_ok());
        assert!(make_change(5, &[]).is_err());
    }
}
