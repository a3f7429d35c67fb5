//! Catalog validation using Validation.
//!
//! All checks run and every violation is reported, so a misconfigured
//! catalog can be fixed in one pass.

use super::error::CatalogViolation;
use super::{Coin, Product, RETURN_EVENT};
use std::collections::HashSet;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

type Check = Validation<(), NonEmptyVec<CatalogViolation>>;

fn require(ok: bool, violation: impl FnOnce() -> CatalogViolation) -> Check {
    if ok {
        Validation::success(())
    } else {
        Validation::fail(violation())
    }
}

/// Validate coin and product tables, accumulating ALL violations.
pub fn validate(coins: &[Coin], products: &[Product]) -> Result<(), Vec<CatalogViolation>> {
    let mut checks: Vec<Check> = Vec::new();

    checks.push(require(!coins.is_empty(), || CatalogViolation::NoCoins));

    let mut coin_ids = HashSet::new();
    for coin in coins {
        checks.push(require(coin.value > 0, || CatalogViolation::ZeroCoinValue {
            id: coin.id.clone(),
        }));
        checks.push(require(coin.id != RETURN_EVENT, || {
            CatalogViolation::ReservedId {
                id: coin.id.clone(),
            }
        }));
        checks.push(require(coin_ids.insert(coin.id.as_str()), || {
            CatalogViolation::DuplicateId {
                id: coin.id.clone(),
            }
        }));
    }

    let mut product_ids = HashSet::new();
    for product in products {
        checks.push(require(product.price > 0, || CatalogViolation::ZeroPrice {
            id: product.id.clone(),
        }));
        checks.push(require(product.id != RETURN_EVENT, || {
            CatalogViolation::ReservedId {
                id: product.id.clone(),
            }
        }));
        checks.push(require(product_ids.insert(product.id.as_str()), || {
            CatalogViolation::DuplicateId {
                id: product.id.clone(),
            }
        }));
        checks.push(require(!coin_ids.contains(product.id.as_str()), || {
            CatalogViolation::SharedId {
                id: product.id.clone(),
            }
        }));
    }

    match Validation::all_vec(checks).map(|_| ()) {
        Validation::Success(()) => Ok(()),
        Validation::Failure(errors) => Err(errors.iter().cloned().collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coin(id: &str, value: u32) -> Coin {
        Coin {
            id: id.to_string(),
            label: id.to_string(),
            value,
        }
    }

    fn product(id: &str, price: u32) -> Product {
        Product {
            id: id.to_string(),
            name: id.to_uppercase(),
            price,
        }
    }

    #[test]
    fn valid_tables_pass() {
        let coins = vec![coin("5", 5), coin("25", 25)];
        let products = vec![product("gum", 30)];
        assert!(validate(&coins, &products).is_ok());
    }

    #[test]
    fn empty_coin_table_is_rejected() {
        let errors = validate(&[], &[product("gum", 30)]).unwrap_err();
        assert_eq!(errors, vec![CatalogViolation::NoCoins]);
    }

    #[test]
    fn validation_accumulates_all_violations() {
        let coins = vec![coin("5", 0), coin("5", 5), coin("RETURN", 10)];
        let products = vec![product("gum", 0), product("5", 20)];

        let errors = validate(&coins, &products).unwrap_err();

        assert!(errors.contains(&CatalogViolation::ZeroCoinValue { id: "5".into() }));
        assert!(errors.contains(&CatalogViolation::DuplicateId { id: "5".into() }));
        assert!(errors.contains(&CatalogViolation::ReservedId {
            id: "RETURN".into()
        }));
        assert!(errors.contains(&CatalogViolation::ZeroPrice { id: "gum".into() }));
        assert!(errors.contains(&CatalogViolation::SharedId { id: "5".into() }));
        assert_eq!(errors.len(), 5);
    }
}
