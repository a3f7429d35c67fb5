//! Coin and product catalog.
//!
//! Static lookup tables mapping coin ids to face values and product ids to
//! display names and prices. All money is in cents. A catalog is validated
//! when it is built and is immutable afterwards.

mod error;
mod validation;

pub use error::{CatalogError, CatalogViolation};
pub use validation::validate;

use serde::{Deserialize, Deserializer, Serialize};

/// Event id of the coin return control.
pub const RETURN_EVENT: &str = "RETURN";

/// A coin the machine accepts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
    pub id: String,
    pub label: String,
    /// Face value in cents
    pub value: u32,
}

/// A product the machine sells.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    /// Price in cents
    pub price: u32,
}

/// What an incoming event id refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventKind<'a> {
    Coin(&'a Coin),
    Product(&'a Product),
    Return,
    Unknown,
}

#[derive(Deserialize)]
struct RawCatalog {
    coins: Vec<Coin>,
    #[serde(default)]
    products: Vec<Product>,
}

/// Validated coin and product tables, in display order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Catalog {
    coins: Vec<Coin>,
    products: Vec<Product>,
}

impl<'de> Deserialize<'de> for Catalog {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawCatalog::deserialize(deserializer)?;
        Catalog::new(raw.coins, raw.products).map_err(serde::de::Error::custom)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl Catalog {
    /// Build a catalog, rejecting it with every violation found.
    pub fn new(coins: Vec<Coin>, products: Vec<Product>) -> Result<Self, CatalogError> {
        validate(&coins, &products).map_err(CatalogError::Invalid)?;
        Ok(Self { coins, products })
    }

    /// The reference machine: 5¢, 10¢, 25¢, $1 and $2 coins and five products.
    pub fn standard() -> Self {
        let coin = |id: &str, label: &str, value| Coin {
            id: id.to_string(),
            label: label.to_string(),
            value,
        };
        let product = |id: &str, name: &str, price| Product {
            id: id.to_string(),
            name: name.to_string(),
            price,
        };

        Self {
            coins: vec![
                coin("5", "5¢", 5),
                coin("10", "10¢", 10),
                coin("25", "25¢", 25),
                coin("100", "$1", 100),
                coin("200", "$2", 200),
            ],
            products: vec![
                product("suprise", "SURPRISE", 150),
                product("pop", "POP", 125),
                product("chips", "CHIPS", 200),
                product("chocolate", "CHOCOLATE", 175),
                product("beer", "BEER", 250),
            ],
        }
    }

    pub fn coins(&self) -> &[Coin] {
        &self.coins
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn coin(&self, id: &str) -> Option<&Coin> {
        self.coins.iter().find(|c| c.id == id)
    }

    pub fn product(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Face value of a coin.
    pub fn coin_value(&self, id: &str) -> Result<u32, CatalogError> {
        self.coin(id)
            .map(|c| c.value)
            .ok_or_else(|| CatalogError::UnknownCoin(id.to_string()))
    }

    /// Display name and price of a product.
    pub fn product_info(&self, id: &str) -> Result<&Product, CatalogError> {
        self.product(id)
            .ok_or_else(|| CatalogError::UnknownProduct(id.to_string()))
    }

    /// Distinct coin values, largest first.
    pub fn denominations(&self) -> Vec<u32> {
        let mut values: Vec<u32> = self.coins.iter().map(|c| c.value).collect();
        values.sort_unstable_by(|a, b| b.cmp(a));
        values.dedup();
        values
    }

    /// Classify an event id against the catalog.
    pub fn classify(&self, id: &str) -> EventKind<'_> {
        if id == RETURN_EVENT {
            return EventKind::Return;
        }
        if let Some(coin) = self.coin(id) {
            return EventKind::Coin(coin);
        }
        match self.product(id) {
            Some(product) => EventKind::Product(product),
            None => EventKind::Unknown,
        }
    }
}

/// Render cents as dollars, e.g. `125` as `$1.25`.
pub fn format_cents(cents: u32) -> String {
    format!("${}.{:02}", cents / 100, cents % 100)
}
