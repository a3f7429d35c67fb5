//! Machine context: the one mutable record the states work on.

use crate::catalog::{Catalog, Coin, EventKind, Product};
use crate::change::ChangeBreakdown;
use crate::engine::Context;
use crate::vending::collaborators::{Dispenser, LogSink};
use crate::vending::notice::Notice;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An owned reading of the current event against the catalog.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Input {
    Coin(Coin),
    Product(Product),
    Return,
    Other,
}

/// Purchase or refund in progress, from first coin back to `Waiting`.
#[derive(Clone, Debug)]
struct Transaction {
    id: Uuid,
    started_at: DateTime<Utc>,
    paid: u32,
    product: Option<String>,
}

/// Summary of a finished transaction. Kept in memory only.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub id: Uuid,
    /// Display name of the product bought; `None` for a refund
    pub product: Option<String>,
    pub paid: u32,
    pub change: ChangeBreakdown,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Credit, pending change and the last event, plus the catalog and the
/// injected collaborators.
///
/// `amount` and `change_due` are never both non-zero between dispatches.
pub struct MachineContext {
    pub(crate) amount: u32,
    pub(crate) change_due: u32,
    pub(crate) event: Option<String>,
    catalog: Catalog,
    denominations: Vec<u32>,
    dispenser: Box<dyn Dispenser>,
    sink: Box<dyn LogSink>,
    transaction: Option<Transaction>,
    last_change: Option<ChangeBreakdown>,
    last_receipt: Option<Receipt>,
}

impl Context for MachineContext {
    fn event(&self) -> Option<&str> {
        self.event.as_deref()
    }
}

impl MachineContext {
    pub fn new(catalog: Catalog, dispenser: Box<dyn Dispenser>, sink: Box<dyn LogSink>) -> Self {
        let denominations = catalog.denominations();
        Self {
            amount: 0,
            change_due: 0,
            event: None,
            catalog,
            denominations,
            dispenser,
            sink,
            transaction: None,
            last_change: None,
            last_receipt: None,
        }
    }

    /// Credit accumulated and not yet spent or refunded, in cents.
    pub fn amount(&self) -> u32 {
        self.amount
    }

    /// Change still owed, in cents.
    pub fn change_due(&self) -> u32 {
        self.change_due
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Coin values used for change, largest first.
    pub fn denominations(&self) -> &[u32] {
        &self.denominations
    }

    pub fn transaction_id(&self) -> Option<Uuid> {
        self.transaction.as_ref().map(|t| t.id)
    }

    /// Coins handed back by the last change sweep of the current or most
    /// recent transaction.
    pub fn last_change(&self) -> Option<&ChangeBreakdown> {
        self.last_change.as_ref()
    }

    pub fn last_receipt(&self) -> Option<&Receipt> {
        self.last_receipt.as_ref()
    }

    pub(crate) fn input(&self) -> Input {
        let Some(event) = self.event.as_deref() else {
            return Input::Other;
        };
        match self.catalog.classify(event) {
            EventKind::Coin(coin) => Input::Coin(coin.clone()),
            EventKind::Product(product) => Input::Product(product.clone()),
            EventKind::Return => Input::Return,
            EventKind::Unknown => Input::Other,
        }
    }

    pub(crate) fn notify(&mut self, notice: Notice) {
        self.sink.notice(&notice);
    }

    pub(crate) fn vend(&mut self) {
        self.dispenser.vend();
    }

    pub(crate) fn insert_coin(&mut self, coin: &Coin) {
        self.amount = self.amount.saturating_add(coin.value);
        if let Some(transaction) = self.transaction.as_mut() {
            transaction.paid = transaction.paid.saturating_add(coin.value);
        }
        self.notify(Notice::CoinInserted {
            label: coin.label.clone(),
            value: coin.value,
        });
    }

    pub(crate) fn open_transaction(&mut self) -> Uuid {
        let id = Uuid::new_v4();
        self.transaction = Some(Transaction {
            id,
            started_at: Utc::now(),
            paid: 0,
            product: None,
        });
        self.last_change = None;
        id
    }

    pub(crate) fn record_purchase(&mut self, product: &Product) {
        if let Some(transaction) = self.transaction.as_mut() {
            transaction.product = Some(product.name.clone());
        }
    }

    pub(crate) fn record_change(&mut self, change: ChangeBreakdown) {
        self.last_change = Some(change);
    }

    pub(crate) fn close_transaction(&mut self) -> Option<&Receipt> {
        let transaction = self.transaction.take()?;
        self.last_receipt = Some(Receipt {
            id: transaction.id,
            product: transaction.product,
            paid: transaction.paid,
            change: self.last_change.clone().unwrap_or_default(),
            started_at: transaction.started_at,
            finished_at: Utc::now(),
        });
        self.last_receipt.as_ref()
    }
}
