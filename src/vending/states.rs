//! The four vending states and their hooks.

use crate::change::make_change;
use crate::engine::{Directive, StateHooks};
use crate::error::MachineError;
use crate::state_enum;
use crate::vending::context::{Input, MachineContext};
use crate::vending::notice::Notice;
use tracing::{debug, info};

state_enum! {
    /// Where the machine is in a purchase.
    pub enum VendState {
        /// Idle, waiting for the first coin
        Waiting => "waiting",
        /// Accepting coins, a product choice, or `RETURN`
        AddCoins => "add_coins",
        /// Vending; entered and left within one dispatch
        DeliverProduct => "deliver_product",
        /// Handing back change
        CountChange => "count_change",
    }
    transient: [DeliverProduct]
}

impl StateHooks<MachineContext> for VendState {
    type Error = MachineError;

    fn on_entry(&self, ctx: &mut MachineContext) -> Result<Directive<Self>, MachineError> {
        match self {
            Self::DeliverProduct => deliver_product(ctx),
            Self::CountChange => {
                ctx.notify(Notice::ChangeDue {
                    amount: ctx.change_due,
                });
                Ok(Directive::Stay)
            }
            Self::Waiting | Self::AddCoins => Ok(Directive::Stay),
        }
    }

    fn update(&self, ctx: &mut MachineContext) -> Result<Directive<Self>, MachineError> {
        match self {
            Self::Waiting => waiting(ctx),
            Self::AddCoins => add_coins(ctx),
            Self::DeliverProduct => Ok(Directive::Ignore),
            Self::CountChange => count_change(ctx),
        }
    }
}

fn waiting(ctx: &mut MachineContext) -> Result<Directive<VendState>, MachineError> {
    // RETURN has no handler here: there is no credit to give back.
    let Input::Coin(coin) = ctx.input() else {
        return Ok(Directive::Ignore);
    };

    let transaction = ctx.open_transaction();
    debug!(%transaction, "Transaction opened");
    ctx.insert_coin(&coin);
    Ok(Directive::GoTo(VendState::AddCoins))
}

fn add_coins(ctx: &mut MachineContext) -> Result<Directive<VendState>, MachineError> {
    match ctx.input() {
        Input::Return => {
            let refund = ctx.amount;
            ctx.change_due = refund;
            ctx.amount = 0;
            ctx.notify(Notice::Refund { amount: refund });
            Ok(Directive::GoTo(VendState::CountChange))
        }
        Input::Coin(coin) => {
            ctx.insert_coin(&coin);
            Ok(Directive::Stay)
        }
        Input::Product(product) if ctx.amount >= product.price => {
            ctx.notify(Notice::ProductSelected {
                product: product.name,
            });
            Ok(Directive::GoTo(VendState::DeliverProduct))
        }
        Input::Product(product) => {
            ctx.notify(Notice::InsufficientFunds {
                shortfall: product.price - ctx.amount,
                product: product.name,
            });
            Ok(Directive::Stay)
        }
        Input::Other => Ok(Directive::Ignore),
    }
}

/// Entry action: settle the price, vend, then route to change or back to idle.
///
/// The product is read from the event that caused the transition, which is
/// still current.
fn deliver_product(ctx: &mut MachineContext) -> Result<Directive<VendState>, MachineError> {
    let product_id = ctx.event.clone().unwrap_or_default();
    let product = ctx.catalog().product_info(&product_id)?.clone();

    let change_due = ctx
        .amount
        .checked_sub(product.price)
        .ok_or(MachineError::InsufficientCredit {
            amount: ctx.amount,
            price: product.price,
        })?;
    ctx.change_due = change_due;
    ctx.amount = 0;
    ctx.record_purchase(&product);

    ctx.notify(Notice::Dispensing {
        product: product.name.clone(),
    });
    ctx.vend();
    info!(
        product = %product.id,
        price = product.price,
        change_due,
        transaction = ?ctx.transaction_id(),
        "Product dispensed"
    );

    if ctx.change_due > 0 {
        return Ok(Directive::GoTo(VendState::CountChange));
    }

    ctx.notify(Notice::NoChange);
    ctx.close_transaction();
    Ok(Directive::GoTo(VendState::Waiting))
}

/// Hands back all change owed in one call, largest coins first.
fn count_change(ctx: &mut MachineContext) -> Result<Directive<VendState>, MachineError> {
    let change = make_change(ctx.change_due, ctx.denominations())?;

    for coin in change.coins() {
        ctx.notify(Notice::CoinReturned { value: coin });
        ctx.change_due -= coin;
    }

    ctx.notify(Notice::TransactionComplete);
    ctx.record_change(change);
    if let Some(receipt) = ctx.close_transaction() {
        info!(
            transaction = %receipt.id,
            paid = receipt.paid,
            change = receipt.change.total(),
            "Transaction complete"
        );
    }
    Ok(Directive::GoTo(VendState::Waiting))
}
