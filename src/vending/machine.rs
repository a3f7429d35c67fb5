//! The vending machine controller.

use crate::builder::VendingMachineBuilder;
use crate::catalog::{Catalog, RETURN_EVENT};
use crate::change::ChangeBreakdown;
use crate::core::StateHistory;
use crate::engine::{DispatchStatus, StateMachine};
use crate::error::MachineError;
use crate::vending::context::{MachineContext, Receipt};
use crate::vending::notice::Notice;
use crate::vending::states::VendState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::warn;
use uuid::Uuid;

/// Point-in-time view of the machine, safe to hand to other threads.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineSnapshot {
    pub state: Option<VendState>,
    pub amount: u32,
    pub change_due: u32,
    pub transaction: Option<Uuid>,
}

/// Owns the engine and its context. Events go in through
/// [`dispatch`](Self::dispatch) and [`tick`](Self::tick), one at a time;
/// each runs to completion before returning.
pub struct VendingMachine {
    engine: StateMachine<VendState>,
    ctx: MachineContext,
    idle_timeout: Option<Duration>,
    last_activity: DateTime<Utc>,
}

impl VendingMachine {
    pub fn builder() -> VendingMachineBuilder {
        VendingMachineBuilder::new()
    }

    pub(crate) fn start(
        mut engine: StateMachine<VendState>,
        mut ctx: MachineContext,
        idle_timeout: Option<Duration>,
    ) -> Result<Self, MachineError> {
        engine.start(&mut ctx)?;
        Ok(Self {
            engine,
            ctx,
            idle_timeout,
            last_activity: Utc::now(),
        })
    }

    /// Deliver one event id: a coin id, a product id or `RETURN`.
    ///
    /// Unrecognised ids are ignored.
    pub fn dispatch(&mut self, event: &str) -> Result<DispatchStatus<VendState>, MachineError> {
        self.ctx.event = Some(event.to_string());
        self.run()
    }

    /// Run the current state with no new event, as a polling loop does
    /// between inputs. This is what drives `CountChange`.
    pub fn tick(&mut self) -> Result<DispatchStatus<VendState>, MachineError> {
        self.ctx.event = None;
        self.run()
    }

    fn run(&mut self) -> Result<DispatchStatus<VendState>, MachineError> {
        let status = self.engine.update(&mut self.ctx)?;
        if matches!(
            status,
            DispatchStatus::Handled(_) | DispatchStatus::Transitioned { .. }
        ) {
            self.last_activity = Utc::now();
        }
        Ok(status)
    }

    /// Refund credit that has sat in `AddCoins` longer than the idle timeout.
    ///
    /// Returns `None` when nothing was due: no timeout configured, not in
    /// `AddCoins`, or not idle long enough. Otherwise the refund goes
    /// through the same path as `RETURN`.
    pub fn check_idle(
        &mut self,
        now: DateTime<Utc>,
    ) -> Result<Option<DispatchStatus<VendState>>, MachineError> {
        let Some(timeout) = self.idle_timeout else {
            return Ok(None);
        };
        if self.state() != Some(VendState::AddCoins) {
            return Ok(None);
        }

        let idle = now
            .signed_duration_since(self.last_activity)
            .to_std()
            .unwrap_or(Duration::ZERO);
        if idle < timeout {
            return Ok(None);
        }

        warn!(
            amount = self.ctx.amount,
            idle_secs = idle.as_secs(),
            transaction = ?self.ctx.transaction_id(),
            "Idle timeout, refunding credit"
        );
        self.ctx.notify(Notice::IdleTimeout {
            amount: self.ctx.amount,
        });
        self.dispatch(RETURN_EVENT).map(Some)
    }

    pub fn state(&self) -> Option<VendState> {
        self.engine.current_state().copied()
    }

    pub fn amount(&self) -> u32 {
        self.ctx.amount()
    }

    pub fn change_due(&self) -> u32 {
        self.ctx.change_due()
    }

    pub fn catalog(&self) -> &Catalog {
        self.ctx.catalog()
    }

    pub fn context(&self) -> &MachineContext {
        &self.ctx
    }

    pub fn history(&self) -> &StateHistory<VendState> {
        self.engine.history()
    }

    pub fn idle_timeout(&self) -> Option<Duration> {
        self.idle_timeout
    }

    pub fn last_activity(&self) -> DateTime<Utc> {
        self.last_activity
    }

    pub fn last_change(&self) -> Option<&ChangeBreakdown> {
        self.ctx.last_change()
    }

    pub fn last_receipt(&self) -> Option<&Receipt> {
        self.ctx.last_receipt()
    }

    pub fn snapshot(&self) -> MachineSnapshot {
        MachineSnapshot {
            state: self.state(),
            amount: self.ctx.amount(),
            change_due: self.ctx.change_due(),
            transaction: self.ctx.transaction_id(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vending::{MemorySink, NoopDispenser};

    fn machine_with_timeout(timeout: Duration) -> (VendingMachine, MemorySink) {
        let sink = MemorySink::new();
        let machine = VendingMachine::builder()
            .dispenser(NoopDispenser)
            .log_sink(sink.clone())
            .idle_timeout(timeout)
            .build()
            .unwrap();
        (machine, sink)
    }

    #[test]
    fn idle_credit_is_refunded_after_timeout() {
        let (mut machine, sink) = machine_with_timeout(Duration::from_secs(60));
        machine.dispatch("100").unwrap();

        let early = machine.last_activity() + chrono::Duration::seconds(30);
        assert_eq!(machine.check_idle(early).unwrap(), None);

        let late = machine.last_activity() + chrono::Duration::seconds(61);
        let status = machine.check_idle(late).unwrap();

        assert_eq!(
            status,
            Some(DispatchStatus::Transitioned {
                from: VendState::AddCoins,
                to: VendState::CountChange
            })
        );
        assert_eq!(machine.amount(), 0);
        assert_eq!(machine.change_due(), 100);
        assert!(sink.notices().contains(&Notice::IdleTimeout { amount: 100 }));

        machine.tick().unwrap();
        assert_eq!(machine.state(), Some(VendState::Waiting));
        assert_eq!(machine.last_receipt().map(|r| r.product.clone()), Some(None));
    }

    #[test]
    fn idle_check_does_nothing_while_waiting() {
        let (mut machine, sink) = machine_with_timeout(Duration::from_secs(1));
        let later = Utc::now() + chrono::Duration::hours(1);

        assert_eq!(machine.check_idle(later).unwrap(), None);
        assert!(sink.notices().is_empty());
    }

    #[test]
    fn ignored_events_do_not_count_as_activity() {
        let (mut machine, _sink) = machine_with_timeout(Duration::from_secs(60));
        machine.dispatch("25").unwrap();
        let before = machine.last_activity();

        machine.dispatch("__TIMEOUT__").unwrap();
        machine.tick().unwrap();

        assert_eq!(machine.last_activity(), before);
    }

    #[test]
    fn snapshot_tracks_transaction() {
        let (mut machine, _sink) = machine_with_timeout(Duration::from_secs(60));
        assert_eq!(machine.snapshot().transaction, None);

        machine.dispatch("25").unwrap();
        let snapshot = machine.snapshot();

        assert_eq!(snapshot.state, Some(VendState::AddCoins));
        assert_eq!(snapshot.amount, 25);
        assert!(snapshot.transaction.is_some());

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["state"], "add_coins");
    }
}
