//! Capabilities injected into the machine: the vend action and the
//! display sink.

use crate::vending::notice::Notice;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tracing::{debug, info};

/// Performs the physical vend. Called exactly once per successful purchase
/// and never retried; may block until the action completes.
pub trait Dispenser: Send {
    fn vend(&mut self);
}

impl<F> Dispenser for F
where
    F: FnMut() + Send,
{
    fn vend(&mut self) {
        self()
    }
}

/// Dispenser that does nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopDispenser;

impl Dispenser for NoopDispenser {
    fn vend(&mut self) {}
}

/// Stands in for the motor: blocks for `pulses` steps of `pulse` each.
#[derive(Clone, Copy, Debug)]
pub struct SimulatedDispenser {
    pulses: u32,
    pulse: Duration,
}

impl SimulatedDispenser {
    pub fn new(pulses: u32, pulse: Duration) -> Self {
        Self { pulses, pulse }
    }
}

impl Dispenser for SimulatedDispenser {
    fn vend(&mut self) {
        for step in 1..=self.pulses {
            debug!(step, pulses = self.pulses, "Dispenser pulse");
            std::thread::sleep(self.pulse);
        }
    }
}

/// Receives display notices in order.
pub trait LogSink: Send {
    fn notice(&mut self, notice: &Notice);
}

impl<F> LogSink for F
where
    F: FnMut(&Notice) + Send,
{
    fn notice(&mut self, notice: &Notice) {
        self(notice)
    }
}

/// Emits each notice as an `info` event on the `coinop::display` target.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn notice(&mut self, notice: &Notice) {
        info!(target: "coinop::display", kind = notice.kind(), "{notice}");
    }
}

/// Keeps notices in a shared buffer. Clones share the buffer, so a handle
/// kept outside the machine sees everything the machine emitted.
#[derive(Clone, Debug, Default)]
pub struct MemorySink {
    notices: Arc<Mutex<Vec<Notice>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Notices rendered as display lines.
    pub fn lines(&self) -> Vec<String> {
        self.notices().iter().map(ToString::to_string).collect()
    }

    pub fn clear(&self) {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl LogSink for MemorySink {
    fn notice(&mut self, notice: &Notice) {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notice.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closures_act_as_dispensers() {
        let mut calls = 0;
        {
            let mut dispenser = || calls += 1;
            dispenser.vend();
            dispenser.vend();
        }
        assert_eq!(calls, 2);
    }

    #[test]
    fn memory_sink_clones_share_buffer() {
        let sink = MemorySink::new();
        let mut writer = sink.clone();

        writer.notice(&Notice::NoChange);
        writer.notice(&Notice::TransactionComplete);

        assert_eq!(
            sink.lines(),
            vec!["Thank you! No change.", "Transaction complete. Returning to idle."]
        );
        sink.clear();
        assert!(writer.notices().is_empty());
    }

    #[test]
    fn simulated_dispenser_blocks_for_each_pulse() {
        let mut dispenser = SimulatedDispenser::new(2, Duration::from_millis(5));
        let started = std::time::Instant::now();
        dispenser.vend();
        assert!(started.elapsed() >= Duration::from_millis(10));
    }
}
