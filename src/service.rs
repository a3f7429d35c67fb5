//! Async host for a vending machine.
//!
//! A single task owns the machine and takes requests from a mailbox, so
//! every event is processed to completion before the next one is read.
//! Clients are cheap to clone and can live on any thread.

use crate::engine::DispatchStatus;
use crate::error::MachineError;
use crate::vending::{MachineSnapshot, VendState, VendingMachine};
use chrono::Utc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{interval, Interval, MissedTickBehavior};
use tracing::{debug, error, info};

const MAILBOX_CAPACITY: usize = 32;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Vending service has stopped")]
    Stopped,

    /// An earlier fault stopped the machine; it no longer takes events
    #[error("Vending machine halted: {0}")]
    Halted(MachineError),

    #[error(transparent)]
    Machine(#[from] MachineError),
}

type Reply<T> = oneshot::Sender<Result<T, ServiceError>>;

enum Request {
    Dispatch {
        event: String,
        respond_to: Reply<MachineSnapshot>,
    },
    Tick {
        respond_to: Reply<MachineSnapshot>,
    },
    Snapshot {
        respond_to: oneshot::Sender<MachineSnapshot>,
    },
    Shutdown {
        respond_to: oneshot::Sender<()>,
    },
}

/// Handle for sending events to a running service.
#[derive(Clone, Debug)]
pub struct VendingClient {
    sender: mpsc::Sender<Request>,
}

impl VendingClient {
    async fn call<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<T>) -> Request,
    ) -> Result<T, ServiceError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(make(respond_to))
            .await
            .map_err(|_| ServiceError::Stopped)?;
        response.await.map_err(|_| ServiceError::Stopped)
    }

    /// Deliver one event id and wait until it has been fully processed.
    pub async fn dispatch(
        &self,
        event: impl Into<String>,
    ) -> Result<MachineSnapshot, ServiceError> {
        let event = event.into();
        debug!(%event, "Sending event");
        self.call(|respond_to| Request::Dispatch { event, respond_to }).await?
    }

    pub async fn tick(&self) -> Result<MachineSnapshot, ServiceError> {
        self.call(|respond_to| Request::Tick { respond_to }).await?
    }

    /// Current machine state. Still answered after a halt.
    pub async fn snapshot(&self) -> Result<MachineSnapshot, ServiceError> {
        self.call(|respond_to| Request::Snapshot { respond_to }).await
    }

    /// Stop the service after requests already queued.
    pub async fn shutdown(&self) -> Result<(), ServiceError> {
        self.call(|respond_to| Request::Shutdown { respond_to }).await
    }
}

/// Start the service task.
///
/// With `tick_every` set, the task also ticks the machine on that period
/// and applies the idle timeout. The first machine error halts the
/// service: periodic ticks stop and later events are answered with
/// [`ServiceError::Halted`]. The join handle yields the machine back once
/// the service stops.
pub fn spawn(
    machine: VendingMachine,
    tick_every: Option<Duration>,
) -> (VendingClient, JoinHandle<VendingMachine>) {
    let (sender, receiver) = mpsc::channel(MAILBOX_CAPACITY);
    let handle = tokio::spawn(run(machine, receiver, tick_every));
    (VendingClient { sender }, handle)
}

enum Wake {
    Request(Option<Request>),
    Tick,
}

struct Host {
    machine: VendingMachine,
    fault: Option<MachineError>,
}

async fn run(
    machine: VendingMachine,
    mut receiver: mpsc::Receiver<Request>,
    tick_every: Option<Duration>,
) -> VendingMachine {
    info!(state = ?machine.state(), "Vending service starting");

    let mut host = Host {
        machine,
        fault: None,
    };
    let mut ticker: Option<Interval> = tick_every.map(|period| {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        ticker
    });

    loop {
        let wake = match ticker.as_mut() {
            Some(ticker) if host.fault.is_none() => tokio::select! {
                request = receiver.recv() => Wake::Request(request),
                _ = ticker.tick() => Wake::Tick,
            },
            _ => Wake::Request(receiver.recv().await),
        };

        match wake {
            Wake::Tick => host.periodic(),
            Wake::Request(Some(request)) => {
                if !host.handle(request) {
                    break;
                }
            }
            Wake::Request(None) => break,
        }
    }

    info!(state = ?host.machine.state(), halted = host.fault.is_some(), "Vending service stopped");
    host.machine
}

impl Host {
    /// Run one step against the machine unless it has halted. The first
    /// error is kept and refuses every later step.
    fn step(
        &mut self,
        action: impl FnOnce(&mut VendingMachine) -> Result<DispatchStatus<VendState>, MachineError>,
    ) -> Result<MachineSnapshot, ServiceError> {
        if let Some(fault) = &self.fault {
            return Err(ServiceError::Halted(fault.clone()));
        }

        match action(&mut self.machine) {
            Ok(_) => Ok(self.machine.snapshot()),
            Err(e) => {
                error!(
                    error = %e,
                    state = ?self.machine.state(),
                    change_due = self.machine.change_due(),
                    "Machine fault, vending service halted"
                );
                self.fault = Some(e.clone());
                Err(e.into())
            }
        }
    }

    fn periodic(&mut self) {
        let _ = self.step(|machine| {
            machine.check_idle(Utc::now())?;
            machine.tick()
        });
    }

    /// Returns `false` once the service should stop.
    fn handle(&mut self, request: Request) -> bool {
        match request {
            Request::Dispatch { event, respond_to } => {
                let _ = respond_to.send(self.step(|machine| machine.dispatch(&event)));
            }
            Request::Tick { respond_to } => {
                let _ = respond_to.send(self.step(VendingMachine::tick));
            }
            Request::Snapshot { respond_to } => {
                let _ = respond_to.send(self.machine.snapshot());
            }
            Request::Shutdown { respond_to } => {
                info!("Vending service shutting down");
                let _ = respond_to.send(());
                return false;
            }
        }
        true
    }
}
