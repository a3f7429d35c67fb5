//! Console front end: reads one event id per line from stdin.
//!
//! `menu` lists the catalog, `state` prints a JSON snapshot, `exit` or EOF
//! quits. Set `COINOP_CONFIG` to load a config file and `RUST_LOG` to
//! change verbosity.
//!
//! The machine runs inside the vending service, which ticks it every
//! `tick_interval_ms`. Change is paid out and idle credit refunded on that
//! tick, whether or not anything is typed.

use coinop::catalog::{format_cents, Catalog};
use coinop::config::{ConfigError, MachineConfig};
use coinop::service::{self, ServiceError};
use coinop::{MachineError, VendingMachine};
use std::io;
use std::process::ExitCode;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinError;
use tracing::{error, info};

#[derive(Debug, Error)]
enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Machine(#[from] MachineError),

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("Vending service task failed: {0}")]
    Join(#[from] JoinError),

    #[error("Failed to read input: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to render snapshot: {0}")]
    Json(#[from] serde_json::Error),
}

fn setup_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_timer(tracing_subscriber::fmt::time::uptime())
        .compact()
        .init();
}

fn print_menu(catalog: &Catalog) {
    println!("COINS:");
    for coin in catalog.coins() {
        println!("  {:<10} {}", coin.id, coin.label);
    }
    println!("PRODUCTS:");
    for product in catalog.products() {
        println!("  {:<10} {}", product.id, format_cents(product.price));
    }
    println!("CONTROL:\n  RETURN");
}

async fn run() -> Result<(), AppError> {
    let config = MachineConfig::from_env()?;
    let machine = VendingMachine::builder()
        .config(&config)
        .dispenser(config.simulated_dispenser())
        .build()?;

    info!(
        coins = config.catalog.coins().len(),
        products = config.catalog.products().len(),
        idle_timeout = ?config.idle_timeout(),
        "Vending machine ready"
    );
    print_menu(&config.catalog);

    let (client, handle) = service::spawn(machine, Some(config.tick_interval()));
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    let result = async {
        while let Some(line) = lines.next_line().await? {
            match line.trim() {
                "" => continue,
                "exit" => break,
                "menu" => print_menu(&config.catalog),
                "state" => {
                    let snapshot = client.snapshot().await?;
                    println!("{}", serde_json::to_string_pretty(&snapshot)?);
                }
                event => {
                    client.dispatch(event).await?;
                }
            }
        }
        Ok::<(), AppError>(())
    }
    .await;

    client.shutdown().await?;
    let machine = handle.await?;
    info!(state = ?machine.state(), "Vending service stopped");
    result
}

#[tokio::main]
async fn main() -> ExitCode {
    setup_tracing();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Vending machine halted");
            ExitCode::FAILURE
        }
    }
}
