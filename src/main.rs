//! Custodial transfer relay.
//!
//! Accepts `POST /withdraw {to, amount}` and sends native SOL or a configured
//! SPL token from the operator account, replying once the transfer is confirmed.
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌──────────────────────────────────────────────────┐
//!                        │                 TRANSFER RELAY                    │
//!                        │                                                   │
//!   POST /withdraw       │  ┌─────────┐    ┌──────────┐    ┌─────────────┐  │
//!   ─────────────────────┼─▶│  http   │───▶│  relay   │───▶│ blockchain  │──┼──▶ Solana RPC
//!                        │  │ server  │    │ withdraw │    │ plan + sign │  │
//!   {success, tx|error}  │  └─────────┘    └──────────┘    └─────────────┘  │
//!   ◀────────────────────┼──────┘                                           │
//!                        │  ┌─────────────────────────────────────────────┐ │
//!                        │  │ config · observability · lifecycle · net    │ │
//!                        │  └─────────────────────────────────────────────┘ │
//!                        └──────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use transfer_relay::blockchain::{Operator, SolanaLedger};
use transfer_relay::config::load_config;
use transfer_relay::lifecycle::{wait_for_signal, Shutdown};
use transfer_relay::observability::{logging, metrics};
use transfer_relay::{AssetMode, HttpServer, TransferRelay};

#[derive(Parser, Debug)]
#[command(name = "transfer-relay", version, about = "Custodial SOL / SPL token transfer relay")]
struct Args {
    /// Optional TOML config file; environment variables override it.
    #[arg(short, long, env = "RELAY_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // .env is optional; real environment variables win.
    let _ = dotenv::dotenv();
    let args = Args::parse();

    let config = load_config(args.config.as_deref())?;
    logging::init_logging(&config.observability);

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "transfer-relay starting");
    tracing::info!(
        bind_address = %config.listener.bind_address(),
        rpc_url = %config.ledger.rpc_url,
        mint = ?config.asset.mint,
        "Configuration loaded"
    );

    let operator = Operator::from_env().map_err(|e| {
        tracing::error!(error = %e, "Operator key unavailable");
        e
    })?;
    let ledger = Arc::new(SolanaLedger::new(&config.ledger));
    let mode = AssetMode::from_config(&config.asset)?;
    let relay = Arc::new(TransferRelay::new(
        operator,
        ledger,
        mode,
        config.withdraw.preflight_balance_check,
    ));

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let tls = config.listener.tls.clone();
    let bind_address = config.listener.bind_address();
    let server = HttpServer::new(config, relay);

    tokio::spawn(async move {
        wait_for_signal().await;
        shutdown.trigger();
    });

    match tls {
        Some(tls) => server.run_tls(&tls, server_shutdown).await?,
        None => {
            let listener = TcpListener::bind(&bind_address).await?;
            tracing::info!(address = %listener.local_addr()?, "Listening for connections");
            server.run(listener, server_shutdown).await?;
        }
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
