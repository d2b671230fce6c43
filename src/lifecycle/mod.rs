//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Shutdown::trigger
//!
//! Shutdown (shutdown.rs):
//!     trigger → every subscriber's recv() completes
//!             → server stops accepting, drains in-flight withdrawals, exits
//! ```
//!
//! # Design Decisions
//! - Startup is linear in `main`: config, logging, operator key, ledger, server
//! - A missing or malformed operator key is fatal before the listener binds

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
pub use signals::wait_for_signal;
