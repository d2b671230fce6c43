//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! Environment variable (operator secret)
//!     → wallet.rs (key decoding, signing)
//! LedgerConfig (RPC URL, commitment, timeouts)
//!     → client.rs (RPC reads, submit + confirm)
//! token.rs + transaction.rs
//!     → instructions for one withdrawal
//! ```
//!
//! # Security Constraints
//! - Operator secret ONLY from the environment
//! - Never log private keys
//! - All RPC calls have configurable timeouts

pub mod client;
pub mod token;
pub mod transaction;
pub mod types;
pub mod wallet;

pub use client::{LedgerClient, SolanaLedger};
pub use transaction::TransferPlan;
pub use types::{LedgerError, LedgerResult, OperatorError, NATIVE_DECIMALS};
pub use wallet::Operator;
