//! Transfer relay: one operation, "withdraw from the operator account to a
//! caller-specified destination".
//!
//! # Data Flow
//! ```text
//! WithdrawRequest (request.rs)
//!     → validation: fields present, address parses, amount positive (amount.rs)
//!     → TransferRelay::withdraw (withdraw.rs)
//!     → Signature | RelayError (error.rs)
//! ```

pub mod amount;
pub mod error;
pub mod request;
pub mod withdraw;

pub use amount::{AmountError, DecimalAmount};
pub use error::{RelayError, RelayResult};
pub use request::{AmountInput, WithdrawRequest};
pub use withdraw::{AssetMode, RelayInfo, TransferRelay};
