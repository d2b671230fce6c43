//! Errors a withdrawal can end with.

use thiserror::Error;

use crate::blockchain::token::TokenError;
use crate::blockchain::types::{LedgerError, OperatorError};
use crate::relay::amount::AmountError;

/// Failure of a withdrawal at any step of the pipeline.
#[derive(Debug, Error)]
pub enum RelayError {
    /// `to` or `amount` absent or empty.
    #[error("Missing fields")]
    MissingFields,

    #[error("Invalid destination address: {0}")]
    InvalidDestination(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(#[from] AmountError),

    /// Asset metadata or token accounts could not be resolved.
    #[error("Asset resolution failed: {0}")]
    Resolution(String),

    #[error("Insufficient operator balance: required {required} lamports, available {available}")]
    InsufficientBalance { required: u64, available: u64 },

    #[error(transparent)]
    Operator(#[from] OperatorError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

impl RelayError {
    /// True for problems with the caller's input, as opposed to failures
    /// on the relay or network side.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            RelayError::MissingFields
                | RelayError::InvalidDestination(_)
                | RelayError::InvalidAmount(_)
        )
    }

    /// Short label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            RelayError::MissingFields
            | RelayError::InvalidDestination(_)
            | RelayError::InvalidAmount(_) => "validation",
            RelayError::Resolution(_) => "resolution",
            RelayError::InsufficientBalance { .. } => "insufficient_balance",
            RelayError::Operator(_) => "signing",
            RelayError::Ledger(LedgerError::ConfirmationTimeout(_)) => "confirmation_timeout",
            RelayError::Ledger(LedgerError::Submission(_)) => "submission",
            RelayError::Ledger(_) => "rpc",
        }
    }
}

impl From<TokenError> for RelayError {
    fn from(err: TokenError) -> Self {
        RelayError::Resolution(err.to_string())
    }
}

/// Result type for relay operations.
pub type RelayResult<T> = Result<T, RelayError>;
