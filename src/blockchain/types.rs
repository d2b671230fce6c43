//! Chain-specific types and error definitions.

use thiserror::Error;

/// Decimal precision of the native coin (lamports per SOL = 10^9).
pub const NATIVE_DECIMALS: u8 = 9;

/// Errors that can occur while talking to the ledger.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// RPC connection or request failed.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// RPC request timed out.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),

    /// The network rejected the transaction or confirmation failed.
    #[error("Transaction submission failed: {0}")]
    Submission(String),

    /// Transaction was not confirmed within the configured time.
    #[error("Transaction not confirmed within {0} seconds")]
    ConfirmationTimeout(u64),
}

/// Result type for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Errors raised while loading or using the operator key.
#[derive(Debug, Error)]
pub enum OperatorError {
    /// Secret missing from the environment.
    #[error("Environment variable {0} not set")]
    Missing(&'static str),

    /// Secret could not be decoded into a keypair.
    #[error("Invalid private key format: {0}")]
    InvalidKey(String),

    /// Signing the transaction failed.
    #[error("Signing failed: {0}")]
    Signing(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LedgerError::Timeout(10);
        assert_eq!(err.to_string(), "RPC timeout after 10 seconds");

        let err = LedgerError::ConfirmationTimeout(60);
        assert!(err.to_string().contains("60 seconds"));

        let err = OperatorError::Missing("ADMIN_PRIVATE_KEY");
        assert_eq!(
            err.to_string(),
            "Environment variable ADMIN_PRIVATE_KEY not set"
        );
    }
}
