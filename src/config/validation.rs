//! Configuration validation.
//!
//! Semantic checks run after serde has parsed the file and the environment
//! overrides have been applied. All problems are collected, not just the first.

use std::net::SocketAddr;
use std::str::FromStr;

use solana_sdk::pubkey::Pubkey;

use crate::config::schema::RelayConfig;

/// Largest decimal precision whose scale factor still fits in a `u64`.
pub const MAX_DECIMALS: u8 = 19;

/// Most RPC round-trips one withdrawal can make before submission: mint
/// lookup, two token-account lookups, blockhash, then fee, rent and balance
/// for the preflight check.
pub const MAX_RPC_CALLS_PER_WITHDRAWAL: u64 = 7;

/// Longest a withdrawal can legitimately take given the ledger timeouts.
pub fn worst_case_withdraw_secs(config: &RelayConfig) -> u64 {
    config
        .ledger
        .rpc_timeout_secs
        .saturating_mul(MAX_RPC_CALLS_PER_WITHDRAWAL)
        .saturating_add(config.ledger.confirm_timeout_secs)
}

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a fully assembled configuration.
pub fn validate_config(config: &RelayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.port == 0 {
        errors.push(ValidationError::new("listener.port", "must be non-zero"));
    }
    if let Some(tls) = &config.listener.tls {
        if tls.cert_path.is_empty() || tls.key_path.is_empty() {
            errors.push(ValidationError::new(
                "listener.tls",
                "cert_path and key_path are both required",
            ));
        }
    }

    if let Err(e) = url::Url::parse(&config.ledger.rpc_url) {
        errors.push(ValidationError::new(
            "ledger.rpc_url",
            format!("invalid URL '{}': {}", config.ledger.rpc_url, e),
        ));
    }
    if config.ledger.rpc_timeout_secs == 0 {
        errors.push(ValidationError::new("ledger.rpc_timeout_secs", "must be > 0"));
    }
    if config.ledger.confirm_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "ledger.confirm_timeout_secs",
            "must be > 0",
        ));
    }

    if let Some(mint) = &config.asset.mint {
        if let Err(e) = Pubkey::from_str(mint) {
            errors.push(ValidationError::new(
                "asset.mint",
                format!("invalid mint address '{}': {}", mint, e),
            ));
        }
    }
    if let Some(decimals) = config.asset.decimals_fallback {
        if decimals > MAX_DECIMALS {
            errors.push(ValidationError::new(
                "asset.decimals_fallback",
                format!("must be <= {}", MAX_DECIMALS),
            ));
        }
    }

    if config.withdraw.max_body_bytes == 0 {
        errors.push(ValidationError::new("withdraw.max_body_bytes", "must be > 0"));
    }
    let worst_case = worst_case_withdraw_secs(config);
    if config.withdraw.request_timeout_secs <= worst_case {
        errors.push(ValidationError::new(
            "withdraw.request_timeout_secs",
            format!(
                "must exceed {}s ({} RPC calls x ledger.rpc_timeout_secs + ledger.confirm_timeout_secs)",
                worst_case, MAX_RPC_CALLS_PER_WITHDRAWAL
            ),
        ));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!(
                "invalid socket address '{}'",
                config.observability.metrics_address
            ),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
