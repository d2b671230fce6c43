//! Ledger RPC client with timeout and error handling.
//!
//! # Responsibilities
//! - Connect to the Solana JSON-RPC endpoint
//! - Query chain state (balances, accounts, blockhash, fees, rent)
//! - Submit a signed transaction and wait for confirmation
//! - Handle timeouts and network errors without panicking

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use solana_client::{client_error::ClientError, nonblocking::rpc_client::RpcClient};
use solana_sdk::{
    account::Account, commitment_config::CommitmentConfig, hash::Hash, message::Message,
    pubkey::Pubkey, signature::Signature, transaction::Transaction,
};
use tokio::time::timeout;

use crate::blockchain::types::{LedgerError, LedgerResult};
use crate::config::LedgerConfig;

/// Operations the relay needs from the network.
///
/// Every network round-trip of a withdrawal goes through this trait, which is
/// what the tests substitute.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Balance in lamports.
    async fn get_balance(&self, pubkey: &Pubkey) -> LedgerResult<u64>;

    /// Account data, or `None` if the account does not exist.
    async fn get_account(&self, pubkey: &Pubkey) -> LedgerResult<Option<Account>>;

    /// A fresh recent blockhash.
    async fn get_latest_blockhash(&self) -> LedgerResult<Hash>;

    /// Fee in lamports the network would charge for `message`.
    async fn get_fee_for_message(&self, message: &Message) -> LedgerResult<u64>;

    /// Lamports needed to make an account of `data_len` bytes rent exempt.
    async fn get_minimum_balance_for_rent_exemption(&self, data_len: usize) -> LedgerResult<u64>;

    /// Submit and block until confirmed at the configured commitment.
    async fn send_and_confirm_transaction(&self, transaction: &Transaction) -> LedgerResult<Signature>;

    /// True if the RPC node answers its health check.
    async fn is_healthy(&self) -> bool;
}

/// `LedgerClient` backed by the nonblocking Solana RPC client.
pub struct SolanaLedger {
    client: RpcClient,
    config: LedgerConfig,
    rpc_timeout: Duration,
    confirm_timeout: Duration,
}

impl SolanaLedger {
    /// Create a client for `config.rpc_url`. No request is made here.
    pub fn new(config: &LedgerConfig) -> Self {
        let rpc_timeout = Duration::from_secs(config.rpc_timeout_secs);
        let commitment: CommitmentConfig = config.commitment.into();
        let client = RpcClient::new_with_timeout_and_commitment(
            config.rpc_url.clone(),
            rpc_timeout,
            commitment,
        );

        tracing::info!(
            rpc_url = %config.rpc_url,
            commitment = ?config.commitment,
            "Ledger client initialized"
        );

        Self {
            client,
            config: config.clone(),
            rpc_timeout,
            confirm_timeout: Duration::from_secs(config.confirm_timeout_secs),
        }
    }

    /// Run one RPC call under the request timeout.
    async fn call<T, F>(&self, method: &'static str, fut: F) -> LedgerResult<T>
    where
        F: Future<Output = Result<T, ClientError>> + Send,
    {
        match timeout(self.rpc_timeout, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => {
                tracing::warn!(method, error = %e, "RPC error");
                Err(LedgerError::Rpc(e.to_string()))
            }
            Err(_) => {
                tracing::warn!(method, "RPC timeout");
                Err(LedgerError::Timeout(self.config.rpc_timeout_secs))
            }
        }
    }

    /// Get the configuration.
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }
}

#[async_trait]
impl LedgerClient for SolanaLedger {
    async fn get_balance(&self, pubkey: &Pubkey) -> LedgerResult<u64> {
        self.call("getBalance", self.client.get_balance(pubkey)).await
    }

    async fn get_account(&self, pubkey: &Pubkey) -> LedgerResult<Option<Account>> {
        let commitment = self.client.commitment();
        self.call("getAccountInfo", async move {
            self.client
                .get_account_with_commitment(pubkey, commitment)
                .await
                .map(|response| response.value)
        })
        .await
    }

    async fn get_latest_blockhash(&self) -> LedgerResult<Hash> {
        self.call("getLatestBlockhash", self.client.get_latest_blockhash())
            .await
    }

    async fn get_fee_for_message(&self, message: &Message) -> LedgerResult<u64> {
        self.call("getFeeForMessage", self.client.get_fee_for_message(message))
            .await
    }

    async fn get_minimum_balance_for_rent_exemption(&self, data_len: usize) -> LedgerResult<u64> {
        self.call(
            "getMinimumBalanceForRentExemption",
            self.client.get_minimum_balance_for_rent_exemption(data_len),
        )
        .await
    }

    async fn send_and_confirm_transaction(&self, transaction: &Transaction) -> LedgerResult<Signature> {
        match timeout(
            self.confirm_timeout,
            self.client.send_and_confirm_transaction(transaction),
        )
        .await
        {
            Ok(Ok(signature)) => Ok(signature),
            Ok(Err(e)) => Err(LedgerError::Submission(e.to_string())),
            Err(_) => Err(LedgerError::ConfirmationTimeout(
                self.config.confirm_timeout_secs,
            )),
        }
    }

    async fn is_healthy(&self) -> bool {
        self.call("getHealth", self.client.get_health()).await.is_ok()
    }
}

impl std::fmt::Debug for SolanaLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SolanaLedger")
            .field("rpc_url", &self.config.rpc_url)
            .field("commitment", &self.config.commitment)
            .field("rpc_timeout_secs", &self.config.rpc_timeout_secs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unreachable_config() -> LedgerConfig {
        LedgerConfig {
            // Nothing listens on port 1.
            rpc_url: "http://127.0.0.1:1".to_string(),
            rpc_timeout_secs: 5,
            confirm_timeout_secs: 5,
            ..LedgerConfig::default()
        }
    }

    #[tokio::test]
    async fn test_unreachable_rpc_is_an_error() {
        let ledger = SolanaLedger::new(&unreachable_config());

        let err = ledger.get_latest_blockhash().await.unwrap_err();
        assert!(matches!(err, LedgerError::Rpc(_) | LedgerError::Timeout(_)));
    }

    #[tokio::test]
    async fn test_unreachable_rpc_is_unhealthy() {
        let ledger = SolanaLedger::new(&unreachable_config());
        assert!(!ledger.is_healthy().await);
    }

    #[test]
    fn test_debug_output() {
        let ledger = SolanaLedger::new(&unreachable_config());
        let debug = format!("{:?}", ledger);
        assert!(debug.contains("127.0.0.1:1"));
        assert_eq!(ledger.config().rpc_timeout_secs, 5);
    }
}
