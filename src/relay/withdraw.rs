//! The withdraw pipeline.
//!
//! ```text
//! validate → resolve asset & accounts → plan → sign → [balance check] → submit & confirm
//! ```
//!
//! Every step either succeeds or ends the request; nothing is retried.
//! Concurrent withdrawals are not serialized: two requests may fetch the same
//! blockhash and race on the operator's account state.

use std::str::FromStr;
use std::sync::Arc;

use serde::Serialize;
use solana_sdk::{pubkey::Pubkey, signature::Signature};

use crate::blockchain::client::LedgerClient;
use crate::blockchain::token::{self, TOKEN_ACCOUNT_LEN};
use crate::blockchain::transaction::TransferPlan;
use crate::blockchain::types::NATIVE_DECIMALS;
use crate::blockchain::wallet::Operator;
use crate::config::AssetConfig;
use crate::observability::metrics;
use crate::relay::error::{RelayError, RelayResult};
use crate::relay::request::{ValidatedWithdraw, WithdrawRequest};

/// What the relay moves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetMode {
    /// Native SOL, 9 decimals.
    Native,
    /// An SPL token. Decimals come from the mint account, or from
    /// `decimals_fallback` when the mint cannot be read.
    Token {
        mint: Pubkey,
        decimals_fallback: Option<u8>,
    },
}

impl AssetMode {
    /// Token mode if a mint is configured, native otherwise.
    pub fn from_config(config: &AssetConfig) -> RelayResult<Self> {
        match &config.mint {
            None => Ok(AssetMode::Native),
            Some(mint) => {
                let mint = Pubkey::from_str(mint)
                    .map_err(|e| RelayError::Resolution(format!("invalid mint '{}': {}", mint, e)))?;
                Ok(AssetMode::Token {
                    mint,
                    decimals_fallback: config.decimals_fallback,
                })
            }
        }
    }

    /// Metrics / log label.
    pub fn label(&self) -> &'static str {
        match self {
            AssetMode::Native => "native",
            AssetMode::Token { .. } => "token",
        }
    }

    pub fn mint(&self) -> Option<Pubkey> {
        match self {
            AssetMode::Native => None,
            AssetMode::Token { mint, .. } => Some(*mint),
        }
    }
}

/// Static facts about a relay, for `/health`.
#[derive(Debug, Clone, Serialize)]
pub struct RelayInfo {
    pub operator: String,
    pub mode: &'static str,
    pub mint: Option<String>,
}

/// Moves funds from the operator account to caller-specified destinations.
pub struct TransferRelay {
    operator: Operator,
    ledger: Arc<dyn LedgerClient>,
    mode: AssetMode,
    preflight_balance_check: bool,
}

impl TransferRelay {
    pub fn new(
        operator: Operator,
        ledger: Arc<dyn LedgerClient>,
        mode: AssetMode,
        preflight_balance_check: bool,
    ) -> Self {
        tracing::info!(
            operator = %operator.pubkey(),
            mode = mode.label(),
            mint = ?mode.mint(),
            preflight_balance_check,
            "Transfer relay ready"
        );

        Self {
            operator,
            ledger,
            mode,
            preflight_balance_check,
        }
    }

    pub fn mode(&self) -> &AssetMode {
        &self.mode
    }

    pub fn describe(&self) -> RelayInfo {
        RelayInfo {
            operator: self.operator.pubkey().to_string(),
            mode: self.mode.label(),
            mint: self.mode.mint().map(|m| m.to_string()),
        }
    }

    /// True if the ledger answers its health check.
    pub async fn ledger_reachable(&self) -> bool {
        self.ledger.is_healthy().await
    }

    /// Execute one withdrawal and return the confirmed transaction signature.
    ///
    /// Validation failures return before any network call.
    pub async fn withdraw(&self, request: &WithdrawRequest) -> RelayResult<Signature> {
        let order = request.validate()?;

        let plan = match &self.mode {
            AssetMode::Native => {
                let lamports = order.amount.to_base_units(NATIVE_DECIMALS)?;
                TransferPlan::native(&self.operator.pubkey(), &order.destination, lamports)
            }
            AssetMode::Token {
                mint,
                decimals_fallback,
            } => self.plan_token_transfer(&order, mint, *decimals_fallback).await?,
        };

        let payer = self.operator.pubkey();
        let blockhash = self.ledger.get_latest_blockhash().await?;
        let message = plan.message(&payer, &blockhash);

        if self.preflight_balance_check {
            self.check_balance(&message, &plan).await?;
        }

        let transaction = self.operator.sign(message, blockhash)?;

        tracing::info!(
            destination = %order.destination,
            amount = %order.amount,
            base_units = plan.base_units,
            created_accounts = plan.created_accounts,
            "Submitting withdrawal"
        );

        let signature = self.ledger.send_and_confirm_transaction(&transaction).await?;

        if plan.created_accounts > 0 {
            metrics::record_token_accounts_created(plan.created_accounts);
        }

        Ok(signature)
    }

    async fn plan_token_transfer(
        &self,
        order: &ValidatedWithdraw,
        mint: &Pubkey,
        decimals_fallback: Option<u8>,
    ) -> RelayResult<TransferPlan> {
        let decimals = self.resolve_decimals(mint, decimals_fallback).await?;
        let amount = order.amount.to_base_units(decimals)?;

        let operator = self.operator.pubkey();
        let mut missing_owners = Vec::new();
        for owner in [operator, order.destination] {
            if missing_owners.contains(&owner) {
                continue;
            }
            let ata = token::associated_account(&owner, mint);
            if self.ledger.get_account(&ata).await?.is_none() {
                tracing::info!(owner = %owner, token_account = %ata, "Token account missing; will create");
                missing_owners.push(owner);
            }
        }

        Ok(TransferPlan::token(
            &operator,
            &order.destination,
            mint,
            &missing_owners,
            amount,
            decimals,
        )?)
    }

    async fn resolve_decimals(&self, mint: &Pubkey, fallback: Option<u8>) -> RelayResult<u8> {
        let failure = match self.ledger.get_account(mint).await {
            Ok(Some(account)) => match token::mint_decimals(mint, &account) {
                Ok(decimals) => return Ok(decimals),
                Err(e @ token::TokenError::UnsupportedProgram { .. }) => return Err(e.into()),
                Err(e) => e.to_string(),
            },
            Ok(None) => format!("mint account {} not found", mint),
            Err(e) => e.to_string(),
        };

        match fallback {
            Some(decimals) => {
                tracing::warn!(mint = %mint, error = %failure, decimals, "Using fallback decimals");
                Ok(decimals)
            }
            None => Err(RelayError::Resolution(failure)),
        }
    }

    async fn check_balance(
        &self,
        message: &solana_sdk::message::Message,
        plan: &TransferPlan,
    ) -> RelayResult<()> {
        let fee = self.ledger.get_fee_for_message(message).await?;
        let rent = if plan.created_accounts > 0 {
            self.ledger
                .get_minimum_balance_for_rent_exemption(TOKEN_ACCOUNT_LEN)
                .await?
                .saturating_mul(plan.created_accounts)
        } else {
            0
        };
        let required = fee.saturating_add(rent).saturating_add(plan.native_lamports);
        let available = self.ledger.get_balance(&self.operator.pubkey()).await?;

        if available < required {
            tracing::warn!(required, available, "Operator balance too low");
            return Err(RelayError::InsufficientBalance {
                required,
                available,
            });
        }
        Ok(())
    }
}

impl std::fmt::Debug for TransferRelay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransferRelay")
            .field("operator", &self.operator)
            .field("mode", &self.mode)
            .field("preflight_balance_check", &self.preflight_balance_check)
            .finish()
    }
}
