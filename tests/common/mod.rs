//! Shared utilities for integration tests: an in-memory ledger and app builders.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use solana_sdk::{
    account::Account,
    hash::Hash,
    message::Message,
    pubkey::Pubkey,
    signature::{Keypair, Signature, Signer},
    transaction::Transaction,
};
use spl_token::solana_program::{program_option::COption, program_pack::Pack};
use spl_token::state::Mint;

use transfer_relay::blockchain::{LedgerClient, LedgerError, LedgerResult, Operator};
use transfer_relay::config::RelayConfig;
use transfer_relay::{AssetMode, HttpServer, TransferRelay};

pub const FEE_LAMPORTS: u64 = 5_000;
pub const RENT_LAMPORTS: u64 = 2_039_280;

/// Ledger kept in memory. Every submission is recorded and "confirmed"
/// unless a failure has been injected.
#[derive(Default)]
pub struct FakeLedger {
    balances: Mutex<HashMap<Pubkey, u64>>,
    accounts: Mutex<HashMap<Pubkey, Account>>,
    submitted: Mutex<Vec<Transaction>>,
    submit_failure: Mutex<Option<String>>,
    confirm_delay: Mutex<Option<Duration>>,
}

impl FakeLedger {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_balance(&self, pubkey: Pubkey, lamports: u64) {
        self.balances.lock().unwrap().insert(pubkey, lamports);
    }

    pub fn insert_account(&self, pubkey: Pubkey, account: Account) {
        self.accounts.lock().unwrap().insert(pubkey, account);
    }

    pub fn fail_submissions(&self, message: &str) {
        *self.submit_failure.lock().unwrap() = Some(message.to_string());
    }

    /// Accept submissions immediately but wait `delay` before confirming.
    pub fn delay_confirmations(&self, delay: Duration) {
        *self.confirm_delay.lock().unwrap() = Some(delay);
    }

    pub fn submitted(&self) -> Vec<Transaction> {
        self.submitted.lock().unwrap().clone()
    }
}

#[async_trait]
impl LedgerClient for FakeLedger {
    async fn get_balance(&self, pubkey: &Pubkey) -> LedgerResult<u64> {
        Ok(self.balances.lock().unwrap().get(pubkey).copied().unwrap_or(0))
    }

    async fn get_account(&self, pubkey: &Pubkey) -> LedgerResult<Option<Account>> {
        Ok(self.accounts.lock().unwrap().get(pubkey).cloned())
    }

    async fn get_latest_blockhash(&self) -> LedgerResult<Hash> {
        Ok(Hash::new_unique())
    }

    async fn get_fee_for_message(&self, _message: &Message) -> LedgerResult<u64> {
        Ok(FEE_LAMPORTS)
    }

    async fn get_minimum_balance_for_rent_exemption(&self, _data_len: usize) -> LedgerResult<u64> {
        Ok(RENT_LAMPORTS)
    }

    async fn send_and_confirm_transaction(&self, transaction: &Transaction) -> LedgerResult<Signature> {
        if let Some(message) = self.submit_failure.lock().unwrap().clone() {
            return Err(LedgerError::Submission(message));
        }
        self.submitted.lock().unwrap().push(transaction.clone());

        let delay = *self.confirm_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        Ok(transaction.signatures[0])
    }

    async fn is_healthy(&self) -> bool {
        true
    }
}

/// A fresh operator together with the keypair it was decoded from.
pub fn operator() -> (Keypair, Operator) {
    let keypair = Keypair::new();
    let secret = bs58::encode(keypair.to_bytes()).into_string();
    let operator = Operator::from_secret(&secret).unwrap();
    (keypair, operator)
}

/// An initialized SPL mint account with the given precision.
pub fn mint_account(decimals: u8) -> Account {
    let mut data = vec![0u8; Mint::LEN];
    Mint::pack(
        Mint {
            mint_authority: COption::None,
            supply: 1_000_000_000_000,
            decimals,
            is_initialized: true,
            freeze_authority: COption::None,
        },
        &mut data,
    )
    .unwrap();

    Account {
        lamports: 1_461_600,
        data,
        owner: spl_token::id(),
        executable: false,
        rent_epoch: 0,
    }
}

/// Any existing account; the relay only checks that token accounts exist.
pub fn token_account() -> Account {
    Account {
        lamports: RENT_LAMPORTS,
        data: vec![0u8; spl_token::state::Account::LEN],
        owner: spl_token::id(),
        executable: false,
        rent_epoch: 0,
    }
}

/// Router wired to `ledger`, returning the operator's public key too.
pub fn build_app(config: RelayConfig, ledger: Arc<FakeLedger>) -> (Pubkey, Router) {
    let (keypair, operator) = operator();
    let mode = AssetMode::from_config(&config.asset).unwrap();
    let relay = Arc::new(TransferRelay::new(
        operator,
        ledger,
        mode,
        config.withdraw.preflight_balance_check,
    ));
    let server = HttpServer::new(config, relay);
    (keypair.pubkey(), server.router())
}
