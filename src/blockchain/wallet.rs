//! Operator key management and transaction signing.
//!
//! # Security
//! - The secret is loaded ONLY from the environment
//! - Keys are never logged or serialized; `Debug` shows the public key only

use solana_sdk::{
    hash::Hash,
    message::Message,
    pubkey::Pubkey,
    signature::{Keypair, Signer},
    signer::SeedDerivable,
    transaction::Transaction,
};

use crate::blockchain::types::OperatorError;

/// Environment variable name for the operator secret.
pub const PRIVATE_KEY_ENV_VAR: &str = "ADMIN_PRIVATE_KEY";

/// The server-custodied account that pays for and signs every withdrawal.
pub struct Operator {
    keypair: Keypair,
}

impl Operator {
    /// Decode an operator secret.
    ///
    /// Accepts either a JSON byte array (`[12,34,...]`, as written by
    /// `solana-keygen`) or a base58 string. Both may hold a full 64-byte
    /// keypair or a 32-byte seed.
    pub fn from_secret(secret: &str) -> Result<Self, OperatorError> {
        let secret = secret.trim();
        if secret.is_empty() {
            return Err(OperatorError::InvalidKey("empty secret".to_string()));
        }

        let bytes = if secret.starts_with('[') {
            serde_json::from_str::<Vec<u8>>(secret)
                .map_err(|e| OperatorError::InvalidKey(format!("bad byte array: {}", e)))?
        } else {
            bs58::decode(secret)
                .into_vec()
                .map_err(|e| OperatorError::InvalidKey(format!("bad base58: {}", e)))?
        };

        let keypair = match bytes.len() {
            64 => Keypair::try_from(bytes.as_slice())
                .map_err(|e| OperatorError::InvalidKey(e.to_string()))?,
            32 => Keypair::from_seed(&bytes)
                .map_err(|e| OperatorError::InvalidKey(e.to_string()))?,
            n => {
                return Err(OperatorError::InvalidKey(format!(
                    "expected 32 or 64 bytes, got {}",
                    n
                )))
            }
        };

        tracing::info!(operator = %keypair.pubkey(), "Operator key loaded");

        Ok(Self { keypair })
    }

    /// Load the operator from `ADMIN_PRIVATE_KEY`.
    pub fn from_env() -> Result<Self, OperatorError> {
        let secret = std::env::var(PRIVATE_KEY_ENV_VAR)
            .map_err(|_| OperatorError::Missing(PRIVATE_KEY_ENV_VAR))?;
        Self::from_secret(&secret)
    }

    /// The operator's account address.
    pub fn pubkey(&self) -> Pubkey {
        self.keypair.pubkey()
    }

    /// Sign `message` against `recent_blockhash`. The operator must be the
    /// only required signer.
    pub fn sign(&self, message: Message, recent_blockhash: Hash) -> Result<Transaction, OperatorError> {
        let mut transaction = Transaction::new_unsigned(message);
        transaction
            .try_sign(&[&self.keypair], recent_blockhash)
            .map_err(|e| OperatorError::Signing(e.to_string()))?;
        Ok(transaction)
    }
}

impl std::fmt::Debug for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Operator")
            .field("pubkey", &self.keypair.pubkey())
            .finish()
    }
}
