//! Inbound withdraw request and its validation.

use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize};
use solana_sdk::pubkey::Pubkey;

use crate::relay::amount::DecimalAmount;
use crate::relay::error::RelayError;

/// Amount as sent by the caller: a JSON number or numeric string.
///
/// Numbers keep the literal the caller wrote (serde_json is built with
/// `arbitrary_precision`), so no digit is lost to an `f64` on the way in.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AmountInput {
    Number(serde_json::Number),
    Text(String),
}

impl<'de> Deserialize<'de> for AmountInput {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match serde_json::Value::deserialize(deserializer)? {
            serde_json::Value::Number(n) => Ok(AmountInput::Number(n)),
            serde_json::Value::String(s) => Ok(AmountInput::Text(s)),
            other => Err(de::Error::custom(format!(
                "amount must be a number or numeric string, got {}",
                other
            ))),
        }
    }
}

impl AmountInput {
    /// The decimal text of the amount.
    pub fn as_text(&self) -> String {
        match self {
            AmountInput::Number(n) => n.to_string(),
            AmountInput::Text(s) => s.trim().to_string(),
        }
    }
}

impl From<u64> for AmountInput {
    fn from(value: u64) -> Self {
        AmountInput::Number(value.into())
    }
}

impl From<&str> for AmountInput {
    fn from(value: &str) -> Self {
        AmountInput::Text(value.to_string())
    }
}

/// Body of `POST /withdraw`: `{ "to": "<address>", "amount": <number> }`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct WithdrawRequest {
    pub to: Option<String>,
    pub amount: Option<AmountInput>,
}

impl WithdrawRequest {
    pub fn new(to: impl Into<String>, amount: impl Into<AmountInput>) -> Self {
        Self {
            to: Some(to.into()),
            amount: Some(amount.into()),
        }
    }

    /// Check presence, address syntax and amount syntax. No network access.
    pub fn validate(&self) -> Result<ValidatedWithdraw, RelayError> {
        let to = self.to.as_deref().map(str::trim).filter(|s| !s.is_empty());
        let amount = self
            .amount
            .as_ref()
            .map(AmountInput::as_text)
            .filter(|s| !s.is_empty());

        let (Some(to), Some(amount)) = (to, amount) else {
            return Err(RelayError::MissingFields);
        };

        let destination =
            Pubkey::from_str(to).map_err(|e| RelayError::InvalidDestination(format!("{} ({})", to, e)))?;
        let amount = DecimalAmount::parse(&amount)?;

        Ok(ValidatedWithdraw {
            destination,
            amount,
        })
    }
}

/// A request that passed local validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedWithdraw {
    pub destination: Pubkey,
    pub amount: DecimalAmount,
}
