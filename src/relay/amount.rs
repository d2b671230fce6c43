//! Human-readable amounts and their conversion to base units.
//!
//! Amounts are handled as decimal text end to end, so `0.1` SOL is exactly
//! `100_000_000` lamports and never `99_999_999`.

use thiserror::Error;

/// `u64::MAX` has 20 digits; anything longer cannot fit.
const MAX_BASE_UNIT_DIGITS: usize = 20;

/// Reasons an amount is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    #[error("amount is empty")]
    Empty,

    #[error("'{0}' is not a decimal number")]
    Malformed(String),

    #[error("amount must be positive")]
    Negative,

    #[error("amount must be greater than zero")]
    Zero,

    #[error("amount has more than {0} decimal places")]
    PrecisionLoss(u8),

    #[error("amount exceeds the maximum transferable value")]
    Overflow,
}

/// A strictly positive decimal number: `digits × 10^-scale`.
///
/// `digits` has no leading or trailing zeros.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecimalAmount {
    digits: String,
    scale: i64,
}

impl DecimalAmount {
    /// Parse decimal text such as `1`, `0.25`, `+3.`, `.5`, `1e-3`, `2.5E2`.
    pub fn parse(text: &str) -> Result<Self, AmountError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(AmountError::Empty);
        }
        let malformed = || AmountError::Malformed(text.to_string());

        let unsigned = match text.as_bytes()[0] {
            b'-' => return Err(AmountError::Negative),
            b'+' => &text[1..],
            _ => text,
        };

        let (mantissa, exponent) = match unsigned.find(['e', 'E']) {
            Some(pos) => {
                let exponent: i64 = unsigned[pos + 1..].parse().map_err(|_| malformed())?;
                (&unsigned[..pos], exponent)
            }
            None => (unsigned, 0),
        };
        // Keeps the scale arithmetic below far away from overflow.
        if exponent.abs() > 1_000 {
            return if exponent > 0 {
                Err(AmountError::Overflow)
            } else {
                Err(AmountError::PrecisionLoss(0))
            };
        }

        let (int_part, frac_part) = mantissa.split_once('.').unwrap_or((mantissa, ""));
        let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
        if (int_part.is_empty() && frac_part.is_empty())
            || !all_digits(int_part)
            || !all_digits(frac_part)
        {
            return Err(malformed());
        }

        let combined = format!("{}{}", int_part, frac_part);
        let significant = combined.trim_start_matches('0');
        if significant.is_empty() {
            return Err(AmountError::Zero);
        }
        let digits = significant.trim_end_matches('0');
        let trailing_zeros = (significant.len() - digits.len()) as i64;

        Ok(Self {
            digits: digits.to_string(),
            scale: frac_part.len() as i64 - exponent - trailing_zeros,
        })
    }

    /// Scale by `10^decimals` and return the integer base-unit amount.
    ///
    /// Fails if the result would need fractional base units or does not fit
    /// in a `u64`.
    pub fn to_base_units(&self, decimals: u8) -> Result<u64, AmountError> {
        let shift = i64::from(decimals) - self.scale;
        if shift < 0 {
            return Err(AmountError::PrecisionLoss(decimals));
        }
        if self.digits.len() as i64 + shift > MAX_BASE_UNIT_DIGITS as i64 {
            return Err(AmountError::Overflow);
        }

        let text = format!("{}{}", self.digits, "0".repeat(shift as usize));
        text.parse::<u64>().map_err(|_| AmountError::Overflow)
    }
}

impl std::fmt::Display for DecimalAmount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.scale <= 0 {
            return write!(f, "{}{}", self.digits, "0".repeat(self.scale.unsigned_abs() as usize));
        }
        let scale = self.scale as usize;
        if self.digits.len() > scale {
            let (int_part, frac_part) = self.digits.split_at(self.digits.len() - scale);
            write!(f, "{}.{}", int_part, frac_part)
        } else {
            write!(f, "0.{}{}", "0".repeat(scale - self.digits.len()), self.digits)
        }
    }
}
