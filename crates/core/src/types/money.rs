//! Money amounts entered through dashboard forms.
//!
//! Prices and discounts arrive as free-form strings ("1 500", "99,90").
//! They are converted to [`Decimal`] before being sent to the API.

use std::str::FromStr;

use rust_decimal::Decimal;

/// Errors that can occur when parsing an amount.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AmountError {
    /// The input string is empty.
    #[error("amount cannot be empty")]
    Empty,
    /// The input is not a number.
    #[error("amount must be a number: {0}")]
    NotANumber(String),
    /// The amount is below zero.
    #[error("amount cannot be negative")]
    Negative,
    /// The amount has a fractional part where whole units are required.
    #[error("amount must be a whole number")]
    Fractional,
}

/// Parse a form-entered amount into a decimal.
///
/// Whitespace anywhere in the input is ignored so thousand separators work,
/// and a comma is accepted as the decimal separator.
///
/// # Errors
///
/// Returns [`AmountError`] if the input is empty, not numeric, or negative.
pub fn parse_amount(input: &str) -> Result<Decimal, AmountError> {
    let normalized: String = input
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    if normalized.is_empty() {
        return Err(AmountError::Empty);
    }

    let amount = Decimal::from_str(&normalized)
        .map_err(|_| AmountError::NotANumber(input.trim().to_string()))?;

    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(AmountError::Negative);
    }

    Ok(amount.normalize())
}

/// Parse a form-entered amount that must be a whole number of currency units.
///
/// # Errors
///
/// Returns [`AmountError::Fractional`] for amounts with a fractional part,
/// plus every error [`parse_amount`] can return.
pub fn parse_whole_amount(input: &str) -> Result<Decimal, AmountError> {
    let amount = parse_amount(input)?;
    if amount.fract().is_zero() {
        Ok(amount)
    } else {
        Err(AmountError::Fractional)
    }
}
