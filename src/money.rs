//! Monetary Arithmetic Module
//!
//! All BRL and USDT amounts in the engine are `rust_decimal::Decimal`.
//! This module owns the two quantization rules and the parse/validate
//! helpers; every amount crossing a module boundary MUST be quantized here.
//!
//! ## Design Principles
//! 1. One rounding strategy: bankers' rounding (MidpointNearestEven),
//!    chosen once and applied everywhere a spread or fee product can
//!    exceed the currency scale
//! 2. Explicit Error Handling: no silent truncation of over-precise input
//!
//! ## Scales
//! - BRL amounts carry 2 decimal places (centavos)
//! - USDT amounts carry 6 decimal places

use rust_decimal::prelude::*;
use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

/// Decimal places for BRL amounts
pub const BRL_SCALE: u32 = 2;

/// Decimal places for USDT amounts
pub const USDT_SCALE: u32 = 6;

const ROUNDING: RoundingStrategy = RoundingStrategy::MidpointNearestEven;

/// Money validation/conversion errors
#[derive(Debug, Error, PartialEq)]
pub enum MoneyError {
    #[error("Precision overflow: provided {provided} decimals, max allowed {max}")]
    PrecisionOverflow { provided: u32, max: u32 },

    #[error("Amount must be positive")]
    InvalidAmount,

    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// Quantize a BRL amount to centavos, bankers' rounding.
pub fn quantize_brl(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(BRL_SCALE, ROUNDING)
}

/// Quantize a USDT amount to 6 decimal places, bankers' rounding.
pub fn quantize_usdt(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(USDT_SCALE, ROUNDING)
}

/// Validate an amount arriving from a caller or a rail.
///
/// Rejects non-positive values and values carrying more decimal places
/// than the currency scale allows. Does NOT round: over-precise input is
/// an error, not something to quietly fix.
pub fn validate_amount(amount: Decimal, scale: u32) -> Result<Decimal, MoneyError> {
    if amount <= Decimal::ZERO {
        return Err(MoneyError::InvalidAmount);
    }
    let normalized = amount.normalize();
    if normalized.scale() > scale {
        return Err(MoneyError::PrecisionOverflow {
            provided: normalized.scale(),
            max: scale,
        });
    }
    Ok(normalized)
}

/// Parse a client-provided amount string at the given scale.
pub fn parse_amount(amount_str: &str, scale: u32) -> Result<Decimal, MoneyError> {
    let amount_str = amount_str.trim();
    if amount_str.is_empty() {
        return Err(MoneyError::InvalidFormat("empty string".into()));
    }
    if amount_str.starts_with('+') {
        return Err(MoneyError::InvalidAmount);
    }

    let value =
        Decimal::from_str(amount_str).map_err(|e| MoneyError::InvalidFormat(e.to_string()))?;

    validate_amount(value, scale)
}

/// Parse a BRL amount string (2 decimal places max).
pub fn parse_brl(amount_str: &str) -> Result<Decimal, MoneyError> {
    parse_amount(amount_str, BRL_SCALE)
}

/// Parse a USDT amount string (6 decimal places max).
pub fn parse_usdt(amount_str: &str) -> Result<Decimal, MoneyError> {
    parse_amount(amount_str, USDT_SCALE)
}

/// Format a BRL amount for display, always 2 decimal places.
pub fn format_brl(amount: Decimal) -> String {
    format!("{:.2}", quantize_brl(amount))
}

/// Format a USDT amount for display, always 6 decimal places.
pub fn format_usdt(amount: Decimal) -> String {
    format!("{:.6}", quantize_usdt(amount))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn quantize_brl_uses_bankers_rounding() {
        // Midpoints round to the even neighbor
        assert_eq!(quantize_brl(dec("0.125")), dec("0.12"));
        assert_eq!(quantize_brl(dec("0.135")), dec("0.14"));
        assert_eq!(quantize_brl(dec("49.505")), dec("49.50"));
        assert_eq!(quantize_brl(dec("49.515")), dec("49.52"));
        // Non-midpoints round normally
        assert_eq!(quantize_brl(dec("10.991")), dec("10.99"));
        assert_eq!(quantize_brl(dec("10.999")), dec("11.00"));
    }

    #[test]
    fn quantize_usdt_scale() {
        assert_eq!(quantize_usdt(dec("1.2345675")), dec("1.234568"));
        assert_eq!(quantize_usdt(dec("1.2345665")), dec("1.234566"));
        assert_eq!(quantize_usdt(dec("50")), dec("50"));
    }

    #[test]
    fn parse_amount_accepts_valid() {
        assert_eq!(parse_brl("50.00").unwrap(), dec("50.00"));
        assert_eq!(parse_brl("10").unwrap(), dec("10"));
        assert_eq!(parse_usdt("49.123456").unwrap(), dec("49.123456"));
    }

    #[test]
    fn parse_amount_rejects_over_precision() {
        assert!(matches!(
            parse_brl("50.001"),
            Err(MoneyError::PrecisionOverflow {
                provided: 3,
                max: 2
            })
        ));
        assert!(matches!(
            parse_usdt("1.1234567"),
            Err(MoneyError::PrecisionOverflow {
                provided: 7,
                max: 6
            })
        ));
        // Trailing zeros are not precision
        assert!(parse_brl("50.0000").is_ok());
    }

    #[test]
    fn parse_amount_rejects_non_positive() {
        assert_eq!(parse_brl("0"), Err(MoneyError::InvalidAmount));
        assert_eq!(parse_brl("0.00"), Err(MoneyError::InvalidAmount));
        assert_eq!(parse_brl("-5"), Err(MoneyError::InvalidAmount));
        assert_eq!(parse_brl("+5"), Err(MoneyError::InvalidAmount));
    }

    #[test]
    fn parse_amount_rejects_garbage() {
        assert!(matches!(parse_brl(""), Err(MoneyError::InvalidFormat(_))));
        assert!(matches!(parse_brl("abc"), Err(MoneyError::InvalidFormat(_))));
        assert!(matches!(parse_brl("1,5"), Err(MoneyError::InvalidFormat(_))));
        assert!(matches!(
            parse_brl("1.2.3"),
            Err(MoneyError::InvalidFormat(_))
        ));
    }

    #[test]
    fn format_helpers() {
        assert_eq!(format_brl(dec("50")), "50.00");
        assert_eq!(format_brl(dec("0.5")), "0.50");
        assert_eq!(format_usdt(dec("49.5")), "49.500000");
    }
}
