use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::constants::CURRENCY_LABEL;
use crate::errors::{Result, ValidationError};

/// Savings progress in whole percent, capped at 100.
///
/// A zero or negative target counts as no progress.
pub fn progress_percent(current: Decimal, target: Decimal) -> u32 {
    if target <= Decimal::ZERO || current <= Decimal::ZERO {
        return 0;
    }
    let percent = (current / target * Decimal::ONE_HUNDRED).round();
    percent.to_u32().unwrap_or(100).min(100)
}

/// Parses a user-typed amount. Empty input is a missing field.
pub fn parse_amount(raw: &str) -> Result<Decimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingField("Amount".into()).into());
    }
    let amount: Decimal = trimmed
        .parse()
        .map_err(|_| ValidationError::InvalidAmount(trimmed.to_string()))?;
    Ok(amount)
}

/// Parses an amount that must be strictly positive.
pub fn parse_positive_amount(raw: &str) -> Result<Decimal> {
    let amount = parse_amount(raw)?;
    if amount <= Decimal::ZERO {
        return Err(ValidationError::InvalidAmount(format!(
            "{} must be greater than zero",
            amount
        ))
        .into());
    }
    Ok(amount)
}

/// Formats an amount with the currency label, e.g. `Ksh.1500.00`.
pub fn format_amount(amount: Decimal) -> String {
    format!("{}{}", CURRENCY_LABEL, amount.round_dp(2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn progress_is_capped() {
        assert_eq!(progress_percent(dec!(250), dec!(1000)), 25);
        assert_eq!(progress_percent(dec!(1500), dec!(1000)), 100);
        assert_eq!(progress_percent(dec!(1), dec!(3)), 33);
        assert_eq!(progress_percent(dec!(100), dec!(0)), 0);
    }

    #[test]
    fn amounts_are_validated() {
        assert_eq!(parse_amount(" 12.50 ").unwrap(), dec!(12.50));
        assert!(matches!(
            parse_amount(""),
            Err(crate::Error::Validation(ValidationError::MissingField(_)))
        ));
        assert!(parse_amount("abc").is_err());
        assert!(parse_positive_amount("0").is_err());
        assert!(parse_positive_amount("-3").is_err());
        assert_eq!(parse_positive_amount("0.01").unwrap(), dec!(0.01));
    }

    #[test]
    fn formats_with_currency_label() {
        assert_eq!(format_amount(dec!(1500)), "Ksh.1500");
        assert_eq!(format_amount(dec!(12.345)), "Ksh.12.34");
    }
}
