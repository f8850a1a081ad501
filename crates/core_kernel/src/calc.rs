//! Rounding policy and money calculation helpers
//!
//! Every monetary computation in the system routes through these functions
//! so that rounding behaves identically everywhere: half-up to 2 places
//! unless a caller explicitly asks for something else. The one deliberate
//! exception is [`round_money_up`], used for flat-rate installments where
//! the sum of installments must cover the total repayment.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

use crate::money::{Currency, MoneyError};

/// Standard monetary scale: 2 decimal places
pub const MONEY_SCALE: u32 = 2;

/// Rounds an amount half-up to the given number of decimal places
pub fn round_to(amount: Decimal, places: u32) -> Decimal {
    amount.round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds an amount half-up to the standard monetary scale
pub fn round_money(amount: Decimal) -> Decimal {
    round_to(amount, MONEY_SCALE)
}

/// Rounds an amount up (away from zero) to the standard monetary scale
///
/// Used for installment amounts so that `installment × n` never falls short
/// of the total being amortized.
pub fn round_money_up(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::AwayFromZero)
}

/// Calculates a percentage of an amount, rounded to the monetary scale
///
/// # Example
///
/// ```rust
/// use core_kernel::calc::percentage;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(percentage(dec!(10000), dec!(0.035)), dec!(350.00));
/// ```
pub fn percentage(amount: Decimal, rate: Decimal) -> Decimal {
    round_money(amount * rate)
}

/// Division that returns `default` when the denominator is zero
///
/// The ledger never raises divide-by-zero; callers supply the fallback
/// that makes sense for their computation (usually zero).
pub fn safe_divide(numerator: Decimal, denominator: Decimal, default: Decimal) -> Decimal {
    if denominator.is_zero() {
        return default;
    }
    round_money(numerator / denominator)
}

/// Sums a sequence of optional amounts, treating missing values as zero
pub fn sum_amounts<I>(amounts: I) -> Decimal
where
    I: IntoIterator<Item = Option<Decimal>>,
{
    round_money(amounts.into_iter().flatten().sum())
}

/// Validates that an amount is non-negative and within an optional range
///
/// # Errors
///
/// Returns `MoneyError::OutOfRange` describing the violated bound.
pub fn validate_amount(
    amount: Decimal,
    min: Option<Decimal>,
    max: Option<Decimal>,
) -> Result<(), MoneyError> {
    if amount < dec!(0) {
        return Err(MoneyError::OutOfRange(
            "amount cannot be negative".to_string(),
        ));
    }

    if let Some(min) = min {
        if amount < min {
            return Err(MoneyError::OutOfRange(format!(
                "amount must be at least {}",
                min
            )));
        }
    }

    if let Some(max) = max {
        if amount > max {
            return Err(MoneyError::OutOfRange(format!(
                "amount cannot exceed {}",
                max
            )));
        }
    }

    Ok(())
}

/// Formats an amount as a currency string with thousands separators
///
/// # Example
///
/// ```rust
/// use core_kernel::calc::format_currency;
/// use core_kernel::Currency;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(format_currency(dec!(1234567.89), Currency::NGN), "₦1,234,567.89");
/// ```
pub fn format_currency(amount: Decimal, currency: Currency) -> String {
    let places = currency.decimal_places() as usize;
    let rounded = round_to(amount, currency.decimal_places());
    let formatted = format!("{:.*}", places, rounded.abs());

    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };

    match frac_part {
        Some(frac) => format!("{}{}{}.{}", sign, currency.symbol(), grouped, frac),
        None => format!("{}{}{}", sign, currency.symbol(), grouped),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_money_half_up() {
        assert_eq!(round_money(dec!(123.456)), dec!(123.46));
        assert_eq!(round_money(dec!(123.454)), dec!(123.45));
        assert_eq!(round_money(dec!(123.455)), dec!(123.46));
        assert_eq!(round_money(dec!(0.005)), dec!(0.01));
    }

    #[test]
    fn test_round_money_up() {
        assert_eq!(round_money_up(dec!(100.001)), dec!(100.01));
        assert_eq!(round_money_up(dec!(100.0100)), dec!(100.01));
        assert_eq!(round_money_up(dec!(2016.666666)), dec!(2016.67));
    }

    #[test]
    fn test_percentage() {
        assert_eq!(percentage(dec!(10000), dec!(0.035)), dec!(350.00));
        assert_eq!(percentage(dec!(0), dec!(0.035)), dec!(0.00));
    }

    #[test]
    fn test_safe_divide() {
        assert_eq!(safe_divide(dec!(100), dec!(3), dec!(0)), dec!(33.33));
        assert_eq!(safe_divide(dec!(100), dec!(0), dec!(0)), dec!(0));
        assert_eq!(safe_divide(dec!(100), dec!(0), dec!(-1)), dec!(-1));
    }

    #[test]
    fn test_sum_amounts_treats_none_as_zero() {
        let total = sum_amounts([Some(dec!(10.50)), None, Some(dec!(4.50))]);
        assert_eq!(total, dec!(15.00));
        assert_eq!(sum_amounts([None, None]), dec!(0.00));
    }

    #[test]
    fn test_validate_amount() {
        assert!(validate_amount(dec!(50), Some(dec!(10)), Some(dec!(100))).is_ok());
        assert!(validate_amount(dec!(-1), None, None).is_err());
        assert!(validate_amount(dec!(5), Some(dec!(10)), None).is_err());
        assert!(validate_amount(dec!(500), None, Some(dec!(100))).is_err());
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(dec!(1234567.89), Currency::NGN), "₦1,234,567.89");
        assert_eq!(format_currency(dec!(0), Currency::NGN), "₦0.00");
        assert_eq!(format_currency(dec!(-950.5), Currency::NGN), "-₦950.50");
        assert_eq!(format_currency(dec!(100), Currency::XOF), "CFA100");
    }
}
