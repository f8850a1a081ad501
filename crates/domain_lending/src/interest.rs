//! Interest calculations
//!
//! Two interest methods are supported, selected per loan product:
//!
//! - **Flat**: interest is computed once on the original principal for the
//!   full term, independent of the declining balance.
//! - **Reducing balance (EMI)**: interest accrues each period on the
//!   remaining balance; the installment is constant and the
//!   principal/interest split varies period to period.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{calc, Money};

use crate::error::LendingError;
use crate::frequency::RepaymentFrequency;

/// Interest method for a loan product
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterestMethod {
    Flat,
    ReducingBalance,
}

/// Result of a flat-rate interest calculation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlatInterestTerms {
    pub principal: Money,
    pub monthly_rate: Decimal,
    pub months: u32,
    /// Number of installments derived from the repayment frequency
    pub num_installments: u32,
    pub total_interest: Money,
    pub total_repayment: Money,
    /// Per-installment amount, rounded up so installments cover the total
    pub installment: Money,
}

/// Result of a reducing-balance (EMI) interest calculation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReducingBalanceTerms {
    pub principal: Money,
    pub monthly_rate: Decimal,
    pub months: u32,
    pub emi: Money,
    pub total_repayment: Money,
    pub total_interest: Money,
}

fn check_inputs(principal: Money, monthly_rate: Decimal, months: u32) -> Result<(), LendingError> {
    if months == 0 {
        return Err(LendingError::InvalidTerm { months });
    }
    if monthly_rate < Decimal::ZERO {
        return Err(LendingError::NegativeRate { rate: monthly_rate });
    }
    if principal.is_negative() {
        return Err(LendingError::InvalidPrincipal {
            principal: principal.amount(),
        });
    }
    Ok(())
}

/// Calculates flat-rate interest for a loan
///
/// `total_interest = round(principal × monthly_rate × months)`. The
/// per-installment amount is rounded **up** so the sum of installments is
/// guaranteed to cover the total repayment; the positive residue is absorbed
/// by the final repayment's outstanding-balance reduction, which the ledger
/// tracks separately.
///
/// # Errors
///
/// Fails fast on a zero-month term or a negative rate.
pub fn calculate_flat_interest(
    principal: Money,
    monthly_rate: Decimal,
    months: u32,
    frequency: RepaymentFrequency,
) -> Result<FlatInterestTerms, LendingError> {
    check_inputs(principal, monthly_rate, months)?;

    let currency = principal.currency();
    let total_interest = Money::new(
        principal.amount() * monthly_rate * Decimal::from(months),
        currency,
    );
    let total_repayment = principal.checked_add(&total_interest)?;

    let num_installments = frequency.installments(months);
    let installment = Money::new(
        calc::round_money_up(total_repayment.amount() / Decimal::from(num_installments)),
        currency,
    );

    Ok(FlatInterestTerms {
        principal,
        monthly_rate,
        months,
        num_installments,
        total_interest,
        total_repayment,
        installment,
    })
}

/// Calculates the Equal Monthly Installment for a reducing-balance loan
///
/// `EMI = round(P × r × (1+r)^n / ((1+r)^n − 1))` when `r > 0`. A zero rate
/// degenerates to an even split of the principal over the term.
///
/// # Errors
///
/// Fails fast on a zero-month term or a negative rate.
pub fn calculate_emi(
    principal: Money,
    monthly_rate: Decimal,
    months: u32,
) -> Result<Money, LendingError> {
    check_inputs(principal, monthly_rate, months)?;

    if monthly_rate.is_zero() {
        return Ok(principal.safe_divide(
            Decimal::from(months),
            Money::zero(principal.currency()),
        ));
    }

    let factor = compound_factor(monthly_rate, months);
    let emi = principal.amount() * monthly_rate * factor / (factor - Decimal::ONE);

    Ok(Money::new(emi, principal.currency()))
}

/// Calculates reducing-balance interest totals for a loan
///
/// Total repayment is `EMI × months`; total interest is the excess over the
/// principal. The per-period split lives in the amortization schedule.
pub fn calculate_reducing_balance_interest(
    principal: Money,
    monthly_rate: Decimal,
    months: u32,
) -> Result<ReducingBalanceTerms, LendingError> {
    let emi = calculate_emi(principal, monthly_rate, months)?;
    let total_repayment = emi.multiply(Decimal::from(months));
    let total_interest = total_repayment.checked_sub(&principal)?;

    Ok(ReducingBalanceTerms {
        principal,
        monthly_rate,
        months,
        emi,
        total_repayment,
        total_interest,
    })
}

/// Computes `(1 + rate)^periods` by repeated multiplication
///
/// Tenors are bounded (a 30-year monthly loan is 360 periods), so the naive
/// product keeps full decimal precision without overflow.
fn compound_factor(rate: Decimal, periods: u32) -> Decimal {
    let base = Decimal::ONE + rate;
    (0..periods).fold(Decimal::ONE, |acc, _| acc * base)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_flat_interest_reference_case() {
        // 10,000 at 3.5%/month for 6 months
        let terms = calculate_flat_interest(
            Money::naira(dec!(10000)),
            dec!(0.035),
            6,
            RepaymentFrequency::Monthly,
        )
        .unwrap();

        assert_eq!(terms.total_interest.amount(), dec!(2100.00));
        assert_eq!(terms.total_repayment.amount(), dec!(12100.00));
        assert_eq!(terms.installment.amount(), dec!(2016.67));
        assert_eq!(terms.num_installments, 6);
    }

    #[test]
    fn test_flat_installments_cover_total() {
        let terms = calculate_flat_interest(
            Money::naira(dec!(10000)),
            dec!(0.035),
            6,
            RepaymentFrequency::Weekly,
        )
        .unwrap();

        assert_eq!(terms.num_installments, 24);
        let covered = terms.installment.amount() * Decimal::from(terms.num_installments);
        assert!(covered >= terms.total_repayment.amount());
    }

    #[test]
    fn test_emi_formula() {
        // 120,000 at 3%/month over 12 months
        let emi = calculate_emi(Money::naira(dec!(120000)), dec!(0.03), 12).unwrap();
        assert_eq!(emi.amount(), dec!(12055.45));
    }

    #[test]
    fn test_emi_zero_rate_divides_evenly() {
        let emi = calculate_emi(Money::naira(dec!(12000)), dec!(0), 12).unwrap();
        assert_eq!(emi.amount(), dec!(1000.00));
    }

    #[test]
    fn test_reducing_balance_totals() {
        let terms =
            calculate_reducing_balance_interest(Money::naira(dec!(120000)), dec!(0.03), 12)
                .unwrap();

        assert_eq!(terms.emi.amount(), dec!(12055.45));
        assert_eq!(terms.total_repayment.amount(), dec!(144665.40));
        assert_eq!(terms.total_interest.amount(), dec!(24665.40));
    }

    #[test]
    fn test_zero_months_fails_fast() {
        let result = calculate_emi(Money::naira(dec!(1000)), dec!(0.03), 0);
        assert!(matches!(result, Err(LendingError::InvalidTerm { months: 0 })));
    }

    #[test]
    fn test_negative_rate_fails_fast() {
        let result = calculate_flat_interest(
            Money::naira(dec!(1000)),
            dec!(-0.01),
            6,
            RepaymentFrequency::Monthly,
        );
        assert!(matches!(result, Err(LendingError::NegativeRate { .. })));
    }
}
