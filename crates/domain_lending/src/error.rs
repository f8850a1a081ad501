//! Lending domain errors

use rust_decimal::Decimal;
use thiserror::Error;

use core_kernel::MoneyError;

/// Errors that can occur in interest and schedule calculations
///
/// These are caller contract violations: the calculator fails fast rather
/// than silently clamping bad input.
#[derive(Debug, Error)]
pub enum LendingError {
    /// Loan term must be a positive number of months
    #[error("Invalid loan term: months must be positive, got {months}")]
    InvalidTerm { months: u32 },

    /// Interest rates cannot be negative
    #[error("Negative interest rate: {rate}")]
    NegativeRate { rate: Decimal },

    /// Principal cannot be negative
    #[error("Invalid principal: {principal}")]
    InvalidPrincipal { principal: Decimal },

    /// Money arithmetic error
    #[error(transparent)]
    Money(#[from] MoneyError),
}
