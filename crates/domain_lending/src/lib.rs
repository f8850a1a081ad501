//! Lending Domain - Interest and Amortization
//!
//! This crate computes loan interest and repayment schedules for the
//! microfinance core. Two methods are supported, selected per loan product:
//!
//! - **Flat rate**: interest on the original principal for the full term,
//!   with the installment rounded up so the term always covers the total.
//! - **Reducing balance (EMI)**: a constant installment whose
//!   principal/interest split shifts as the balance declines, with the
//!   terminal installment corrected so the schedule amortizes exactly.
//!
//! All calculations are pure functions over [`core_kernel::Money`] and are
//! safe to call concurrently.
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_lending::{calculate_flat_interest, RepaymentFrequency};
//!
//! let terms = calculate_flat_interest(principal, monthly_rate, months, RepaymentFrequency::Monthly)?;
//! println!("installment: {}", terms.installment);
//! ```

pub mod error;
pub mod frequency;
pub mod interest;
pub mod schedule;

pub use error::LendingError;
pub use frequency::RepaymentFrequency;
pub use interest::{
    calculate_emi, calculate_flat_interest, calculate_reducing_balance_interest,
    FlatInterestTerms, InterestMethod, ReducingBalanceTerms,
};
pub use schedule::{add_months, generate_amortization_schedule, AmortizationEntry};
