//! Core Kernel - Foundational types and utilities for the microfinance ledger
//!
//! This crate provides the fundamental building blocks used across all domain
//! modules:
//! - Money types with precise decimal arithmetic and the system rounding policy
//! - Strongly-typed identifiers
//! - Entity lifecycle (soft-deactivation) tracking

pub mod calc;
pub mod error;
pub mod identifiers;
pub mod lifecycle;
pub mod money;

pub use error::CoreError;
pub use identifiers::{
    BranchId, ClientId, GlAccountId, GroupId, JournalEntryId, JournalLineId, LoanId,
    SavingsAccountId, StaffId, TransactionId,
};
pub use lifecycle::Lifecycle;
pub use money::{Currency, Money, MoneyError};
