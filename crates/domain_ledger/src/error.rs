//! Ledger domain errors
//!
//! Every failure carries enough context (account code, computed totals) for
//! the caller to log and retry with corrected input. Nothing is corrected
//! silently, and the engine never retries internally.

use rust_decimal::Decimal;
use thiserror::Error;

use core_kernel::{JournalEntryId, MoneyError};

use crate::entry::EntryStatus;

/// Errors that can occur in the ledger domain
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Caller supplied malformed input (wrong line count, zero amounts, ...)
    #[error("Validation error: {0}")]
    Validation(String),

    /// No active account with this GL code (branch-scoped or global)
    #[error("Account {gl_code} not found")]
    AccountNotFound { gl_code: String },

    /// The account exists but has been deactivated
    #[error("Account {gl_code} is inactive")]
    AccountInactive { gl_code: String },

    /// Control accounts are aggregate-only and take no direct lines
    #[error("Account {gl_code} is a control account and cannot take direct postings")]
    ControlAccountPosting { gl_code: String },

    /// Manual entries may only target accounts that allow them
    #[error("Account {gl_code} does not allow manual journal entries")]
    ManualPostingNotAllowed { gl_code: String },

    /// Total debits and credits differ; both totals are carried for diagnostics
    #[error("Journal entry not balanced: debits={debits}, credits={credits}")]
    NotBalanced { debits: Decimal, credits: Decimal },

    /// No journal entry with this identifier
    #[error("Journal entry {0} not found")]
    EntryNotFound(JournalEntryId),

    /// The entry is not in a status that permits the attempted operation
    #[error("Cannot {action} a journal entry with status {status}")]
    InvalidStatus {
        action: &'static str,
        status: EntryStatus,
    },

    /// A repayment split must reconcile with the total amount
    #[error(
        "Repayment split does not reconcile: amount={amount}, principal={principal}, interest={interest}"
    )]
    SplitMismatch {
        amount: Decimal,
        principal: Decimal,
        interest: Decimal,
    },

    /// The ledger itself is inconsistent - implies a bug, not bad input
    #[error("Ledger invariant violated: {0}")]
    InvariantViolation(String),

    /// Money arithmetic error
    #[error(transparent)]
    Money(#[from] MoneyError),
}

impl LedgerError {
    pub fn validation(message: impl Into<String>) -> Self {
        LedgerError::Validation(message.into())
    }
}
