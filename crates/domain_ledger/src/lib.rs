//! Ledger Domain - Double-Entry Journal Engine
//!
//! This crate implements the accounting core of the microfinance system:
//! a strict double-entry ledger in which every business event (loan
//! disbursement, repayment, savings deposit/withdrawal, fee collection)
//! becomes a balanced journal entry over a typed chart of accounts.
//!
//! # Double-Entry Principles
//!
//! - Debits increase asset/expense accounts
//! - Credits increase liability/equity/income accounts
//! - The sum of all debits must equal the sum of all credits, exactly
//! - Posted entries are immutable; only a compensating reversal offsets them
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_ledger::{JournalEngine, posting};
//!
//! let mut engine = JournalEngine::with_standard_chart();
//! let entry = posting::post_loan_disbursement(&mut engine, &loan, disbursed_by)?;
//! assert!(entry.is_balanced());
//! ```

pub mod chart;
pub mod engine;
pub mod entry;
pub mod error;
pub mod posting;
pub mod reports;

pub use chart::{
    AccountCategory, AccountType, ChartOfAccounts, FeeType, GlAccount, NormalBalance,
    SavingsProductType, CASH_IN_HAND, INTEREST_INCOME_LOANS, LOAN_RECEIVABLE_PRINCIPAL,
};
pub use engine::JournalEngine;
pub use entry::{
    EntryDraft, EntryStatus, EntryType, JournalEntry, JournalLine, LineAmount, LineSpec,
};
pub use error::LedgerError;
pub use posting::{LoanFacts, SavingsFacts};
pub use reports::{
    balance_sheet, general_ledger, profit_and_loss, trial_balance, BalanceSheet, GeneralLedger,
    ProfitAndLoss, TrialBalance,
};
