//! Journal entry and line types
//!
//! A journal entry is a balanced set of debit/credit lines recording one
//! business event. Line amounts are strongly typed: a line is either a
//! debit or a credit of a positive amount, never both and never neither.
//! Once an entry is posted its lines are immutable; the only way to offset
//! it is a compensating reversal entry.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use core_kernel::{
    BranchId, ClientId, Currency, GlAccountId, JournalEntryId, JournalLineId, LoanId, Money,
    SavingsAccountId, StaffId, TransactionId,
};

/// Business event tag carried by every journal entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryType {
    LoanDisbursement,
    LoanRepayment,
    SavingsDeposit,
    SavingsWithdrawal,
    FeeCollection,
    Manual,
    Reversal,
}

impl EntryType {
    /// Returns the stable string tag used in storage and reporting
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryType::LoanDisbursement => "loan_disbursement",
            EntryType::LoanRepayment => "loan_repayment",
            EntryType::SavingsDeposit => "savings_deposit",
            EntryType::SavingsWithdrawal => "savings_withdrawal",
            EntryType::FeeCollection => "fee_collection",
            EntryType::Manual => "manual",
            EntryType::Reversal => "reversal",
        }
    }

    /// System-generated entries bypass the manual-entry account restriction
    pub fn is_system_generated(&self) -> bool {
        !matches!(self, EntryType::Manual)
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Journal entry state machine: draft → posted → reversed (terminal)
///
/// A draft that is rejected or abandoned is simply discarded; discarding is
/// not a ledger state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryStatus {
    Draft,
    Posted,
    Reversed,
}

impl EntryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryStatus::Draft => "draft",
            EntryStatus::Posted => "posted",
            EntryStatus::Reversed => "reversed",
        }
    }
}

impl fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A line amount: exactly one of debit or credit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineAmount {
    Debit(Money),
    Credit(Money),
}

impl LineAmount {
    /// Returns the monetary value regardless of side
    pub fn value(&self) -> Money {
        match self {
            LineAmount::Debit(m) | LineAmount::Credit(m) => *m,
        }
    }

    pub fn is_debit(&self) -> bool {
        matches!(self, LineAmount::Debit(_))
    }
}

/// Caller-facing specification of one journal line
///
/// The engine resolves the account code against the chart of accounts and
/// validates the amount before anything is recorded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineSpec {
    pub account_code: String,
    pub amount: LineAmount,
    pub description: Option<String>,
    /// Optional client reference for sub-ledger drill-down
    pub client: Option<ClientId>,
}

impl LineSpec {
    /// Creates a debit line spec
    pub fn debit(account_code: impl Into<String>, amount: Money) -> Self {
        Self {
            account_code: account_code.into(),
            amount: LineAmount::Debit(amount),
            description: None,
            client: None,
        }
    }

    /// Creates a credit line spec
    pub fn credit(account_code: impl Into<String>, amount: Money) -> Self {
        Self {
            account_code: account_code.into(),
            amount: LineAmount::Credit(amount),
            description: None,
            client: None,
        }
    }

    /// Adds a line description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Attaches a client reference
    pub fn for_client(mut self, client: ClientId) -> Self {
        self.client = Some(client);
        self
    }
}

/// A persisted journal entry line
///
/// Exactly one of `debit_amount`/`credit_amount` is positive; the other is
/// zero. Lines belong to exactly one entry and are never mutated after the
/// entry is posted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalLine {
    pub id: JournalLineId,
    pub account_id: GlAccountId,
    pub gl_code: String,
    pub debit_amount: Money,
    pub credit_amount: Money,
    pub description: String,
    pub client: Option<ClientId>,
}

impl JournalLine {
    /// Returns the signed movement for a debit-normal account
    pub fn debit_normal_movement(&self) -> Decimal {
        self.debit_amount.amount() - self.credit_amount.amount()
    }

    /// Returns the signed movement for a credit-normal account
    pub fn credit_normal_movement(&self) -> Decimal {
        self.credit_amount.amount() - self.debit_amount.amount()
    }
}

/// A journal entry: header plus its lines
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: JournalEntryId,
    /// Sequential, unique: JE-YYYYMMDD-NNNNNN
    pub journal_number: String,
    pub entry_type: EntryType,
    pub status: EntryStatus,
    pub transaction_date: NaiveDate,
    /// Set when the entry is posted (locked)
    pub posting_date: Option<NaiveDate>,
    pub branch: BranchId,
    pub description: String,
    /// External reference supplied by the caller (also the idempotency key)
    pub reference_number: Option<String>,
    /// Source transaction, when system-generated
    pub transaction: Option<TransactionId>,
    pub loan: Option<LoanId>,
    pub savings_account: Option<SavingsAccountId>,
    pub created_by: StaffId,
    pub created_at: DateTime<Utc>,
    pub posted_by: Option<StaffId>,
    pub posted_at: Option<DateTime<Utc>>,
    /// For reversal entries: the entry being reversed
    pub reversal_of: Option<JournalEntryId>,
    pub lines: Vec<JournalLine>,
}

impl JournalEntry {
    /// Sums the debit amounts across all lines
    pub fn total_debits(&self) -> Decimal {
        self.lines.iter().map(|l| l.debit_amount.amount()).sum()
    }

    /// Sums the credit amounts across all lines
    pub fn total_credits(&self) -> Decimal {
        self.lines.iter().map(|l| l.credit_amount.amount()).sum()
    }

    /// Exact decimal equality of debit and credit totals - no epsilon
    pub fn is_balanced(&self) -> bool {
        self.total_debits() == self.total_credits()
    }

    /// The entry currency, taken from its first line
    pub fn currency(&self) -> Currency {
        self.lines
            .first()
            .map(|l| l.debit_amount.currency())
            .unwrap_or_default()
    }
}

impl fmt::Display for JournalEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.journal_number, self.transaction_date)
    }
}

/// Input for creating a journal entry
///
/// Built incrementally, then handed to the engine which validates and
/// records it as one atomic operation.
#[derive(Debug, Clone)]
pub struct EntryDraft {
    pub entry_type: EntryType,
    pub transaction_date: NaiveDate,
    pub branch: BranchId,
    pub description: String,
    pub created_by: StaffId,
    pub reference_number: Option<String>,
    pub transaction: Option<TransactionId>,
    pub loan: Option<LoanId>,
    pub savings_account: Option<SavingsAccountId>,
    pub reversal_of: Option<JournalEntryId>,
    pub lines: Vec<LineSpec>,
    pub auto_post: bool,
}

impl EntryDraft {
    /// Creates a draft; system-generated entry types auto-post by default,
    /// manual entries await approval
    pub fn new(
        entry_type: EntryType,
        transaction_date: NaiveDate,
        branch: BranchId,
        description: impl Into<String>,
        created_by: StaffId,
    ) -> Self {
        Self {
            entry_type,
            transaction_date,
            branch,
            description: description.into(),
            created_by,
            reference_number: None,
            transaction: None,
            loan: None,
            savings_account: None,
            reversal_of: None,
            lines: Vec::new(),
            auto_post: entry_type.is_system_generated(),
        }
    }

    /// Adds a line
    pub fn line(mut self, spec: LineSpec) -> Self {
        self.lines.push(spec);
        self
    }

    /// Sets the external reference number
    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference_number = Some(reference.into());
        self
    }

    /// Links the originating business transaction
    pub fn for_transaction(mut self, transaction: TransactionId) -> Self {
        self.transaction = Some(transaction);
        self
    }

    /// Links the originating loan
    pub fn for_loan(mut self, loan: LoanId) -> Self {
        self.loan = Some(loan);
        self
    }

    /// Links the originating savings account
    pub fn for_savings(mut self, savings: SavingsAccountId) -> Self {
        self.savings_account = Some(savings);
        self
    }

    /// Overrides the auto-post behavior
    pub fn auto_post(mut self, auto_post: bool) -> Self {
        self.auto_post = auto_post;
        self
    }
}
