//! The journal engine
//!
//! Validates and records balanced journal entries, enforcing the
//! double-entry invariants:
//!
//! - every entry has at least two lines
//! - every line debits or credits an active, postable account
//! - total debits equal total credits, by exact decimal comparison
//! - posted entries are immutable; a compensating reversal is the only
//!   mutation path
//!
//! Validation is all-or-nothing: a draft that fails any check leaves no
//! partial state behind. The engine requires `&mut self` for writes, so a
//! single engine is never mutated concurrently; the persistence layer
//! provides the same guarantee with database transactions.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use std::collections::HashMap;
use tracing::info;

use core_kernel::{JournalEntryId, JournalLineId, Money, StaffId};

use crate::chart::ChartOfAccounts;
use crate::entry::{
    EntryDraft, EntryStatus, EntryType, JournalEntry, JournalLine, LineAmount, LineSpec,
};
use crate::error::LedgerError;

/// In-memory journal engine over a chart of accounts
#[derive(Debug, Default)]
pub struct JournalEngine {
    chart: ChartOfAccounts,
    entries: Vec<JournalEntry>,
    index: HashMap<JournalEntryId, usize>,
    next_sequence: u64,
}

impl JournalEngine {
    /// Creates an engine over the given chart
    pub fn new(chart: ChartOfAccounts) -> Self {
        Self {
            chart,
            entries: Vec::new(),
            index: HashMap::new(),
            next_sequence: 1,
        }
    }

    /// Creates an engine seeded with the standard chart of accounts
    pub fn with_standard_chart() -> Self {
        Self::new(ChartOfAccounts::standard())
    }

    /// Returns the chart of accounts
    pub fn chart(&self) -> &ChartOfAccounts {
        &self.chart
    }

    /// Returns the chart of accounts for maintenance (account upserts,
    /// deactivation)
    pub fn chart_mut(&mut self) -> &mut ChartOfAccounts {
        &mut self.chart
    }

    /// Validates and records a journal entry
    ///
    /// Checks, in order: line count, account resolution (active accounts,
    /// branch-preferring; control accounts take no direct lines; manual
    /// entries only target accounts that allow them), positive one-sided
    /// amounts, a single line currency, and exact debit/credit balance.
    /// Nothing is recorded unless every check passes.
    ///
    /// With `auto_post` (the default for system-generated entries) the
    /// entry is stamped posted immediately; otherwise it stays a draft for
    /// later approval via [`JournalEngine::post`].
    ///
    /// # Errors
    ///
    /// `Validation`, `AccountNotFound`, `AccountInactive`,
    /// `ControlAccountPosting`, `ManualPostingNotAllowed`, or
    /// `NotBalanced` carrying both totals.
    pub fn create_entry(&mut self, draft: EntryDraft) -> Result<&JournalEntry, LedgerError> {
        if draft.lines.len() < 2 {
            return Err(LedgerError::validation(format!(
                "journal entry must have at least 2 lines, got {}",
                draft.lines.len()
            )));
        }

        let lines = self.resolve_lines(&draft)?;

        let debits: Decimal = lines.iter().map(|l| l.debit_amount.amount()).sum();
        let credits: Decimal = lines.iter().map(|l| l.credit_amount.amount()).sum();
        if debits != credits {
            return Err(LedgerError::NotBalanced { debits, credits });
        }

        let now = Utc::now();
        let entry = JournalEntry {
            id: JournalEntryId::new(),
            journal_number: self.next_journal_number(draft.transaction_date),
            entry_type: draft.entry_type,
            status: if draft.auto_post {
                EntryStatus::Posted
            } else {
                EntryStatus::Draft
            },
            transaction_date: draft.transaction_date,
            posting_date: draft.auto_post.then_some(draft.transaction_date),
            branch: draft.branch,
            description: draft.description,
            reference_number: draft.reference_number,
            transaction: draft.transaction,
            loan: draft.loan,
            savings_account: draft.savings_account,
            created_by: draft.created_by,
            created_at: now,
            posted_by: draft.auto_post.then_some(draft.created_by),
            posted_at: draft.auto_post.then_some(now),
            reversal_of: draft.reversal_of,
            lines,
        };

        info!(
            journal_number = %entry.journal_number,
            entry_type = %entry.entry_type,
            status = %entry.status,
            total = %entry.total_debits(),
            "journal entry created"
        );

        let slot = self.entries.len();
        self.index.insert(entry.id, slot);
        self.entries.push(entry);
        Ok(&self.entries[slot])
    }

    /// Posts a draft entry (approval of a manual entry)
    ///
    /// Re-validates balance and line count before locking the entry.
    ///
    /// # Errors
    ///
    /// `InvalidStatus` unless the entry is a draft; `NotBalanced` if the
    /// draft no longer balances.
    pub fn post(
        &mut self,
        id: JournalEntryId,
        posted_by: StaffId,
    ) -> Result<&JournalEntry, LedgerError> {
        let slot = self.slot_of(id)?;
        let entry = &self.entries[slot];

        if entry.status != EntryStatus::Draft {
            return Err(LedgerError::InvalidStatus {
                action: "post",
                status: entry.status,
            });
        }
        if !entry.is_balanced() {
            return Err(LedgerError::NotBalanced {
                debits: entry.total_debits(),
                credits: entry.total_credits(),
            });
        }
        if entry.lines.len() < 2 {
            return Err(LedgerError::validation(
                "journal entry must have at least 2 lines",
            ));
        }

        let now = Utc::now();
        let entry = &mut self.entries[slot];
        entry.status = EntryStatus::Posted;
        entry.posted_by = Some(posted_by);
        entry.posted_at = Some(now);
        entry.posting_date = Some(now.date_naive());

        info!(journal_number = %entry.journal_number, "journal entry posted");
        Ok(&self.entries[slot])
    }

    /// Reverses a posted entry
    ///
    /// Creates a new auto-posted entry with every line's debit and credit
    /// swapped, linked back to the original, and flips the original's
    /// status to reversed. The status check and transition happen under the
    /// same exclusive borrow, so an entry can never be reversed twice.
    ///
    /// # Errors
    ///
    /// `InvalidStatus` unless the original is posted.
    pub fn reverse(
        &mut self,
        id: JournalEntryId,
        reversed_by: StaffId,
        reason: &str,
    ) -> Result<&JournalEntry, LedgerError> {
        let slot = self.slot_of(id)?;
        let original = &self.entries[slot];

        if original.status != EntryStatus::Posted {
            return Err(LedgerError::InvalidStatus {
                action: "reverse",
                status: original.status,
            });
        }

        let mut draft = EntryDraft::new(
            EntryType::Reversal,
            Utc::now().date_naive(),
            original.branch,
            format!("REVERSAL of {}: {}", original.journal_number, reason),
            reversed_by,
        )
        .with_reference(format!("REV-{}", original.journal_number));
        draft.reversal_of = Some(original.id);
        draft.transaction = original.transaction;
        draft.loan = original.loan;
        draft.savings_account = original.savings_account;

        for line in &original.lines {
            let amount = if line.debit_amount.is_positive() {
                LineAmount::Credit(line.debit_amount)
            } else {
                LineAmount::Debit(line.credit_amount)
            };
            draft.lines.push(LineSpec {
                account_code: line.gl_code.clone(),
                amount,
                description: Some(format!("Reversal: {}", line.description)),
                client: line.client,
            });
        }

        let reversal_id = self.create_entry(draft)?.id;

        let original = &mut self.entries[slot];
        original.status = EntryStatus::Reversed;
        info!(journal_number = %original.journal_number, "journal entry reversed");

        let reversal_slot = self.slot_of(reversal_id)?;
        Ok(&self.entries[reversal_slot])
    }

    /// Loads an already-persisted entry without validation
    ///
    /// This is the rehydration path for entries read back from storage; it
    /// trusts the caller completely. The report queries exist precisely to
    /// detect state that was corrupted behind the engine's back (see
    /// [`crate::reports::trial_balance`]).
    pub fn load(&mut self, entry: JournalEntry) {
        if let Some(sequence) = entry
            .journal_number
            .rsplit('-')
            .next()
            .and_then(|s| s.parse::<u64>().ok())
        {
            self.next_sequence = self.next_sequence.max(sequence + 1);
        }

        let slot = self.entries.len();
        self.index.insert(entry.id, slot);
        self.entries.push(entry);
    }

    /// Finds an entry by identifier
    pub fn entry(&self, id: JournalEntryId) -> Option<&JournalEntry> {
        self.index.get(&id).map(|&slot| &self.entries[slot])
    }

    /// Iterates all entries in insertion order
    pub fn entries(&self) -> &[JournalEntry] {
        &self.entries
    }

    /// Iterates entries whose lines have hit the ledger
    ///
    /// Drafts are excluded. Reversed entries remain included: their lines
    /// were posted and are netted out by the offsetting reversal entry, so
    /// dropping them would unbalance every report that spans the reversal.
    pub fn posted_entries(&self) -> impl Iterator<Item = &JournalEntry> {
        self.entries
            .iter()
            .filter(|e| matches!(e.status, EntryStatus::Posted | EntryStatus::Reversed))
    }

    fn slot_of(&self, id: JournalEntryId) -> Result<usize, LedgerError> {
        self.index
            .get(&id)
            .copied()
            .ok_or(LedgerError::EntryNotFound(id))
    }

    fn resolve_lines(&self, draft: &EntryDraft) -> Result<Vec<JournalLine>, LedgerError> {
        let mut lines = Vec::with_capacity(draft.lines.len());
        let mut currency = None;

        for (index, spec) in draft.lines.iter().enumerate() {
            let account = self.chart.lookup(&spec.account_code, Some(draft.branch))?;

            if account.is_control_account {
                return Err(LedgerError::ControlAccountPosting {
                    gl_code: account.gl_code.clone(),
                });
            }
            if !draft.entry_type.is_system_generated() && !account.allows_manual_entries {
                return Err(LedgerError::ManualPostingNotAllowed {
                    gl_code: account.gl_code.clone(),
                });
            }

            let amount = spec.amount.value();
            if !amount.is_positive() {
                return Err(LedgerError::validation(format!(
                    "line {}: amount must be positive, got {}",
                    index + 1,
                    amount.amount()
                )));
            }

            match currency {
                None => currency = Some(amount.currency()),
                Some(expected) if expected != amount.currency() => {
                    return Err(LedgerError::validation(format!(
                        "line {}: currency {} does not match entry currency {}",
                        index + 1,
                        amount.currency(),
                        expected
                    )));
                }
                Some(_) => {}
            }

            let zero = Money::zero(amount.currency());
            let (debit_amount, credit_amount) = match spec.amount {
                LineAmount::Debit(m) => (m, zero),
                LineAmount::Credit(m) => (zero, m),
            };

            lines.push(JournalLine {
                id: JournalLineId::new(),
                account_id: account.id,
                gl_code: account.gl_code.clone(),
                debit_amount,
                credit_amount,
                description: spec
                    .description
                    .clone()
                    .unwrap_or_else(|| draft.description.clone()),
                client: spec.client,
            });
        }

        Ok(lines)
    }

    fn next_journal_number(&mut self, date: NaiveDate) -> String {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        format!("JE-{}-{:06}", date.format("%Y%m%d"), sequence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::LineSpec;
    use core_kernel::BranchId;
    use rust_decimal_macros::dec;

    fn engine() -> JournalEngine {
        JournalEngine::with_standard_chart()
    }

    fn draft(engine_branch: BranchId, staff: StaffId) -> EntryDraft {
        EntryDraft::new(
            EntryType::Manual,
            NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
            engine_branch,
            "Office rent for July",
            staff,
        )
        .line(LineSpec::debit("5120", Money::naira(dec!(50000))))
        .line(LineSpec::credit("1010", Money::naira(dec!(50000))))
    }

    #[test]
    fn test_journal_numbers_are_sequential() {
        let mut engine = engine();
        let branch = BranchId::new();
        let staff = StaffId::new();

        let first = engine.create_entry(draft(branch, staff)).unwrap();
        assert_eq!(first.journal_number, "JE-20250701-000001");

        let second = engine.create_entry(draft(branch, staff)).unwrap();
        assert_eq!(second.journal_number, "JE-20250701-000002");
    }

    #[test]
    fn test_manual_entry_stays_draft() {
        let mut engine = engine();
        let entry = engine.create_entry(draft(BranchId::new(), StaffId::new())).unwrap();
        assert_eq!(entry.status, EntryStatus::Draft);
        assert!(entry.posted_at.is_none());
        assert!(entry.posting_date.is_none());
    }

    #[test]
    fn test_manual_entry_cannot_target_system_only_account() {
        let mut engine = engine();
        let bad = EntryDraft::new(
            EntryType::Manual,
            NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
            BranchId::new(),
            "sneaky",
            StaffId::new(),
        )
        .line(LineSpec::debit("1010", Money::naira(dec!(100))))
        .line(LineSpec::credit("1810", Money::naira(dec!(100))));

        assert!(matches!(
            engine.create_entry(bad),
            Err(LedgerError::ManualPostingNotAllowed { gl_code }) if gl_code == "1810"
        ));
    }
}
