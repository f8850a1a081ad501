//! Custom test assertions
//!
//! Assertion helpers for ledger types that give more meaningful failure
//! messages than bare `assert_eq!`.

use rust_decimal::Decimal;

use core_kernel::Money;
use domain_lending::AmortizationEntry;
use domain_ledger::JournalEntry;

/// Asserts that a Money value equals an expected decimal amount exactly
pub fn assert_money_eq(actual: &Money, expected: Decimal) {
    assert_eq!(
        actual.amount(),
        expected,
        "expected {} {}, got {}",
        actual.currency(),
        expected,
        actual.amount()
    );
}

/// Asserts that an entry's debit and credit totals are exactly equal
pub fn assert_entry_balanced(entry: &JournalEntry) {
    assert_eq!(
        entry.total_debits(),
        entry.total_credits(),
        "entry {} is not balanced: debits={}, credits={}",
        entry.journal_number,
        entry.total_debits(),
        entry.total_credits()
    );
}

/// Asserts that every line carries exactly one positive side
pub fn assert_lines_one_sided(entry: &JournalEntry) {
    for line in &entry.lines {
        let debit_set = line.debit_amount.is_positive();
        let credit_set = line.credit_amount.is_positive();
        assert!(
            debit_set ^ credit_set,
            "line on {} has debit={}, credit={}",
            line.gl_code,
            line.debit_amount.amount(),
            line.credit_amount.amount()
        );
    }
}

/// Asserts that `reversal` is the exact debit/credit mirror of `original`
pub fn assert_lines_swapped(original: &JournalEntry, reversal: &JournalEntry) {
    assert_eq!(
        original.lines.len(),
        reversal.lines.len(),
        "reversal of {} has a different line count",
        original.journal_number
    );
    for (orig, rev) in original.lines.iter().zip(&reversal.lines) {
        assert_eq!(orig.gl_code, rev.gl_code, "line account mismatch");
        assert_eq!(
            orig.debit_amount.amount(),
            rev.credit_amount.amount(),
            "debit of {} not mirrored",
            orig.gl_code
        );
        assert_eq!(
            orig.credit_amount.amount(),
            rev.debit_amount.amount(),
            "credit of {} not mirrored",
            orig.gl_code
        );
    }
}

/// Asserts that a schedule fully amortizes the principal: N entries,
/// terminal balance exactly zero, principal payments summing to the
/// principal
pub fn assert_schedule_amortizes(schedule: &[AmortizationEntry], principal: Decimal) {
    let last = schedule.last().expect("schedule must not be empty");
    assert!(
        last.balance_after.is_zero(),
        "terminal balance is {}, expected 0",
        last.balance_after.amount()
    );

    let total: Decimal = schedule.iter().map(|e| e.principal_payment.amount()).sum();
    assert_eq!(
        total, principal,
        "principal payments sum to {}, expected {}",
        total, principal
    );

    let mut previous = principal;
    for entry in schedule {
        assert!(
            entry.balance_after.amount() <= previous,
            "balance increased at installment {}",
            entry.installment_number
        );
        previous = entry.balance_after.amount();
    }
}
