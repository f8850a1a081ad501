//! Posting rules
//!
//! Deterministic journal templates mapping business events to balanced
//! debit/credit line sets. Each rule receives already-validated business
//! facts from the application layer (amounts, principal/interest splits)
//! and produces an auto-posted entry through the journal engine:
//!
//! | Event              | Debit                     | Credit                          |
//! |--------------------|---------------------------|---------------------------------|
//! | Loan disbursement  | Loan Receivable (1810)    | Cash (1010, branch-preferring)  |
//! | Loan repayment     | Cash                      | Loan Receivable + Interest Income (4010) |
//! | Savings deposit    | Cash                      | Savings Deposits (by product)   |
//! | Savings withdrawal | Savings Deposits          | Cash                            |
//! | Fee collection     | Cash                      | Fee Income (by fee type)        |

use chrono::NaiveDate;

use core_kernel::{BranchId, ClientId, LoanId, Money, SavingsAccountId, StaffId, TransactionId};

use crate::chart::{
    FeeType, SavingsProductType, CASH_IN_HAND, INTEREST_INCOME_LOANS, LOAN_RECEIVABLE_PRINCIPAL,
};
use crate::engine::JournalEngine;
use crate::entry::{EntryDraft, EntryType, JournalEntry, LineSpec};
use crate::error::LedgerError;

/// Loan facts needed to post disbursements and repayments
#[derive(Debug, Clone)]
pub struct LoanFacts {
    pub loan: LoanId,
    pub loan_number: String,
    pub client: ClientId,
    pub client_name: String,
    pub branch: BranchId,
    pub principal: Money,
    pub disbursement_date: NaiveDate,
}

/// Savings account facts needed to post deposits and withdrawals
#[derive(Debug, Clone)]
pub struct SavingsFacts {
    pub account: SavingsAccountId,
    pub account_number: String,
    pub client: ClientId,
    pub client_name: String,
    pub branch: BranchId,
    pub product_type: SavingsProductType,
}

/// Posts a loan disbursement
///
/// Dr 1810 Loan Receivable - Principal, Cr Cash, for the loan principal.
pub fn post_loan_disbursement(
    engine: &mut JournalEngine,
    loan: &LoanFacts,
    disbursed_by: StaffId,
) -> Result<JournalEntry, LedgerError> {
    let draft = EntryDraft::new(
        EntryType::LoanDisbursement,
        loan.disbursement_date,
        loan.branch,
        format!("Loan Disbursement: {}", loan.loan_number),
        disbursed_by,
    )
    .with_reference(loan.loan_number.clone())
    .for_loan(loan.loan)
    .line(
        LineSpec::debit(LOAN_RECEIVABLE_PRINCIPAL, loan.principal)
            .with_description(format!("Loan disbursement to {}", loan.client_name))
            .for_client(loan.client),
    )
    .line(
        LineSpec::credit(CASH_IN_HAND, loan.principal)
            .with_description(format!("Cash paid for loan {}", loan.loan_number))
            .for_client(loan.client),
    );

    engine.create_entry(draft).cloned()
}

/// Posts a loan repayment, split into principal and interest
///
/// Dr Cash for the full amount; Cr 1810 for the principal portion and
/// Cr 4010 Interest Income for the interest portion. The split comes from
/// the loan's live amortization state and is re-validated here: the
/// portions must sum exactly to the amount received.
///
/// # Errors
///
/// `SplitMismatch` if `principal_portion + interest_portion != amount`.
#[allow(clippy::too_many_arguments)]
pub fn post_loan_repayment(
    engine: &mut JournalEngine,
    loan: &LoanFacts,
    amount: Money,
    principal_portion: Money,
    interest_portion: Money,
    processed_by: StaffId,
    transaction: TransactionId,
    transaction_ref: &str,
    transaction_date: NaiveDate,
) -> Result<JournalEntry, LedgerError> {
    let split = principal_portion.checked_add(&interest_portion)?;
    if split.amount() != amount.amount() {
        return Err(LedgerError::SplitMismatch {
            amount: amount.amount(),
            principal: principal_portion.amount(),
            interest: interest_portion.amount(),
        });
    }

    let mut draft = EntryDraft::new(
        EntryType::LoanRepayment,
        transaction_date,
        loan.branch,
        format!("Loan Repayment: {}", loan.loan_number),
        processed_by,
    )
    .with_reference(transaction_ref)
    .for_transaction(transaction)
    .for_loan(loan.loan)
    .line(
        LineSpec::debit(CASH_IN_HAND, amount)
            .with_description(format!("Loan repayment from {}", loan.client_name))
            .for_client(loan.client),
    );

    if principal_portion.is_positive() {
        draft = draft.line(
            LineSpec::credit(LOAN_RECEIVABLE_PRINCIPAL, principal_portion)
                .with_description(format!("Principal repayment for loan {}", loan.loan_number))
                .for_client(loan.client),
        );
    }
    if interest_portion.is_positive() {
        draft = draft.line(
            LineSpec::credit(INTEREST_INCOME_LOANS, interest_portion)
                .with_description(format!("Interest income from loan {}", loan.loan_number))
                .for_client(loan.client),
        );
    }

    engine.create_entry(draft).cloned()
}

/// Posts a savings deposit
///
/// Dr Cash, Cr the liability account selected by the savings product type.
pub fn post_savings_deposit(
    engine: &mut JournalEngine,
    savings: &SavingsFacts,
    amount: Money,
    processed_by: StaffId,
    transaction: TransactionId,
    transaction_ref: &str,
    transaction_date: NaiveDate,
) -> Result<JournalEntry, LedgerError> {
    let liability_code = savings.product_type.liability_account_code();

    let draft = EntryDraft::new(
        EntryType::SavingsDeposit,
        transaction_date,
        savings.branch,
        format!("Savings Deposit: {}", savings.account_number),
        processed_by,
    )
    .with_reference(transaction_ref)
    .for_transaction(transaction)
    .for_savings(savings.account)
    .line(
        LineSpec::debit(CASH_IN_HAND, amount)
            .with_description(format!("Savings deposit from {}", savings.client_name))
            .for_client(savings.client),
    )
    .line(
        LineSpec::credit(liability_code, amount)
            .with_description(format!("Deposit to account {}", savings.account_number))
            .for_client(savings.client),
    );

    engine.create_entry(draft).cloned()
}

/// Posts a savings withdrawal
///
/// Dr the product's liability account, Cr Cash.
pub fn post_savings_withdrawal(
    engine: &mut JournalEngine,
    savings: &SavingsFacts,
    amount: Money,
    processed_by: StaffId,
    transaction: TransactionId,
    transaction_ref: &str,
    transaction_date: NaiveDate,
) -> Result<JournalEntry, LedgerError> {
    let liability_code = savings.product_type.liability_account_code();

    let draft = EntryDraft::new(
        EntryType::SavingsWithdrawal,
        transaction_date,
        savings.branch,
        format!("Savings Withdrawal: {}", savings.account_number),
        processed_by,
    )
    .with_reference(transaction_ref)
    .for_transaction(transaction)
    .for_savings(savings.account)
    .line(
        LineSpec::debit(liability_code, amount)
            .with_description(format!("Withdrawal from account {}", savings.account_number))
            .for_client(savings.client),
    )
    .line(
        LineSpec::credit(CASH_IN_HAND, amount)
            .with_description(format!("Cash paid to {}", savings.client_name))
            .for_client(savings.client),
    );

    engine.create_entry(draft).cloned()
}

/// Posts a fee collection
///
/// Dr Cash, Cr the income account selected by the fee type.
#[allow(clippy::too_many_arguments)]
pub fn post_fee_collection(
    engine: &mut JournalEngine,
    fee_type: FeeType,
    amount: Money,
    client: ClientId,
    client_name: &str,
    branch: BranchId,
    processed_by: StaffId,
    transaction: TransactionId,
    transaction_ref: &str,
    transaction_date: NaiveDate,
) -> Result<JournalEntry, LedgerError> {
    let income_code = fee_type.income_account_code();

    let draft = EntryDraft::new(
        EntryType::FeeCollection,
        transaction_date,
        branch,
        format!("Fee Collection: {}", fee_type.display_name()),
        processed_by,
    )
    .with_reference(transaction_ref)
    .for_transaction(transaction)
    .line(
        LineSpec::debit(CASH_IN_HAND, amount)
            .with_description(format!("{} from {}", fee_type.display_name(), client_name))
            .for_client(client),
    )
    .line(
        LineSpec::credit(income_code, amount)
            .with_description(format!("{} income", fee_type.display_name()))
            .for_client(client),
    );

    engine.create_entry(draft).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::EntryStatus;
    use rust_decimal_macros::dec;

    fn loan_facts(branch: BranchId) -> LoanFacts {
        LoanFacts {
            loan: LoanId::new(),
            loan_number: "LN-2025-00042".to_string(),
            client: ClientId::new(),
            client_name: "Amina Yusuf".to_string(),
            branch,
            principal: Money::naira(dec!(50000)),
            disbursement_date: NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
        }
    }

    #[test]
    fn test_disbursement_template() {
        let mut engine = JournalEngine::with_standard_chart();
        let branch = BranchId::new();
        let entry = post_loan_disbursement(&mut engine, &loan_facts(branch), StaffId::new()).unwrap();

        assert_eq!(entry.entry_type, EntryType::LoanDisbursement);
        assert_eq!(entry.status, EntryStatus::Posted);
        assert_eq!(entry.lines.len(), 2);
        assert_eq!(entry.lines[0].gl_code, "1810");
        assert_eq!(entry.lines[0].debit_amount.amount(), dec!(50000));
        assert_eq!(entry.lines[1].gl_code, "1010");
        assert_eq!(entry.lines[1].credit_amount.amount(), dec!(50000));
    }

    #[test]
    fn test_repayment_split_must_reconcile() {
        let mut engine = JournalEngine::with_standard_chart();
        let branch = BranchId::new();
        let result = post_loan_repayment(
            &mut engine,
            &loan_facts(branch),
            Money::naira(dec!(1000)),
            Money::naira(dec!(700)),
            Money::naira(dec!(200)),
            StaffId::new(),
            TransactionId::new(),
            "TXN-1",
            NaiveDate::from_ymd_opt(2025, 8, 1).unwrap(),
        );

        assert!(matches!(result, Err(LedgerError::SplitMismatch { .. })));
        assert!(engine.entries().is_empty());
    }
}
