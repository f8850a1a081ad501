//! Test data builders
//!
//! Builders produce realistic domain fixtures (named clients, numbered
//! loans and accounts) so tests read like the business events they model.

use chrono::NaiveDate;
use fake::faker::name::en::Name;
use fake::faker::number::en::NumberWithFormat;
use fake::Fake;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use core_kernel::{BranchId, ClientId, LoanId, Money, SavingsAccountId, StaffId};
use domain_ledger::{
    EntryDraft, EntryType, JournalEngine, LineSpec, LoanFacts, SavingsFacts, SavingsProductType,
};

/// A journal engine over the standard chart of accounts
pub fn standard_engine() -> JournalEngine {
    JournalEngine::with_standard_chart()
}

/// Loan facts with a generated client name and loan number
pub fn loan_facts(branch: BranchId, principal: Decimal, disbursement_date: NaiveDate) -> LoanFacts {
    LoanFacts {
        loan: LoanId::new(),
        loan_number: NumberWithFormat("LN-2025-#####").fake(),
        client: ClientId::new(),
        client_name: Name().fake(),
        branch,
        principal: Money::naira(principal),
        disbursement_date,
    }
}

/// Savings facts with a generated client name and account number
pub fn savings_facts(branch: BranchId, product_type: SavingsProductType) -> SavingsFacts {
    SavingsFacts {
        account: SavingsAccountId::new(),
        account_number: NumberWithFormat("SA-######").fake(),
        client: ClientId::new(),
        client_name: Name().fake(),
        branch,
        product_type,
    }
}

/// A balanced manual draft: rent expense against cash
pub fn rent_draft(
    branch: BranchId,
    staff: StaffId,
    date: NaiveDate,
    amount: Decimal,
) -> EntryDraft {
    EntryDraft::new(EntryType::Manual, date, branch, "Monthly rent", staff)
        .line(LineSpec::debit("5120", Money::naira(amount)))
        .line(LineSpec::credit("1010", Money::naira(amount)))
}

/// Posts an opening capital injection so the cash account has funds
pub fn inject_capital(
    engine: &mut JournalEngine,
    branch: BranchId,
    staff: StaffId,
    date: NaiveDate,
    amount: Decimal,
) {
    let draft = EntryDraft::new(
        EntryType::Manual,
        date,
        branch,
        "Initial share capital",
        staff,
    )
    .auto_post(true)
    .line(LineSpec::debit("1010", Money::naira(amount)))
    .line(LineSpec::credit("3010", Money::naira(amount)));

    engine
        .create_entry(draft)
        .expect("capital injection must post");
}

/// A plausible monthly interest rate for test loans (3%)
pub fn monthly_rate() -> Decimal {
    dec!(0.03)
}
