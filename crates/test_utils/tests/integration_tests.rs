//! Cross-crate integration tests
//!
//! Exercise the full flow: amortization schedules feeding posting rules,
//! the journal engine enforcing double-entry invariants, and the report
//! queries reconstructing balances. Database tests at the bottom require a
//! Docker daemon and are ignored by default.

use chrono::NaiveDate;
use rust_decimal_macros::dec;

use core_kernel::{BranchId, Money, StaffId, TransactionId};
use domain_lending::{add_months, generate_amortization_schedule};
use domain_ledger::{
    balance_sheet, general_ledger, posting, profit_and_loss, trial_balance, EntryStatus,
    EntryType, FeeType, SavingsProductType,
};
use test_utils::assertions::{
    assert_entry_balanced, assert_lines_one_sided, assert_lines_swapped, assert_money_eq,
    assert_schedule_amortizes,
};
use test_utils::builders::{
    inject_capital, loan_facts, monthly_rate, savings_facts, standard_engine,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_amortization_schedule_drives_repayment_postings() {
    let branch = BranchId::new();
    let staff = StaffId::new();
    let mut engine = standard_engine();
    inject_capital(&mut engine, branch, staff, date(2025, 1, 2), dec!(1000000));

    let disbursed = date(2025, 1, 15);
    let loan = loan_facts(branch, dec!(120000), disbursed);
    let schedule =
        generate_amortization_schedule(loan.principal, monthly_rate(), 12, disbursed).unwrap();
    assert_schedule_amortizes(&schedule, dec!(120000));

    let entry = posting::post_loan_disbursement(&mut engine, &loan, staff).unwrap();
    assert_entry_balanced(&entry);
    assert_lines_one_sided(&entry);

    // pay the first two installments exactly as the schedule splits them
    for installment in &schedule[..2] {
        let entry = posting::post_loan_repayment(
            &mut engine,
            &loan,
            installment.total_payment,
            installment.principal_payment,
            installment.interest_payment,
            staff,
            TransactionId::new(),
            &format!("{}-{}", loan.loan_number, installment.installment_number),
            installment.due_date,
        )
        .unwrap();
        assert_entry_balanced(&entry);
    }

    // outstanding principal in the ledger matches the schedule balance
    let receivable = general_ledger(&engine, "1810", None, date(2025, 1, 1), date(2025, 12, 31))
        .unwrap()
        .closing_balance();
    assert_eq!(receivable, schedule[1].balance_after.amount());

    // and the ledger as a whole still balances
    let report = trial_balance(&engine, date(2025, 1, 1), date(2025, 12, 31), None);
    assert!(report.is_balanced);

    // interest income so far is the first two interest portions
    let expected_interest =
        schedule[0].interest_payment.amount() + schedule[1].interest_payment.amount();
    let pnl = profit_and_loss(&engine, date(2025, 1, 1), date(2025, 12, 31), None);
    assert_eq!(pnl.total_income, expected_interest);
}

#[test]
fn test_savings_and_fee_flow_through_reports() {
    let branch = BranchId::new();
    let staff = StaffId::new();
    let mut engine = standard_engine();
    inject_capital(&mut engine, branch, staff, date(2025, 3, 1), dec!(200000));

    let savings = savings_facts(branch, SavingsProductType::Fixed);
    posting::post_savings_deposit(
        &mut engine,
        &savings,
        Money::naira(dec!(40000)),
        staff,
        TransactionId::new(),
        "TXN-DEP-1",
        date(2025, 3, 2),
    )
    .unwrap();
    posting::post_savings_withdrawal(
        &mut engine,
        &savings,
        Money::naira(dec!(15000)),
        staff,
        TransactionId::new(),
        "TXN-WDL-1",
        date(2025, 3, 9),
    )
    .unwrap();
    posting::post_fee_collection(
        &mut engine,
        FeeType::LatePayment,
        Money::naira(dec!(2500)),
        savings.client,
        &savings.client_name,
        branch,
        staff,
        TransactionId::new(),
        "TXN-FEE-1",
        date(2025, 3, 10),
    )
    .unwrap();

    // fixed deposits live in 2020, net of the withdrawal
    let deposits = general_ledger(&engine, "2020", None, date(2025, 3, 1), date(2025, 3, 31))
        .unwrap()
        .closing_balance();
    assert_eq!(deposits, dec!(25000));

    let sheet = balance_sheet(&engine, date(2025, 3, 31), None);
    assert!(sheet.is_balanced);
    assert_eq!(sheet.total_liabilities, dec!(25000));
    assert_eq!(sheet.net_earnings, dec!(2500));

    // late payment fees land in 4170
    let pnl = profit_and_loss(&engine, date(2025, 3, 1), date(2025, 3, 31), None);
    let late_fees = pnl.income.iter().find(|r| r.gl_code == "4170").unwrap();
    assert_eq!(late_fees.amount, dec!(2500));
}

#[test]
fn test_reversal_restores_all_balances() {
    let branch = BranchId::new();
    let staff = StaffId::new();
    let mut engine = standard_engine();
    inject_capital(&mut engine, branch, staff, date(2025, 5, 1), dec!(300000));

    let cash_before = general_ledger(&engine, "1010", None, date(2025, 1, 1), date(2025, 12, 31))
        .unwrap()
        .closing_balance();

    let loan = loan_facts(branch, dec!(80000), date(2025, 5, 2));
    let original_id = posting::post_loan_disbursement(&mut engine, &loan, staff)
        .unwrap()
        .id;

    let reversal = engine
        .reverse(original_id, staff, "wrong client selected")
        .unwrap()
        .clone();
    let original = engine.entry(original_id).unwrap().clone();

    assert_eq!(original.status, EntryStatus::Reversed);
    assert_eq!(reversal.entry_type, EntryType::Reversal);
    assert_lines_swapped(&original, &reversal);

    // cash and receivable are back where they started
    let cash_after = general_ledger(&engine, "1010", None, date(2025, 1, 1), date(2025, 12, 31))
        .unwrap()
        .closing_balance();
    assert_eq!(cash_after, cash_before);

    let receivable = general_ledger(&engine, "1810", None, date(2025, 1, 1), date(2025, 12, 31))
        .unwrap()
        .closing_balance();
    assert_eq!(receivable, dec!(0));

    let report = trial_balance(&engine, date(2025, 1, 1), date(2025, 12, 31), None);
    assert!(report.is_balanced);
}

#[test]
fn test_due_dates_follow_calendar_months() {
    let start = date(2025, 1, 31);
    assert_eq!(add_months(start, 1), date(2025, 2, 28));

    let schedule = generate_amortization_schedule(
        Money::naira(dec!(10000)),
        monthly_rate(),
        3,
        start,
    )
    .unwrap();
    assert_eq!(schedule[0].due_date, date(2025, 2, 28));
    assert_eq!(schedule[1].due_date, date(2025, 3, 31));
}

#[test]
fn test_storage_tags_are_stable() {
    // external reporting tools depend on these exact strings
    assert_eq!(
        serde_json::to_string(&EntryType::LoanDisbursement).unwrap(),
        "\"loan_disbursement\""
    );
    assert_eq!(
        serde_json::to_string(&EntryStatus::Reversed).unwrap(),
        "\"reversed\""
    );
    assert_eq!(
        serde_json::to_string(&SavingsProductType::Children).unwrap(),
        "\"children\""
    );
    assert_eq!(FeeType::Tech.income_account_code(), "4160");
}

#[test]
fn test_shared_standard_chart_fixture() {
    let chart = test_utils::STANDARD_CHART.clone();
    let cash = chart.lookup("1010", None).unwrap();
    assert_money_eq(&Money::zero(cash.currency), dec!(0));
}

// ============================================================================
// Database integration (requires Docker)
// ============================================================================

mod database_tests {
    use super::*;
    use infra_db::{ChartRepository, LedgerRepository};
    use test_utils::database::TestDatabase;

    #[tokio::test]
    #[ignore = "requires a Docker daemon"]
    async fn test_chart_seeding_is_idempotent() {
        let db = TestDatabase::new().await.expect("container");
        let chart = ChartRepository::new(db.pool().clone());

        let created = chart.seed_standard_chart().await.unwrap();
        assert!(created > 0);

        let created_again = chart.seed_standard_chart().await.unwrap();
        assert_eq!(created_again, 0);

        let cash = chart.fetch_account("1010", None).await.unwrap();
        assert_eq!(cash.name, "Cash In Hand");
        assert!(cash.allows_manual_entries);
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon"]
    async fn test_atomic_persist_and_cas_reversal() {
        let db = TestDatabase::new().await.expect("container");
        let chart_repo = ChartRepository::new(db.pool().clone());
        let ledger_repo = LedgerRepository::new(db.pool().clone());
        chart_repo.seed_standard_chart().await.unwrap();

        // build a posted entry in the engine, sharing the persisted chart
        let mut engine = domain_ledger::JournalEngine::new(domain_ledger::ChartOfAccounts::new());
        for account in chart_repo.list_accounts().await.unwrap() {
            engine.chart_mut().upsert_account(account);
        }
        let branch = BranchId::new();
        let staff = StaffId::new();
        let loan = loan_facts(branch, dec!(75000), date(2025, 6, 1));
        let mut entry = posting::post_loan_disbursement(&mut engine, &loan, staff).unwrap();
        entry.journal_number = ledger_repo
            .next_journal_number(entry.transaction_date)
            .await
            .unwrap();

        ledger_repo.insert_entry(&entry).await.unwrap();

        let persisted = ledger_repo.fetch_entry(entry.id).await.unwrap();
        assert_eq!(persisted.journal_number, entry.journal_number);
        assert_eq!(persisted.status, EntryStatus::Posted);
        assert_eq!(persisted.lines.len(), 2);
        assert_entry_balanced(&persisted);

        // the posted→reversed transition applies exactly once
        ledger_repo.mark_reversed(entry.id).await.unwrap();
        assert!(ledger_repo.mark_reversed(entry.id).await.is_err());
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon"]
    async fn test_unbalanced_entry_is_rejected_before_commit() {
        let db = TestDatabase::new().await.expect("container");
        let chart_repo = ChartRepository::new(db.pool().clone());
        let ledger_repo = LedgerRepository::new(db.pool().clone());
        chart_repo.seed_standard_chart().await.unwrap();

        let mut engine = domain_ledger::JournalEngine::new(domain_ledger::ChartOfAccounts::new());
        for account in chart_repo.list_accounts().await.unwrap() {
            engine.chart_mut().upsert_account(account);
        }
        let branch = BranchId::new();
        let staff = StaffId::new();
        let loan = loan_facts(branch, dec!(10000), date(2025, 6, 1));
        let mut entry = posting::post_loan_disbursement(&mut engine, &loan, staff).unwrap();

        // tamper with a line behind the engine's back
        entry.lines[0].debit_amount = Money::naira(dec!(9999));

        let result = ledger_repo.insert_entry(&entry).await;
        assert!(result.is_err());
        assert!(ledger_repo.fetch_entry(entry.id).await.is_err());
    }
}
