//! Ledger query layer
//!
//! Report queries reconstruct balances by replaying posted journal lines:
//! trial balance, general ledger (running balances), balance sheet, and
//! profit & loss. Drafts never count; reversed entries stay in because
//! their reversal entries net them out.
//!
//! A trial balance that fails to balance is not a recoverable error - it
//! means the engine's invariant was bypassed (e.g. a line injected directly
//! at the storage layer) and is logged as such.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;
use tracing::error;

use core_kernel::{BranchId, GlAccountId};

use crate::chart::{AccountType, GlAccount, NormalBalance};
use crate::engine::JournalEngine;
use crate::entry::{JournalEntry, JournalLine};
use crate::error::LedgerError;

/// One account row of a trial balance
#[derive(Debug, Clone, Serialize)]
pub struct TrialBalanceRow {
    pub gl_code: String,
    pub account_name: String,
    pub account_type: AccountType,
    pub debit: Decimal,
    pub credit: Decimal,
}

/// Trial balance over a date range
#[derive(Debug, Clone, Serialize)]
pub struct TrialBalance {
    pub rows: Vec<TrialBalanceRow>,
    pub total_debits: Decimal,
    pub total_credits: Decimal,
    pub is_balanced: bool,
    pub difference: Decimal,
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
}

/// Sums posted lines per account within the date range, signing each
/// account's net by its normal balance
///
/// `is_balanced` must always hold for a ledger written only through the
/// journal engine; a false value indicates corruption and is logged as an
/// invariant violation, never silently corrected.
pub fn trial_balance(
    engine: &JournalEngine,
    date_from: NaiveDate,
    date_to: NaiveDate,
    branch: Option<BranchId>,
) -> TrialBalance {
    let sums = sums_per_account(engine, branch, |date| date >= date_from && date <= date_to);

    let mut rows = Vec::new();
    let mut total_debits = Decimal::ZERO;
    let mut total_credits = Decimal::ZERO;

    for account in engine.chart().accounts() {
        let Some(&(debit_sum, credit_sum)) = sums.get(&account.id) else {
            continue;
        };

        // each account nets to one side; zero-movement accounts are omitted
        let (net_debit, net_credit) = if debit_sum > credit_sum {
            (debit_sum - credit_sum, Decimal::ZERO)
        } else {
            (Decimal::ZERO, credit_sum - debit_sum)
        };

        if net_debit.is_zero() && net_credit.is_zero() {
            continue;
        }

        total_debits += net_debit;
        total_credits += net_credit;
        rows.push(TrialBalanceRow {
            gl_code: account.gl_code.clone(),
            account_name: account.name.clone(),
            account_type: account.account_type,
            debit: net_debit,
            credit: net_credit,
        });
    }

    let is_balanced = total_debits == total_credits;
    if !is_balanced {
        error!(
            %total_debits,
            %total_credits,
            "trial balance does not balance - ledger invariant violated"
        );
    }

    TrialBalance {
        rows,
        difference: total_debits - total_credits,
        total_debits,
        total_credits,
        is_balanced,
        date_from,
        date_to,
    }
}

/// One row of a general ledger listing
#[derive(Debug, Clone)]
pub struct GeneralLedgerRow<'a> {
    pub entry: &'a JournalEntry,
    pub line: &'a JournalLine,
    pub running_balance: Decimal,
}

/// General ledger for one account: opening balance plus a running-balance
/// sequence over the period
#[derive(Debug)]
pub struct GeneralLedger<'a> {
    pub account: &'a GlAccount,
    pub opening_balance: Decimal,
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
    lines: Vec<(&'a JournalEntry, &'a JournalLine)>,
}

impl<'a> GeneralLedger<'a> {
    /// Returns a lazy running-balance iterator over the period's lines
    ///
    /// The iterator is finite and restartable: each call starts a fresh
    /// pass from the opening balance.
    pub fn rows(&self) -> impl Iterator<Item = GeneralLedgerRow<'a>> + '_ {
        let normal = self.account.normal_balance();
        self.lines.iter().scan(self.opening_balance, move |balance, &(entry, line)| {
            *balance += match normal {
                NormalBalance::Debit => line.debit_normal_movement(),
                NormalBalance::Credit => line.credit_normal_movement(),
            };
            Some(GeneralLedgerRow {
                entry,
                line,
                running_balance: *balance,
            })
        })
    }

    /// The balance after the last line of the period
    pub fn closing_balance(&self) -> Decimal {
        self.rows()
            .last()
            .map(|row| row.running_balance)
            .unwrap_or(self.opening_balance)
    }
}

/// Builds the general ledger for an account over a date range
///
/// The opening balance replays all posted lines before `date_from`; rows
/// are ordered by transaction date, then insertion order.
///
/// # Errors
///
/// Fails if the account cannot be resolved (missing or inactive).
pub fn general_ledger<'a>(
    engine: &'a JournalEngine,
    gl_code: &str,
    branch: Option<BranchId>,
    date_from: NaiveDate,
    date_to: NaiveDate,
) -> Result<GeneralLedger<'a>, LedgerError> {
    let account = engine.chart().lookup(gl_code, branch)?;

    let mut opening_balance = Decimal::ZERO;
    let mut lines: Vec<(&JournalEntry, &JournalLine)> = Vec::new();

    for entry in engine.posted_entries() {
        if let Some(branch) = branch {
            if entry.branch != branch {
                continue;
            }
        }
        for line in entry.lines.iter().filter(|l| l.account_id == account.id) {
            if entry.transaction_date < date_from {
                opening_balance += match account.normal_balance() {
                    NormalBalance::Debit => line.debit_normal_movement(),
                    NormalBalance::Credit => line.credit_normal_movement(),
                };
            } else if entry.transaction_date <= date_to {
                lines.push((entry, line));
            }
        }
    }

    // entries iterate in insertion order; a stable sort by date preserves it
    lines.sort_by_key(|(entry, _)| entry.transaction_date);

    Ok(GeneralLedger {
        account,
        opening_balance,
        date_from,
        date_to,
        lines,
    })
}

/// One account row of a balance sheet section
#[derive(Debug, Clone, Serialize)]
pub struct BalanceSheetRow {
    pub gl_code: String,
    pub account_name: String,
    pub balance: Decimal,
}

/// Balance sheet as of a date
///
/// Equity is shown alongside the net earnings accumulated in income and
/// expense accounts up to the as-of date, so the statement balances from
/// ledger data alone.
#[derive(Debug, Clone, Serialize)]
pub struct BalanceSheet {
    pub assets: Vec<BalanceSheetRow>,
    pub liabilities: Vec<BalanceSheetRow>,
    pub equity: Vec<BalanceSheetRow>,
    pub total_assets: Decimal,
    pub total_liabilities: Decimal,
    pub total_equity: Decimal,
    /// Income minus expenses over all posted lines up to the as-of date
    pub net_earnings: Decimal,
    pub total_liabilities_and_equity: Decimal,
    pub is_balanced: bool,
    pub as_of: NaiveDate,
}

/// Aggregates posted lines by account type into a balance sheet
pub fn balance_sheet(
    engine: &JournalEngine,
    as_of: NaiveDate,
    branch: Option<BranchId>,
) -> BalanceSheet {
    let sums = sums_per_account(engine, branch, |date| date <= as_of);

    let mut assets = Vec::new();
    let mut liabilities = Vec::new();
    let mut equity = Vec::new();
    let mut total_assets = Decimal::ZERO;
    let mut total_liabilities = Decimal::ZERO;
    let mut total_equity = Decimal::ZERO;
    let mut net_earnings = Decimal::ZERO;

    for account in engine.chart().accounts() {
        let Some(&(debit_sum, credit_sum)) = sums.get(&account.id) else {
            continue;
        };
        let balance = match account.normal_balance() {
            NormalBalance::Debit => debit_sum - credit_sum,
            NormalBalance::Credit => credit_sum - debit_sum,
        };
        if balance.is_zero() {
            continue;
        }

        let row = BalanceSheetRow {
            gl_code: account.gl_code.clone(),
            account_name: account.name.clone(),
            balance,
        };

        match account.account_type {
            AccountType::Asset => {
                total_assets += balance;
                assets.push(row);
            }
            AccountType::Liability => {
                total_liabilities += balance;
                liabilities.push(row);
            }
            AccountType::Equity => {
                total_equity += balance;
                equity.push(row);
            }
            AccountType::Income => net_earnings += balance,
            AccountType::Expense => net_earnings -= balance,
        }
    }

    let total_liabilities_and_equity = total_liabilities + total_equity + net_earnings;

    BalanceSheet {
        assets,
        liabilities,
        equity,
        total_assets,
        total_liabilities,
        total_equity,
        net_earnings,
        total_liabilities_and_equity,
        is_balanced: total_assets == total_liabilities_and_equity,
        as_of,
    }
}

/// One account row of a profit & loss statement
#[derive(Debug, Clone, Serialize)]
pub struct ProfitAndLossRow {
    pub gl_code: String,
    pub account_name: String,
    pub amount: Decimal,
}

/// Profit & loss statement over a date range
#[derive(Debug, Clone, Serialize)]
pub struct ProfitAndLoss {
    pub income: Vec<ProfitAndLossRow>,
    pub expenses: Vec<ProfitAndLossRow>,
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub net_profit: Decimal,
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
}

/// Aggregates posted income and expense lines over a date range
///
/// Income increases with credit, expenses with debit; net profit is the
/// difference.
pub fn profit_and_loss(
    engine: &JournalEngine,
    date_from: NaiveDate,
    date_to: NaiveDate,
    branch: Option<BranchId>,
) -> ProfitAndLoss {
    let sums = sums_per_account(engine, branch, |date| date >= date_from && date <= date_to);

    let mut income = Vec::new();
    let mut expenses = Vec::new();
    let mut total_income = Decimal::ZERO;
    let mut total_expenses = Decimal::ZERO;

    for account in engine.chart().accounts() {
        let Some(&(debit_sum, credit_sum)) = sums.get(&account.id) else {
            continue;
        };

        match account.account_type {
            AccountType::Income => {
                let amount = credit_sum - debit_sum;
                if !amount.is_zero() {
                    total_income += amount;
                    income.push(ProfitAndLossRow {
                        gl_code: account.gl_code.clone(),
                        account_name: account.name.clone(),
                        amount,
                    });
                }
            }
            AccountType::Expense => {
                let amount = debit_sum - credit_sum;
                if !amount.is_zero() {
                    total_expenses += amount;
                    expenses.push(ProfitAndLossRow {
                        gl_code: account.gl_code.clone(),
                        account_name: account.name.clone(),
                        amount,
                    });
                }
            }
            _ => {}
        }
    }

    ProfitAndLoss {
        income,
        expenses,
        total_income,
        total_expenses,
        net_profit: total_income - total_expenses,
        date_from,
        date_to,
    }
}

/// Accumulates (debit_sum, credit_sum) per account over posted lines whose
/// entry matches the branch filter and date predicate
fn sums_per_account(
    engine: &JournalEngine,
    branch: Option<BranchId>,
    in_range: impl Fn(NaiveDate) -> bool,
) -> HashMap<GlAccountId, (Decimal, Decimal)> {
    let mut sums: HashMap<GlAccountId, (Decimal, Decimal)> = HashMap::new();

    for entry in engine.posted_entries() {
        if !in_range(entry.transaction_date) {
            continue;
        }
        if let Some(branch) = branch {
            if entry.branch != branch {
                continue;
            }
        }
        for line in &entry.lines {
            let (debits, credits) = sums.entry(line.account_id).or_default();
            *debits += line.debit_amount.amount();
            *credits += line.credit_amount.amount();
        }
    }

    sums
}
