//! Chart of accounts
//!
//! Typed GL accounts with normal-balance semantics, plus the static account
//! mappings (savings product type → liability account, fee type → income
//! account) that posting rules depend on. The standard microfinance
//! taxonomy is seeded by [`ChartOfAccounts::initialize`], which is
//! idempotent: accounts are keyed by GL code (and optional branch scope)
//! and re-running creates nothing new.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use core_kernel::{BranchId, Currency, GlAccountId, Lifecycle, StaffId};

use crate::error::LedgerError;

/// Cash In Hand - the default cash account for branch tills
pub const CASH_IN_HAND: &str = "1010";
/// Loan Receivable - Principal
pub const LOAN_RECEIVABLE_PRINCIPAL: &str = "1810";
/// Interest Income - Loans
pub const INTEREST_INCOME_LOANS: &str = "4010";

/// The side on which an account's balance normally increases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormalBalance {
    Debit,
    Credit,
}

impl fmt::Display for NormalBalance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NormalBalance::Debit => write!(f, "debit"),
            NormalBalance::Credit => write!(f, "credit"),
        }
    }
}

/// The five account types of the chart of accounts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    Asset,
    Liability,
    Equity,
    Income,
    Expense,
}

impl AccountType {
    /// Returns the normal balance side for this account type
    pub fn normal_balance(&self) -> NormalBalance {
        match self {
            AccountType::Asset | AccountType::Expense => NormalBalance::Debit,
            AccountType::Liability | AccountType::Equity | AccountType::Income => {
                NormalBalance::Credit
            }
        }
    }

    /// Returns true if this account type has a debit normal balance
    pub fn is_debit_normal(&self) -> bool {
        self.normal_balance() == NormalBalance::Debit
    }

    /// Returns the stable string tag used in storage
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Asset => "asset",
            AccountType::Liability => "liability",
            AccountType::Equity => "equity",
            AccountType::Income => "income",
            AccountType::Expense => "expense",
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Sub-classification of accounts, keyed by GL code prefix
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountCategory {
    pub name: String,
    pub code_prefix: String,
    pub account_type: AccountType,
    pub description: Option<String>,
}

impl AccountCategory {
    pub fn new(
        code_prefix: impl Into<String>,
        name: impl Into<String>,
        account_type: AccountType,
    ) -> Self {
        Self {
            name: name.into(),
            code_prefix: code_prefix.into(),
            account_type,
            description: None,
        }
    }
}

/// A general-ledger account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlAccount {
    pub id: GlAccountId,
    /// Natural key, e.g. "1010"
    pub gl_code: String,
    pub name: String,
    pub account_type: AccountType,
    /// Category code prefix, e.g. "10" for Cash & Bank
    pub category_prefix: Option<String>,
    /// Branch scope; None for system-wide accounts
    pub branch: Option<BranchId>,
    pub currency: Currency,
    /// Control accounts aggregate sub-ledgers and take no direct postings
    pub is_control_account: bool,
    /// Whether user-initiated manual entries may target this account
    pub allows_manual_entries: bool,
    pub lifecycle: Lifecycle,
    pub description: Option<String>,
}

impl GlAccount {
    /// Creates a new active, system-wide account
    pub fn new(
        gl_code: impl Into<String>,
        name: impl Into<String>,
        account_type: AccountType,
    ) -> Self {
        Self {
            id: GlAccountId::new(),
            gl_code: gl_code.into(),
            name: name.into(),
            account_type,
            category_prefix: None,
            branch: None,
            currency: Currency::NGN,
            is_control_account: false,
            allows_manual_entries: true,
            lifecycle: Lifecycle::active(),
            description: None,
        }
    }

    /// Sets the category code prefix
    pub fn with_category(mut self, code_prefix: impl Into<String>) -> Self {
        self.category_prefix = Some(code_prefix.into());
        self
    }

    /// Scopes the account to a branch
    pub fn for_branch(mut self, branch: BranchId) -> Self {
        self.branch = Some(branch);
        self
    }

    /// Marks the account as system-generated-postings-only
    pub fn system_only(mut self) -> Self {
        self.allows_manual_entries = false;
        self
    }

    /// Marks the account as a control (aggregate-only) account
    pub fn as_control(mut self) -> Self {
        self.is_control_account = true;
        self
    }

    /// Sets the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Returns the normal balance side, derived from the account type
    pub fn normal_balance(&self) -> NormalBalance {
        self.account_type.normal_balance()
    }

    pub fn is_active(&self) -> bool {
        self.lifecycle.is_active
    }
}

impl fmt::Display for GlAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.gl_code, self.name)
    }
}

/// Savings product types, each mapping to its own liability account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SavingsProductType {
    Regular,
    Fixed,
    Target,
    Children,
}

impl SavingsProductType {
    /// Returns the GL code of the liability account deposits of this
    /// product type are credited to
    pub fn liability_account_code(&self) -> &'static str {
        match self {
            SavingsProductType::Regular => "2010",
            SavingsProductType::Fixed => "2020",
            SavingsProductType::Target => "2030",
            SavingsProductType::Children => "2040",
        }
    }

    /// Parses a storage tag, defaulting unknown values to Regular
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "fixed" => SavingsProductType::Fixed,
            "target" => SavingsProductType::Target,
            "children" => SavingsProductType::Children,
            _ => SavingsProductType::Regular,
        }
    }
}

/// Fee types collected from clients, each mapping to an income account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeeType {
    Registration,
    LoanForm,
    LoanInsurance,
    Processing,
    RiskPremium,
    Tech,
    LatePayment,
}

impl FeeType {
    /// Returns the GL code of the income account this fee is credited to
    pub fn income_account_code(&self) -> &'static str {
        match self {
            FeeType::Registration => "4110",
            FeeType::LoanForm => "4120",
            FeeType::LoanInsurance => "4130",
            FeeType::Processing => "4140",
            FeeType::RiskPremium => "4150",
            FeeType::Tech => "4160",
            FeeType::LatePayment => "4170",
        }
    }

    /// Human-readable name used in journal narrations
    pub fn display_name(&self) -> &'static str {
        match self {
            FeeType::Registration => "Registration Fee",
            FeeType::LoanForm => "Loan Form Fee",
            FeeType::LoanInsurance => "Loan Insurance Fee",
            FeeType::Processing => "Processing Fee",
            FeeType::RiskPremium => "Risk Premium",
            FeeType::Tech => "Tech Fee",
            FeeType::LatePayment => "Late Payment Fee",
        }
    }

    /// Parses a storage tag, defaulting unknown values to Registration
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "loan_form_fee" => FeeType::LoanForm,
            "loan_insurance_fee" => FeeType::LoanInsurance,
            "processing_fee" => FeeType::Processing,
            "risk_premium" => FeeType::RiskPremium,
            "tech_fee" => FeeType::Tech,
            "late_payment_fee" => FeeType::LatePayment,
            _ => FeeType::Registration,
        }
    }
}

/// The chart of accounts: categories plus GL accounts keyed by
/// (gl_code, branch scope)
#[derive(Debug, Clone, Default)]
pub struct ChartOfAccounts {
    categories: BTreeMap<String, AccountCategory>,
    accounts: BTreeMap<(String, Option<BranchId>), GlAccount>,
}

impl ChartOfAccounts {
    /// Creates an empty chart
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a chart seeded with the standard taxonomy
    pub fn standard() -> Self {
        let mut chart = Self::new();
        chart.initialize();
        chart
    }

    /// Idempotently seeds the standard microfinance account taxonomy
    ///
    /// Accounts and categories are upserted by natural key (category code
    /// prefix, account GL code), so re-running never duplicates rows.
    /// Returns the number of accounts created by this call.
    pub fn initialize(&mut self) -> usize {
        for category in standard_categories() {
            self.upsert_category(category);
        }

        let mut created = 0;
        for account in standard_accounts() {
            if self.upsert_account(account) {
                created += 1;
            }
        }
        created
    }

    /// Inserts a category unless one with the same code prefix exists
    pub fn upsert_category(&mut self, category: AccountCategory) -> bool {
        if self.categories.contains_key(&category.code_prefix) {
            return false;
        }
        self.categories.insert(category.code_prefix.clone(), category);
        true
    }

    /// Inserts an account unless one with the same (gl_code, branch) exists
    ///
    /// Returns true if the account was created.
    pub fn upsert_account(&mut self, account: GlAccount) -> bool {
        let key = (account.gl_code.clone(), account.branch);
        if self.accounts.contains_key(&key) {
            return false;
        }
        self.accounts.insert(key, account);
        true
    }

    /// Looks up an active account by GL code
    ///
    /// Prefers a branch-scoped account when `branch` is given, falling back
    /// to the system-wide account with the same code.
    ///
    /// # Errors
    ///
    /// `AccountNotFound` if no account carries the code; `AccountInactive`
    /// if accounts exist but none is active.
    pub fn lookup(
        &self,
        gl_code: &str,
        branch: Option<BranchId>,
    ) -> Result<&GlAccount, LedgerError> {
        let branch_scoped = branch.and_then(|b| self.accounts.get(&(gl_code.to_string(), Some(b))));
        if let Some(account) = branch_scoped {
            if account.is_active() {
                return Ok(account);
            }
        }

        let global = self.accounts.get(&(gl_code.to_string(), None));
        if let Some(account) = global {
            if account.is_active() {
                return Ok(account);
            }
        }

        if branch_scoped.is_some() || global.is_some() {
            Err(LedgerError::AccountInactive {
                gl_code: gl_code.to_string(),
            })
        } else {
            Err(LedgerError::AccountNotFound {
                gl_code: gl_code.to_string(),
            })
        }
    }

    /// Returns the account with this exact (gl_code, branch) key, active or not
    pub fn get(&self, gl_code: &str, branch: Option<BranchId>) -> Option<&GlAccount> {
        self.accounts.get(&(gl_code.to_string(), branch))
    }

    /// Finds an account by its identifier
    pub fn account_by_id(&self, id: GlAccountId) -> Option<&GlAccount> {
        self.accounts.values().find(|a| a.id == id)
    }

    /// Deactivates an account; it stays in the chart for history
    pub fn deactivate(
        &mut self,
        gl_code: &str,
        branch: Option<BranchId>,
        by: StaffId,
        reason: impl Into<String>,
    ) -> Result<(), LedgerError> {
        let account = self
            .accounts
            .get_mut(&(gl_code.to_string(), branch))
            .ok_or_else(|| LedgerError::AccountNotFound {
                gl_code: gl_code.to_string(),
            })?;
        account.lifecycle.deactivate(by, reason);
        Ok(())
    }

    /// Iterates all accounts in GL-code order
    pub fn accounts(&self) -> impl Iterator<Item = &GlAccount> {
        self.accounts.values()
    }

    /// Iterates all categories in code-prefix order
    pub fn categories(&self) -> impl Iterator<Item = &AccountCategory> {
        self.categories.values()
    }
}

fn standard_categories() -> Vec<AccountCategory> {
    vec![
        AccountCategory::new("10", "Cash & Bank", AccountType::Asset),
        AccountCategory::new("18", "Loan Receivables", AccountType::Asset),
        AccountCategory::new("19", "Other Assets", AccountType::Asset),
        AccountCategory::new("20", "Savings & Deposits", AccountType::Liability),
        AccountCategory::new("21", "Interest Payable", AccountType::Liability),
        AccountCategory::new("29", "Other Liabilities", AccountType::Liability),
        AccountCategory::new("30", "Capital", AccountType::Equity),
        AccountCategory::new("31", "Current Year", AccountType::Equity),
        AccountCategory::new("40", "Interest Income", AccountType::Income),
        AccountCategory::new("41", "Fee Income", AccountType::Income),
        AccountCategory::new("50", "Interest Expense", AccountType::Expense),
        AccountCategory::new("51", "Operating Expenses", AccountType::Expense),
        AccountCategory::new("59", "Loan Loss Provisions", AccountType::Expense),
    ]
}

fn standard_accounts() -> Vec<GlAccount> {
    vec![
        // Assets - Cash & Bank
        GlAccount::new("1010", "Cash In Hand", AccountType::Asset)
            .with_category("10")
            .with_description("Physical cash held at branches"),
        GlAccount::new("1020", "Cash at Bank - Main Operating Account", AccountType::Asset)
            .with_category("10"),
        GlAccount::new("1030", "Cash at Bank - Savings Account", AccountType::Asset)
            .with_category("10"),
        GlAccount::new("1040", "Petty Cash", AccountType::Asset).with_category("10"),
        // Assets - Loan Receivables
        GlAccount::new("1810", "Loan Receivable - Principal", AccountType::Asset)
            .with_category("18")
            .with_description("Outstanding loan principal from clients")
            .system_only(),
        GlAccount::new("1820", "Interest Receivable - Loans", AccountType::Asset)
            .with_category("18")
            .system_only(),
        GlAccount::new("1830", "Loan Fees Receivable", AccountType::Asset).with_category("18"),
        // Assets - Other
        GlAccount::new("1910", "Prepaid Expenses", AccountType::Asset).with_category("19"),
        GlAccount::new("1920", "Fixed Assets", AccountType::Asset).with_category("19"),
        // Liabilities - Savings & Deposits
        GlAccount::new("2010", "Savings Deposits - Regular", AccountType::Liability)
            .with_category("20")
            .system_only(),
        GlAccount::new("2020", "Savings Deposits - Fixed", AccountType::Liability)
            .with_category("20")
            .system_only(),
        GlAccount::new("2030", "Savings Deposits - Target", AccountType::Liability)
            .with_category("20")
            .system_only(),
        GlAccount::new("2040", "Savings Deposits - Children", AccountType::Liability)
            .with_category("20")
            .system_only(),
        // Liabilities - Interest Payable
        GlAccount::new("2110", "Interest Payable - Savings", AccountType::Liability)
            .with_category("21")
            .system_only(),
        // Liabilities - Other
        GlAccount::new("2910", "Accounts Payable", AccountType::Liability).with_category("29"),
        GlAccount::new("2920", "Accrued Expenses", AccountType::Liability).with_category("29"),
        // Equity
        GlAccount::new("3010", "Share Capital", AccountType::Equity).with_category("30"),
        GlAccount::new("3020", "Retained Earnings", AccountType::Equity).with_category("30"),
        GlAccount::new("3110", "Current Year Profit/Loss", AccountType::Equity)
            .with_category("31")
            .system_only(),
        // Income - Interest
        GlAccount::new("4010", "Interest Income - Loans", AccountType::Income)
            .with_category("40")
            .with_description("Interest earned on loans to clients")
            .system_only(),
        GlAccount::new("4020", "Interest Income - Investments", AccountType::Income)
            .with_category("40"),
        // Income - Fees
        GlAccount::new("4110", "Registration Fee Income", AccountType::Income)
            .with_category("41")
            .system_only(),
        GlAccount::new("4120", "Loan Application Fee Income", AccountType::Income)
            .with_category("41")
            .system_only(),
        GlAccount::new("4130", "Loan Insurance Fee Income", AccountType::Income)
            .with_category("41")
            .system_only(),
        GlAccount::new("4140", "Processing Fee Income", AccountType::Income)
            .with_category("41")
            .system_only(),
        GlAccount::new("4150", "Risk Premium Income", AccountType::Income)
            .with_category("41")
            .system_only(),
        GlAccount::new("4160", "Technology Fee Income", AccountType::Income)
            .with_category("41")
            .system_only(),
        GlAccount::new("4170", "Late Payment Fee Income", AccountType::Income)
            .with_category("41")
            .system_only(),
        // Expenses
        GlAccount::new("5010", "Interest Expense - Savings", AccountType::Expense)
            .with_category("50")
            .system_only(),
        GlAccount::new("5110", "Salaries & Wages", AccountType::Expense).with_category("51"),
        GlAccount::new("5120", "Rent Expense", AccountType::Expense).with_category("51"),
        GlAccount::new("5130", "Utilities Expense", AccountType::Expense).with_category("51"),
        GlAccount::new("5140", "Office Supplies", AccountType::Expense).with_category("51"),
        GlAccount::new("5910", "Provision for Bad Debts", AccountType::Expense)
            .with_category("59"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normal_balance_derivation() {
        assert!(AccountType::Asset.is_debit_normal());
        assert!(AccountType::Expense.is_debit_normal());
        assert!(!AccountType::Liability.is_debit_normal());
        assert!(!AccountType::Equity.is_debit_normal());
        assert!(!AccountType::Income.is_debit_normal());
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let mut chart = ChartOfAccounts::new();
        let created = chart.initialize();
        assert!(created > 0);

        let created_again = chart.initialize();
        assert_eq!(created_again, 0);
        assert_eq!(chart.accounts().count(), created);
    }

    #[test]
    fn test_lookup_prefers_branch_scoped_account() {
        let branch = BranchId::new();
        let mut chart = ChartOfAccounts::standard();
        chart.upsert_account(
            GlAccount::new("1010", "Cash In Hand - Main Branch", AccountType::Asset)
                .with_category("10")
                .for_branch(branch),
        );

        let found = chart.lookup("1010", Some(branch)).unwrap();
        assert_eq!(found.branch, Some(branch));

        let other_branch = chart.lookup("1010", Some(BranchId::new())).unwrap();
        assert_eq!(other_branch.branch, None);
    }

    #[test]
    fn test_lookup_missing_and_inactive() {
        let mut chart = ChartOfAccounts::standard();
        assert!(matches!(
            chart.lookup("9999", None),
            Err(LedgerError::AccountNotFound { .. })
        ));

        chart
            .deactivate("1040", None, StaffId::new(), "till retired")
            .unwrap();
        assert!(matches!(
            chart.lookup("1040", None),
            Err(LedgerError::AccountInactive { .. })
        ));
    }

    #[test]
    fn test_inactive_branch_account_falls_back_to_global() {
        let branch = BranchId::new();
        let mut chart = ChartOfAccounts::standard();
        chart.upsert_account(
            GlAccount::new("1010", "Cash In Hand - Old Till", AccountType::Asset)
                .for_branch(branch),
        );
        chart
            .deactivate("1010", Some(branch), StaffId::new(), "till replaced")
            .unwrap();

        let found = chart.lookup("1010", Some(branch)).unwrap();
        assert_eq!(found.branch, None);
    }

    #[test]
    fn test_product_type_mapping() {
        assert_eq!(SavingsProductType::Regular.liability_account_code(), "2010");
        assert_eq!(SavingsProductType::Fixed.liability_account_code(), "2020");
        assert_eq!(SavingsProductType::Target.liability_account_code(), "2030");
        assert_eq!(SavingsProductType::Children.liability_account_code(), "2040");
        assert_eq!(
            SavingsProductType::from_tag("unknown"),
            SavingsProductType::Regular
        );
    }

    #[test]
    fn test_fee_type_mapping() {
        assert_eq!(FeeType::Registration.income_account_code(), "4110");
        assert_eq!(FeeType::LoanForm.income_account_code(), "4120");
        assert_eq!(FeeType::LoanInsurance.income_account_code(), "4130");
        assert_eq!(FeeType::Processing.income_account_code(), "4140");
        assert_eq!(FeeType::RiskPremium.income_account_code(), "4150");
        assert_eq!(FeeType::Tech.income_account_code(), "4160");
        assert_eq!(FeeType::LatePayment.income_account_code(), "4170");
        assert_eq!(FeeType::from_tag("nonsense"), FeeType::Registration);
    }

    #[test]
    fn test_standard_chart_mapped_accounts_exist_and_are_system_only() {
        let chart = ChartOfAccounts::standard();

        for code in ["2010", "2020", "2030", "2040", "4110", "4170", "1810", "4010"] {
            let account = chart.lookup(code, None).unwrap();
            assert!(!account.allows_manual_entries, "{} should be system-only", code);
        }
    }
}
