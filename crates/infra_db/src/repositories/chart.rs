//! Chart of accounts repository
//!
//! Idempotent account upserts (keyed by GL code and branch scope) and
//! branch-preferring lookups against the `gl_accounts` table.

use sqlx::{PgPool, Row};
use tracing::info;
use uuid::Uuid;

use core_kernel::{BranchId, GlAccountId, Lifecycle, StaffId};
use domain_ledger::{AccountType, ChartOfAccounts, GlAccount};

use crate::error::{classify, DatabaseError};

/// Repository for GL accounts
#[derive(Debug, Clone)]
pub struct ChartRepository {
    pool: PgPool,
}

impl ChartRepository {
    /// Creates a new repository over the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts an account unless one with the same (gl_code, branch) exists
    ///
    /// Returns true if the account was created. Re-running with the same
    /// account is a no-op, which makes chart initialization idempotent.
    pub async fn upsert_account(&self, account: &GlAccount) -> Result<bool, DatabaseError> {
        let result = sqlx::query(
            r#"
            INSERT INTO gl_accounts (
                account_id, gl_code, account_name, account_type, category_prefix,
                branch_id, currency, is_control_account, allows_manual_entries,
                is_active, description
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ON CONFLICT (gl_code, branch_id) DO NOTHING
            "#,
        )
        .bind(account.id.as_uuid())
        .bind(&account.gl_code)
        .bind(&account.name)
        .bind(account.account_type.as_str())
        .bind(&account.category_prefix)
        .bind(account.branch.map(Uuid::from))
        .bind(account.currency.code())
        .bind(account.is_control_account)
        .bind(account.allows_manual_entries)
        .bind(account.lifecycle.is_active)
        .bind(&account.description)
        .execute(&self.pool)
        .await
        .map_err(classify)?;

        Ok(result.rows_affected() > 0)
    }

    /// Seeds the standard microfinance chart of accounts
    ///
    /// Returns the number of accounts created; re-running creates none.
    pub async fn seed_standard_chart(&self) -> Result<usize, DatabaseError> {
        let chart = ChartOfAccounts::standard();
        let mut created = 0;

        for account in chart.accounts() {
            if self.upsert_account(account).await? {
                created += 1;
                info!(gl_code = %account.gl_code, name = %account.name, "account created");
            }
        }

        Ok(created)
    }

    /// Looks up an active account by GL code, preferring the branch-scoped
    /// account over the system-wide one
    pub async fn fetch_account(
        &self,
        gl_code: &str,
        branch: Option<BranchId>,
    ) -> Result<GlAccount, DatabaseError> {
        let row = sqlx::query(
            r#"
            SELECT account_id, gl_code, account_name, account_type, category_prefix,
                   branch_id, is_control_account, allows_manual_entries, is_active,
                   description
            FROM gl_accounts
            WHERE gl_code = $1
              AND is_active
              AND (branch_id = $2 OR branch_id IS NULL)
            ORDER BY branch_id NULLS LAST
            LIMIT 1
            "#,
        )
        .bind(gl_code)
        .bind(branch.map(Uuid::from))
        .fetch_optional(&self.pool)
        .await
        .map_err(classify)?
        .ok_or_else(|| DatabaseError::not_found("GlAccount", gl_code))?;

        account_from_row(&row)
    }

    /// Deactivates an account; rows are never deleted
    pub async fn deactivate_account(
        &self,
        gl_code: &str,
        branch: Option<BranchId>,
        by: StaffId,
        reason: &str,
    ) -> Result<(), DatabaseError> {
        let result = sqlx::query(
            r#"
            UPDATE gl_accounts
            SET is_active = FALSE, deactivated_at = now(),
                deactivated_by = $3, deactivation_reason = $4
            WHERE gl_code = $1 AND branch_id IS NOT DISTINCT FROM $2 AND is_active
            "#,
        )
        .bind(gl_code)
        .bind(branch.map(Uuid::from))
        .bind(by.as_uuid())
        .bind(reason)
        .execute(&self.pool)
        .await
        .map_err(classify)?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("GlAccount", gl_code));
        }
        Ok(())
    }

    /// Lists every account in GL-code order, active or not
    pub async fn list_accounts(&self) -> Result<Vec<GlAccount>, DatabaseError> {
        let rows = sqlx::query(
            r#"
            SELECT account_id, gl_code, account_name, account_type, category_prefix,
                   branch_id, is_control_account, allows_manual_entries, is_active,
                   description
            FROM gl_accounts
            ORDER BY gl_code, branch_id NULLS FIRST
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(classify)?;

        rows.iter().map(account_from_row).collect()
    }
}

fn account_from_row(row: &sqlx::postgres::PgRow) -> Result<GlAccount, DatabaseError> {
    let account_type = parse_account_type(&row.get::<String, _>("account_type"))?;
    let is_active: bool = row.get("is_active");

    let mut account = GlAccount {
        id: GlAccountId::from_uuid(row.get("account_id")),
        gl_code: row.get("gl_code"),
        name: row.get("account_name"),
        account_type,
        category_prefix: row.get("category_prefix"),
        branch: row.get::<Option<Uuid>, _>("branch_id").map(BranchId::from_uuid),
        currency: core_kernel::Currency::NGN,
        is_control_account: row.get("is_control_account"),
        allows_manual_entries: row.get("allows_manual_entries"),
        lifecycle: Lifecycle::active(),
        description: row.get("description"),
    };

    if !is_active {
        account.lifecycle.is_active = false;
    }

    Ok(account)
}

fn parse_account_type(tag: &str) -> Result<AccountType, DatabaseError> {
    match tag {
        "asset" => Ok(AccountType::Asset),
        "liability" => Ok(AccountType::Liability),
        "equity" => Ok(AccountType::Equity),
        "income" => Ok(AccountType::Income),
        "expense" => Ok(AccountType::Expense),
        other => Err(DatabaseError::ConstraintViolation(format!(
            "unknown account_type '{}'",
            other
        ))),
    }
}
