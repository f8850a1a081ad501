//! Ledger repository
//!
//! Database access for the double-entry journal. The journal entry header
//! and all of its lines are written in a single transaction - either
//! everything lands or nothing does - and the balance invariant is
//! re-verified at this layer before commit, independent of the engine.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Row};
use tracing::info;
use uuid::Uuid;

use core_kernel::{
    BranchId, ClientId, Currency, GlAccountId, JournalEntryId, JournalLineId, LoanId, Money,
    SavingsAccountId, StaffId, TransactionId,
};
use domain_ledger::{EntryStatus, EntryType, JournalEntry, JournalLine};

use crate::error::{classify, DatabaseError};

/// Repository for journal entries and their lines
#[derive(Debug, Clone)]
pub struct LedgerRepository {
    pool: PgPool,
}

impl LedgerRepository {
    /// Creates a new repository over the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Allocates the next journal number from the database sequence
    ///
    /// The sequence is the serialization point for numbering: concurrent
    /// callers always receive distinct, increasing numbers.
    pub async fn next_journal_number(&self, date: NaiveDate) -> Result<String, DatabaseError> {
        let sequence: i64 = sqlx::query_scalar("SELECT nextval('journal_number_seq')")
            .fetch_one(&self.pool)
            .await
            .map_err(classify)?;

        Ok(format!("JE-{}-{:06}", date.format("%Y%m%d"), sequence))
    }

    /// Persists a journal entry with all of its lines atomically
    ///
    /// Re-validates the double-entry invariants (≥2 lines, exact balance)
    /// before writing; the schema's check constraints enforce one-sided
    /// positive lines as a final guard. Nothing is committed on any
    /// failure.
    pub async fn insert_entry(&self, entry: &JournalEntry) -> Result<(), DatabaseError> {
        if entry.lines.len() < 2 {
            return Err(DatabaseError::ConstraintViolation(format!(
                "journal entry must have at least 2 lines, got {}",
                entry.lines.len()
            )));
        }
        let debits = entry.total_debits();
        let credits = entry.total_credits();
        if debits != credits {
            return Err(DatabaseError::ConstraintViolation(format!(
                "journal entry not balanced: debits={}, credits={}",
                debits, credits
            )));
        }

        let mut tx = self.pool.begin().await.map_err(classify)?;

        sqlx::query(
            r#"
            INSERT INTO journal_entries (
                entry_id, journal_number, entry_type, status, transaction_date,
                posting_date, branch_id, description, reference_number,
                transaction_id, loan_id, savings_account_id, created_by,
                created_at, posted_by, posted_at, reversal_of
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            "#,
        )
        .bind(entry.id.as_uuid())
        .bind(&entry.journal_number)
        .bind(entry.entry_type.as_str())
        .bind(entry.status.as_str())
        .bind(entry.transaction_date)
        .bind(entry.posting_date)
        .bind(entry.branch.as_uuid())
        .bind(&entry.description)
        .bind(&entry.reference_number)
        .bind(entry.transaction.map(Uuid::from))
        .bind(entry.loan.map(Uuid::from))
        .bind(entry.savings_account.map(Uuid::from))
        .bind(entry.created_by.as_uuid())
        .bind(entry.created_at)
        .bind(entry.posted_by.map(Uuid::from))
        .bind(entry.posted_at)
        .bind(entry.reversal_of.map(Uuid::from))
        .execute(&mut *tx)
        .await
        .map_err(classify)?;

        for line in &entry.lines {
            sqlx::query(
                r#"
                INSERT INTO journal_entry_lines (
                    line_id, entry_id, account_id, gl_code,
                    debit_amount, credit_amount, description, client_id
                ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                "#,
            )
            .bind(line.id.as_uuid())
            .bind(entry.id.as_uuid())
            .bind(line.account_id.as_uuid())
            .bind(&line.gl_code)
            .bind(line.debit_amount.amount())
            .bind(line.credit_amount.amount())
            .bind(&line.description)
            .bind(line.client.map(Uuid::from))
            .execute(&mut *tx)
            .await
            .map_err(classify)?;
        }

        tx.commit().await.map_err(classify)?;

        info!(
            journal_number = %entry.journal_number,
            lines = entry.lines.len(),
            "journal entry persisted"
        );
        Ok(())
    }

    /// Posts a draft entry: draft → posted, compare-and-swap on status
    ///
    /// # Errors
    ///
    /// `ConstraintViolation` if the entry is not a draft (zero rows
    /// updated), so concurrent posts cannot double-apply.
    pub async fn mark_posted(
        &self,
        id: JournalEntryId,
        posted_by: StaffId,
        posting_date: NaiveDate,
    ) -> Result<(), DatabaseError> {
        let result = sqlx::query(
            r#"
            UPDATE journal_entries
            SET status = 'posted', posted_by = $2, posted_at = now(), posting_date = $3
            WHERE entry_id = $1 AND status = 'draft'
            "#,
        )
        .bind(id.as_uuid())
        .bind(posted_by.as_uuid())
        .bind(posting_date)
        .execute(&self.pool)
        .await
        .map_err(classify)?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::ConstraintViolation(format!(
                "journal entry {} is not a draft",
                id
            )));
        }
        Ok(())
    }

    /// Marks a posted entry reversed: posted → reversed, compare-and-swap
    ///
    /// The `status = 'posted'` predicate makes a second reversal of the
    /// same entry fail with zero rows updated.
    pub async fn mark_reversed(&self, id: JournalEntryId) -> Result<(), DatabaseError> {
        let result = sqlx::query(
            "UPDATE journal_entries SET status = 'reversed' WHERE entry_id = $1 AND status = 'posted'",
        )
        .bind(id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(classify)?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::ConstraintViolation(format!(
                "journal entry {} is not posted (already reversed?)",
                id
            )));
        }
        Ok(())
    }

    /// Fetches one entry with its lines
    pub async fn fetch_entry(&self, id: JournalEntryId) -> Result<JournalEntry, DatabaseError> {
        let row = sqlx::query(
            r#"
            SELECT entry_id, journal_number, entry_type, status, transaction_date,
                   posting_date, branch_id, description, reference_number,
                   transaction_id, loan_id, savings_account_id, created_by,
                   created_at, posted_by, posted_at, reversal_of
            FROM journal_entries
            WHERE entry_id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(classify)?
        .ok_or_else(|| DatabaseError::not_found("JournalEntry", id))?;

        let lines = self.fetch_lines(id).await?;
        entry_from_row(&row, lines)
    }

    /// Fetches the lines of an entry in insertion order
    pub async fn fetch_lines(&self, id: JournalEntryId) -> Result<Vec<JournalLine>, DatabaseError> {
        let rows = sqlx::query(
            r#"
            SELECT line_id, account_id, gl_code, debit_amount, credit_amount,
                   description, client_id
            FROM journal_entry_lines
            WHERE entry_id = $1
            ORDER BY created_at, line_id
            "#,
        )
        .bind(id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(classify)?;

        rows.iter().map(line_from_row).collect()
    }

    /// Finds entries carrying an external reference number
    ///
    /// Idempotency hook: callers supply a unique reference per business
    /// transaction and check for an existing entry before re-posting.
    pub async fn find_by_reference(
        &self,
        reference: &str,
    ) -> Result<Vec<JournalEntry>, DatabaseError> {
        let rows = sqlx::query(
            r#"
            SELECT entry_id FROM journal_entries
            WHERE reference_number = $1
            ORDER BY created_at
            "#,
        )
        .bind(reference)
        .fetch_all(&self.pool)
        .await
        .map_err(classify)?;

        let mut entries = Vec::with_capacity(rows.len());
        for row in rows {
            let id = JournalEntryId::from_uuid(row.get("entry_id"));
            entries.push(self.fetch_entry(id).await?);
        }
        Ok(entries)
    }

    /// Loads every entry (posted, reversed, and draft) with lines, in
    /// creation order - the rehydration path for an in-memory engine
    pub async fn fetch_all_entries(&self) -> Result<Vec<JournalEntry>, DatabaseError> {
        let rows = sqlx::query("SELECT entry_id FROM journal_entries ORDER BY created_at")
            .fetch_all(&self.pool)
            .await
            .map_err(classify)?;

        let mut entries = Vec::with_capacity(rows.len());
        for row in rows {
            let id = JournalEntryId::from_uuid(row.get("entry_id"));
            entries.push(self.fetch_entry(id).await?);
        }
        Ok(entries)
    }

    /// Computes an account's balance from posted lines, signed by the
    /// account's normal balance side
    pub async fn account_balance(
        &self,
        account_id: GlAccountId,
        as_of: Option<NaiveDate>,
    ) -> Result<Decimal, DatabaseError> {
        let balance: Option<Decimal> = sqlx::query_scalar(
            r#"
            SELECT SUM(
                CASE WHEN a.account_type IN ('asset', 'expense')
                     THEN l.debit_amount - l.credit_amount
                     ELSE l.credit_amount - l.debit_amount
                END
            )
            FROM journal_entry_lines l
            JOIN journal_entries e ON e.entry_id = l.entry_id
            JOIN gl_accounts a ON a.account_id = l.account_id
            WHERE l.account_id = $1
              AND e.status IN ('posted', 'reversed')
              AND ($2::date IS NULL OR e.transaction_date <= $2)
            "#,
        )
        .bind(account_id.as_uuid())
        .bind(as_of)
        .fetch_one(&self.pool)
        .await
        .map_err(classify)?;

        Ok(balance.unwrap_or(Decimal::ZERO))
    }

    /// Sums posted debits and credits per account over a date range
    ///
    /// Returns (gl_code, account_name, account_type, debit_sum, credit_sum)
    /// rows for trial-balance style reporting against the store itself.
    pub async fn movement_per_account(
        &self,
        date_from: NaiveDate,
        date_to: NaiveDate,
    ) -> Result<Vec<AccountMovement>, DatabaseError> {
        let rows = sqlx::query(
            r#"
            SELECT a.gl_code, a.account_name, a.account_type,
                   COALESCE(SUM(l.debit_amount), 0) AS debit_sum,
                   COALESCE(SUM(l.credit_amount), 0) AS credit_sum
            FROM journal_entry_lines l
            JOIN journal_entries e ON e.entry_id = l.entry_id
            JOIN gl_accounts a ON a.account_id = l.account_id
            WHERE e.status IN ('posted', 'reversed')
              AND e.transaction_date BETWEEN $1 AND $2
            GROUP BY a.gl_code, a.account_name, a.account_type
            ORDER BY a.gl_code
            "#,
        )
        .bind(date_from)
        .bind(date_to)
        .fetch_all(&self.pool)
        .await
        .map_err(classify)?;

        Ok(rows
            .iter()
            .map(|row| AccountMovement {
                gl_code: row.get("gl_code"),
                account_name: row.get("account_name"),
                account_type: row.get("account_type"),
                debit_sum: row.get("debit_sum"),
                credit_sum: row.get("credit_sum"),
            })
            .collect())
    }
}

/// Per-account movement sums for store-level reporting
#[derive(Debug, Clone)]
pub struct AccountMovement {
    pub gl_code: String,
    pub account_name: String,
    pub account_type: String,
    pub debit_sum: Decimal,
    pub credit_sum: Decimal,
}

fn entry_from_row(
    row: &sqlx::postgres::PgRow,
    lines: Vec<JournalLine>,
) -> Result<JournalEntry, DatabaseError> {
    let entry_type = parse_entry_type(&row.get::<String, _>("entry_type"))?;
    let status = parse_status(&row.get::<String, _>("status"))?;

    Ok(JournalEntry {
        id: JournalEntryId::from_uuid(row.get("entry_id")),
        journal_number: row.get("journal_number"),
        entry_type,
        status,
        transaction_date: row.get("transaction_date"),
        posting_date: row.get("posting_date"),
        branch: BranchId::from_uuid(row.get("branch_id")),
        description: row.get("description"),
        reference_number: row.get("reference_number"),
        transaction: row
            .get::<Option<Uuid>, _>("transaction_id")
            .map(TransactionId::from_uuid),
        loan: row.get::<Option<Uuid>, _>("loan_id").map(LoanId::from_uuid),
        savings_account: row
            .get::<Option<Uuid>, _>("savings_account_id")
            .map(SavingsAccountId::from_uuid),
        created_by: StaffId::from_uuid(row.get("created_by")),
        created_at: row.get::<DateTime<Utc>, _>("created_at"),
        posted_by: row.get::<Option<Uuid>, _>("posted_by").map(StaffId::from_uuid),
        posted_at: row.get("posted_at"),
        reversal_of: row
            .get::<Option<Uuid>, _>("reversal_of")
            .map(JournalEntryId::from_uuid),
        lines,
    })
}

fn line_from_row(row: &sqlx::postgres::PgRow) -> Result<JournalLine, DatabaseError> {
    Ok(JournalLine {
        id: JournalLineId::from_uuid(row.get("line_id")),
        account_id: GlAccountId::from_uuid(row.get("account_id")),
        gl_code: row.get("gl_code"),
        debit_amount: Money::new(row.get("debit_amount"), Currency::NGN),
        credit_amount: Money::new(row.get("credit_amount"), Currency::NGN),
        description: row.get("description"),
        client: row.get::<Option<Uuid>, _>("client_id").map(ClientId::from_uuid),
    })
}

fn parse_entry_type(tag: &str) -> Result<EntryType, DatabaseError> {
    match tag {
        "loan_disbursement" => Ok(EntryType::LoanDisbursement),
        "loan_repayment" => Ok(EntryType::LoanRepayment),
        "savings_deposit" => Ok(EntryType::SavingsDeposit),
        "savings_withdrawal" => Ok(EntryType::SavingsWithdrawal),
        "fee_collection" => Ok(EntryType::FeeCollection),
        "manual" => Ok(EntryType::Manual),
        "reversal" => Ok(EntryType::Reversal),
        other => Err(DatabaseError::ConstraintViolation(format!(
            "unknown entry_type '{}'",
            other
        ))),
    }
}

fn parse_status(tag: &str) -> Result<EntryStatus, DatabaseError> {
    match tag {
        "draft" => Ok(EntryStatus::Draft),
        "posted" => Ok(EntryStatus::Posted),
        "reversed" => Ok(EntryStatus::Reversed),
        other => Err(DatabaseError::ConstraintViolation(format!(
            "unknown status '{}'",
            other
        ))),
    }
}
