use anyhow::{Context, Result};
use chrono::NaiveDate;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;

use crate::domain::{
    format_date, DetailMap, ExpenseRecord, IncomeRecord, MonthKey, RecordId, RecordKind,
};

use super::MIGRATION_001_INITIAL;

/// The two record tables addressable by delete.
/// SQL table names only ever come from this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Expenses,
    Income,
}

impl Table {
    pub fn table_name(&self) -> &'static str {
        match self {
            Table::Expenses => "transactions",
            Table::Income => "monthly_income",
        }
    }

    /// Accepts the user-facing names and the SQL table names.
    pub fn from_name(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "expenses" | "transactions" => Some(Table::Expenses),
            "income" | "monthly_income" => Some(Table::Income),
            _ => None,
        }
    }
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.table_name())
    }
}

/// Repository for persisting and querying expense and income records.
///
/// Holds a pool capped at a single connection. Each operation acquires it for
/// its own duration; writes run inside a transaction that rolls back on drop.
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to a SQLite database URL.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(database_url)
            .await
            .context("Failed to connect to database")?;
        Ok(Self::new(pool))
    }

    /// Ensure both tables exist. Safe to run on every startup.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(MIGRATION_001_INITIAL)
            .execute(&self.pool)
            .await
            .context("Failed to run migration 001")?;
        Ok(())
    }

    /// Initialize a database (connect + migrate).
    pub async fn init(database_url: &str) -> Result<Self> {
        let repo = Self::connect(database_url).await?;
        repo.migrate().await?;
        Ok(repo)
    }

    /// Close the pool, waiting for the connection to be released.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    // ========================
    // Expense operations
    // ========================

    /// Save a new expense. Assigns the record's id.
    pub async fn save_expense(&self, record: &mut ExpenseRecord) -> Result<()> {
        let details_json = record
            .details
            .to_json()
            .context("Failed to serialize expense details")?;

        let mut tx = self.pool.begin().await.context("Failed to begin transaction")?;

        let result = sqlx::query(
            r#"
            INSERT INTO transactions (type, details, date, month)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(record.kind.as_str())
        .bind(&details_json)
        .bind(format_date(record.date))
        .bind(record.month().to_string())
        .execute(&mut *tx)
        .await
        .context("Failed to save expense")?;

        tx.commit().await.context("Failed to commit expense")?;

        record.id = result.last_insert_rowid();
        Ok(())
    }

    /// List all expenses by month, then date, then insertion order.
    pub async fn list_expenses(&self) -> Result<Vec<ExpenseRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT id, type, details, date, month
            FROM transactions
            WHERE type = ?
            ORDER BY month ASC, date ASC, id ASC
            "#,
        )
        .bind(RecordKind::Expense.as_str())
        .fetch_all(&self.pool)
        .await
        .context("Failed to list expenses")?;

        rows.iter().map(Self::row_to_expense).collect()
    }

    // ========================
    // Income operations
    // ========================

    /// Save a new income record. Assigns the record's id.
    pub async fn save_income(&self, record: &mut IncomeRecord) -> Result<()> {
        let details_json = record
            .details
            .to_json()
            .context("Failed to serialize income details")?;

        let mut tx = self.pool.begin().await.context("Failed to begin transaction")?;

        let result = sqlx::query("INSERT INTO monthly_income (details, month) VALUES (?, ?)")
            .bind(&details_json)
            .bind(record.month.to_string())
            .execute(&mut *tx)
            .await
            .context("Failed to save income")?;

        tx.commit().await.context("Failed to commit income")?;

        record.id = result.last_insert_rowid();
        Ok(())
    }

    /// List all income records by month, then insertion order.
    pub async fn list_income(&self) -> Result<Vec<IncomeRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT id, details, month
            FROM monthly_income
            ORDER BY month ASC, id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list income")?;

        rows.iter().map(Self::row_to_income).collect()
    }

    // ========================
    // Shared operations
    // ========================

    /// Delete a record by id. Returns the number of rows removed (0 if none matched).
    pub async fn delete(&self, table: Table, id: RecordId) -> Result<u64> {
        let query = match table {
            Table::Expenses => "DELETE FROM transactions WHERE id = ?",
            Table::Income => "DELETE FROM monthly_income WHERE id = ?",
        };

        let mut tx = self.pool.begin().await.context("Failed to begin transaction")?;
        let result = sqlx::query(query)
            .bind(id)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("Failed to delete from {}", table))?;
        tx.commit().await.context("Failed to commit delete")?;

        Ok(result.rows_affected())
    }

    fn row_to_expense(row: &SqliteRow) -> Result<ExpenseRecord> {
        let id: RecordId = row.get("id");
        let kind_str: String = row.get("type");
        let details_json: String = row.get("details");
        let date_str: String = row.get("date");
        let month_str: String = row.get("month");

        RecordKind::from_str(&kind_str)
            .ok_or_else(|| anyhow::anyhow!("Invalid record type in expense {}: {}", id, kind_str))?;
        let details = DetailMap::from_json(&details_json)
            .with_context(|| format!("Corrupt details in expense {}", id))?;
        let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")
            .with_context(|| format!("Invalid date in expense {}: {}", id, date_str))?;

        let record = ExpenseRecord::new(date, details).with_id(id);
        anyhow::ensure!(
            record.month().to_string() == month_str,
            "Month {} does not match date {} in expense {}",
            month_str,
            date_str,
            id
        );

        Ok(record)
    }

    fn row_to_income(row: &SqliteRow) -> Result<IncomeRecord> {
        let id: RecordId = row.get("id");
        let details_json: String = row.get("details");
        let month_str: String = row.get("month");

        let details = DetailMap::from_json(&details_json)
            .with_context(|| format!("Corrupt details in income {}", id))?;
        let month = MonthKey::parse(&month_str)
            .ok_or_else(|| anyhow::anyhow!("Invalid month in income {}: {}", id, month_str))?;

        Ok(IncomeRecord::new(month, details).with_id(id))
    }
}
