use crate::domain::{
    parse_date, DetailMap, EntryInput, ExpenseRecord, IncomeRecord, MonthKey, RecordId,
    SkipReason, MAX_ENTRIES,
};
use crate::storage::{Repository, Table};

use super::{
    format_income_view, group_expenses_by_month, sum_monthly_totals, AppError, EntryKind,
    IncomeLine, MonthlyExpenses, MonthlyTotal, ValidationError,
};

/// Application service providing the ledger's operations.
/// This is the interface any front end (CLI, GUI, ...) talks to.
pub struct LedgerService {
    repo: Repository,
}

/// Outcome of a delete request. Deleting a missing id is not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteResult {
    pub table: Table,
    pub id: RecordId,
    pub removed: bool,
}

impl LedgerService {
    /// Create a new ledger service with the given repository.
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// Open the database at the given path, creating the file and tables if
    /// needed. Safe to call on every startup.
    pub async fn open(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}?mode=rwc", database_path);
        let repo = Repository::init(&db_url).await?;
        tracing::debug!(path = database_path, "opened ledger database");
        Ok(Self::new(repo))
    }

    /// Release the store connection.
    pub async fn close(self) {
        self.repo.close().await;
    }

    // ========================
    // Expense operations
    // ========================

    /// Validate and record one day's expenses.
    pub async fn add_expense(
        &self,
        date: &str,
        entries: &[EntryInput],
    ) -> Result<ExpenseRecord, AppError> {
        let parsed_date =
            parse_date(date).ok_or_else(|| ValidationError::InvalidDate(date.trim().to_string()))?;
        let details = collect_details(entries, EntryKind::Expense)?;

        let mut record = ExpenseRecord::new(parsed_date, details);
        self.repo.save_expense(&mut record).await?;

        tracing::info!(
            id = record.id,
            date = %record.date,
            entries = record.details.len(),
            "recorded expense"
        );
        Ok(record)
    }

    /// All expenses, ordered by month, then date, then insertion order.
    pub async fn list_expenses(&self) -> Result<Vec<ExpenseRecord>, AppError> {
        Ok(self.repo.list_expenses().await?)
    }

    /// Expenses grouped by month, for the two-level listing.
    pub async fn expenses_by_month(&self) -> Result<Vec<MonthlyExpenses>, AppError> {
        let records = self.list_expenses().await?;
        Ok(group_expenses_by_month(&records))
    }

    /// Monthly expense totals in ascending month order, for the chart.
    pub async fn monthly_expense_totals(&self) -> Result<Vec<MonthlyTotal>, AppError> {
        let records = self.list_expenses().await?;
        Ok(sum_monthly_totals(&records))
    }

    // ========================
    // Income operations
    // ========================

    /// Validate and record a month's income.
    pub async fn add_income(
        &self,
        month: &str,
        entries: &[EntryInput],
    ) -> Result<IncomeRecord, AppError> {
        let parsed_month = MonthKey::parse(month)
            .ok_or_else(|| ValidationError::InvalidMonth(month.trim().to_string()))?;
        let details = collect_details(entries, EntryKind::Income)?;

        let mut record = IncomeRecord::new(parsed_month, details);
        self.repo.save_income(&mut record).await?;

        tracing::info!(
            id = record.id,
            month = %record.month,
            entries = record.details.len(),
            "recorded income"
        );
        Ok(record)
    }

    /// All income records, ordered by month, then insertion order.
    pub async fn list_income(&self) -> Result<Vec<IncomeRecord>, AppError> {
        Ok(self.repo.list_income().await?)
    }

    /// Income records with their totals, one line each.
    pub async fn income_view(&self) -> Result<Vec<IncomeLine>, AppError> {
        let records = self.list_income().await?;
        Ok(format_income_view(&records))
    }

    // ========================
    // Delete
    // ========================

    /// Delete a record by id from the named table.
    pub async fn delete_by_id(&self, table: &str, id: &str) -> Result<DeleteResult, AppError> {
        let table = Table::from_name(table)
            .ok_or_else(|| ValidationError::UnknownTable(table.trim().to_string()))?;
        let id: RecordId = id
            .trim()
            .parse()
            .map_err(|_| ValidationError::InvalidId(id.trim().to_string()))?;

        let removed = self.repo.delete(table, id).await?;
        if removed == 0 {
            tracing::debug!(%table, id, "delete matched no record");
        } else {
            tracing::info!(%table, id, "deleted record");
        }

        Ok(DeleteResult {
            table,
            id,
            removed: removed > 0,
        })
    }
}

/// Filter raw entries into a detail mapping before anything touches the store.
fn collect_details(entries: &[EntryInput], kind: EntryKind) -> Result<DetailMap, ValidationError> {
    if entries.len() > MAX_ENTRIES {
        return Err(ValidationError::TooManyEntries(entries.len()));
    }

    let (details, skipped) = DetailMap::from_inputs(entries);
    for (index, reason) in &skipped {
        match reason {
            SkipReason::EmptyName => tracing::debug!(entry = index, "skipped entry without a name"),
            SkipReason::BadAmount(why) => {
                tracing::debug!(entry = index, reason = %why, "skipped entry with bad amount")
            }
        }
    }

    if details.is_empty() {
        return Err(ValidationError::NoValidEntries(kind));
    }
    Ok(details)
}
