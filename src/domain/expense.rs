use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Amount, DetailMap, MonthKey};

/// Row identifier assigned by the store on insert.
pub type RecordId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordKind {
    /// Money spent on a given day
    Expense,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Expense => "Expense",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Expense" => Some(RecordKind::Expense),
            _ => None,
        }
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One day's spending, split by category.
/// Records are immutable once stored; corrections are a delete plus a new record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpenseRecord {
    /// Assigned by the repository; 0 until saved
    pub id: RecordId,
    pub kind: RecordKind,
    pub details: DetailMap,
    pub date: NaiveDate,
    month: MonthKey,
}

impl ExpenseRecord {
    /// Create an unsaved expense. The month is always derived from the date.
    pub fn new(date: NaiveDate, details: DetailMap) -> Self {
        Self {
            id: 0,
            kind: RecordKind::Expense,
            details,
            date,
            month: MonthKey::of(date),
        }
    }

    pub fn with_id(mut self, id: RecordId) -> Self {
        self.id = id;
        self
    }

    pub fn month(&self) -> MonthKey {
        self.month
    }

    /// Sum of this day's amounts.
    pub fn daily_total(&self) -> Amount {
        self.details.total()
    }
}
