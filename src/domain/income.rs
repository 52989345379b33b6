use serde::{Deserialize, Serialize};

use super::{Amount, DetailMap, MonthKey, RecordId};

/// Income received in a month, split by source.
/// Several records may share a month; they are never merged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeRecord {
    pub id: RecordId,
    pub details: DetailMap,
    pub month: MonthKey,
}

impl IncomeRecord {
    pub fn new(month: MonthKey, details: DetailMap) -> Self {
        Self {
            id: 0,
            details,
            month,
        }
    }

    pub fn with_id(mut self, id: RecordId) -> Self {
        self.id = id;
        self
    }

    pub fn total(&self) -> Amount {
        self.details.total()
    }
}
