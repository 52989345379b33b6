use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

use crate::domain::{Amount, DetailMap, ExpenseRecord, IncomeRecord, MonthKey, RecordId};

/// Expenses of one month, with the per-day records that make it up.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyExpenses {
    pub month: MonthKey,
    pub monthly_total: Amount,
    pub daily_entries: Vec<DailyEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyEntry {
    pub id: RecordId,
    pub date: NaiveDate,
    pub details: DetailMap,
    pub daily_total: Amount,
}

/// One bar of the monthly expense chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MonthlyTotal {
    pub month: MonthKey,
    pub total: Amount,
}

/// One income record with its summed total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IncomeLine {
    pub id: RecordId,
    pub month: MonthKey,
    pub details: DetailMap,
    pub monthly_total: Amount,
}

/// Group expenses by month.
///
/// Months appear in the order they are first seen in `records`, and records
/// keep their input order within a month. Monthly totals are accumulated in
/// that same order.
pub fn group_expenses_by_month(records: &[ExpenseRecord]) -> Vec<MonthlyExpenses> {
    let mut groups: Vec<MonthlyExpenses> = Vec::new();
    let mut index: HashMap<MonthKey, usize> = HashMap::new();

    for record in records {
        let daily_total = record.daily_total();
        let slot = *index.entry(record.month()).or_insert_with(|| {
            groups.push(MonthlyExpenses {
                month: record.month(),
                monthly_total: 0.0,
                daily_entries: Vec::new(),
            });
            groups.len() - 1
        });

        let group = &mut groups[slot];
        group.monthly_total += daily_total;
        group.daily_entries.push(DailyEntry {
            id: record.id,
            date: record.date,
            details: record.details.clone(),
            daily_total,
        });
    }

    groups
}

/// Total expenses per month, ascending by month regardless of input order.
pub fn sum_monthly_totals(records: &[ExpenseRecord]) -> Vec<MonthlyTotal> {
    let mut totals: BTreeMap<MonthKey, Amount> = BTreeMap::new();
    for record in records {
        *totals.entry(record.month()).or_insert(0.0) += record.daily_total();
    }

    totals
        .into_iter()
        .map(|(month, total)| MonthlyTotal { month, total })
        .collect()
}

/// One line per income record. Records sharing a month stay separate.
pub fn format_income_view(records: &[IncomeRecord]) -> Vec<IncomeLine> {
    records
        .iter()
        .map(|record| IncomeLine {
            id: record.id,
            month: record.month,
            details: record.details.clone(),
            monthly_total: record.total(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expense(id: RecordId, date: &str, details: &[(&str, Amount)]) -> ExpenseRecord {
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap();
        ExpenseRecord::new(date, details.iter().copied().collect()).with_id(id)
    }

    fn income(id: RecordId, month: &str, details: &[(&str, Amount)]) -> IncomeRecord {
        IncomeRecord::new(MonthKey::parse(month).unwrap(), details.iter().copied().collect())
            .with_id(id)
    }

    #[test]
    fn test_group_single_month() {
        let records = vec![
            expense(1, "2024-01-05", &[("food", 7.0), ("transport", 3.0)]),
            expense(2, "2024-01-06", &[("food", 5.0)]),
        ];

        let groups = group_expenses_by_month(&records);

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].month.to_string(), "2024-01");
        assert_eq!(groups[0].monthly_total, 15.0);

        let entries = &groups[0].daily_entries;
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].id, 1);
        assert_eq!(entries[0].daily_total, 10.0);
        assert_eq!(entries[1].id, 2);
        assert_eq!(entries[1].daily_total, 5.0);
    }

    #[test]
    fn test_group_keeps_first_seen_month_order() {
        let records = vec![
            expense(1, "2024-03-01", &[("rent", 500.0)]),
            expense(2, "2024-01-10", &[("food", 20.0)]),
            expense(3, "2024-03-15", &[("food", 12.0)]),
        ];

        let groups = group_expenses_by_month(&records);
        let months: Vec<String> = groups.iter().map(|g| g.month.to_string()).collect();

        assert_eq!(months, vec!["2024-03", "2024-01"]);
        assert_eq!(groups[0].monthly_total, 512.0);
        let ids: Vec<RecordId> = groups[0].daily_entries.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_group_sums_in_input_order() {
        let records = vec![
            expense(1, "2024-01-01", &[("a", 0.1)]),
            expense(2, "2024-01-02", &[("b", 0.2)]),
            expense(3, "2024-01-03", &[("c", 0.3)]),
        ];

        let groups = group_expenses_by_month(&records);

        // Left-to-right float addition, not any other association
        assert_eq!(groups[0].monthly_total, 0.0 + 0.1 + 0.2 + 0.3);
    }

    #[test]
    fn test_group_empty() {
        assert!(group_expenses_by_month(&[]).is_empty());
    }

    #[test]
    fn test_sum_monthly_totals_sorted() {
        let records = vec![
            expense(1, "2024-02-03", &[("food", 4.0)]),
            expense(2, "2024-01-09", &[("food", 6.0), ("taxi", 1.5)]),
            expense(3, "2024-02-20", &[("gift", 10.0)]),
        ];

        let totals = sum_monthly_totals(&records);
        let months: Vec<String> = totals.iter().map(|t| t.month.to_string()).collect();

        assert_eq!(months, vec!["2024-01", "2024-02"]);
        assert_eq!(totals[0].total, 7.5);
        assert_eq!(totals[1].total, 14.0);
    }

    #[test]
    fn test_sum_monthly_totals_across_years() {
        let records = vec![
            expense(1, "2024-01-01", &[("food", 1.0)]),
            expense(2, "2023-12-31", &[("food", 2.0)]),
        ];

        let totals = sum_monthly_totals(&records);
        let months: Vec<String> = totals.iter().map(|t| t.month.to_string()).collect();
        assert_eq!(months, vec!["2023-12", "2024-01"]);
    }

    #[test]
    fn test_income_view_does_not_merge_months() {
        let records = vec![
            income(1, "2024-01", &[("salary", 1000.0), ("freelance", 250.0)]),
            income(2, "2024-01", &[("bonus", 100.0)]),
            income(3, "2024-02", &[("salary", 1000.0)]),
        ];

        let lines = format_income_view(&records);

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].monthly_total, 1250.0);
        assert_eq!(lines[1].monthly_total, 100.0);
        assert_eq!(lines[1].month.to_string(), "2024-01");
        assert_eq!(lines[2].id, 3);
    }
}
