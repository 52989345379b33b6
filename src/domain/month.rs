use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A calendar month, rendered as `YYYY-MM`.
/// Ordering is chronological, which matches the lexicographic order of the
/// rendered keys since years are always four digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        if is_supported_year(year) && (1..=12).contains(&month) {
            Some(Self { year, month })
        } else {
            None
        }
    }

    /// The month a date belongs to.
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Parse a `YYYY-MM` string. Single-digit months ("2024-1") are accepted
    /// and canonicalized.
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        if !has_four_digit_year(input) {
            return None;
        }
        let date = NaiveDate::parse_from_str(&format!("{}-01", input), "%Y-%m-%d").ok()?;
        Self::new(date.year(), date.month())
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid month '{}'", s))
    }
}

impl Serialize for MonthKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MonthKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Parse a `YYYY-MM-DD` date. Unpadded fields ("2024-1-5") are accepted;
/// the returned date always renders canonically.
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    let input = input.trim();
    if !has_four_digit_year(input) {
        return None;
    }
    let date = NaiveDate::parse_from_str(input, "%Y-%m-%d").ok()?;
    is_supported_year(date.year()).then_some(date)
}

/// Render a date as stored: `YYYY-MM-DD`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// chrono's `%Y` takes 1 to 4 digits or a signed year; require exactly 4.
fn has_four_digit_year(input: &str) -> bool {
    let year = input.split('-').next().unwrap_or_default();
    year.len() == 4 && year.bytes().all(|b| b.is_ascii_digit())
}

fn is_supported_year(year: i32) -> bool {
    (1..=9999).contains(&year)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_month() {
        let month = MonthKey::parse("2024-03").unwrap();
        assert_eq!(month.year(), 2024);
        assert_eq!(month.month(), 3);
        assert_eq!(month.to_string(), "2024-03");

        assert_eq!(MonthKey::parse("2024-3").unwrap().to_string(), "2024-03");
    }

    #[test]
    fn test_parse_month_invalid() {
        assert!(MonthKey::parse("2024-13").is_none());
        assert!(MonthKey::parse("2024-00").is_none());
        assert!(MonthKey::parse("2024").is_none());
        assert!(MonthKey::parse("2024-01-05").is_none());
        assert!(MonthKey::parse("March").is_none());
        assert!(MonthKey::parse("").is_none());
        assert!(MonthKey::parse("24-01").is_none());
        assert!(MonthKey::parse("+2024-01").is_none());
        assert!(MonthKey::parse("02024-01").is_none());
    }

    #[test]
    fn test_month_of_date() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        assert_eq!(MonthKey::of(date).to_string(), "2024-01");
    }

    #[test]
    fn test_month_ordering_is_chronological() {
        let mut months = vec![
            MonthKey::parse("2024-02").unwrap(),
            MonthKey::parse("2023-12").unwrap(),
            MonthKey::parse("2024-01").unwrap(),
        ];
        months.sort();
        let rendered: Vec<String> = months.iter().map(|m| m.to_string()).collect();
        assert_eq!(rendered, vec!["2023-12", "2024-01", "2024-02"]);
    }

    #[test]
    fn test_parse_date() {
        let date = parse_date("2024-01-05").unwrap();
        assert_eq!(format_date(date), "2024-01-05");

        // Unpadded input is canonicalized
        let date = parse_date("2024-1-5").unwrap();
        assert_eq!(format_date(date), "2024-01-05");

        // Early years are fine as long as all four digits are written
        let date = parse_date("0024-1-5").unwrap();
        assert_eq!(format_date(date), "0024-01-05");
    }

    #[test]
    fn test_parse_date_invalid() {
        assert!(parse_date("2024-13-01").is_none());
        assert!(parse_date("2024-02-30").is_none());
        assert!(parse_date("05/01/2024").is_none());
        assert!(parse_date("2024-01").is_none());
        assert!(parse_date("").is_none());
        assert!(parse_date("24-01-05").is_none());
        assert!(parse_date("+2024-01-05").is_none());
    }

    #[test]
    fn test_month_key_serializes_as_string() {
        let month = MonthKey::parse("2024-07").unwrap();
        assert_eq!(serde_json::to_string(&month).unwrap(), "\"2024-07\"");
        let back: MonthKey = serde_json::from_str("\"2024-07\"").unwrap();
        assert_eq!(back, month);
    }
}
