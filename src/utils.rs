use crate::error::{DashboardError, Result};
use chrono::{Datelike, Months, NaiveDate};

pub const MONTH_LABEL_FORMAT: &str = "%Y-%m";

pub fn first_day_of_next_month(date: NaiveDate) -> Option<NaiveDate> {
    let first = NaiveDate::from_ymd_opt(date.year(), date.month(), 1)?;
    first.checked_add_months(Months::new(1))
}

/// Parses a month label in the format "YYYY-MM" and returns the first day of that month.
pub fn parse_month_label(label: &str) -> Result<NaiveDate> {
    let trimmed = label.trim();
    // chrono accepts unpadded months, so pin the exact shape first
    let well_formed = trimmed.len() == 7
        && trimmed.as_bytes()[4] == b'-'
        && trimmed
            .chars()
            .enumerate()
            .all(|(i, c)| i == 4 || c.is_ascii_digit());

    if !well_formed {
        return Err(DashboardError::DateError(format!(
            "Invalid month label: {}. Expected YYYY-MM",
            label
        )));
    }

    NaiveDate::parse_from_str(&format!("{}-01", trimmed), "%Y-%m-%d").map_err(|_| {
        DashboardError::DateError(format!(
            "Invalid month label: {}. Expected YYYY-MM",
            label
        ))
    })
}

pub fn format_month_label(date: NaiveDate) -> String {
    date.format(MONTH_LABEL_FORMAT).to_string()
}

/// Returns `count` consecutive calendar month labels starting at `start` ("YYYY-MM").
///
/// # Examples
/// - `month_labels("2024-01", 3)` -> `["2024-01", "2024-02", "2024-03"]`
/// - `month_labels("2024-11", 3)` -> `["2024-11", "2024-12", "2025-01"]`
pub fn month_labels(start: &str, count: u32) -> Result<Vec<String>> {
    let mut current = parse_month_label(start)?;
    let mut labels = Vec::with_capacity(count as usize);

    for i in 0..count {
        labels.push(format_month_label(current));
        if i + 1 < count {
            current = first_day_of_next_month(current).ok_or_else(|| {
                DashboardError::DateError(format!(
                    "Month range starting at {} overflows the calendar after {} months",
                    start,
                    i + 1
                ))
            })?;
        }
    }

    Ok(labels)
}

/// Distinct values in first-appearance order.
pub fn distinct_in_order<'a, I>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = std::collections::HashSet::new();
    let mut distinct = Vec::new();
    for value in values {
        if seen.insert(value) {
            distinct.push(value.to_string());
        }
    }
    distinct
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_month_label() {
        let date = parse_month_label("2024-02").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());

        assert!(parse_month_label("2024-13").is_err());
        assert!(parse_month_label("2024-1").is_err());
        assert!(parse_month_label("January").is_err());
        assert!(parse_month_label("2024/01").is_err());
    }

    #[test]
    fn test_month_labels_calendar_order() {
        let labels = month_labels("2024-01", 12).unwrap();
        assert_eq!(labels.len(), 12);
        assert_eq!(labels[0], "2024-01");
        assert_eq!(labels[11], "2024-12");
    }

    #[test]
    fn test_month_labels_cross_year() {
        let labels = month_labels("2024-11", 3).unwrap();
        assert_eq!(labels, vec!["2024-11", "2024-12", "2025-01"]);
    }

    #[test]
    fn test_month_labels_zero_count() {
        assert!(month_labels("2024-01", 0).unwrap().is_empty());
    }

    #[test]
    fn test_first_day_of_next_month() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        assert_eq!(
            first_day_of_next_month(date),
            NaiveDate::from_ymd_opt(2024, 2, 1)
        );

        let date = NaiveDate::from_ymd_opt(2024, 12, 15).unwrap();
        assert_eq!(
            first_day_of_next_month(date),
            NaiveDate::from_ymd_opt(2025, 1, 1)
        );
    }

    #[test]
    fn test_distinct_in_order() {
        let values = ["b", "a", "b", "c", "a"];
        assert_eq!(distinct_in_order(values), vec!["b", "a", "c"]);
    }
}
