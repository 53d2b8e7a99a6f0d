//! Statement date handling.
//!
//! Dates are calendar days with no timezone. `NaiveDate` orders by
//! (year, month, day), which is the only comparison the engine needs.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::error::{Result, TallyError};

pub const STATEMENT_DATE_FORMAT: &str = "%m/%d/%Y";

static DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b\d{1,2}/\d{1,2}/\d{4}\b").expect("date pattern is valid")
});

/// Parse a `MM/DD/YYYY` statement date.
pub fn parse_statement_date(s: &str) -> Result<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, STATEMENT_DATE_FORMAT)
        .map_err(|_| TallyError::InvalidDate(s.to_string()))
}

/// Pull the two bounds of a date range out of a line of user input.
///
/// Accepts `12/01/2023 12/31/2023` as well as the prompt's own wording,
/// `from: 12/01/2023 to: 12/31/2023`.
pub fn parse_date_range(line: &str) -> Result<(NaiveDate, NaiveDate)> {
    let found: Vec<&str> = DATE_RE.find_iter(line).map(|m| m.as_str()).collect();
    let [from, to] = found.as_slice() else {
        return Err(TallyError::MalformedRange(line.trim().to_string()));
    };
    let from = parse_statement_date(from)
        .map_err(|_| TallyError::MalformedRange(line.trim().to_string()))?;
    let to = parse_statement_date(to)
        .map_err(|_| TallyError::MalformedRange(line.trim().to_string()))?;
    Ok((from, to))
}

/// Render a date the way statements print it.
pub fn format_statement_date(date: NaiveDate) -> String {
    date.format(STATEMENT_DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_parse_statement_date() {
        assert_eq!(parse_statement_date("12/05/2023").unwrap(), d(2023, 12, 5));
        assert_eq!(parse_statement_date(" 01/31/2024 ").unwrap(), d(2024, 1, 31));
    }

    #[test]
    fn test_parse_statement_date_rejects_other_formats() {
        assert_eq!(
            parse_statement_date("2023-12-05"),
            Err(TallyError::InvalidDate("2023-12-05".to_string()))
        );
        assert!(parse_statement_date("13/01/2023").is_err());
        assert!(parse_statement_date("").is_err());
    }

    #[test]
    fn test_chronological_order_is_year_month_day() {
        assert!(d(2023, 12, 31) < d(2024, 1, 1));
        assert!(d(2024, 1, 31) < d(2024, 2, 1));
        assert!(d(2024, 2, 1) < d(2024, 2, 2));
    }

    #[test]
    fn test_parse_date_range_plain_and_worded() {
        let expected = (d(2023, 12, 1), d(2023, 12, 31));
        assert_eq!(parse_date_range("12/01/2023 12/31/2023").unwrap(), expected);
        assert_eq!(
            parse_date_range("from: 12/01/2023 to: 12/31/2023").unwrap(),
            expected
        );
    }

    #[test]
    fn test_parse_date_range_malformed() {
        assert!(matches!(
            parse_date_range("12/01/2023"),
            Err(TallyError::MalformedRange(_))
        ));
        assert!(parse_date_range("12/01/2023 12/02/2023 12/03/2023").is_err());
        assert!(parse_date_range("12/41/2023 12/31/2023").is_err());
        assert!(parse_date_range("last month").is_err());
    }

    #[test]
    fn test_format_round_trips_statement_form() {
        assert_eq!(format_statement_date(d(2023, 3, 7)), "03/07/2023");
    }
}
