//! Narrow a newest-first statement to an inclusive date window.
//!
//! Statements list the most recent transaction first, so a window is one
//! contiguous run of the list. Both ends are located with a binary search.

use std::fmt;
use std::ops::Range;

use chrono::NaiveDate;

use crate::date::format_statement_date;
use crate::transaction::Transaction;

/// Why a selection came back empty. None of these are errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeWarning {
    NoTransactions,
    /// `from` is after `to`.
    Inverted { from: NaiveDate, to: NaiveDate },
    /// `from` is after the newest transaction on the statement.
    StartsAfterData { from: NaiveDate, newest: NaiveDate },
    /// The window lies before the oldest transaction or in a gap.
    NoOverlap,
}

impl fmt::Display for RangeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangeWarning::NoTransactions => write!(f, "the statement has no transactions"),
            RangeWarning::Inverted { from, to } => write!(
                f,
                "start date {} is after end date {}",
                format_statement_date(*from),
                format_statement_date(*to)
            ),
            RangeWarning::StartsAfterData { from, newest } => write!(
                f,
                "start date {} is after the newest transaction ({})",
                format_statement_date(*from),
                format_statement_date(*newest)
            ),
            RangeWarning::NoOverlap => write!(f, "no transactions fall inside the range"),
        }
    }
}

/// Indices of the selected run, plus a warning when it is empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeSelection {
    pub span: Range<usize>,
    pub warning: Option<RangeWarning>,
}

impl RangeSelection {
    fn empty(warning: RangeWarning) -> Self {
        Self {
            span: 0..0,
            warning: Some(warning),
        }
    }

    pub fn slice<'t>(&self, txns: &'t [Transaction]) -> &'t [Transaction] {
        &txns[self.span.clone()]
    }

    pub fn is_empty(&self) -> bool {
        self.span.is_empty()
    }

    pub fn len(&self) -> usize {
        self.span.len()
    }
}

/// Select the transactions dated `from..=to` from a newest-first list.
pub fn select_range(txns: &[Transaction], from: NaiveDate, to: NaiveDate) -> RangeSelection {
    let Some(newest) = txns.first() else {
        return RangeSelection::empty(RangeWarning::NoTransactions);
    };
    if from > to {
        return RangeSelection::empty(RangeWarning::Inverted { from, to });
    }
    if from > newest.date {
        return RangeSelection::empty(RangeWarning::StartsAfterData {
            from,
            newest: newest.date,
        });
    }

    // first transaction not newer than `to`
    let front = txns.partition_point(|t| t.date > to);
    // one past the last transaction not older than `from`
    let back = txns.partition_point(|t| t.date >= from);

    if front >= back {
        return RangeSelection {
            span: front..front,
            warning: Some(RangeWarning::NoOverlap),
        };
    }
    RangeSelection {
        span: front..back,
        warning: None,
    }
}

/// Oldest and newest dates on a newest-first statement.
pub fn statement_span(txns: &[Transaction]) -> Option<(NaiveDate, NaiveDate)> {
    Some((txns.last()?.date, txns.first()?.date))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn d(m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, m, day).unwrap()
    }

    fn statement(days: &[u32]) -> Vec<Transaction> {
        days.iter()
            .map(|&day| Transaction::new(d(12, day), dec!(1), format!("DAY {day}")))
            .collect()
    }

    fn picked(txns: &[Transaction], sel: &RangeSelection) -> Vec<u32> {
        use chrono::Datelike;
        sel.slice(txns).iter().map(|t| t.date.day()).collect()
    }

    #[test]
    fn test_inner_window_selects_middle() {
        let txns = statement(&[10, 5, 1]);
        let sel = select_range(&txns, d(12, 3), d(12, 6));
        assert_eq!(picked(&txns, &sel), [5]);
        assert_eq!(sel.warning, None);
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let txns = statement(&[10, 8, 5, 5, 1]);
        let sel = select_range(&txns, d(12, 5), d(12, 8));
        assert_eq!(picked(&txns, &sel), [8, 5, 5]);
    }

    #[test]
    fn test_window_covering_everything() {
        let txns = statement(&[10, 5, 1]);
        let sel = select_range(&txns, d(11, 1), d(12, 31));
        assert_eq!(sel.span, 0..3);
    }

    #[test]
    fn test_reselect_is_idempotent() {
        let txns = statement(&[20, 15, 10, 5, 1]);
        let first = select_range(&txns, d(12, 4), d(12, 16));
        let narrowed = first.slice(&txns).to_vec();
        let second = select_range(&narrowed, d(12, 4), d(12, 16));
        assert_eq!(second.slice(&narrowed), first.slice(&txns));
    }

    #[test]
    fn test_inverted_range_is_empty() {
        let txns = statement(&[10, 5, 1]);
        let sel = select_range(&txns, d(12, 6), d(12, 3));
        assert!(sel.is_empty());
        assert!(matches!(sel.warning, Some(RangeWarning::Inverted { .. })));
    }

    #[test]
    fn test_range_after_all_data_is_empty() {
        let txns = statement(&[10, 5, 1]);
        let sel = select_range(&txns, d(12, 11), d(12, 31));
        assert!(sel.is_empty());
        assert_eq!(
            sel.warning,
            Some(RangeWarning::StartsAfterData { from: d(12, 11), newest: d(12, 10) })
        );
    }

    #[test]
    fn test_range_before_all_data_is_empty() {
        let txns = statement(&[10, 5, 1]);
        let sel = select_range(&txns, d(11, 1), d(11, 30));
        assert!(sel.is_empty());
        assert_eq!(sel.warning, Some(RangeWarning::NoOverlap));
    }

    #[test]
    fn test_range_in_gap_is_empty() {
        let txns = statement(&[10, 1]);
        let sel = select_range(&txns, d(12, 3), d(12, 6));
        assert!(sel.is_empty());
        assert_eq!(sel.warning, Some(RangeWarning::NoOverlap));
    }

    #[test]
    fn test_empty_statement() {
        let sel = select_range(&[], d(12, 1), d(12, 31));
        assert!(sel.is_empty());
        assert_eq!(sel.warning, Some(RangeWarning::NoTransactions));
    }

    #[test]
    fn test_single_transaction_statement() {
        let txns = statement(&[5]);
        assert_eq!(select_range(&txns, d(12, 5), d(12, 5)).span, 0..1);
        assert_eq!(select_range(&txns, d(12, 1), d(12, 31)).span, 0..1);
        assert!(select_range(&txns, d(12, 1), d(12, 4)).is_empty());
        assert!(select_range(&txns, d(12, 6), d(12, 31)).is_empty());
    }

    #[test]
    fn test_statement_span() {
        assert_eq!(statement_span(&statement(&[10, 5, 1])), Some((d(12, 1), d(12, 10))));
        assert_eq!(statement_span(&[]), None);
    }

    #[test]
    fn test_warning_messages_name_dates() {
        let w = RangeWarning::Inverted { from: d(12, 6), to: d(12, 3) };
        assert_eq!(w.to_string(), "start date 12/06/2023 is after end date 12/03/2023");
    }
}
