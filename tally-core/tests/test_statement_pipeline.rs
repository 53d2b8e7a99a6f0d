use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tally_core::{
    CategoryTotals, Classifier, KeywordDictionary, OTHER, ReconciliationSession, Report,
    ScriptedConsole, Transaction, parse_date_range, select_range,
};

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 12, d).unwrap()
}

/// Newest first, the way statements are exported.
fn december() -> Vec<Transaction> {
    vec![
        Transaction::parse("12/10/2023", "5.00", "ONLINE PAYMENT THANK YOU").unwrap(),
        Transaction::parse("12/05/2023", "50.00", "WALMART STORE").unwrap(),
        Transaction::parse("12/01/2023", "20.00", "AMZN MKTPLACE").unwrap(),
    ]
}

fn keywords() -> KeywordDictionary {
    KeywordDictionary::parse("amzn: amazon, wal: walmart, walmart: walmart")
}

#[test]
fn test_december_totals_exclude_card_payment() {
    let dict = keywords();
    let mut txns = december();

    let result = Classifier::new(&dict).classify_all(&mut txns, CategoryTotals::seeded(&dict));
    let report = Report::new(&result.totals);

    assert_eq!(report.get("amazon"), Some(dec!(20.00)));
    assert_eq!(report.get("walmart"), Some(dec!(50.00)));
    assert_eq!(report.get(OTHER), Some(dec!(0.00)));
    assert_eq!(report.total, dec!(70.00));
    assert_eq!(result.ignored, 1);
    assert!(result.unmatched.is_empty());
    assert_eq!(txns[0].category(), None);
}

#[test]
fn test_totals_match_statement_sum_without_multi_matches() {
    let dict = keywords();
    let mut txns = december();
    let result = Classifier::new(&dict).classify_all(&mut txns, CategoryTotals::seeded(&dict));

    let spending: Decimal = txns.iter().filter(|t| t.category().is_some()).map(|t| t.amount).sum();
    assert_eq!(result.totals.grand_total(), spending);
}

#[test]
fn test_range_then_classify() {
    let dict = keywords();
    let statement = december();
    let (from, to) = parse_date_range("from: 12/03/2023 to: 12/06/2023").unwrap();

    let selection = select_range(&statement, from, to);
    let mut working = selection.slice(&statement).to_vec();
    assert_eq!(working.len(), 1);
    assert_eq!(working[0].date, day(5));

    let result = Classifier::new(&dict).classify_all(&mut working, CategoryTotals::seeded(&dict));
    assert_eq!(Report::new(&result.totals).total, dec!(50.00));
}

#[test]
fn test_reconciled_keywords_classify_next_run() {
    let dict = keywords();
    let mut txns = december();
    txns.insert(0, Transaction::parse("12/12/2023", "4.75", "STARBUCKS COFFEE #221").unwrap());

    let first = Classifier::new(&dict).classify_all(&mut txns, CategoryTotals::seeded(&dict));
    assert_eq!(first.unmatched, vec![0]);
    assert_eq!(first.totals.get(OTHER), Some(dec!(4.75)));

    let mut console = ScriptedConsole::new(["n", "coffee", "starbucks"]);
    let outcome = ReconciliationSession::new(&mut txns, first.unmatched, first.totals).run(&mut console);
    assert_eq!(outcome.totals.get("coffee"), Some(dec!(4.75)));
    assert_eq!(outcome.totals.get(OTHER), Some(dec!(0)));

    let learned = dict.with_associations(&outcome.associations);
    let reloaded = KeywordDictionary::parse(&learned.to_config_string());
    let mut fresh = december();
    fresh.insert(0, Transaction::parse("12/12/2023", "4.75", "STARBUCKS COFFEE #221").unwrap());
    let second = Classifier::new(&reloaded).classify_all(&mut fresh, CategoryTotals::seeded(&reloaded));

    assert!(second.unmatched.is_empty());
    assert_eq!(second.totals.get("coffee"), Some(dec!(4.75)));
    assert_eq!(Report::new(&second.totals).total, dec!(74.75));
}
