//! tally-core: keyword classification of credit-card statements.
//!
//! Descriptions are tokenized, matched against a keyword dictionary and
//! totalled per category over a chosen date range. Transactions nothing
//! matched land in `other` and can be reviewed interactively.

pub mod classifier;
pub mod console;
pub mod date;
pub mod dictionary;
pub mod error;
pub mod range;
pub mod reconcile;
pub mod report;
pub mod tokenizer;
pub mod transaction;

pub use classifier::{
    CategoryTotals, Classification, Classifier, Decision, IgnorePattern, MatchPolicy,
    transactions_in,
};
pub use console::{Console, ScriptedConsole};
pub use date::{format_statement_date, parse_date_range, parse_statement_date};
pub use dictionary::{KeywordAssociation, KeywordDictionary};
pub use error::TallyError;
pub use range::{RangeSelection, RangeWarning, select_range, statement_span};
pub use reconcile::{MenuCommand, ReconciliationOutcome, ReconciliationSession, SessionState};
pub use report::Report;
pub use tokenizer::tokenize;
pub use transaction::{OTHER, Transaction, is_newest_first, sort_newest_first};
