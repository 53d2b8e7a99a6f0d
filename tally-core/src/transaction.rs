//! Statement transactions as the engine sees them.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::date::{format_statement_date, parse_statement_date};
use crate::error::{Result, TallyError};
use crate::tokenizer::tokenize;

/// Reserved category for transactions no keyword matched.
pub const OTHER: &str = "other";

/// One statement row. Tokens are computed once, at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub date: NaiveDate,
    /// Signed; statements export charges and credits with opposite signs.
    pub amount: Decimal,
    pub description: String,
    tokens: Vec<String>,
    category: Option<String>,
}

impl Transaction {
    pub fn new(date: NaiveDate, amount: Decimal, description: impl Into<String>) -> Self {
        let description = description.into();
        let tokens = tokenize(&description).collect();
        Self {
            date,
            amount,
            description,
            tokens,
            category: None,
        }
    }

    /// Build a transaction from the raw text fields of a statement row.
    pub fn parse(date: &str, amount: &str, description: &str) -> Result<Self> {
        let date = parse_statement_date(date)?;
        let amount = parse_amount(amount)?;
        Ok(Self::new(date, amount, description.trim()))
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Assigned category, `None` until the classifier has seen it.
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// Label the transaction. A category, once set, is never cleared.
    pub fn assign(&mut self, category: impl Into<String>) {
        self.category = Some(category.into());
    }

    pub fn is_other(&self) -> bool {
        self.category() == Some(OTHER)
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:>10} [{}] {} {:?}",
            format_statement_date(self.date),
            self.amount.round_dp(2),
            self.category().unwrap_or("-"),
            self.description,
            self.tokens
        )
    }
}

/// Parse a statement amount. Accepts `-12.50`, `$12.50` and `1,234.50`.
pub fn parse_amount(s: &str) -> Result<Decimal> {
    let cleaned: String = s
        .trim()
        .chars()
        .filter(|c| *c != '$' && *c != ',')
        .collect();
    Decimal::from_str(&cleaned).map_err(|_| TallyError::InvalidAmount(s.trim().to_string()))
}

/// True when dates never increase along the list.
pub fn is_newest_first(txns: &[Transaction]) -> bool {
    txns.windows(2).all(|w| w[0].date >= w[1].date)
}

/// Stable sort into newest-first order; same-day rows keep statement order.
pub fn sort_newest_first(txns: &mut [Transaction]) {
    txns.sort_by(|a, b| b.date.cmp(&a.date));
}
