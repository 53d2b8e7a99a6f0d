//! Category totals as printed to the terminal and saved to disk.

use std::fmt;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::{Map, Value};

use crate::classifier::CategoryTotals;

/// Round to cents, half away from zero, always showing two places.
pub fn to_cents(amount: Decimal) -> Decimal {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}

#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    /// Alphabetical by category.
    pub rows: Vec<(String, Decimal)>,
    pub total: Decimal,
}

impl Report {
    pub fn new(totals: &CategoryTotals) -> Self {
        let rows = totals
            .sorted()
            .into_iter()
            .map(|(category, amount)| (category.to_string(), to_cents(amount)))
            .collect();
        Self {
            rows,
            total: to_cents(totals.grand_total()),
        }
    }

    pub fn get(&self, category: &str) -> Option<Decimal> {
        self.rows
            .iter()
            .find(|(c, _)| c == category)
            .map(|(_, amount)| *amount)
    }

    /// The saved form: a JSON object of category totals followed by a
    /// `Total:` line.
    pub fn to_artifact(&self) -> String {
        let object: Map<String, Value> = self
            .rows
            .iter()
            .map(|(category, amount)| {
                let number = amount.to_f64().map(Value::from).unwrap_or(Value::Null);
                (category.clone(), number)
            })
            .collect();
        let json = serde_json::to_string_pretty(&Value::Object(object)).unwrap_or_default();
        format!("{json}\nTotal: {}\n", self.total)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (category, amount) in &self.rows {
            writeln!(f, "{category}: {amount}")?;
        }
        write!(f, "Total: {}", self.total)
    }
}
