//! Credit-card statement CSV reader.
//!
//! The default layout is the bank export the tool was first written for: no
//! header row, five columns, the description in the last one.
//!
//!   "12/05/2023","-50.00","*","","WALMART STORE 1234 SEATTLE WA"

use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use tally_core::Transaction;
use tracing::info;

/// Which CSV columns hold the fields the engine needs (0-based).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct StatementLayout {
    pub date_column: usize,
    pub amount_column: usize,
    pub description_column: usize,
    pub has_headers: bool,
}

impl Default for StatementLayout {
    fn default() -> Self {
        Self {
            date_column: 0,
            amount_column: 1,
            description_column: 4,
            has_headers: false,
        }
    }
}

/// Read every row of a statement. Any unparseable row fails the whole read,
/// naming the 1-based line it came from.
pub fn read_statement(path: impl AsRef<Path>, layout: &StatementLayout) -> Result<Vec<Transaction>> {
    let path = path.as_ref();
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(layout.has_headers)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;

    let mut txns = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let line = i + 1 + usize::from(layout.has_headers);
        let record = result.with_context(|| format!("reading {} line {line}", path.display()))?;

        // tolerate blank trailing rows
        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }

        let date = field(&record, layout.date_column, "date", path, line)?;
        let amount = field(&record, layout.amount_column, "amount", path, line)?;
        let description = field(&record, layout.description_column, "description", path, line)?;

        let txn = Transaction::parse(date, amount, description)
            .with_context(|| format!("{} line {line}", path.display()))?;
        txns.push(txn);
    }

    info!(path = %path.display(), rows = txns.len(), "statement loaded");
    Ok(txns)
}

fn field<'r>(
    record: &'r csv::StringRecord,
    column: usize,
    name: &str,
    path: &Path,
    line: usize,
) -> Result<&'r str> {
    match record.get(column) {
        Some(value) => Ok(value),
        None => bail!(
            "{} line {line}: missing {name} column {column} ({} fields)",
            path.display(),
            record.len()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn fixture(name: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("fixtures")
            .join(name)
    }

    #[test]
    fn test_default_layout() {
        let layout = StatementLayout::default();
        assert_eq!(layout.description_column, 4);
        assert!(!layout.has_headers);
    }

    #[test]
    fn test_layout_deserializes_partially() {
        let layout: StatementLayout = serde_json::from_str(r#"{"has_headers": true, "description_column": 2}"#).unwrap();
        assert_eq!(layout.date_column, 0);
        assert_eq!(layout.description_column, 2);
        assert!(layout.has_headers);
    }

    #[test]
    fn test_missing_file_names_path() {
        let err = read_statement(fixture("does_not_exist.csv"), &StatementLayout::default()).unwrap_err();
        assert!(format!("{err:#}").contains("does_not_exist.csv"));
    }
}
