//! Top-level interactive loop of `tally analyze`.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use tally_core::{Console, format_statement_date, parse_date_range, statement_span};
use tally_ingest::save_keywords;
use tracing::info;

use crate::analysis::Analysis;

const MAIN_MENU: [&str; 5] = [
    "Enter the letter with the action associated with what you want to do",
    "(a) look through the 'other' category",
    "(b) enter a new range of dates to calculate transactions",
    "(c) look through categories to see expenses in each category",
    "(q) quit the program",
];

/// Files the menu keeps up to date. `None` disables writing.
#[derive(Debug, Clone, Default)]
pub struct Outputs {
    pub keywords: Option<PathBuf>,
    pub report: Option<PathBuf>,
}

/// What came of one range prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeInput {
    Applied,
    Invalid,
    Closed,
}

pub struct MainMenu<'c, C: Console> {
    analysis: Analysis,
    console: &'c mut C,
    outputs: Outputs,
}

impl<'c, C: Console> MainMenu<'c, C> {
    pub fn new(analysis: Analysis, console: &'c mut C, outputs: Outputs) -> Self {
        Self {
            analysis,
            console,
            outputs,
        }
    }

    #[cfg(test)]
    pub fn analysis(&self) -> &Analysis {
        &self.analysis
    }

    /// Keep asking for a date range until one is applied. Returns `Ok(false)`
    /// if input ends first.
    pub fn prompt_initial_range(&mut self) -> Result<bool> {
        loop {
            match self.prompt_range()? {
                RangeInput::Applied => return Ok(true),
                RangeInput::Invalid => continue,
                RangeInput::Closed => return Ok(false),
            }
        }
    }

    /// Ask for a date range once. Unless it is applied, the previous working
    /// set is kept.
    pub fn prompt_range(&mut self) -> Result<RangeInput> {
        let span = statement_span(self.analysis.statement());
        let hint = match span {
            Some((oldest, newest)) => format!(
                "between the range of {} to {} ",
                format_statement_date(oldest),
                format_statement_date(newest)
            ),
            None => String::new(),
        };
        self.console.write_line(&format!(
            "Please enter the dates you would like to calculate transactions {hint}in the form of from: mm/dd/yyyy to: mm/dd/yyyy"
        ));

        let Some(line) = self.console.read_line() else {
            return Ok(RangeInput::Closed);
        };
        match parse_date_range(&line) {
            Ok((from, to)) => {
                self.apply_range(from, to)?;
                Ok(RangeInput::Applied)
            }
            Err(e) => {
                self.console.write_line(&format!("Invalid date range entered: {e}"));
                Ok(RangeInput::Invalid)
            }
        }
    }

    /// Classify `from..=to`, print the totals and save them.
    pub fn apply_range(&mut self, from: NaiveDate, to: NaiveDate) -> Result<()> {
        if let Some(warning) = self.analysis.select(from, to) {
            self.console.write_line(&format!("Warning: {warning}"));
        }
        self.console.write_line(&format!(
            "{} transaction(s) from {} to {}",
            self.analysis.working().len(),
            format_statement_date(from),
            format_statement_date(to)
        ));
        self.show_report()?;
        Ok(())
    }

    fn show_report(&mut self) -> Result<()> {
        let report = self.analysis.report();
        for line in report.to_string().lines() {
            self.console.write_line(line);
        }
        if let Some(path) = &self.outputs.report {
            fs::write(path, report.to_artifact())
                .with_context(|| format!("write {}", path.display()))?;
            info!(path = %path.display(), "report saved");
        }
        Ok(())
    }

    /// Loop until the user quits or input ends.
    pub fn run(&mut self) -> Result<()> {
        loop {
            for line in MAIN_MENU {
                self.console.write_line(line);
            }
            let Some(input) = self.console.read_line() else {
                break;
            };
            match input.trim().to_lowercase().as_str() {
                "a" => self.review_other()?,
                "b" => {
                    self.prompt_range()?;
                }
                "c" => self.browse_category(),
                "q" => {
                    self.console.write_line("Exiting tally.");
                    break;
                }
                other => self
                    .console
                    .write_line(&format!("Unrecognized option '{other}'")),
            }
        }
        Ok(())
    }

    fn review_other(&mut self) -> Result<()> {
        if self.analysis.unmatched_count() == 0 {
            self.console.write_line("Nothing in 'other' to review.");
            return Ok(());
        }
        let outcome = self.analysis.reconcile(self.console);
        if let Some(path) = &self.outputs.keywords {
            if !outcome.associations.is_empty() {
                save_keywords(path, self.analysis.dictionary())?;
                self.console.write_line(&format!(
                    "Saved {} new keyword(s) to {}",
                    outcome.associations.len(),
                    path.display()
                ));
            }
        }
        if outcome.relabelled > 0 {
            self.show_report()?;
        }
        Ok(())
    }

    fn browse_category(&mut self) {
        let categories: Vec<String> = self
            .analysis
            .categories()
            .into_iter()
            .map(str::to_string)
            .collect();
        self.console.write_line("Which category do you want to look through?");
        for category in &categories {
            self.console.write_line(category);
        }
        let Some(input) = self.console.read_line() else {
            return;
        };
        let category = input.trim().to_lowercase();
        let txns = self.analysis.transactions_in(&category);
        if txns.is_empty() {
            self.console
                .write_line(&format!("No transactions in category '{category}'"));
            return;
        }
        let lines: Vec<String> = txns.iter().map(ToString::to_string).collect();
        for line in lines {
            self.console.write_line(&line);
        }
    }
}
