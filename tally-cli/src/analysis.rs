//! One statement under analysis: the full statement, the current working set
//! and its totals.

use chrono::NaiveDate;
use tally_core::{
    CategoryTotals, Classifier, Console, IgnorePattern, KeywordDictionary, MatchPolicy,
    RangeWarning, ReconciliationOutcome, ReconciliationSession, Report, Transaction,
    select_range, transactions_in,
};
use tracing::{info, warn};

pub struct Analysis {
    /// Newest first; never modified.
    statement: Vec<Transaction>,
    dictionary: KeywordDictionary,
    ignore: Vec<IgnorePattern>,
    policy: MatchPolicy,
    working: Vec<Transaction>,
    unmatched: Vec<usize>,
    totals: CategoryTotals,
}

impl Analysis {
    pub fn new(
        statement: Vec<Transaction>,
        dictionary: KeywordDictionary,
        ignore: Vec<IgnorePattern>,
        policy: MatchPolicy,
    ) -> Self {
        let totals = CategoryTotals::seeded(&dictionary);
        Self {
            statement,
            dictionary,
            ignore,
            policy,
            working: Vec::new(),
            unmatched: Vec::new(),
            totals,
        }
    }

    pub fn statement(&self) -> &[Transaction] {
        &self.statement
    }

    pub fn dictionary(&self) -> &KeywordDictionary {
        &self.dictionary
    }

    pub fn working(&self) -> &[Transaction] {
        &self.working
    }

    pub fn report(&self) -> Report {
        Report::new(&self.totals)
    }

    /// Replace the working set with a fresh, unclassified copy of the
    /// statement rows dated `from..=to`, then classify it.
    pub fn select(&mut self, from: NaiveDate, to: NaiveDate) -> Option<RangeWarning> {
        let selection = select_range(&self.statement, from, to);
        if let Some(w) = &selection.warning {
            warn!(warning = %w, "date range selected nothing");
        }
        self.working = selection.slice(&self.statement).to_vec();
        self.classify();
        selection.warning
    }

    fn classify(&mut self) {
        let classifier = Classifier::new(&self.dictionary)
            .with_ignore_patterns(self.ignore.clone())
            .with_policy(self.policy);
        let result = classifier.classify_all(&mut self.working, CategoryTotals::seeded(&self.dictionary));
        self.totals = result.totals;
        self.unmatched = result.unmatched;
    }

    pub fn unmatched_count(&self) -> usize {
        self.unmatched.len()
    }

    /// Review `other` interactively. The learned keywords in the returned
    /// outcome are already folded into this analysis's dictionary, and its
    /// totals are the ones now held here.
    pub fn reconcile(&mut self, console: &mut impl Console) -> ReconciliationOutcome {
        let totals = std::mem::take(&mut self.totals);
        let unmatched = std::mem::take(&mut self.unmatched);
        let outcome = ReconciliationSession::new(&mut self.working, unmatched, totals).run(console);

        self.totals = outcome.totals.clone();
        self.unmatched = self
            .working
            .iter()
            .enumerate()
            .filter(|(_, t)| t.is_other())
            .map(|(i, _)| i)
            .collect();

        if !outcome.associations.is_empty() {
            self.dictionary = self.dictionary.with_associations(&outcome.associations);
            info!(
                learned = outcome.associations.len(),
                keywords = self.dictionary.len(),
                "dictionary extended"
            );
        }
        outcome
    }

    pub fn categories(&self) -> Vec<&str> {
        self.totals.categories()
    }

    pub fn transactions_in(&self, category: &str) -> Vec<&Transaction> {
        transactions_in(&self.working, category)
    }
}
