//! Dictionary-driven classification and per-category totals.
//!
//! Every token of a transaction is looked up in the [`KeywordDictionary`].
//! Matches add the transaction amount to the matched category. A transaction
//! with no match is either an ignored non-spending entry (its token sequence
//! equals an [`IgnorePattern`]) or goes to `other` and is queued for
//! reconciliation.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::dictionary::KeywordDictionary;
use crate::tokenizer::tokenize;
use crate::transaction::{OTHER, Transaction};

/// Exact token sequence of a non-spending statement line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IgnorePattern(Vec<String>);

impl IgnorePattern {
    /// Build a pattern from a phrase, tokenized like a description.
    pub fn from_phrase(phrase: &str) -> Self {
        Self(tokenize(phrase).collect())
    }

    pub fn tokens(&self) -> &[String] {
        &self.0
    }

    /// Whole-sequence equality; a pattern is never matched as a subset.
    pub fn matches(&self, tokens: &[String]) -> bool {
        !self.0.is_empty() && self.0 == tokens
    }

    /// Card payments, which move money onto the card rather than spend it.
    pub fn defaults() -> Vec<Self> {
        vec![
            Self::from_phrase("online payment thank you"),
            Self::from_phrase("automatic payment thank you"),
        ]
    }
}

impl fmt::Display for IgnorePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(" "))
    }
}

/// How a transaction whose tokens hit several keywords is counted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MatchPolicy {
    /// Each matching token adds the full amount to its category. Two matches
    /// count the amount twice; totals then exceed the statement sum.
    #[default]
    EveryMatch,
    /// Only the first matching token counts.
    FirstMatch,
}

/// Running totals per category. Owned by whoever is currently accumulating;
/// the classifier and reconciliation take it by value and hand it back.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryTotals {
    totals: HashMap<String, Decimal>,
}

impl CategoryTotals {
    /// Every known category plus `other`, all at zero.
    pub fn seeded(dictionary: &KeywordDictionary) -> Self {
        let mut totals: HashMap<String, Decimal> = dictionary
            .known_categories()
            .into_iter()
            .map(|c| (c, Decimal::ZERO))
            .collect();
        totals.entry(OTHER.to_string()).or_insert(Decimal::ZERO);
        Self { totals }
    }

    pub fn add(&mut self, category: &str, amount: Decimal) {
        *self.totals.entry(category.to_string()).or_insert(Decimal::ZERO) += amount;
    }

    /// Start tracking a category at zero; existing totals are kept.
    pub fn ensure(&mut self, category: &str) {
        self.totals.entry(category.to_string()).or_insert(Decimal::ZERO);
    }

    /// Move `amount` from one category to another.
    pub fn transfer(&mut self, from: &str, to: &str, amount: Decimal) {
        self.add(from, -amount);
        self.add(to, amount);
    }

    pub fn get(&self, category: &str) -> Option<Decimal> {
        self.totals.get(category).copied()
    }

    /// Category names in alphabetical order.
    pub fn categories(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.totals.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Totals in alphabetical order.
    pub fn sorted(&self) -> BTreeMap<&str, Decimal> {
        self.totals.iter().map(|(k, v)| (k.as_str(), *v)).collect()
    }

    pub fn grand_total(&self) -> Decimal {
        self.totals.values().copied().sum()
    }
}

/// Result of classifying a single transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Categories credited, in token order. May repeat under
    /// [`MatchPolicy::EveryMatch`].
    Matched(Vec<String>),
    /// Matched an ignore pattern; no total changed.
    Ignored,
    /// Routed to `other`.
    Unmatched,
}

/// Outcome of a full classification pass over a working set.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub totals: CategoryTotals,
    /// Indices into the working set of transactions routed to `other`, in
    /// the order they were encountered.
    pub unmatched: Vec<usize>,
    pub ignored: usize,
}

pub struct Classifier<'a> {
    dictionary: &'a KeywordDictionary,
    ignore: Vec<IgnorePattern>,
    policy: MatchPolicy,
}

impl<'a> Classifier<'a> {
    /// Classifier with the default ignore patterns and [`MatchPolicy::EveryMatch`].
    pub fn new(dictionary: &'a KeywordDictionary) -> Self {
        Self {
            dictionary,
            ignore: IgnorePattern::defaults(),
            policy: MatchPolicy::default(),
        }
    }

    pub fn with_ignore_patterns(mut self, ignore: Vec<IgnorePattern>) -> Self {
        self.ignore = ignore;
        self
    }

    pub fn with_policy(mut self, policy: MatchPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Classify one transaction, crediting `totals` and labelling `txn`.
    pub fn classify(&self, txn: &mut Transaction, totals: &mut CategoryTotals) -> Decision {
        let mut matched = Vec::new();
        for token in txn.tokens() {
            if let Some(category) = self.dictionary.lookup(token) {
                totals.add(category, txn.amount);
                matched.push(category.to_string());
                if self.policy == MatchPolicy::FirstMatch {
                    break;
                }
            }
        }

        // The label is the earliest matching token's category, even when
        // later tokens credit other categories too.
        if let Some(first) = matched.first() {
            txn.assign(first.clone());
            return Decision::Matched(matched);
        }

        if self.ignore.iter().any(|p| p.matches(txn.tokens())) {
            debug!(description = %txn.description, "ignoring non-spending transaction");
            return Decision::Ignored;
        }

        debug!(description = %txn.description, amount = %txn.amount, "routing to other");
        totals.add(OTHER, txn.amount);
        txn.assign(OTHER);
        Decision::Unmatched
    }

    /// Classify a whole working set. Run once per working set: classifying
    /// the same transactions again would add their amounts a second time.
    pub fn classify_all(&self, txns: &mut [Transaction], mut totals: CategoryTotals) -> Classification {
        let mut unmatched = Vec::new();
        let mut ignored = 0;

        for (i, txn) in txns.iter_mut().enumerate() {
            match self.classify(txn, &mut totals) {
                Decision::Matched(_) => {}
                Decision::Ignored => ignored += 1,
                Decision::Unmatched => unmatched.push(i),
            }
        }

        info!(
            transactions = txns.len(),
            unmatched = unmatched.len(),
            ignored,
            "classification pass complete"
        );

        Classification {
            totals,
            unmatched,
            ignored,
        }
    }
}

/// Transactions currently labelled `category`, in working-set order.
pub fn transactions_in<'t>(txns: &'t [Transaction], category: &str) -> Vec<&'t Transaction> {
    txns.iter().filter(|t| t.category() == Some(category)).collect()
}
