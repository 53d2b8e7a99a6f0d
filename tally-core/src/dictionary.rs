//! Keyword → category dictionary.
//!
//! Keyword files are plain text: any number of lines, each a comma-separated
//! list of `token:category` pairs.
//!
//! ```text
//! amzn:amazon, amazon:amazon, wal:walmart
//! starbucks:coffee
//! ```
//!
//! Pairs that do not split into exactly two fields on `:` are skipped.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use tracing::debug;

/// `,` and `:` delimit keyword files, so a category name holding either
/// would not survive a save and reload.
pub(crate) fn is_storable_category(name: &str) -> bool {
    !name.contains([',', ':'])
}

/// A learned `token → category` pair, e.g. from reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeywordAssociation {
    pub token: String,
    pub category: String,
}

impl KeywordAssociation {
    pub fn new(token: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            category: category.into(),
        }
    }
}

/// Immutable token → category map. Many tokens may share one category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordDictionary {
    keywords: HashMap<String, String>,
}

impl KeywordDictionary {
    /// Parse keyword-file text. Later duplicates of a token win.
    pub fn parse(text: &str) -> Self {
        let mut keywords = HashMap::new();
        for line in text.lines() {
            for pair in line.split(',') {
                let fields: Vec<&str> = pair.split(':').collect();
                let [token, category] = fields.as_slice() else {
                    if !pair.trim().is_empty() {
                        debug!(pair, "skipping malformed keyword pair");
                    }
                    continue;
                };
                let token = token.trim().to_lowercase();
                let category = category.trim().to_lowercase();
                if token.is_empty() || category.is_empty() {
                    debug!(pair, "skipping keyword pair with an empty side");
                    continue;
                }
                keywords.insert(token, category);
            }
        }
        Self { keywords }
    }

    pub fn from_pairs<I, T, C>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (T, C)>,
        T: Into<String>,
        C: Into<String>,
    {
        Self {
            keywords: pairs
                .into_iter()
                .map(|(t, c)| (t.into().to_lowercase(), c.into().to_lowercase()))
                .collect(),
        }
    }

    pub fn lookup(&self, token: &str) -> Option<&str> {
        self.keywords.get(token).map(String::as_str)
    }

    /// Distinct categories named by the dictionary, sorted. Excludes `other`
    /// unless a keyword maps to it explicitly.
    pub fn known_categories(&self) -> BTreeSet<String> {
        self.keywords.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    /// A new dictionary with `associations` layered on top (last wins).
    pub fn with_associations<'a, I>(&self, associations: I) -> Self
    where
        I: IntoIterator<Item = &'a KeywordAssociation>,
    {
        let mut keywords = self.keywords.clone();
        for a in associations {
            keywords.insert(a.token.to_lowercase(), a.category.to_lowercase());
        }
        Self { keywords }
    }

    /// Render back to keyword-file text: one line per category, categories
    /// and tokens sorted, so saving is deterministic.
    pub fn to_config_string(&self) -> String {
        let mut by_category: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
        for (token, category) in &self.keywords {
            by_category
                .entry(category.as_str())
                .or_default()
                .insert(token.as_str());
        }

        let mut out = String::new();
        for (category, tokens) in by_category {
            let line: Vec<String> = tokens
                .into_iter()
                .map(|t| format!("{t}:{category}"))
                .collect();
            out.push_str(&line.join(", "));
            out.push('\n');
        }
        out
    }
}
