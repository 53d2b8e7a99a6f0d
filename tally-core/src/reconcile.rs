//! Interactive review of transactions routed to `other`.
//!
//! The session walks the unmatched transactions in the order the classifier
//! queued them. For each one the user can list categories, move it into an
//! existing or a new category (choosing which of its tokens should map to that
//! category from now on), skip it, or leave the session.
//!
//! ```text
//!            l                  known            tokens chosen
//!   Menu ─────────► Menu    ┌──────────► SelectTokensToAssociate ──► Menu (next txn)
//!    │ a                    │                ▲            ▲
//!    └──► SelectExistingCategory             │ y          │
//!    │           │ unknown ────► ConfirmNewCategory ──n──► Menu (same txn)
//!    │ n         │                                        │
//!    └──► NameNewCategory ────────────────────────────────┘
//!    │ s ──► Menu (next txn)        b / end of input ──► Done
//! ```

use std::collections::BTreeSet;

use tracing::{debug, info};

use crate::classifier::CategoryTotals;
use crate::console::Console;
use crate::dictionary::{KeywordAssociation, is_storable_category};
use crate::transaction::{OTHER, Transaction};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Menu,
    SelectExistingCategory,
    NameNewCategory,
    ConfirmNewCategory { category: String },
    SelectTokensToAssociate { category: String },
    Done,
}

/// Single-letter commands accepted at the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuCommand {
    List,
    AssignExisting,
    AssignNew,
    Skip,
    Back,
}

impl MenuCommand {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "l" => Some(Self::List),
            "a" => Some(Self::AssignExisting),
            "n" => Some(Self::AssignNew),
            "s" => Some(Self::Skip),
            "b" => Some(Self::Back),
            _ => None,
        }
    }
}

const MENU: [&str; 5] = [
    "(l) list current categories",
    "(a) add transaction to current category",
    "(n) add transaction to new category",
    "(s) skip this transaction",
    "(b) go back to previous menu",
];

/// Everything a finished session produced.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconciliationOutcome {
    pub totals: CategoryTotals,
    /// Tokens the user tied to a category, in the order they were chosen.
    pub associations: Vec<KeywordAssociation>,
    pub new_categories: Vec<String>,
    /// Transactions moved out of `other`.
    pub relabelled: usize,
}

pub struct ReconciliationSession<'t> {
    txns: &'t mut [Transaction],
    queue: Vec<usize>,
    position: usize,
    categories: BTreeSet<String>,
    state: SessionState,
    totals: CategoryTotals,
    associations: Vec<KeywordAssociation>,
    new_categories: Vec<String>,
    relabelled: usize,
}

impl<'t> ReconciliationSession<'t> {
    /// `unmatched` holds indices into `txns`. Entries that are out of range
    /// or no longer labelled `other` are dropped.
    pub fn new(txns: &'t mut [Transaction], unmatched: Vec<usize>, totals: CategoryTotals) -> Self {
        let queue: Vec<usize> = unmatched
            .into_iter()
            .filter(|&i| txns.get(i).is_some_and(Transaction::is_other))
            .collect();
        let categories = totals
            .categories()
            .into_iter()
            .filter(|c| *c != OTHER)
            .map(str::to_string)
            .collect();

        Self {
            txns,
            queue,
            position: 0,
            categories,
            state: SessionState::Menu,
            totals,
            associations: Vec::new(),
            new_categories: Vec::new(),
            relabelled: 0,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Transactions still waiting for review, the current one included.
    pub fn pending(&self) -> usize {
        self.queue.len().saturating_sub(self.position)
    }

    /// Drive the session until the user leaves or the queue is exhausted.
    pub fn run(mut self, console: &mut impl Console) -> ReconciliationOutcome {
        while self.state != SessionState::Done {
            self.step(console);
        }
        info!(
            relabelled = self.relabelled,
            learned = self.associations.len(),
            "reconciliation finished"
        );
        ReconciliationOutcome {
            totals: self.totals,
            associations: self.associations,
            new_categories: self.new_categories,
            relabelled: self.relabelled,
        }
    }

    /// Consume at most one line of input and make one transition.
    pub fn step(&mut self, console: &mut impl Console) {
        let state = std::mem::replace(&mut self.state, SessionState::Done);
        self.state = match state {
            SessionState::Menu => self.menu(console),
            SessionState::SelectExistingCategory => self.select_existing(console),
            SessionState::NameNewCategory => self.name_new(console),
            SessionState::ConfirmNewCategory { category } => self.confirm_new(console, category),
            SessionState::SelectTokensToAssociate { category } => {
                self.select_tokens(console, category)
            }
            SessionState::Done => SessionState::Done,
        };
    }

    fn current(&self) -> Option<&Transaction> {
        let &i = self.queue.get(self.position)?;
        self.txns.get(i)
    }

    fn write_categories(&self, console: &mut impl Console) {
        for category in &self.categories {
            console.write_line(category);
        }
    }

    fn menu(&mut self, console: &mut impl Console) -> SessionState {
        let Some(txn) = self.current() else {
            console.write_line("No more transactions in 'other'.");
            return SessionState::Done;
        };
        let shown = txn.to_string();

        console.write_line("");
        for line in MENU {
            console.write_line(line);
        }
        console.write_line("Transaction:");
        console.write_line(&shown);

        let Some(input) = console.read_line() else {
            return SessionState::Done;
        };
        match MenuCommand::parse(&input) {
            Some(MenuCommand::List) => {
                self.write_categories(console);
                SessionState::Menu
            }
            Some(MenuCommand::AssignExisting) => {
                console.write_line("Which category do you want to associate this transaction with?");
                self.write_categories(console);
                SessionState::SelectExistingCategory
            }
            Some(MenuCommand::AssignNew) => {
                console.write_line("What should the new category be called?");
                SessionState::NameNewCategory
            }
            Some(MenuCommand::Skip) => {
                self.position += 1;
                SessionState::Menu
            }
            Some(MenuCommand::Back) => SessionState::Done,
            None => {
                console.write_line(&format!("Unrecognized option '{}'", input.trim()));
                SessionState::Menu
            }
        }
    }

    fn select_existing(&mut self, console: &mut impl Console) -> SessionState {
        let Some(input) = console.read_line() else {
            return SessionState::Done;
        };
        let category = input.trim().to_lowercase();
        if category.is_empty() || category == OTHER {
            return SessionState::Menu;
        }
        if !is_storable_category(&category) {
            reject_name(console, &category);
            return SessionState::SelectExistingCategory;
        }
        if self.categories.contains(&category) {
            return self.enter_token_selection(console, category);
        }
        console.write_line(&format!(
            "Category {category} is not recognized, would you like to add {category} to possible categories? (y/n)"
        ));
        SessionState::ConfirmNewCategory { category }
    }

    fn name_new(&mut self, console: &mut impl Console) -> SessionState {
        let Some(input) = console.read_line() else {
            return SessionState::Done;
        };
        let category = input.trim().to_lowercase();
        if category.is_empty() || category == OTHER {
            return SessionState::Menu;
        }
        if !is_storable_category(&category) {
            reject_name(console, &category);
            return SessionState::NameNewCategory;
        }
        if self.categories.contains(&category) {
            console.write_line(&format!("Category {category} already exists"));
        } else {
            self.create_category(&category);
        }
        self.enter_token_selection(console, category)
    }

    fn confirm_new(&mut self, console: &mut impl Console, category: String) -> SessionState {
        let Some(input) = console.read_line() else {
            return SessionState::Done;
        };
        match input.trim().to_lowercase().as_str() {
            "y" | "yes" => {
                self.create_category(&category);
                self.enter_token_selection(console, category)
            }
            _ => SessionState::Menu,
        }
    }

    fn enter_token_selection(&mut self, console: &mut impl Console, category: String) -> SessionState {
        let Some(txn) = self.current() else {
            return SessionState::Done;
        };
        let quoted: Vec<String> = txn.tokens().iter().map(|t| format!("\"{t}\"")).collect();
        console.write_line(&format!(
            "Which term(s) from this transaction do you want to associate with {category}?"
        ));
        console.write_line(&quoted.join(" "));
        SessionState::SelectTokensToAssociate { category }
    }

    fn select_tokens(&mut self, console: &mut impl Console, category: String) -> SessionState {
        let Some(input) = console.read_line() else {
            return SessionState::Done;
        };
        let Some(&index) = self.queue.get(self.position) else {
            return SessionState::Done;
        };

        let mut chosen: Vec<String> = Vec::new();
        for word in input.split_whitespace().map(str::to_lowercase) {
            if !self.txns[index].tokens().contains(&word) {
                console.write_line(&format!("'{word}' is not a term of this transaction, ignoring"));
            } else if !chosen.contains(&word) {
                chosen.push(word);
            }
        }
        for token in chosen {
            debug!(token = %token, category = %category, "learned keyword");
            let association = KeywordAssociation::new(token, category.as_str());
            self.associations.retain(|a| a.token != association.token);
            self.associations.push(association);
        }

        let txn = &mut self.txns[index];
        self.totals.transfer(OTHER, &category, txn.amount);
        txn.assign(category.as_str());
        self.relabelled += 1;
        self.position += 1;
        SessionState::Menu
    }

    fn create_category(&mut self, category: &str) {
        if self.categories.insert(category.to_string()) {
            self.totals.ensure(category);
            self.new_categories.push(category.to_string());
        }
    }
}

fn reject_name(console: &mut impl Console, category: &str) {
    console.write_line(&format!(
        "Category names cannot contain ',' or ':', '{category}' was not used. Enter another name:"
    ));
}
