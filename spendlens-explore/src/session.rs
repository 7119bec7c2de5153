//! Explicit session state for the explorer.
//!
//! Upload, summary, drill-down — held as a plain value passed between
//! calls, so the interaction contract is testable without a UI harness.
//! The presentation layer owns rendering; this type owns the states and
//! transitions.

use std::io::Read;
use std::mem;

use serde::{Deserialize, Serialize};

use spendlens_core::{CurrencyFormat, ExploreError, Ledger, Result};
use spendlens_ingest::read_ledger;

use crate::engine::{
    self, CategorySummary, ExcludedSpend, MerchantSummary, SecondaryStat,
};
use crate::resolver::{CommittedResolver, EnrichmentResolver};
use crate::rules::SpendRules;

/// Which pipeline a session serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpendView {
    /// Merchant-mapped committed categories; companion statistic is the
    /// distinct-merchant count.
    Committed,
    /// Upstream enrichment categories minus noise labels; companion
    /// statistic is the mean outgoing amount.
    Enrichment,
}

#[derive(Debug, Clone, PartialEq)]
struct Loaded {
    ledger: Ledger,
    summary: Vec<CategorySummary>,
}

#[derive(Debug, Clone, PartialEq)]
enum State {
    NoFileLoaded,
    FileLoaded(Loaded),
    CategorySelected {
        loaded: Loaded,
        category: String,
        merchants: Vec<MerchantSummary>,
    },
}

/// One explorer session: a rule set, a view, and the current state.
///
/// Sessions are independent values; concurrent sessions never share a
/// working table, only the (immutable) rules they were built with.
pub struct Session {
    rules: SpendRules,
    view: SpendView,
    currency: CurrencyFormat,
    state: State,
}

impl Session {
    pub fn new(rules: SpendRules, view: SpendView, currency: CurrencyFormat) -> Self {
        Self {
            rules,
            view,
            currency,
            state: State::NoFileLoaded,
        }
    }

    pub fn view(&self) -> SpendView {
        self.view
    }

    /// Load a new file, replacing any previous table and selection.
    ///
    /// Schema and resource failures reset the session to `NoFileLoaded`.
    /// An empty result leaves a loaded (but empty) summary behind and
    /// propagates the error, so the caller can render the empty state.
    pub fn load_file<R: Read>(&mut self, input: R) -> Result<&[CategorySummary]> {
        self.state = State::NoFileLoaded;

        let ledger = read_ledger(input)?.outgoings();
        let summary = match self.summarize(&ledger) {
            Ok(summary) => summary,
            Err(err @ ExploreError::EmptyResult(_)) => {
                self.state = State::FileLoaded(Loaded {
                    ledger,
                    summary: Vec::new(),
                });
                return Err(err);
            }
            Err(err) => return Err(err),
        };

        self.state = State::FileLoaded(Loaded { ledger, summary });
        Ok(self.summary_slice())
    }

    /// Drill into one category from the current summary.
    ///
    /// Re-selecting recomputes only the merchant table; the category
    /// summary is reused as-is. A category outside the current summary
    /// (including the no-file case) is an `InvalidSelection`.
    pub fn select_category(&mut self, category: &str) -> Result<&[MerchantSummary]> {
        if !self.summary_slice().iter().any(|s| s.category == category) {
            return Err(ExploreError::invalid_selection(format!(
                "category '{category}' is not in the current summary"
            )));
        }

        let loaded = match mem::replace(&mut self.state, State::NoFileLoaded) {
            State::FileLoaded(loaded) | State::CategorySelected { loaded, .. } => loaded,
            State::NoFileLoaded => {
                return Err(ExploreError::invalid_selection("no file loaded"));
            }
        };

        match self.drill_down(&loaded.ledger, category) {
            Ok(merchants) => {
                self.state = State::CategorySelected {
                    loaded,
                    category: category.to_string(),
                    merchants,
                };
                Ok(self.merchants_slice())
            }
            Err(err) => {
                self.state = State::FileLoaded(loaded);
                Err(err)
            }
        }
    }

    /// Current category summary, if a file is loaded.
    pub fn category_summary(&self) -> Option<&[CategorySummary]> {
        match &self.state {
            State::NoFileLoaded => None,
            _ => Some(self.summary_slice()),
        }
    }

    /// Current selection and its merchant table.
    pub fn selection(&self) -> Option<(&str, &[MerchantSummary])> {
        match &self.state {
            State::CategorySelected {
                category, merchants, ..
            } => Some((category, merchants)),
            _ => None,
        }
    }

    /// Spend excluded from the loaded summary (unmapped merchants or
    /// noise categories), if a file is loaded.
    pub fn excluded_spend(&self) -> Option<ExcludedSpend> {
        let ledger = match &self.state {
            State::NoFileLoaded => return None,
            State::FileLoaded(loaded) | State::CategorySelected { loaded, .. } => &loaded.ledger,
        };
        // requires() held at load time, so this cannot fail here
        match self.view {
            SpendView::Committed => {
                engine::excluded_spend(ledger, &CommittedResolver::new(&self.rules)).ok()
            }
            SpendView::Enrichment => {
                engine::excluded_spend(ledger, &EnrichmentResolver::new(&self.rules)).ok()
            }
        }
    }

    fn summarize(&self, ledger: &Ledger) -> Result<Vec<CategorySummary>> {
        match self.view {
            SpendView::Committed => engine::summarize_categories(
                ledger,
                &CommittedResolver::new(&self.rules),
                SecondaryStat::UniqueMerchants,
            ),
            SpendView::Enrichment => engine::summarize_categories(
                ledger,
                &EnrichmentResolver::new(&self.rules),
                SecondaryStat::MeanSpend,
            ),
        }
    }

    fn drill_down(&self, ledger: &Ledger, category: &str) -> Result<Vec<MerchantSummary>> {
        match self.view {
            SpendView::Committed => engine::top_merchants(
                ledger,
                &CommittedResolver::new(&self.rules),
                category,
                &self.currency,
            ),
            SpendView::Enrichment => engine::top_merchants(
                ledger,
                &EnrichmentResolver::new(&self.rules),
                category,
                &self.currency,
            ),
        }
    }

    fn summary_slice(&self) -> &[CategorySummary] {
        match &self.state {
            State::NoFileLoaded => &[],
            State::FileLoaded(loaded) | State::CategorySelected { loaded, .. } => &loaded.summary,
        }
    }

    fn merchants_slice(&self) -> &[MerchantSummary] {
        match &self.state {
            State::CategorySelected { merchants, .. } => merchants,
            _ => &[],
        }
    }
}
