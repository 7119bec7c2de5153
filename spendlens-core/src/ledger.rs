//! Ledger row types shared across the ingest and explore crates.

use serde::{Deserialize, Serialize};

/// One row of a bank-export ledger, reduced to the fields the
/// aggregation pipeline reads. Every other input column is dropped at
/// ingestion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    /// Counting key; unique per transaction in a well-formed export.
    pub id: String,
    /// Signed amount in the source convention: negative = outgoing.
    pub amount: f64,
    /// Merchant name as exported (free text, case-varying).
    pub merchant: String,
    /// Enrichment category attached upstream. `None` when the cell was
    /// blank or the column was missing from the file.
    pub category: Option<String>,
}

impl Transaction {
    /// Create a transaction with no enrichment category.
    pub fn new(id: impl Into<String>, amount: f64, merchant: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            amount,
            merchant: merchant.into(),
            category: None,
        }
    }

    /// Attach an enrichment category.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// True for outgoing (debit) rows.
    pub fn is_outgoing(&self) -> bool {
        self.amount < 0.0
    }

    /// Non-negative magnitude of the amount.
    pub fn abs_amount(&self) -> f64 {
        self.amount.abs()
    }
}

/// The working table handed from ingestion to the explore pipelines.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Ledger {
    pub rows: Vec<Transaction>,
    /// Whether the source file carried an enrichment-categories column at
    /// all. Per-row `Option` cannot distinguish a blank cell from a column
    /// that was never present.
    pub has_categories: bool,
}

impl Ledger {
    pub fn new(rows: Vec<Transaction>, has_categories: bool) -> Self {
        Self {
            rows,
            has_categories,
        }
    }

    /// Restrict the ledger to outgoing rows (strictly negative amounts).
    /// Idempotent: applying it to its own output changes nothing.
    pub fn outgoings(mut self) -> Ledger {
        self.rows.retain(Transaction::is_outgoing);
        self
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
