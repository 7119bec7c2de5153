//! Row-to-category resolution for the two explore views.

use spendlens_core::{ExploreError, Ledger, Result, Transaction};

use crate::rules::SpendRules;

/// Maps a row to its grouping category, or `None` to drop the row from
/// the view.
pub trait CategoryResolver {
    fn resolve(&self, txn: &Transaction) -> Option<String>;

    /// Check that the ledger carries the fields this resolver reads.
    fn requires(&self, ledger: &Ledger) -> Result<()>;
}

/// Committed-spend view: merchant lookup against the configured mapping.
/// Unmapped merchants drop out — only recognized recurring obligations
/// count.
pub struct CommittedResolver<'a> {
    rules: &'a SpendRules,
}

impl<'a> CommittedResolver<'a> {
    pub fn new(rules: &'a SpendRules) -> Self {
        Self { rules }
    }
}

impl CategoryResolver for CommittedResolver<'_> {
    fn resolve(&self, txn: &Transaction) -> Option<String> {
        self.rules
            .committed_category(&txn.merchant)
            .map(str::to_string)
    }

    fn requires(&self, _ledger: &Ledger) -> Result<()> {
        // merchant column presence is enforced at ingestion
        Ok(())
    }
}

/// Enrichment view: pass the upstream category through unchanged, minus
/// noise labels and blank cells.
pub struct EnrichmentResolver<'a> {
    rules: &'a SpendRules,
}

impl<'a> EnrichmentResolver<'a> {
    pub fn new(rules: &'a SpendRules) -> Self {
        Self { rules }
    }
}

impl CategoryResolver for EnrichmentResolver<'_> {
    fn resolve(&self, txn: &Transaction) -> Option<String> {
        let category = txn.category.as_deref()?.trim();
        if category.is_empty() || self.rules.is_noise(category) {
            return None;
        }
        Some(category.to_string())
    }

    fn requires(&self, ledger: &Ledger) -> Result<()> {
        if ledger.has_categories {
            Ok(())
        } else {
            Err(ExploreError::schema(
                "required column 'enrichment_categories' not found",
            ))
        }
    }
}
