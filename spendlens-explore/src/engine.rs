//! The group/rank/label engine behind both explore views.
//!
//! Grouping preserves first-appearance order, and ranking uses a stable
//! descending sort, so rows with equal totals keep the order they first
//! appeared in the input.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use spendlens_core::{CurrencyFormat, ExploreError, Ledger, Result};

use crate::resolver::CategoryResolver;
use crate::rules::normalize_key;

/// Category tables are capped at this many rows.
pub const CATEGORY_TOP_N: usize = 20;
/// Merchant drill-downs are capped at this many rows.
pub const MERCHANT_TOP_N: usize = 10;

/// Which per-category companion statistic to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SecondaryStat {
    /// Distinct merchant names within the category.
    UniqueMerchants,
    /// Mean outgoing amount within the category.
    MeanSpend,
}

/// Value of the companion statistic for one summary row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SecondaryValue {
    UniqueMerchants(usize),
    MeanSpend(f64),
}

/// One row of the top-level category table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategorySummary {
    pub category: String,
    pub total_spend: f64,
    pub txn_count: usize,
    pub secondary: SecondaryValue,
}

/// One row of the merchant drill-down table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MerchantSummary {
    /// Normalized (lowercase) merchant name — also the grouping key.
    pub merchant: String,
    pub total_spend: f64,
    pub txn_count: usize,
    /// Display label, e.g. `£1,235 (7 txns)`.
    pub label: String,
}

/// Spend the resolver dropped: unmapped merchants in the committed view,
/// noise and blank categories in the enrichment view.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct ExcludedSpend {
    pub total_spend: f64,
    pub txn_count: usize,
}

#[derive(Default)]
struct GroupAcc {
    total: f64,
    count: usize,
    merchants: HashSet<String>,
}

/// Group resolved rows by category and rank them by total spend.
///
/// Returns at most [`CATEGORY_TOP_N`] rows, sorted descending by
/// `total_spend`. Fails with `EmptyResult` when no row survives the
/// resolver's filter.
pub fn summarize_categories<R: CategoryResolver>(
    ledger: &Ledger,
    resolver: &R,
    stat: SecondaryStat,
) -> Result<Vec<CategorySummary>> {
    resolver.requires(ledger)?;

    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, GroupAcc> = HashMap::new();

    for txn in &ledger.rows {
        let Some(category) = resolver.resolve(txn) else {
            continue;
        };
        let acc = groups.entry(category.clone()).or_insert_with(|| {
            order.push(category);
            GroupAcc::default()
        });
        acc.total += txn.abs_amount();
        acc.count += 1;
        acc.merchants.insert(normalize_key(&txn.merchant));
    }

    if order.is_empty() {
        return Err(ExploreError::empty_result(
            "no rows matched the current view",
        ));
    }

    let mut summaries: Vec<CategorySummary> = order
        .into_iter()
        .map(|category| {
            let acc = &groups[&category];
            let secondary = match stat {
                SecondaryStat::UniqueMerchants => {
                    SecondaryValue::UniqueMerchants(acc.merchants.len())
                }
                SecondaryStat::MeanSpend => SecondaryValue::MeanSpend(acc.total / acc.count as f64),
            };
            CategorySummary {
                category,
                total_spend: acc.total,
                txn_count: acc.count,
                secondary,
            }
        })
        .collect();

    summaries.sort_by(|a, b| b.total_spend.total_cmp(&a.total_spend));
    summaries.truncate(CATEGORY_TOP_N);
    Ok(summaries)
}

/// Rank the merchants within one category.
///
/// Returns at most [`MERCHANT_TOP_N`] rows, sorted descending by
/// `total_spend`, each carrying a formatted display label. Fails with
/// `InvalidSelection` when no row resolves to `category`.
pub fn top_merchants<R: CategoryResolver>(
    ledger: &Ledger,
    resolver: &R,
    category: &str,
    currency: &CurrencyFormat,
) -> Result<Vec<MerchantSummary>> {
    resolver.requires(ledger)?;

    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, GroupAcc> = HashMap::new();

    for txn in &ledger.rows {
        if resolver.resolve(txn).as_deref() != Some(category) {
            continue;
        }
        let merchant = normalize_key(&txn.merchant);
        let acc = groups.entry(merchant.clone()).or_insert_with(|| {
            order.push(merchant);
            GroupAcc::default()
        });
        acc.total += txn.abs_amount();
        acc.count += 1;
    }

    if order.is_empty() {
        return Err(ExploreError::invalid_selection(format!(
            "category '{category}' is not in the current summary"
        )));
    }

    let mut summaries: Vec<MerchantSummary> = order
        .into_iter()
        .map(|merchant| {
            let acc = &groups[&merchant];
            MerchantSummary {
                merchant,
                total_spend: acc.total,
                txn_count: acc.count,
                label: currency.txn_label(acc.total, acc.count),
            }
        })
        .collect();

    summaries.sort_by(|a, b| b.total_spend.total_cmp(&a.total_spend));
    summaries.truncate(MERCHANT_TOP_N);
    Ok(summaries)
}

/// Total over the rows the resolver dropped. Companion figure for the
/// summaries, so callers can surface unclassified spend instead of
/// losing it silently.
pub fn excluded_spend<R: CategoryResolver>(
    ledger: &Ledger,
    resolver: &R,
) -> Result<ExcludedSpend> {
    resolver.requires(ledger)?;

    let mut out = ExcludedSpend::default();
    for txn in &ledger.rows {
        if resolver.resolve(txn).is_none() {
            out.total_spend += txn.abs_amount();
            out.txn_count += 1;
        }
    }
    Ok(out)
}
