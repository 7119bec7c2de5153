//! Bank-export CSV reader.
//!
//! Column labels are matched after trimming and lowercasing, so ` Amount `
//! and `AMOUNT` both resolve to the amount column. Only the columns the
//! pipeline reads are kept; everything else in the export is ignored.

use std::io::Read;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;

use spendlens_core::{ExploreError, Ledger, Result, Transaction};

/// Hard ceiling on input size. Exports past this point fail fast instead
/// of grinding through an unbounded file.
pub const MAX_ROWS: usize = 500_000;

const COL_ID: &str = "id";
const COL_AMOUNT: &str = "amount";
const COL_MERCHANT: &str = "enrichment_merchant_name";
const COL_CATEGORIES: &str = "enrichment_categories";

/// Read a ledger from CSV bytes.
///
/// Required columns: `id`, `amount`, `enrichment_merchant_name`.
/// `enrichment_categories` is optional; its absence is recorded on the
/// returned [`Ledger`] so the enrichment view can reject the file.
pub fn read_ledger<R: Read>(input: R) -> Result<Ledger> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(input);

    let headers = reader
        .headers()
        .map_err(|e| ExploreError::schema(format!("unreadable CSV header: {e}")))?;
    let canonical: Vec<String> = headers.iter().map(|h| h.trim().to_lowercase()).collect();
    let find = |name: &str| canonical.iter().position(|h| h == name);

    let id_idx = find(COL_ID).ok_or_else(|| missing_column(COL_ID))?;
    let amount_idx = find(COL_AMOUNT).ok_or_else(|| missing_column(COL_AMOUNT))?;
    let merchant_idx = find(COL_MERCHANT).ok_or_else(|| missing_column(COL_MERCHANT))?;
    let categories_idx = find(COL_CATEGORIES);

    let mut rows = Vec::new();
    for (i, record) in reader.records().enumerate() {
        if i >= MAX_ROWS {
            return Err(ExploreError::resource_limit(format!(
                "ledger exceeds {MAX_ROWS} rows"
            )));
        }

        // 1-based file position, counting the header line.
        let row = i + 2;
        let record = record.map_err(|e| ExploreError::schema(format!("row {row}: {e}")))?;

        let amount_cell = record.get(amount_idx).unwrap_or("");
        let amount = parse_amount(amount_cell).ok_or_else(|| {
            ExploreError::schema(format!("row {row}: unparseable amount {amount_cell:?}"))
        })?;

        let mut txn = Transaction::new(
            record.get(id_idx).unwrap_or("").trim(),
            amount,
            record.get(merchant_idx).unwrap_or("").trim(),
        );
        txn.category = categories_idx
            .and_then(|idx| record.get(idx))
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string);

        rows.push(txn);
    }

    Ok(Ledger::new(rows, categories_idx.is_some()))
}

/// Read a ledger from a CSV file on disk.
pub fn read_ledger_path(path: impl AsRef<Path>) -> Result<Ledger> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)
        .map_err(|e| ExploreError::schema(format!("open {}: {e}", path.display())))?;
    read_ledger(file)
}

fn missing_column(name: &str) -> ExploreError {
    ExploreError::schema(format!("required column '{name}' not found"))
}

/// Clean and parse an amount cell. Accepts currency symbols, thousands
/// separators, inner whitespace, and `(…)` for negatives.
fn parse_amount(cell: &str) -> Option<f64> {
    static CLEAN: OnceLock<Regex> = OnceLock::new();
    let clean = CLEAN.get_or_init(|| Regex::new(r"[£$€,\s]+").unwrap());

    let cell = cell.trim();
    let (negated, cell) = match cell.strip_prefix('(').and_then(|c| c.strip_suffix(')')) {
        Some(inner) => (true, inner),
        None => (false, cell),
    };

    let cleaned = clean.replace_all(cell, "");
    let value: f64 = cleaned.parse().ok()?;
    Some(if negated { -value } else { value })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headers_match_case_insensitively() {
        let csv = "\
ID, Amount ,Enrichment_Merchant_Name,Enrichment_Categories
t1,-10.50,EE,Phone & Internet
t2,25.00,Acme Payroll,Income
";
        let ledger = read_ledger(csv.as_bytes()).unwrap();
        assert_eq!(ledger.len(), 2);
        assert!(ledger.has_categories);
        assert_eq!(ledger.rows[0].amount, -10.50);
        assert_eq!(ledger.rows[0].merchant, "EE");
        assert_eq!(ledger.rows[0].category.as_deref(), Some("Phone & Internet"));
    }

    #[test]
    fn test_extra_columns_are_ignored() {
        let csv = "\
id,amount,enrichment_merchant_name,booking date,reference
t1,-5.00,Tesco,2025-06-01,ref-1
";
        let ledger = read_ledger(csv.as_bytes()).unwrap();
        assert_eq!(ledger.len(), 1);
        assert!(!ledger.has_categories);
        assert_eq!(ledger.rows[0].category, None);
    }

    #[test]
    fn test_missing_amount_column_is_a_schema_error() {
        let csv = "id,enrichment_merchant_name\nt1,EE\n";
        let err = read_ledger(csv.as_bytes()).unwrap_err();
        match err {
            ExploreError::Schema(msg) => assert!(msg.contains("'amount'"), "{msg}"),
            other => panic!("expected Schema, got {other:?}"),
        }
    }

    #[test]
    fn test_unparseable_amount_names_the_row() {
        let csv = "\
id,amount,enrichment_merchant_name
t1,-10.00,EE
t2,n/a,Vodafone
";
        let err = read_ledger(csv.as_bytes()).unwrap_err();
        match err {
            ExploreError::Schema(msg) => assert!(msg.contains("row 3"), "{msg}"),
            other => panic!("expected Schema, got {other:?}"),
        }
    }

    #[test]
    fn test_blank_category_cell_is_none() {
        let csv = "\
id,amount,enrichment_merchant_name,enrichment_categories
t1,-9.99,Netflix,
t2,-5.00,Tesco,  Groceries
";
        let ledger = read_ledger(csv.as_bytes()).unwrap();
        assert!(ledger.has_categories);
        assert_eq!(ledger.rows[0].category, None);
        assert_eq!(ledger.rows[1].category.as_deref(), Some("Groceries"));
    }

    #[test]
    fn test_amount_cell_cleanup() {
        assert_eq!(parse_amount("-£1,234.50"), Some(-1234.5));
        assert_eq!(parse_amount("(12.00)"), Some(-12.0));
        assert_eq!(parse_amount(" $2,000 "), Some(2000.0));
        assert_eq!(parse_amount("-45.50"), Some(-45.5));
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("n/a"), None);
    }
}
