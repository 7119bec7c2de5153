//! Display formatting for money amounts.

use serde::{Deserialize, Serialize};

/// Currency display settings for formatted labels. The default matches
/// UK open-banking exports: GBP symbol, comma thousands separator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CurrencyFormat {
    pub symbol: String,
    pub thousands_sep: char,
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self {
            symbol: "£".to_string(),
            thousands_sep: ',',
        }
    }
}

impl CurrencyFormat {
    pub fn new(symbol: impl Into<String>, thousands_sep: char) -> Self {
        Self {
            symbol: symbol.into(),
            thousands_sep,
        }
    }

    /// Format a magnitude to whole units: `1234.5` becomes `£1,235`.
    /// Halves round away from zero.
    pub fn format_amount(&self, amount: f64) -> String {
        format!("{}{}", self.symbol, self.group_digits(amount.round() as i64))
    }

    /// Row label for merchant summaries: `£1,235 (7 txns)`.
    pub fn txn_label(&self, total: f64, count: usize) -> String {
        format!("{} ({count} txns)", self.format_amount(total))
    }

    fn group_digits(&self, units: i64) -> String {
        let digits = units.unsigned_abs().to_string();
        let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
        if units < 0 {
            out.push('-');
        }
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                out.push(self.thousands_sep);
            }
            out.push(c);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_rounds_half_up_and_groups_thousands() {
        let gbp = CurrencyFormat::default();
        assert_eq!(gbp.txn_label(1234.5, 7), "£1,235 (7 txns)");
    }

    #[test]
    fn test_format_amount_small_values() {
        let gbp = CurrencyFormat::default();
        assert_eq!(gbp.format_amount(0.4), "£0");
        assert_eq!(gbp.format_amount(999.9), "£1,000");
        assert_eq!(gbp.format_amount(65.98), "£66");
    }

    #[test]
    fn test_format_amount_millions() {
        let gbp = CurrencyFormat::default();
        assert_eq!(gbp.format_amount(1_234_567.0), "£1,234,567");
    }

    #[test]
    fn test_non_default_currency() {
        let usd = CurrencyFormat::new("$", ',');
        assert_eq!(usd.txn_label(1500.0, 3), "$1,500 (3 txns)");

        let eur = CurrencyFormat::new("€", '.');
        assert_eq!(eur.format_amount(9876.0), "€9.876");
    }
}
