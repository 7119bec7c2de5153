//! Merchant-to-category and noise-exclusion rules.
//!
//! Both tables are configuration: loaded once at startup and immutable for
//! the life of the process. Business-rule changes mean editing a JSON file,
//! not recompiling.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Lookup tables driving both explore views.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SpendRules {
    /// Merchant name (canonical form) to committed category label.
    committed: HashMap<String, String>,
    /// Enrichment-category labels (canonical form) treated as non-spend.
    noise: HashSet<String>,
}

impl SpendRules {
    /// Build a rule set, canonicalizing every lookup key.
    pub fn new(committed: HashMap<String, String>, noise: HashSet<String>) -> Self {
        Self {
            committed: committed
                .into_iter()
                .map(|(merchant, label)| (normalize_key(&merchant), label))
                .collect(),
            noise: noise.iter().map(|label| normalize_key(label)).collect(),
        }
    }

    /// The default UK rule set: recurring obligations (connectivity,
    /// utilities, council tax, housing, childcare) plus the standard
    /// non-spend enrichment labels.
    pub fn builtin() -> Self {
        let committed = [
            ("ee", "Media & Connectivity"),
            ("vodafone", "Media & Connectivity"),
            ("virgin media", "Media & Connectivity"),
            ("thames water", "Utilities"),
            ("edf", "Utilities"),
            ("manchester city council", "Council Tax"),
            ("hsbc mortgage", "Housing"),
            ("childcare co-op", "Childcare"),
        ]
        .into_iter()
        .map(|(merchant, label)| (merchant.to_string(), label.to_string()))
        .collect();

        let noise = ["transfers", "insufficient information", "unknown"]
            .into_iter()
            .map(str::to_string)
            .collect();

        Self::new(committed, noise)
    }

    /// Load rules from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        let parsed: SpendRules =
            serde_json::from_str(&raw).with_context(|| format!("parse {}", path.display()))?;
        Ok(Self::new(parsed.committed, parsed.noise))
    }

    /// Committed category for a merchant name, if the merchant is mapped.
    pub fn committed_category(&self, merchant: &str) -> Option<&str> {
        self.committed.get(&normalize_key(merchant)).map(String::as_str)
    }

    /// Whether an enrichment category is a known non-spend label.
    pub fn is_noise(&self, category: &str) -> bool {
        self.noise.contains(&normalize_key(category))
    }
}

/// Canonical lookup form: trimmed, lowercased, inner runs of whitespace
/// collapsed to a single space.
pub(crate) fn normalize_key(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_and_whitespace_insensitive() {
        let rules = SpendRules::builtin();
        assert_eq!(rules.committed_category("EE"), Some("Media & Connectivity"));
        assert_eq!(rules.committed_category("ee"), Some("Media & Connectivity"));
        assert_eq!(
            rules.committed_category("  Virgin   Media "),
            Some("Media & Connectivity")
        );
        assert_eq!(rules.committed_category("Unknown Shop"), None);
    }

    #[test]
    fn test_noise_labels_match_case_insensitively() {
        let rules = SpendRules::builtin();
        assert!(rules.is_noise("Transfers"));
        assert!(rules.is_noise("INSUFFICIENT INFORMATION"));
        assert!(!rules.is_noise("Groceries"));
    }

    #[test]
    fn test_new_canonicalizes_configured_keys() {
        let committed = HashMap::from([(" My  Gym ".to_string(), "Health".to_string())]);
        let noise = HashSet::from(["  Pending  ".to_string()]);
        let rules = SpendRules::new(committed, noise);
        assert_eq!(rules.committed_category("my gym"), Some("Health"));
        assert!(rules.is_noise("pending"));
    }

    #[test]
    fn test_unknown_json_keys_are_rejected() {
        let raw = r#"{"committed": {}, "noise": [], "extra": 1}"#;
        assert!(serde_json::from_str::<SpendRules>(raw).is_err());
    }
}
