//! Pipeline error taxonomy.
//!
//! Every variant is recoverable at the session boundary: schema and
//! resource failures prompt a re-upload, an empty result renders as an
//! empty state, and an invalid selection re-prompts.

use thiserror::Error;

/// Errors raised by the ingest and explore pipelines.
#[derive(Debug, Error)]
pub enum ExploreError {
    /// A required column is missing or a cell cannot be parsed.
    #[error("schema error: {0}")]
    Schema(String),

    /// Filtering and exclusion left zero rows to aggregate.
    #[error("nothing to aggregate: {0}")]
    EmptyResult(String),

    /// The selected category is not in the current summary.
    #[error("invalid selection: {0}")]
    InvalidSelection(String),

    /// The input exceeds a fixed processing ceiling.
    #[error("resource limit exceeded: {0}")]
    ResourceLimit(String),
}

impl ExploreError {
    pub fn schema(msg: impl Into<String>) -> Self {
        Self::Schema(msg.into())
    }

    pub fn empty_result(msg: impl Into<String>) -> Self {
        Self::EmptyResult(msg.into())
    }

    pub fn invalid_selection(msg: impl Into<String>) -> Self {
        Self::InvalidSelection(msg.into())
    }

    pub fn resource_limit(msg: impl Into<String>) -> Self {
        Self::ResourceLimit(msg.into())
    }
}

/// Pipeline result type.
pub type Result<T> = std::result::Result<T, ExploreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_failure() {
        let err = ExploreError::schema("required column 'amount' not found");
        assert_eq!(
            err.to_string(),
            "schema error: required column 'amount' not found"
        );

        let err = ExploreError::invalid_selection("category 'Groceries' is not in the current summary");
        assert!(err.to_string().starts_with("invalid selection:"));
    }
}
