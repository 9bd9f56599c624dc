//! Store error types
//!
//! Error codes:
//! - STORE_FAILED_PRECONDITION (query needs a composite index)
//! - STORE_INVALID_QUERY (query shape rejected)
//! - STORE_UNAVAILABLE (transient)
//! - STORE_INVALID_DOCUMENT (payload is not a JSON object)
//! - STORE_SEED_FAILED (seed file unreadable)

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Failures reported by a listing store
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    /// The query combines fields no declared index covers
    #[error("query on '{collection}' requires a composite index on [{}]", .fields.join(", "))]
    FailedPrecondition {
        collection: String,
        fields: Vec<String>,
    },

    /// The engine rejected the query shape outright
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// The store could not be reached
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A document body was not a JSON object
    #[error("invalid document: {0}")]
    InvalidDocument(String),

    /// Seeding from a file failed
    #[error("seed failed: {0}")]
    Seed(String),
}

impl StoreError {
    pub fn invalid_query(reason: impl Into<String>) -> Self {
        Self::InvalidQuery(reason.into())
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable(reason.into())
    }

    pub fn invalid_document(reason: impl Into<String>) -> Self {
        Self::InvalidDocument(reason.into())
    }

    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::FailedPrecondition { .. } => "STORE_FAILED_PRECONDITION",
            StoreError::InvalidQuery(_) => "STORE_INVALID_QUERY",
            StoreError::Unavailable(_) => "STORE_UNAVAILABLE",
            StoreError::InvalidDocument(_) => "STORE_INVALID_DOCUMENT",
            StoreError::Seed(_) => "STORE_SEED_FAILED",
        }
    }

    /// Returns true if the failure means a composite index is missing
    pub fn is_missing_index(&self) -> bool {
        matches!(self, StoreError::FailedPrecondition { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_index_display() {
        let err = StoreError::FailedPrecondition {
            collection: "listings".into(),
            fields: vec!["city".into(), "listingDate".into()],
        };
        assert!(err.is_missing_index());
        assert_eq!(err.code(), "STORE_FAILED_PRECONDITION");
        assert_eq!(
            err.to_string(),
            "query on 'listings' requires a composite index on [city, listingDate]"
        );
    }

    #[test]
    fn test_other_errors_not_missing_index() {
        assert!(!StoreError::unavailable("down").is_missing_index());
        assert_eq!(StoreError::invalid_query("x").code(), "STORE_INVALID_QUERY");
    }
}
