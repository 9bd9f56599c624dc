//! Listings service errors

use thiserror::Error;

use crate::store::StoreError;

/// Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Listings service errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ServiceError {
    /// Required fields absent or empty on create
    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),

    /// Submitted fields would produce a document that is not a listing
    #[error("invalid listing fields: {0}")]
    InvalidFields(String),

    /// Stored document could not be mapped to a listing
    #[error("listing {id} is malformed: {reason}")]
    Malformed { id: String, reason: String },

    /// Underlying store failure
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ServiceError {
    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::MissingFields(_) => "LISTING_MISSING_FIELDS",
            ServiceError::InvalidFields(_) => "LISTING_INVALID_FIELDS",
            ServiceError::Malformed { .. } => "LISTING_MALFORMED",
            ServiceError::Store(err) => err.code(),
        }
    }
}
