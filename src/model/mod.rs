//! Listing domain model
//!
//! The persisted [`Listing`] record and the transient [`SearchCriteria`]
//! a search is driven by.

mod criteria;
mod listing;

pub use criteria::SearchCriteria;
pub use listing::{fields, missing_required_fields, Listing, ListingStatus, REQUIRED_FIELDS};
