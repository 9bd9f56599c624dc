//! Listing store
//!
//! The retrieval and persistence capability the search core consumes. A
//! store handle is scoped to one collection and is injected by the caller,
//! which owns its lifecycle.
//!
//! [`MemoryStore`] simulates the managed document engine, including its
//! query-shape rules, so the planner and executor can run end to end
//! without a network dependency.

mod document;
mod errors;
mod filters;
mod memory;
mod sorter;

use std::future::Future;
use std::pin::Pin;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::planner::{Predicate, QueryPlan, RangeClause, SortSpec};

pub use document::RawDocument;
pub use errors::{StoreError, StoreResult};
pub use filters::PredicateFilter;
pub use memory::{CompositeIndex, IndexPolicy, MemoryStore};
pub use sorter::DocumentSorter;

/// Boxed future returned by store operations
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = StoreResult<T>> + Send + 'a>>;

/// Query descriptor submitted to a store
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoreQuery {
    /// Equality predicates
    pub equality: Vec<Predicate>,
    /// At most one range clause
    pub range: Option<RangeClause>,
    /// Ordering
    pub sort: SortSpec,
    /// Result cap
    pub limit: usize,
}

impl StoreQuery {
    /// Builds the descriptor for the server-side part of a plan
    pub fn from_plan(plan: &QueryPlan) -> Self {
        Self {
            equality: plan.equality.clone(),
            range: plan.range.clone(),
            sort: plan.sort.clone(),
            limit: plan.limit,
        }
    }

    /// All predicates, equality first
    pub fn predicates(&self) -> Vec<Predicate> {
        let mut predicates = self.equality.clone();
        if let Some(range) = &self.range {
            predicates.extend(range.predicates());
        }
        predicates
    }

    /// Fields touched by the query: equality fields, range field, sort field
    pub fn fields(&self) -> Vec<String> {
        let mut fields: Vec<String> = Vec::new();
        let touched = self
            .equality
            .iter()
            .map(|p| p.field.as_str())
            .chain(self.range.as_ref().map(|r| r.field.as_str()))
            .chain(std::iter::once(self.sort.field.as_str()));
        for field in touched {
            if !fields.iter().any(|f| f == field) {
                fields.push(field.to_string());
            }
        }
        fields
    }

    /// Returns true if a filtered field differs from the sort field, which
    /// a single-field index cannot serve.
    pub fn requires_composite_index(&self) -> bool {
        self.equality
            .iter()
            .map(|p| p.field.as_str())
            .chain(self.range.as_ref().map(|r| r.field.as_str()))
            .any(|field| field != self.sort.field)
    }
}

/// Retrieval and persistence over one collection
pub trait ListingStore: Send + Sync {
    /// Collection name, for diagnostics
    fn collection(&self) -> &str;

    /// Runs a filtered, sorted, capped query
    fn fetch<'a>(&'a self, query: &'a StoreQuery) -> StoreFuture<'a, Vec<RawDocument>>;

    /// Returns every document in natural order
    fn fetch_all(&self) -> StoreFuture<'_, Vec<RawDocument>>;

    /// Looks up one document by identifier
    fn get<'a>(&'a self, id: &'a str) -> StoreFuture<'a, Option<RawDocument>>;

    /// Creates a document, assigning its identifier and timestamps
    fn insert(&self, body: Map<String, Value>) -> StoreFuture<'_, RawDocument>;

    /// Merges `body` into an existing document and refreshes `updatedAt`.
    /// Returns `None` if the document does not exist.
    fn update<'a>(
        &'a self,
        id: &'a str,
        body: Map<String, Value>,
    ) -> StoreFuture<'a, Option<RawDocument>>;

    /// Removes a document, returning it if it existed
    fn delete<'a>(&'a self, id: &'a str) -> StoreFuture<'a, Option<RawDocument>>;
}
