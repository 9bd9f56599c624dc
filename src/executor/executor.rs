//! Search executor for listings
//!
//! Execution flow (strict order):
//! 1. Build the store query from the plan's server-side clauses
//! 2. Await retrieval
//! 3. Map each raw document to a listing
//! 4. Keep listings passing every client-side filter
//! 5. Return in store order; the store's cap already applies
//!
//! Retrieval failures never reach the caller of [`SearchExecutor::search`]
//! or [`SearchExecutor::get_all`]: they are logged and an empty result is
//! returned.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::model::{Listing, SearchCriteria};
use crate::planner::{ClientFilter, FilterPlanner, QueryPlan, SearchOptions};
use crate::store::{ListingStore, RawDocument, StoreError, StoreQuery, StoreResult};

/// Executes listing searches against an injected store
#[derive(Clone)]
pub struct SearchExecutor {
    store: Arc<dyn ListingStore>,
}

impl SearchExecutor {
    /// Creates a new executor
    pub fn new(store: Arc<dyn ListingStore>) -> Self {
        Self { store }
    }

    /// Searches listings.
    ///
    /// Criteria with no constraints take the [`get_all`](Self::get_all)
    /// path and keep the store's natural order.
    pub async fn search(&self, criteria: &SearchCriteria, options: &SearchOptions) -> Vec<Listing> {
        if criteria.is_empty() {
            return self.get_all().await;
        }

        let plan = FilterPlanner::plan(criteria, options);
        debug!(
            collection = self.store.collection(),
            equality = plan.equality.len(),
            range = ?plan.range.as_ref().map(|r| r.field.as_str()),
            client_filters = plan.client_filters.len(),
            sort_by = %plan.sort.field,
            limit = plan.limit,
            "planned listing search"
        );

        match self.try_execute(&plan).await {
            Ok(listings) => listings,
            Err(err) => {
                self.log_failure("search", &err);
                Vec::new()
            }
        }
    }

    /// Returns every listing, unfiltered and in the store's natural order.
    pub async fn get_all(&self) -> Vec<Listing> {
        match self.store.fetch_all().await {
            Ok(documents) => map_documents(documents).collect(),
            Err(err) => {
                self.log_failure("get_all", &err);
                Vec::new()
            }
        }
    }

    /// Executes a plan, surfacing retrieval failures to the caller.
    pub async fn try_execute(&self, plan: &QueryPlan) -> StoreResult<Vec<Listing>> {
        let query = StoreQuery::from_plan(plan);
        let documents = self.store.fetch(&query).await?;
        let fetched = documents.len();

        let listings: Vec<Listing> = map_documents(documents)
            .filter(|listing| ClientFilter::matches_all(&plan.client_filters, listing))
            .collect();

        debug!(
            collection = self.store.collection(),
            fetched,
            returned = listings.len(),
            filtered_out = fetched - listings.len(),
            "executed listing search"
        );
        Ok(listings)
    }

    fn log_failure(&self, operation: &str, err: &StoreError) {
        let collection = self.store.collection();
        if err.is_missing_index() {
            warn!(
                collection,
                operation,
                code = err.code(),
                error = %err,
                "query requires a composite index; declare it on the collection to serve this filter combination"
            );
        } else {
            warn!(
                collection,
                operation,
                code = err.code(),
                error = %err,
                "listing retrieval failed"
            );
        }
    }
}

/// Maps raw documents to listings, skipping documents that cannot be read
fn map_documents(documents: Vec<RawDocument>) -> impl Iterator<Item = Listing> {
    documents.into_iter().filter_map(|doc| {
        let id = doc.id.clone();
        match doc.into_listing() {
            Ok(listing) => Some(listing),
            Err(err) => {
                warn!(id = %id, error = %err, "skipping unreadable listing document");
                None
            }
        }
    })
}
