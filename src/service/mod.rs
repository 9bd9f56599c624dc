//! Listings service
//!
//! Application-level entry points over an injected store: search and
//! get-all through the executor, plus single-record CRUD.

mod errors;

use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::info;

use crate::executor::SearchExecutor;
use crate::model::{fields, missing_required_fields, Listing, SearchCriteria};
use crate::planner::SearchOptions;
use crate::store::{ListingStore, RawDocument};

pub use errors::{ServiceError, ServiceResult};

/// Listings service shared by the HTTP layer and the CLI
#[derive(Clone)]
pub struct ListingService {
    store: Arc<dyn ListingStore>,
    executor: SearchExecutor,
}

impl ListingService {
    /// Creates a service over `store`
    pub fn new(store: Arc<dyn ListingStore>) -> Self {
        Self {
            executor: SearchExecutor::new(Arc::clone(&store)),
            store,
        }
    }

    /// Searches listings. Never fails; see [`SearchExecutor::search`].
    pub async fn search(&self, criteria: &SearchCriteria, options: &SearchOptions) -> Vec<Listing> {
        self.executor.search(criteria, options).await
    }

    /// Returns every listing. Never fails.
    pub async fn get_all(&self) -> Vec<Listing> {
        self.executor.get_all().await
    }

    /// Looks up a listing by identifier
    pub async fn get(&self, id: &str) -> ServiceResult<Option<Listing>> {
        match self.store.get(id).await? {
            Some(doc) => Ok(Some(to_listing(doc)?)),
            None => Ok(None),
        }
    }

    /// Creates a listing after checking required fields
    pub async fn create(&self, body: Map<String, Value>) -> ServiceResult<Listing> {
        let missing = missing_required_fields(&body);
        if !missing.is_empty() {
            return Err(ServiceError::MissingFields(
                missing.into_iter().map(String::from).collect(),
            ));
        }

        check_mappable(body.clone())?;

        let doc = self.store.insert(body).await?;
        info!(collection = self.store.collection(), id = %doc.id, "listing created");
        to_listing(doc)
    }

    /// Applies a partial update. Returns `None` if the listing does not exist.
    ///
    /// The merged result is checked before anything is written, so a rejected
    /// update leaves the stored listing untouched.
    pub async fn update(&self, id: &str, body: Map<String, Value>) -> ServiceResult<Option<Listing>> {
        let Some(current) = self.store.get(id).await? else {
            return Ok(None);
        };
        let mut merged = current.body;
        merged.extend(body.clone());
        check_mappable(merged)?;

        match self.store.update(id, body).await? {
            Some(doc) => {
                info!(collection = self.store.collection(), id, "listing updated");
                Ok(Some(to_listing(doc)?))
            }
            None => Ok(None),
        }
    }

    /// Deletes a listing, returning it as it was before deletion
    pub async fn delete(&self, id: &str) -> ServiceResult<Option<Listing>> {
        match self.store.delete(id).await? {
            Some(doc) => {
                info!(collection = self.store.collection(), id, "listing deleted");
                Ok(Some(to_listing(doc)?))
            }
            None => Ok(None),
        }
    }
}

/// Rejects fields that would be stored but could not be read back as a
/// listing. Store-managed fields are ignored; the store overwrites them.
fn check_mappable(mut candidate: Map<String, Value>) -> ServiceResult<()> {
    for managed in [fields::ID, fields::CREATED_AT, fields::UPDATED_AT] {
        candidate.remove(managed);
    }
    Listing::from_fields("", candidate)
        .map(|_| ())
        .map_err(|e| ServiceError::InvalidFields(e.to_string()))
}

fn to_listing(doc: RawDocument) -> ServiceResult<Listing> {
    let id = doc.id.clone();
    doc.into_listing().map_err(|e| ServiceError::Malformed {
        id,
        reason: e.to_string(),
    })
}
