//! Raw documents returned by a store

use serde::Serialize;
use serde_json::{Map, Value};

use crate::model::Listing;

/// A stored document: identifier plus key-value body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawDocument {
    /// Document identifier
    pub id: String,
    /// Document body (never contains `id`)
    pub body: Map<String, Value>,
}

impl RawDocument {
    pub fn new(id: impl Into<String>, body: Map<String, Value>) -> Self {
        Self {
            id: id.into(),
            body,
        }
    }

    /// Field lookup on the body
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.body.get(field)
    }

    /// Maps the document to a listing, attaching the identifier
    pub fn into_listing(self) -> serde_json::Result<Listing> {
        Listing::from_fields(self.id, self.body)
    }
}
