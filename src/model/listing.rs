//! Listing record as stored in the `listings` collection
//!
//! Stored documents use camelCase keys. The document identifier is never
//! part of the body; it is attached when a stored document is mapped to a
//! [`Listing`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Stored field names referenced by the planner and the store.
pub mod fields {
    pub const CITY: &str = "city";
    pub const PROPERTY_TYPE: &str = "propertyType";
    pub const LIST_PRICE: &str = "listPrice";
    pub const BEDROOMS: &str = "bedrooms";
    pub const LISTING_DATE: &str = "listingDate";
    pub const CREATED_AT: &str = "createdAt";
    pub const UPDATED_AT: &str = "updatedAt";
    pub const ID: &str = "id";
}

/// Fields that must be present and truthy when a listing is created.
pub const REQUIRED_FIELDS: [&str; 12] = [
    "listingId",
    "mlsId",
    "listingStatus",
    "listPrice",
    "propertyType",
    "description",
    "bedrooms",
    "bathrooms",
    "squareFeet",
    "streetAddress",
    "city",
    "state",
];

/// Market status of a listing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ListingStatus {
    #[default]
    Active,
    Pending,
    Sold,
    Withdrawn,
}

/// A property for sale
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Listing {
    /// Store-assigned identifier, present once persisted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub listing_id: String,
    pub mls_id: String,
    pub listing_status: ListingStatus,
    pub list_price: f64,
    pub listing_date: String,
    pub property_type: String,
    pub description: String,
    pub bedrooms: f64,
    pub bathrooms: f64,
    pub square_feet: f64,
    pub lot_size: f64,
    pub year_built: f64,
    pub parking: String,
    pub heating: String,
    pub cooling: String,
    pub hoa_fees: f64,
    pub street_address: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
    pub agent_id: String,
    pub agent_name: String,
    pub agent_phone: String,
    pub agent_email: String,
    pub brokerage_name: String,
    pub brokerage_phone: String,
    pub photos: Vec<String>,
    #[serde(rename = "virtualTourURL", skip_serializing_if = "Option::is_none")]
    pub virtual_tour_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Listing {
    /// Maps a stored document body to a listing, attaching its identifier.
    pub fn from_fields(id: impl Into<String>, body: Map<String, Value>) -> serde_json::Result<Self> {
        let mut listing: Listing = serde_json::from_value(Value::Object(body))?;
        listing.id = Some(id.into());
        Ok(listing)
    }

    /// Returns true once the listing has been persisted
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }
}

/// Returns the required fields that are absent or falsy in `body`.
///
/// Null, empty strings, zero and `false` all count as missing.
pub fn missing_required_fields(body: &Map<String, Value>) -> Vec<&'static str> {
    REQUIRED_FIELDS
        .iter()
        .copied()
        .filter(|field| !body.get(*field).map(is_truthy).unwrap_or(false))
        .collect()
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
