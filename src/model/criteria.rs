//! Search criteria
//!
//! Every field is optional. Absent, empty and zero values all mean
//! "no constraint on this field"; the accessors only return values that
//! actually constrain a search.

use serde::{Deserialize, Serialize};

/// User-supplied filters for a single search
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchCriteria {
    pub city: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub min_bedrooms: Option<u32>,
    pub property_type: Option<String>,
}

impl SearchCriteria {
    /// Creates criteria with no constraints
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    pub fn with_min_price(mut self, price: f64) -> Self {
        self.min_price = Some(price);
        self
    }

    pub fn with_max_price(mut self, price: f64) -> Self {
        self.max_price = Some(price);
        self
    }

    pub fn with_min_bedrooms(mut self, bedrooms: u32) -> Self {
        self.min_bedrooms = Some(bedrooms);
        self
    }

    pub fn with_property_type(mut self, property_type: impl Into<String>) -> Self {
        self.property_type = Some(property_type.into());
        self
    }

    /// City constraint, if non-empty
    pub fn city(&self) -> Option<&str> {
        non_empty(self.city.as_deref())
    }

    /// Property type constraint, if non-empty
    pub fn property_type(&self) -> Option<&str> {
        non_empty(self.property_type.as_deref())
    }

    /// Minimum price constraint, if positive and finite
    pub fn min_price(&self) -> Option<f64> {
        self.min_price.filter(|p| constrains_price(*p))
    }

    /// Maximum price constraint, if positive and finite
    pub fn max_price(&self) -> Option<f64> {
        self.max_price.filter(|p| constrains_price(*p))
    }

    /// Minimum bedroom constraint, if positive
    pub fn min_bedrooms(&self) -> Option<u32> {
        self.min_bedrooms.filter(|b| *b > 0)
    }

    /// Returns true if no field constrains the search.
    pub fn is_empty(&self) -> bool {
        self.city().is_none()
            && self.property_type().is_none()
            && self.min_price().is_none()
            && self.max_price().is_none()
            && self.min_bedrooms().is_none()
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

fn constrains_price(price: f64) -> bool {
    price.is_finite() && price > 0.0
}
