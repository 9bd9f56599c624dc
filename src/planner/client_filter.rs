//! Post-retrieval filters
//!
//! Constraints the remote engine cannot serve alongside the rest of the
//! query are evaluated on mapped listings after the store returns.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::Listing;

/// A predicate applied to already-retrieved listings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClientFilter {
    /// `min <= listPrice <= max`
    PriceBetween { min: f64, max: f64 },
    /// `bedrooms >= min`
    MinBedrooms { min: u32 },
}

impl ClientFilter {
    /// Checks a single listing
    pub fn matches(&self, listing: &Listing) -> bool {
        match self {
            ClientFilter::PriceBetween { min, max } => {
                listing.list_price >= *min && listing.list_price <= *max
            }
            ClientFilter::MinBedrooms { min } => listing.bedrooms >= f64::from(*min),
        }
    }

    /// Checks a listing against every filter (AND semantics)
    pub fn matches_all(filters: &[ClientFilter], listing: &Listing) -> bool {
        filters.iter().all(|f| f.matches(listing))
    }
}

impl fmt::Display for ClientFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientFilter::PriceBetween { min, max } => write!(f, "{} <= listPrice <= {}", min, max),
            ClientFilter::MinBedrooms { min } => write!(f, "bedrooms >= {}", min),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(price: f64, bedrooms: f64) -> Listing {
        Listing {
            list_price: price,
            bedrooms,
            ..Default::default()
        }
    }

    #[test]
    fn test_price_between_is_inclusive() {
        let filter = ClientFilter::PriceBetween {
            min: 400000.0,
            max: 500000.0,
        };
        assert!(filter.matches(&listing(400000.0, 1.0)));
        assert!(filter.matches(&listing(500000.0, 1.0)));
        assert!(!filter.matches(&listing(399999.0, 1.0)));
        assert!(!filter.matches(&listing(500001.0, 1.0)));
    }

    #[test]
    fn test_matches_all_is_conjunction() {
        let filters = vec![
            ClientFilter::PriceBetween {
                min: 400000.0,
                max: 500000.0,
            },
            ClientFilter::MinBedrooms { min: 3 },
        ];
        assert!(ClientFilter::matches_all(&filters, &listing(450000.0, 3.0)));
        assert!(!ClientFilter::matches_all(&filters, &listing(450000.0, 2.0)));
        assert!(!ClientFilter::matches_all(&filters, &listing(550000.0, 4.0)));
        assert!(ClientFilter::matches_all(&[], &listing(1.0, 0.0)));
    }

    #[test]
    fn test_min_bedrooms_fractional_counts() {
        let filter = ClientFilter::MinBedrooms { min: 3 };
        assert!(!filter.matches(&listing(1.0, 2.5)));
        assert!(filter.matches(&listing(1.0, 3.5)));

        let filter = ClientFilter::MinBedrooms { min: 2 };
        assert!(filter.matches(&listing(1.0, 2.5)));
    }
}
