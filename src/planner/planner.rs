//! Listing search planner
//!
//! Splits search criteria between clauses the remote engine can serve and
//! filters evaluated after retrieval.
//!
//! Engine rules the plan must respect:
//! - equality clauses are unrestricted
//! - at most one field may carry a range filter
//! - a range filter on a field other than the sort key needs a composite
//!   index, and two bounds on such a field are never submitted
//!
//! Planning never fails: whatever cannot be pushed safely is evaluated
//! client-side instead.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::model::{fields, SearchCriteria};

use super::ast::{Predicate, RangeClause, SortDirection, SortSpec};
use super::client_filter::ClientFilter;

/// Result cap applied when the caller does not pick one
pub const DEFAULT_LIMIT: usize = 20;

/// Sort and cap options for a search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchOptions {
    /// Field to order by (default: `listingDate`)
    pub sort_by: String,
    /// Order direction (default: descending)
    pub direction: SortDirection,
    /// Result cap (default: 20)
    pub limit: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            sort_by: fields::LISTING_DATE.to_string(),
            direction: SortDirection::Desc,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl SearchOptions {
    pub fn sorted_by(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.sort_by = field.into();
        self.direction = direction;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    fn sort_spec(&self) -> SortSpec {
        SortSpec {
            field: self.sort_by.clone(),
            direction: self.direction,
        }
    }
}

/// Immutable search plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryPlan {
    /// Server-side equality clauses, city first
    pub equality: Vec<Predicate>,
    /// The single server-side range clause, if any
    pub range: Option<RangeClause>,
    /// Server-side ordering
    pub sort: SortSpec,
    /// Server-side result cap
    pub limit: usize,
    /// Filters evaluated after retrieval, all must pass
    pub client_filters: Vec<ClientFilter>,
}

impl QueryPlan {
    /// All server-side predicates, equality first
    pub fn server_predicates(&self) -> Vec<Predicate> {
        let mut predicates = self.equality.clone();
        if let Some(range) = &self.range {
            predicates.extend(range.predicates());
        }
        predicates
    }

    /// Returns true if some constraint is evaluated after retrieval
    pub fn has_client_filters(&self) -> bool {
        !self.client_filters.is_empty()
    }
}

/// Planner for listing searches. Stateless and deterministic.
pub struct FilterPlanner;

impl FilterPlanner {
    /// Builds the plan for `criteria` under `options`.
    pub fn plan(criteria: &SearchCriteria, options: &SearchOptions) -> QueryPlan {
        let mut equality = Vec::new();
        if let Some(city) = criteria.city() {
            equality.push(Predicate::eq(fields::CITY, json!(city)));
        }
        if let Some(property_type) = criteria.property_type() {
            equality.push(Predicate::eq(fields::PROPERTY_TYPE, json!(property_type)));
        }

        let mut client_filters = Vec::new();
        let min_price = criteria.min_price();
        let max_price = criteria.max_price();

        let range = if options.sort_by == fields::LIST_PRICE {
            // Both bounds sit on the sort key, which the engine serves directly.
            match (min_price, max_price) {
                (None, None) => None,
                (min, max) => Some(RangeClause::between(
                    fields::LIST_PRICE,
                    min.map(|p| json!(p)),
                    max.map(|p| json!(p)),
                )),
            }
        } else {
            match (min_price, max_price) {
                (Some(min), Some(max)) => {
                    client_filters.push(ClientFilter::PriceBetween { min, max });
                    None
                }
                (Some(min), None) => Some(RangeClause::at_least(fields::LIST_PRICE, json!(min))),
                (None, Some(max)) => Some(RangeClause::at_most(fields::LIST_PRICE, json!(max))),
                (None, None) => None,
            }
        };

        // Bedrooms would be a second range field in every branch.
        if let Some(min) = criteria.min_bedrooms() {
            client_filters.push(ClientFilter::MinBedrooms { min });
        }

        QueryPlan {
            equality,
            range,
            sort: options.sort_spec(),
            limit: options.limit,
            client_filters,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn by_price() -> SearchOptions {
        SearchOptions::default().sorted_by(fields::LIST_PRICE, SortDirection::Asc)
    }

    #[test]
    fn test_defaults() {
        let options = SearchOptions::default();
        assert_eq!(options.sort_by, "listingDate");
        assert_eq!(options.direction, SortDirection::Desc);
        assert_eq!(options.limit, 20);
    }

    #[test]
    fn test_equality_clauses_pushed_in_order() {
        let criteria = SearchCriteria::new()
            .with_property_type("Condo")
            .with_city("Anytown");
        let plan = FilterPlanner::plan(&criteria, &SearchOptions::default());

        assert_eq!(
            plan.equality,
            vec![
                Predicate::eq("city", json!("Anytown")),
                Predicate::eq("propertyType", json!("Condo")),
            ]
        );
        assert!(plan.range.is_none());
        assert!(plan.client_filters.is_empty());
    }

    #[test]
    fn test_empty_strings_not_pushed() {
        let criteria = SearchCriteria::new().with_city("").with_property_type("");
        let plan = FilterPlanner::plan(&criteria, &SearchOptions::default());
        assert!(plan.equality.is_empty());
    }

    #[test]
    fn test_price_sort_pushes_both_bounds() {
        let criteria = SearchCriteria::new()
            .with_min_price(100000.0)
            .with_max_price(500000.0);
        let plan = FilterPlanner::plan(&criteria, &by_price());

        let range = plan.range.expect("range clause");
        assert_eq!(range.field, "listPrice");
        assert_eq!(range.lower, Some(json!(100000.0)));
        assert_eq!(range.upper, Some(json!(500000.0)));
        assert!(plan.client_filters.is_empty());
        assert_eq!(plan.sort, SortSpec::asc("listPrice"));
    }

    #[test]
    fn test_price_sort_single_bound() {
        let criteria = SearchCriteria::new().with_max_price(300000.0);
        let plan = FilterPlanner::plan(&criteria, &by_price());
        assert_eq!(
            plan.range,
            Some(RangeClause::at_most("listPrice", json!(300000.0)))
        );
    }

    #[test]
    fn test_price_sort_bedrooms_client_side() {
        let criteria = SearchCriteria::new()
            .with_min_price(100000.0)
            .with_min_bedrooms(2);
        let plan = FilterPlanner::plan(&criteria, &by_price());

        assert!(plan.range.is_some());
        assert_eq!(plan.client_filters, vec![ClientFilter::MinBedrooms { min: 2 }]);
    }

    #[test]
    fn test_default_sort_both_bounds_client_side() {
        let criteria = SearchCriteria::new()
            .with_min_price(100000.0)
            .with_max_price(500000.0);
        let plan = FilterPlanner::plan(&criteria, &SearchOptions::default());

        assert!(plan.range.is_none());
        assert_eq!(
            plan.client_filters,
            vec![ClientFilter::PriceBetween {
                min: 100000.0,
                max: 500000.0
            }]
        );
    }

    #[test]
    fn test_default_sort_min_only_server_side() {
        let criteria = SearchCriteria::new().with_min_price(250000.0);
        let plan = FilterPlanner::plan(&criteria, &SearchOptions::default());

        assert_eq!(
            plan.range,
            Some(RangeClause::at_least("listPrice", json!(250000.0)))
        );
        assert!(plan.client_filters.is_empty());
    }

    #[test]
    fn test_default_sort_max_only_server_side() {
        let criteria = SearchCriteria::new().with_max_price(250000.0);
        let plan = FilterPlanner::plan(&criteria, &SearchOptions::default());

        assert_eq!(
            plan.range,
            Some(RangeClause::at_most("listPrice", json!(250000.0)))
        );
    }

    #[test]
    fn test_zero_prices_ignored() {
        let criteria = SearchCriteria::new()
            .with_min_price(0.0)
            .with_max_price(0.0)
            .with_city("Anytown");
        let plan = FilterPlanner::plan(&criteria, &by_price());
        assert!(plan.range.is_none());
        assert!(plan.client_filters.is_empty());
    }

    #[test]
    fn test_other_sort_field_treated_as_default() {
        let criteria = SearchCriteria::new()
            .with_min_price(1.0)
            .with_max_price(2.0)
            .with_min_bedrooms(1);
        let options = SearchOptions::default().sorted_by("bedrooms", SortDirection::Asc);
        let plan = FilterPlanner::plan(&criteria, &options);

        assert!(plan.range.is_none());
        assert_eq!(plan.client_filters.len(), 2);
        assert_eq!(plan.sort.field, "bedrooms");
    }

    #[test]
    fn test_server_predicates() {
        let criteria = SearchCriteria::new()
            .with_city("Anytown")
            .with_min_price(1.0)
            .with_max_price(2.0);
        let plan = FilterPlanner::plan(&criteria, &by_price());

        assert_eq!(
            plan.server_predicates(),
            vec![
                Predicate::eq("city", json!("Anytown")),
                Predicate::gte("listPrice", json!(1.0)),
                Predicate::lte("listPrice", json!(2.0)),
            ]
        );
    }

    #[test]
    fn test_deterministic_planning() {
        let criteria = SearchCriteria::new()
            .with_city("Anytown")
            .with_min_price(400000.0)
            .with_max_price(500000.0)
            .with_min_bedrooms(3);
        let options = SearchOptions::default().with_limit(50);

        let plan1 = FilterPlanner::plan(&criteria, &options);
        let plan2 = FilterPlanner::plan(&criteria, &options);
        let plan3 = FilterPlanner::plan(&criteria, &options);

        assert_eq!(plan1, plan2);
        assert_eq!(plan2, plan3);
        assert_eq!(plan1.limit, 50);
    }
}
