//! Server-side predicate evaluation for the in-memory store
//!
//! Mirrors the remote engine's matching rules: no type coercion, missing
//! or null fields never match, numbers compare numerically and strings
//! lexicographically.

use std::cmp::Ordering;

use serde_json::{Map, Value};

use crate::planner::{FilterOp, Predicate};

/// Evaluates predicates against document bodies
pub struct PredicateFilter;

impl PredicateFilter {
    /// Checks if a document matches all predicates
    pub fn matches(document: &Map<String, Value>, predicates: &[Predicate]) -> bool {
        predicates
            .iter()
            .all(|pred| Self::matches_predicate(document, pred))
    }

    fn matches_predicate(document: &Map<String, Value>, predicate: &Predicate) -> bool {
        let actual = match document.get(&predicate.field) {
            Some(Value::Null) | None => return false,
            Some(v) => v,
        };

        match &predicate.op {
            FilterOp::Eq(expected) => Self::eq_match(actual, expected),
            FilterOp::Gte(bound) => matches!(
                Self::compare(actual, bound),
                Some(Ordering::Greater | Ordering::Equal)
            ),
            FilterOp::Lte(bound) => matches!(
                Self::compare(actual, bound),
                Some(Ordering::Less | Ordering::Equal)
            ),
        }
    }

    /// Exact equality; numbers compare by value so `3` matches `3.0`
    fn eq_match(actual: &Value, expected: &Value) -> bool {
        match (actual, expected) {
            (Value::Number(_), Value::Number(_)) => {
                Self::compare(actual, expected) == Some(Ordering::Equal)
            }
            _ => actual == expected,
        }
    }

    /// Ordering between two comparable values of the same kind
    fn compare(actual: &Value, bound: &Value) -> Option<Ordering> {
        match (actual, bound) {
            (Value::Number(a), Value::Number(b)) => {
                if let (Some(ai), Some(bi)) = (a.as_i64(), b.as_i64()) {
                    return Some(ai.cmp(&bi));
                }
                a.as_f64()?.partial_cmp(&b.as_f64()?)
            }
            (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_eq_match() {
        let d = doc(json!({"city": "Anytown", "bedrooms": 3}));
        assert!(PredicateFilter::matches(&d, &[Predicate::eq("city", json!("Anytown"))]));
        assert!(!PredicateFilter::matches(&d, &[Predicate::eq("city", json!("Elsewhere"))]));
        assert!(PredicateFilter::matches(&d, &[Predicate::eq("bedrooms", json!(3.0))]));
    }

    #[test]
    fn test_no_type_coercion() {
        let d = doc(json!({"bedrooms": "3"}));
        assert!(!PredicateFilter::matches(&d, &[Predicate::eq("bedrooms", json!(3))]));
        assert!(!PredicateFilter::matches(&d, &[Predicate::gte("bedrooms", json!(1))]));
    }

    #[test]
    fn test_range_bounds_inclusive() {
        let d = doc(json!({"listPrice": 420000}));
        assert!(PredicateFilter::matches(
            &d,
            &[
                Predicate::gte("listPrice", json!(420000.0)),
                Predicate::lte("listPrice", json!(420000)),
            ]
        ));
        assert!(!PredicateFilter::matches(&d, &[Predicate::gte("listPrice", json!(420001))]));
        assert!(!PredicateFilter::matches(&d, &[Predicate::lte("listPrice", json!(419999.5))]));
    }

    #[test]
    fn test_missing_and_null_never_match() {
        let d = doc(json!({"city": null}));
        assert!(!PredicateFilter::matches(&d, &[Predicate::eq("city", json!(null))]));
        assert!(!PredicateFilter::matches(&d, &[Predicate::gte("listPrice", json!(0))]));
    }

    #[test]
    fn test_string_range() {
        let d = doc(json!({"listingDate": "2024-03-01"}));
        assert!(PredicateFilter::matches(&d, &[Predicate::gte("listingDate", json!("2024-01-01"))]));
    }

    #[test]
    fn test_empty_predicates_match() {
        assert!(PredicateFilter::matches(&Map::new(), &[]));
    }
}
