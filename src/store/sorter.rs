//! Result ordering for the in-memory store
//!
//! Stable sort on a single field; documents with equal keys keep their
//! natural (identifier) order.

use std::cmp::Ordering;

use serde_json::Value;

use super::document::RawDocument;
use crate::planner::{SortDirection, SortSpec};

/// Sorts raw documents
pub struct DocumentSorter;

impl DocumentSorter {
    /// Sorts documents according to the sort specification.
    pub fn sort(documents: &mut [RawDocument], sort_spec: &SortSpec) {
        documents.sort_by(|a, b| {
            let ordering = Self::compare_values(a.get(&sort_spec.field), b.get(&sort_spec.field));

            match sort_spec.direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });
    }

    /// Compares two JSON values for sorting.
    ///
    /// Ordering rules:
    /// - missing < null < bool < number < string
    /// - for same types, natural ordering
    fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
        match (a, b) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(a_val), Some(b_val)) => {
                let a_type = Self::type_rank(a_val);
                let b_type = Self::type_rank(b_val);
                if a_type != b_type {
                    return a_type.cmp(&b_type);
                }

                match (a_val, b_val) {
                    (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
                    (Value::Number(x), Value::Number(y)) => {
                        let x = x.as_f64().unwrap_or(0.0);
                        let y = y.as_f64().unwrap_or(0.0);
                        x.partial_cmp(&y).unwrap_or(Ordering::Equal)
                    }
                    (Value::String(x), Value::String(y)) => x.cmp(y),
                    _ => Ordering::Equal,
                }
            }
        }
    }

    fn type_rank(value: &Value) -> u8 {
        match value {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Number(_) => 2,
            Value::String(_) => 3,
            Value::Array(_) => 4,
            Value::Object(_) => 5,
        }
    }
}
