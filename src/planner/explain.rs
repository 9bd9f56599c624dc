//! Explain output for search plans
//!
//! Produces deterministic, human-readable descriptions of where each
//! constraint of a search is evaluated.

use std::fmt;

use serde::Serialize;

use super::planner::QueryPlan;

/// Explain plan output
#[derive(Debug, Clone, Serialize)]
pub struct ExplainPlan {
    /// Server-side predicates in submission order
    pub server_predicates: Vec<String>,
    /// Field carrying the range clause, if any
    pub range_field: Option<String>,
    /// Sort description
    pub sort: String,
    /// Limit
    pub limit: usize,
    /// Post-retrieval filters
    pub client_filters: Vec<String>,
}

impl ExplainPlan {
    /// Creates an explain plan from a query plan
    pub fn from_plan(plan: &QueryPlan) -> Self {
        Self {
            server_predicates: plan
                .server_predicates()
                .iter()
                .map(ToString::to_string)
                .collect(),
            range_field: plan.range.as_ref().map(|r| r.field.clone()),
            sort: format!("{} {}", plan.sort.field, plan.sort.direction),
            limit: plan.limit,
            client_filters: plan.client_filters.iter().map(ToString::to_string).collect(),
        }
    }
}

impl fmt::Display for ExplainPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== SEARCH PLAN ===")?;

        if self.server_predicates.is_empty() {
            writeln!(f, "Server: (no filters)")?;
        } else {
            writeln!(f, "Server:")?;
            for pred in &self.server_predicates {
                writeln!(f, "  - {}", pred)?;
            }
        }
        if let Some(field) = &self.range_field {
            writeln!(f, "Range Field: {}", field)?;
        }
        writeln!(f, "Sort: {}", self.sort)?;
        writeln!(f, "Limit: {}", self.limit)?;

        if !self.client_filters.is_empty() {
            writeln!(f, "Client:")?;
            for filter in &self.client_filters {
                writeln!(f, "  - {}", filter)?;
            }
        }

        Ok(())
    }
}
