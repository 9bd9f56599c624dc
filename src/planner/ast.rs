//! Query clause structures shared by the planner and the store
//!
//! The remote engine understands equality predicates, one range clause and
//! one sort key. Range bounds live together in [`RangeClause`] so a plan can
//! never address more than one range field.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Filter operation types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "op", content = "value")]
pub enum FilterOp {
    /// Equality: field = value
    Eq(Value),
    /// Greater than or equal: field >= value
    Gte(Value),
    /// Less than or equal: field <= value
    Lte(Value),
}

impl FilterOp {
    /// Returns true if this is an equality operation
    pub fn is_equality(&self) -> bool {
        matches!(self, FilterOp::Eq(_))
    }

    /// Returns true if this is a range operation
    pub fn is_range(&self) -> bool {
        matches!(self, FilterOp::Gte(_) | FilterOp::Lte(_))
    }

    /// Operator symbol for explain output
    pub fn symbol(&self) -> &'static str {
        match self {
            FilterOp::Eq(_) => "==",
            FilterOp::Gte(_) => ">=",
            FilterOp::Lte(_) => "<=",
        }
    }

    /// The operand
    pub fn value(&self) -> &Value {
        match self {
            FilterOp::Eq(v) | FilterOp::Gte(v) | FilterOp::Lte(v) => v,
        }
    }
}

/// A single predicate (field + operation)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Predicate {
    /// Field name
    pub field: String,
    /// Filter operation
    #[serde(flatten)]
    pub op: FilterOp,
}

impl Predicate {
    /// Create an equality predicate
    pub fn eq(field: impl Into<String>, value: Value) -> Self {
        Self {
            field: field.into(),
            op: FilterOp::Eq(value),
        }
    }

    /// Create a range predicate (gte)
    pub fn gte(field: impl Into<String>, value: Value) -> Self {
        Self {
            field: field.into(),
            op: FilterOp::Gte(value),
        }
    }

    /// Create a range predicate (lte)
    pub fn lte(field: impl Into<String>, value: Value) -> Self {
        Self {
            field: field.into(),
            op: FilterOp::Lte(value),
        }
    }

    /// Returns true if this is an equality predicate
    pub fn is_equality(&self) -> bool {
        self.op.is_equality()
    }

    /// Returns true if this is a range predicate
    pub fn is_range(&self) -> bool {
        self.op.is_range()
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.field, self.op.symbol(), self.op.value())
    }
}

/// Range filter on a single field with optional lower and upper bounds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeClause {
    pub field: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lower: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upper: Option<Value>,
}

impl RangeClause {
    /// Range with only a lower bound (`field >= value`)
    pub fn at_least(field: impl Into<String>, value: Value) -> Self {
        Self {
            field: field.into(),
            lower: Some(value),
            upper: None,
        }
    }

    /// Range with only an upper bound (`field <= value`)
    pub fn at_most(field: impl Into<String>, value: Value) -> Self {
        Self {
            field: field.into(),
            lower: None,
            upper: Some(value),
        }
    }

    /// Range with both bounds, either of which may be absent
    pub fn between(field: impl Into<String>, lower: Option<Value>, upper: Option<Value>) -> Self {
        Self {
            field: field.into(),
            lower,
            upper,
        }
    }

    /// Returns true if neither bound is set
    pub fn is_unbounded(&self) -> bool {
        self.lower.is_none() && self.upper.is_none()
    }

    /// Expands the clause into its `>=` / `<=` predicates
    pub fn predicates(&self) -> Vec<Predicate> {
        let mut predicates = Vec::with_capacity(2);
        if let Some(lower) = &self.lower {
            predicates.push(Predicate::gte(&self.field, lower.clone()));
        }
        if let Some(upper) = &self.upper {
            predicates.push(Predicate::lte(&self.field, upper.clone()));
        }
        predicates
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(format!("invalid sort direction '{}', expected asc or desc", other)),
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort specification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    /// Field to sort by
    pub field: String,
    /// Sort direction
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Desc,
        }
    }
}
