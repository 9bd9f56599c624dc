//! Search planner for listings
//!
//! The remote document store serves equality filters freely but accepts a
//! range filter on one field only, and only cheaply on the field being
//! sorted by. The planner decides, for each search, which constraints go to
//! the store and which are checked after retrieval.
//!
//! # Design Principles
//!
//! - Deterministic: same criteria and options → same plan
//! - Total: every input produces a plan, never an error
//! - Conservative: only provably servable shapes are pushed to the store

mod ast;
mod client_filter;
mod explain;
mod planner;

pub use ast::{FilterOp, Predicate, RangeClause, SortDirection, SortSpec};
pub use client_filter::ClientFilter;
pub use explain::ExplainPlan;
pub use planner::{FilterPlanner, QueryPlan, SearchOptions, DEFAULT_LIMIT};
