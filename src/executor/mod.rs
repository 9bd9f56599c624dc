//! Search executor subsystem
//!
//! Consumes a plan, runs the server-side part against the injected store and
//! applies the client-side part to what comes back.
//!
//! # Invariants
//!
//! - Client-side filtering only shrinks the store's result; it never
//!   re-sorts or re-caps
//! - Criteria without constraints bypass planning entirely
//! - `search` and `get_all` never fail; failures become empty results

mod executor;

pub use executor::SearchExecutor;
