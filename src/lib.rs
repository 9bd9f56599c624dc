//! listings - real estate listing search and management
//!
//! Searches are planned by [`planner::FilterPlanner`], which splits criteria
//! between clauses a document store can serve and filters applied after
//! retrieval, then executed by [`executor::SearchExecutor`] against an
//! injected [`store::ListingStore`].

pub mod cli;
pub mod config;
pub mod executor;
pub mod http_server;
pub mod model;
pub mod planner;
pub mod service;
pub mod store;
