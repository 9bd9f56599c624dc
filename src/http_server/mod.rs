//! # HTTP Server Module
//!
//! Axum server exposing the listings API.
//!
//! # Endpoints
//!
//! - `/health` - Health check (no API key)
//! - `/api/listings` - Search, list and create
//! - `/api/listings/:id` - Get, update and delete

pub mod auth;
pub mod config;
pub mod errors;
pub mod health_routes;
pub mod listing_routes;
pub mod server;

pub use auth::{ApiKeys, API_KEY_HEADER};
pub use config::HttpServerConfig;
pub use errors::{ApiError, ApiResult};
pub use server::HttpServer;
