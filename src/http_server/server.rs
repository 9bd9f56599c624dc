//! # HTTP Server
//!
//! Combines the health and listing routers behind CORS, request tracing and
//! the API key check.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::{header, HeaderName, Method};
use axum::{middleware, Router};
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::AppConfig;
use crate::service::ListingService;

use super::auth::{require_api_key, ApiKeys, API_KEY_HEADER};
use super::config::HttpServerConfig;
use super::health_routes::health_routes;
use super::listing_routes::{listing_routes, ListingsState};

/// HTTP server for the listings API
pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
}

impl HttpServer {
    /// Create a server from application configuration
    pub fn new(config: &AppConfig, service: ListingService) -> Self {
        let router = Self::build_router(config, service);
        Self {
            config: config.server.clone(),
            router,
        }
    }

    /// Build the combined router with all endpoints
    fn build_router(config: &AppConfig, service: ListingService) -> Router {
        let keys = Arc::new(ApiKeys::new(config.api_keys.iter().cloned()));
        let state = Arc::new(ListingsState::new(service, config.default_limit));

        let api = listing_routes(state)
            .layer(middleware::from_fn_with_state(keys, require_api_key));

        Router::new()
            .merge(health_routes(&config.collection))
            .nest("/api", api)
            .layer(TraceLayer::new_for_http())
            .layer(cors_layer(&config.server))
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Start the HTTP server
    pub async fn start(self) -> Result<(), io::Error> {
        let addr: SocketAddr = self
            .config
            .socket_addr()
            .parse()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

        let listener = TcpListener::bind(addr).await?;
        info!(%addr, "listings API listening");
        axum::serve(listener, self.router).await?;

        Ok(())
    }
}

fn cors_layer(config: &HttpServerConfig) -> CorsLayer {
    let origin = match config.allowed_origins() {
        Some(origins) => AllowOrigin::list(origins),
        None => AllowOrigin::from(Any),
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static(API_KEY_HEADER),
        ])
}
