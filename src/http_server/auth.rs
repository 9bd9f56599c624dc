//! Shared-secret API key check
//!
//! Every listings request must carry an `x-api-key` header matching one of
//! the configured keys. Comparison is constant-time.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use subtle::{Choice, ConstantTimeEq};
use tracing::warn;

use super::errors::ApiError;

/// Header carrying the API key
pub const API_KEY_HEADER: &str = "x-api-key";

/// Set of accepted API keys
#[derive(Debug, Clone, Default)]
pub struct ApiKeys {
    keys: Vec<String>,
}

impl ApiKeys {
    pub fn new(keys: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Checks `candidate` against every key without short-circuiting
    pub fn accepts(&self, candidate: &str) -> bool {
        let matched = self
            .keys
            .iter()
            .fold(Choice::from(0), |acc, key| {
                acc | key.as_bytes().ct_eq(candidate.as_bytes())
            });
        matched.into()
    }
}

/// Middleware rejecting requests without a valid API key
pub async fn require_api_key(
    State(keys): State<Arc<ApiKeys>>,
    request: Request,
    next: Next,
) -> Response {
    let provided = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok());
    let key_present = provided.is_some();

    if provided.is_some_and(|key| keys.accepts(key)) {
        return next.run(request).await;
    }

    warn!(
        method = %request.method(),
        path = %request.uri().path(),
        key_present,
        "rejected request with invalid API key"
    );
    ApiError::Unauthorized.into_response()
}
