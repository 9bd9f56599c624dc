//! Listing HTTP Routes
//!
//! CRUD and search endpoints for listings. Mounted under `/api` behind the
//! API key check.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::model::{Listing, SearchCriteria};
use crate::planner::{SearchOptions, SortDirection};
use crate::service::ListingService;

use super::errors::{ApiError, ApiResult};

// ==================
// Shared State
// ==================

/// Listing state shared across handlers
pub struct ListingsState {
    pub service: ListingService,
    pub default_limit: usize,
}

impl ListingsState {
    pub fn new(service: ListingService, default_limit: usize) -> Self {
        Self {
            service,
            default_limit,
        }
    }
}

// ==================
// Request/Response Types
// ==================

/// Query string accepted by `GET /listings`
///
/// Numeric parameters left blank (`minPrice=`) are treated as absent.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingsQuery {
    pub city: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub min_price: Option<f64>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub max_price: Option<f64>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub min_bedrooms: Option<u32>,
    pub property_type: Option<String>,
    pub sort_by: Option<String>,
    pub sort_direction: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub limit: Option<usize>,
}

fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    match Option::<String>::deserialize(deserializer)?.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => raw.parse().map(Some).map_err(de::Error::custom),
    }
}

impl ListingsQuery {
    fn criteria(&self) -> SearchCriteria {
        SearchCriteria {
            city: self.city.clone(),
            min_price: self.min_price,
            max_price: self.max_price,
            min_bedrooms: self.min_bedrooms,
            property_type: self.property_type.clone(),
        }
    }

    fn options(&self, default_limit: usize) -> ApiResult<SearchOptions> {
        let mut options = SearchOptions::default().with_limit(default_limit);
        if let Some(sort_by) = self.sort_by.as_deref().filter(|s| !s.is_empty()) {
            options.sort_by = sort_by.to_string();
        }
        if let Some(direction) = self.sort_direction.as_deref().filter(|s| !s.is_empty()) {
            options.direction = direction
                .parse::<SortDirection>()
                .map_err(ApiError::InvalidQuery)?;
        }
        match self.limit {
            Some(0) => return Err(ApiError::InvalidQuery("limit must be > 0".into())),
            Some(limit) => options.limit = limit,
            None => {}
        }
        Ok(options)
    }
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub message: &'static str,
    pub listing: Listing,
}

// ==================
// Routes
// ==================

/// Create listing routes
pub fn listing_routes(state: Arc<ListingsState>) -> Router {
    Router::new()
        .route(
            "/listings",
            get(list_listings)
                .post(create_listing)
                .put(missing_id)
                .delete(missing_id)
                .fallback(method_not_allowed),
        )
        .route(
            "/listings/:id",
            get(get_listing)
                .put(update_listing)
                .delete(delete_listing)
                .fallback(method_not_allowed),
        )
        .with_state(state)
}

// ==================
// Handlers
// ==================

/// Search listings, or list them all when no criteria are given
async fn list_listings(
    State(state): State<Arc<ListingsState>>,
    query: Result<Query<ListingsQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<Listing>>> {
    let Query(query) = query.map_err(|e| ApiError::InvalidQuery(e.body_text()))?;
    let criteria = query.criteria();
    let options = query.options(state.default_limit)?;

    let listings = state.service.search(&criteria, &options).await;
    Ok(Json(listings))
}

async fn get_listing(
    State(state): State<Arc<ListingsState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Listing>> {
    state
        .service
        .get(&id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound)
}

async fn create_listing(
    State(state): State<Arc<ListingsState>>,
    body: Bytes,
) -> ApiResult<impl IntoResponse> {
    let body = parse_body(&body)?;
    let listing = state.service.create(body).await?;
    Ok((StatusCode::CREATED, Json(listing)))
}

async fn update_listing(
    State(state): State<Arc<ListingsState>>,
    Path(id): Path<String>,
    body: Bytes,
) -> ApiResult<Json<Listing>> {
    if state.service.get(&id).await?.is_none() {
        return Err(ApiError::NotFound);
    }

    let body = parse_body(&body)?;
    state
        .service
        .update(&id, body)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound)
}

async fn delete_listing(
    State(state): State<Arc<ListingsState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<DeleteResponse>> {
    let listing = state.service.delete(&id).await?.ok_or(ApiError::NotFound)?;
    Ok(Json(DeleteResponse {
        message: "Listing deleted successfully",
        listing,
    }))
}

async fn missing_id() -> ApiError {
    ApiError::MissingId
}

async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

/// Parses a request body into a JSON object. An empty body is an empty object.
fn parse_body(body: &[u8]) -> ApiResult<Map<String, Value>> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Map::new());
    }

    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(ApiError::InvalidBody("expected a JSON object".into())),
        Err(e) => Err(ApiError::InvalidBody(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_body() {
        assert!(parse_body(b"").unwrap().is_empty());
        assert!(parse_body(b"  \n").unwrap().is_empty());
        assert_eq!(parse_body(br#"{"city": "Anytown"}"#).unwrap().len(), 1);
        assert!(matches!(parse_body(b"[1, 2]"), Err(ApiError::InvalidBody(_))));
        assert!(matches!(parse_body(b"{bad"), Err(ApiError::InvalidBody(_))));
    }

    #[test]
    fn test_query_options_defaults() {
        let query = ListingsQuery::default();
        let options = query.options(25).unwrap();
        assert_eq!(options.sort_by, "listingDate");
        assert_eq!(options.direction, SortDirection::Desc);
        assert_eq!(options.limit, 25);
        assert!(query.criteria().is_empty());
    }

    #[test]
    fn test_query_options_overrides() {
        let query = ListingsQuery {
            city: Some("Anytown".into()),
            sort_by: Some("listPrice".into()),
            sort_direction: Some("ASC".into()),
            limit: Some(5),
            ..Default::default()
        };
        let options = query.options(20).unwrap();
        assert_eq!(options.sort_by, "listPrice");
        assert_eq!(options.direction, SortDirection::Asc);
        assert_eq!(options.limit, 5);
        assert_eq!(query.criteria().city(), Some("Anytown"));
    }

    #[test]
    fn test_blank_numeric_params_are_absent() {
        let query: ListingsQuery = serde_json::from_value(serde_json::json!({
            "city": "Anytown",
            "minPrice": "",
            "maxPrice": " 500000 ",
            "minBedrooms": "  ",
            "limit": ""
        }))
        .unwrap();
        assert_eq!(query.min_price, None);
        assert_eq!(query.max_price, Some(500000.0));
        assert_eq!(query.min_bedrooms, None);
        assert_eq!(query.limit, None);

        let bad: Result<ListingsQuery, _> =
            serde_json::from_value(serde_json::json!({"minBedrooms": "three"}));
        assert!(bad.is_err());
    }

    #[test]
    fn test_query_options_rejects_bad_values() {
        let bad_direction = ListingsQuery {
            sort_direction: Some("sideways".into()),
            ..Default::default()
        };
        assert!(matches!(
            bad_direction.options(20),
            Err(ApiError::InvalidQuery(_))
        ));

        let zero_limit = ListingsQuery {
            limit: Some(0),
            ..Default::default()
        };
        assert!(matches!(zero_limit.options(20), Err(ApiError::InvalidQuery(_))));
    }
}
