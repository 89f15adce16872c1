use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use serde::Deserialize;
use tracing::info;

use crate::{
    aggregator::ApiValidation,
    api::{
        error::ApiError,
        response::{ApiResponse, EndpointDataResponse},
    },
    cache::ProbeKey,
    models::ApiListing,
    state::AppState,
};

/// Query parameters identifying one endpoint.
#[derive(Deserialize)]
pub struct EndpointQuery {
    host: String,
    method: String,
    path: String,
}

impl EndpointQuery {
    fn probe_key(&self) -> Result<ProbeKey, ApiError> {
        Ok(ProbeKey::new(&self.host, &self.method, &self.path)?)
    }
}

pub fn create_router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route("/endpoint", get(fetch_endpoint).delete(invalidate_endpoint))
        .route("/endpoint/cached", get(cached_endpoint))
        .route("/cache", delete(invalidate_all))
        .route("/api/validate", post(validate_api))
        .with_state(app_state)
}

/// GET /endpoint - read-through probe of a single endpoint.
async fn fetch_endpoint(
    State(state): State<Arc<AppState>>,
    Query(params): Query<EndpointQuery>,
) -> Result<Response, ApiError> {
    let key = params.probe_key()?;
    info!("Fetching endpoint data for {}", key);

    let result = state.cache.fetch(&key).await;
    Ok(ApiResponse { data: result }.into_response())
}

/// GET /endpoint/cached - cached-only read, never triggers a probe.
async fn cached_endpoint(
    State(state): State<Arc<AppState>>,
    Query(params): Query<EndpointQuery>,
) -> Result<Response, ApiError> {
    let key = params.probe_key()?;

    let data = state.cache.get(&key).await;
    let is_validating = state.cache.is_validating(&key).await;
    let has_data = data.is_some();
    let is_expired = data
        .as_ref()
        .map(|result| state.cache.is_expired(result))
        .unwrap_or(false);

    if !has_data && !is_validating {
        return Err(ApiError::NotFound(format!(
            "No cached data for endpoint {}",
            key
        )));
    }

    Ok(EndpointDataResponse {
        data,
        is_validating,
        has_data,
        is_expired,
    }
    .into_response())
}

/// DELETE /endpoint - evict one endpoint from the cache.
async fn invalidate_endpoint(
    State(state): State<Arc<AppState>>,
    Query(params): Query<EndpointQuery>,
) -> Result<Response, ApiError> {
    let key = params.probe_key()?;
    state.cache.invalidate(&key).await;
    Ok((StatusCode::OK, "Endpoint cache invalidated").into_response())
}

/// DELETE /cache - evict everything, e.g. on sign-out or forced refresh.
async fn invalidate_all(State(state): State<Arc<AppState>>) -> Result<Response, ApiError> {
    state.cache.invalidate_all().await;
    Ok((StatusCode::OK, "Cache cleared").into_response())
}

/// POST /api/validate - probe every endpoint of a listing and derive
/// the pricing summary.
async fn validate_api(
    State(state): State<Arc<AppState>>,
    Json(api): Json<ApiListing>,
) -> Result<Response, ApiError> {
    info!(
        "Validating API listing {} with {} endpoints",
        api.id,
        api.endpoints.len()
    );

    let validation: ApiValidation = state.validator.validate_all(&api).await?;
    Ok(ApiResponse { data: validation }.into_response())
}
