use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::models::ProbeResult;

#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub data: T,
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Cached-only read contract: the data plus the freshness flags UI
/// consumers key their spinners off.
#[derive(Serialize)]
pub struct EndpointDataResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<ProbeResult>,
    pub is_validating: bool,
    pub has_data: bool,
    pub is_expired: bool,
}

impl IntoResponse for EndpointDataResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}
