use axum::{
    extract::{Query, State},
    Json,
};
use latte_geocode::{BusinessResult, GeocodeError};
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState};

#[derive(Debug, Default, Deserialize)]
pub(super) struct BusinessQuery {
    q: Option<String>,
}

/// Business-name autocomplete for the shop submission form. Answers 500 when
/// ValueSerp has no key.
pub(super) async fn search(
    State(state): State<AppState>,
    req_id: RequestId,
    Query(params): Query<BusinessQuery>,
) -> Result<Json<ApiResponse<Vec<BusinessResult>>>, ApiError> {
    let Some(query) = params.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) else {
        return Err(ApiError::bad_request(req_id.0, "query parameter q is required"));
    };

    let results = state
        .geocoder
        .business_search(query)
        .await
        .map_err(|e| match e {
            GeocodeError::NotConfigured(provider) => ApiError::new(
                req_id.0.clone(),
                "internal_error",
                format!("{provider} API key not configured"),
            ),
            other => ApiError::upstream(req_id.0.clone(), "business search", &other),
        })?;

    tracing::debug!(query, count = results.len(), "business search");
    Ok(Json(ApiResponse::new(results, req_id.0)))
}
