use axum::{
    extract::{Query, State},
    Json,
};
use latte_geocode::{GeocodeError, GeocodeKind};
use serde::Deserialize;
use serde_json::Value;

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState};

#[derive(Debug, Default, Deserialize)]
pub(super) struct GeocodeQuery {
    q: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
}

/// Address autosuggest (default) or full geocoding for the submission form.
pub(super) async fn lookup(
    State(state): State<AppState>,
    req_id: RequestId,
    Query(params): Query<GeocodeQuery>,
) -> Result<Json<ApiResponse<Value>>, ApiError> {
    let Some(query) = params.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) else {
        return Err(ApiError::bad_request(req_id.0, "query parameter q is required"));
    };

    let kind = match params.kind.as_deref() {
        None => GeocodeKind::Autosuggest,
        Some(raw) => raw
            .parse::<GeocodeKind>()
            .map_err(|e| ApiError::bad_request(req_id.0.clone(), e.to_string()))?,
    };

    let data = state
        .geocoder
        .lookup(kind, query)
        .await
        .map_err(|e| match e {
            GeocodeError::NotConfigured(provider) => ApiError::new(
                req_id.0.clone(),
                "not_configured",
                format!("{provider} API key is not configured"),
            ),
            other => ApiError::upstream(req_id.0.clone(), "geocode", &other),
        })?;

    Ok(Json(ApiResponse::new(data, req_id.0)))
}
