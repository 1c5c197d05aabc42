use axum::{
    extract::{Path, Query, State},
    Json,
};
use latte_core::DEFAULT_RADIUS_KM;
use serde::Deserialize;
use serde_json::Value;

use crate::middleware::RequestId;
use crate::supabase::zero_votes;

use super::{ApiError, ApiResponse, AppState};

#[derive(Debug, Default, Deserialize)]
pub(super) struct ShopsQuery {
    lat: Option<String>,
    lng: Option<String>,
    radius: Option<String>,
    crypto: Option<String>,
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty())
}

fn parse_number(name: &str, raw: &str) -> Result<f64, String> {
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| format!("{name} must be a number, got \"{raw}\""))
}

/// Nearby shops when both `lat` and `lng` are given, otherwise every approved
/// shop (optionally filtered by `crypto`).
pub(super) async fn list_shops(
    State(state): State<AppState>,
    req_id: RequestId,
    Query(params): Query<ShopsQuery>,
) -> Result<Json<ApiResponse<Vec<Value>>>, ApiError> {
    let lat = non_empty(params.lat.as_ref());
    let lng = non_empty(params.lng.as_ref());

    let rows = if let (Some(lat), Some(lng)) = (lat, lng) {
        let lat = parse_number("lat", lat).map_err(|m| ApiError::bad_request(req_id.0.clone(), m))?;
        let lng = parse_number("lng", lng).map_err(|m| ApiError::bad_request(req_id.0.clone(), m))?;
        let radius_km = match non_empty(params.radius.as_ref()) {
            Some(raw) => parse_number("radius", raw)
                .map_err(|m| ApiError::bad_request(req_id.0.clone(), m))?,
            None => DEFAULT_RADIUS_KM,
        };

        let rows = state
            .supabase
            .nearby_shops(lat, lng, radius_km)
            .await
            .map_err(|e| ApiError::upstream(req_id.0.clone(), "get_nearby_shops", &e))?;
        tracing::info!(lat, lng, radius_km, count = rows.len(), "nearby shops");
        rows
    } else {
        let crypto = non_empty(params.crypto.as_ref());
        let rows = state
            .supabase
            .approved_shops(crypto)
            .await
            .map_err(|e| ApiError::upstream(req_id.0.clone(), "approved shops", &e))?;
        tracing::info!(crypto, count = rows.len(), "approved shops");
        rows
    };

    Ok(Json(ApiResponse::new(rows, req_id.0)))
}

/// Shop detail with images, comments and vote totals.
pub(super) async fn get_shop(
    State(state): State<AppState>,
    req_id: RequestId,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Value>>, ApiError> {
    let mut shop = state
        .supabase
        .shop(&id)
        .await
        .map_err(|e| ApiError::upstream(req_id.0.clone(), "shop detail", &e))?
        .ok_or_else(|| ApiError::new(req_id.0.clone(), "not_found", format!("shop {id} not found")))?;

    let votes = match state.supabase.shop_votes(&id).await {
        Ok(votes) => votes,
        Err(e) => {
            tracing::warn!(shop_id = %id, error = %e, "vote totals unavailable");
            zero_votes()
        }
    };
    if let Some(object) = shop.as_object_mut() {
        object.insert("votes".to_owned(), votes);
    }

    Ok(Json(ApiResponse::new(shop, req_id.0)))
}
