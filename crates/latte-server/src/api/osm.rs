use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use latte_core::{BoundingBox, Shop};
use serde::{Deserialize, Serialize};

use super::AppState;

const MISSING_BBOX: &str = "Missing bbox parameter. Format: south,west,north,east";
const INVALID_BBOX: &str = "Invalid bbox format. Expected: south,west,north,east (numbers)";

#[derive(Debug, Default, Deserialize)]
pub(super) struct OsmQuery {
    bbox: Option<String>,
}

/// Body of a successful OSM proxy response. Nothing is cached, so `cached`
/// is always `false`; `timestamp` is epoch milliseconds.
#[derive(Debug, Serialize)]
pub(super) struct OsmShopsResponse {
    pub shops: Vec<Shop>,
    pub cached: bool,
    pub timestamp: i64,
    pub count: usize,
}

/// The map client reads `error` (and `message` when present) from failed
/// proxy calls, so this route keeps that flat shape instead of the envelope.
#[derive(Debug, Serialize)]
pub(super) struct OsmErrorBody {
    pub error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

fn osm_error(status: StatusCode, error: &'static str, message: Option<String>) -> Response {
    (status, Json(OsmErrorBody { error, message })).into_response()
}

pub(super) async fn list_osm_shops(
    State(state): State<AppState>,
    Query(params): Query<OsmQuery>,
) -> Response {
    let Some(raw) = params.bbox.filter(|b| !b.trim().is_empty()) else {
        tracing::warn!("OSM request without bbox");
        return osm_error(StatusCode::BAD_REQUEST, MISSING_BBOX, None);
    };

    let bbox: BoundingBox = match raw.parse() {
        Ok(bbox) => bbox,
        Err(e) => {
            tracing::warn!(error = %e, "invalid OSM bbox");
            return osm_error(StatusCode::BAD_REQUEST, INVALID_BBOX, Some(e.to_string()));
        }
    };

    match state.overpass.fetch_shops(&bbox).await {
        Ok(shops) => {
            let count = shops.len();
            Json(OsmShopsResponse {
                shops,
                cached: false,
                timestamp: Utc::now().timestamp_millis(),
                count,
            })
            .into_response()
        }
        Err(e) => {
            tracing::error!(%bbox, error = %e, "Overpass fetch failed");
            osm_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to fetch OSM data",
                Some(e.to_string()),
            )
        }
    }
}
