use axum::body::{to_bytes, Body};
use axum::http::Request;
use latte_geocode::GeocodeEndpoints;
use serde_json::json;
use tower::ServiceExt;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::*;

fn test_app(upstream: &MockServer) -> Router {
    app_with_keys(upstream, Some("here-key"), None)
}

fn app_with_keys(upstream: &MockServer, here: Option<&str>, valueserp: Option<&str>) -> Router {
    let uri = upstream.uri();
    let state = AppState {
        supabase: Arc::new(SupabaseClient::new(&uri, "anon-key", 5, "latte-test").expect("supabase")),
        overpass: Arc::new(
            OverpassClient::with_interpreter_url(5, "latte-test", &format!("{uri}/api/interpreter"))
                .expect("overpass"),
        ),
        geocoder: Arc::new(
            GeocodeClient::with_endpoints(
                5,
                "latte-test",
                here.map(str::to_owned),
                valueserp.map(str::to_owned),
                GeocodeEndpoints::with_base_url(&uri),
            )
            .expect("geocoder"),
        ),
    };
    build_app(state)
}

async fn get(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).expect("request"))
        .await
        .expect("response");
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    let json = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, json)
}

#[tokio::test]
async fn health_returns_ok_and_echoes_request_id() {
    let upstream = MockServer::start().await;
    let app = test_app(&upstream);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .header("x-request-id", "req-123")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("x-request-id").and_then(|v| v.to_str().ok()),
        Some("req-123")
    );
    let body = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    let json: serde_json::Value = serde_json::from_slice(&body).expect("json");
    assert_eq!(json["data"]["status"], "ok");
    assert_eq!(json["meta"]["request_id"], "req-123");
}

#[tokio::test]
async fn shops_with_coordinates_calls_nearby_rpc() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/rpc/get_nearby_shops"))
        .and(header("apikey", "anon-key"))
        .and(header("authorization", "Bearer anon-key"))
        .and(body_json(json!({ "lat": 37.77, "lng": -122.41, "radius_km": 15.0 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "s1", "name": "Satoshi Beans", "latitude": 37.78, "longitude": -122.4,
              "crypto_accepted": ["BTC"], "distance_km": 1.2 }
        ])))
        .expect(1)
        .mount(&upstream)
        .await;

    let app = test_app(&upstream);
    let (status, json) = get(app, "/api/shops?lat=37.77&lng=-122.41&radius=15").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"][0]["id"], "s1");
    assert_eq!(json["data"][0]["distance_km"], 1.2);
}

#[tokio::test]
async fn shops_radius_defaults_to_ten_km() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/rpc/get_nearby_shops"))
        .and(body_json(json!({ "lat": 1.0, "lng": 2.0, "radius_km": 10.0 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&upstream)
        .await;

    let app = test_app(&upstream);
    let (status, json) = get(app, "/api/shops?lat=1&lng=2").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"], json!([]));
}

#[tokio::test]
async fn shops_without_coordinates_lists_approved_with_crypto_filter() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/shops"))
        .and(query_param("approved", "eq.true"))
        .and(query_param("order", "created_at.desc"))
        .and(query_param("crypto_accepted", "cs.{XMR}"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "s2", "name": "Monero Mocha", "latitude": 0.0, "longitude": 0.0 }
        ])))
        .expect(1)
        .mount(&upstream)
        .await;

    let app = test_app(&upstream);
    let (status, json) = get(app, "/api/shops?crypto=XMR").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn shops_with_unparsable_latitude_is_bad_request() {
    let upstream = MockServer::start().await;
    let app = test_app(&upstream);

    let (status, json) = get(app, "/api/shops?lat=north&lng=2").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "bad_request");
}

#[tokio::test]
async fn shops_upstream_failure_is_internal_error() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/rpc/get_nearby_shops"))
        .respond_with(ResponseTemplate::new(500).set_body_string("function missing"))
        .mount(&upstream)
        .await;

    let app = test_app(&upstream);
    let (status, json) = get(app, "/api/shops?lat=1&lng=2").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"]["code"], "upstream_error");
}

#[tokio::test]
async fn shop_detail_includes_votes() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/shops"))
        .and(query_param("id", "eq.s1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "s1", "name": "Satoshi Beans", "shop_images": [], "comments": [] }
        ])))
        .mount(&upstream)
        .await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/rpc/calculate_shop_score"))
        .and(body_json(json!({ "shop_uuid": "s1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "quality_score": 4, "bitcoin_verified_score": 2, "total_votes": 6 }
        ])))
        .mount(&upstream)
        .await;

    let app = test_app(&upstream);
    let (status, json) = get(app, "/api/shops/s1").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["name"], "Satoshi Beans");
    assert_eq!(json["data"]["votes"]["total_votes"], 6);
}

#[tokio::test]
async fn shop_detail_for_unknown_id_is_not_found() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/shops"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&upstream)
        .await;

    let app = test_app(&upstream);
    let (status, json) = get(app, "/api/shops/missing").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"]["code"], "not_found");
}

#[tokio::test]
async fn osm_without_bbox_is_bad_request() {
    let upstream = MockServer::start().await;
    let app = test_app(&upstream);

    let (status, json) = get(app, "/api/osm-crypto-shops").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        json["error"],
        "Missing bbox parameter. Format: south,west,north,east"
    );
}

#[tokio::test]
async fn osm_with_three_numbers_is_bad_request() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "elements": [] })))
        .expect(0)
        .mount(&upstream)
        .await;
    let app = test_app(&upstream);

    let (status, json) = get(app, "/api/osm-crypto-shops?bbox=1,2,3").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        json["error"],
        "Invalid bbox format. Expected: south,west,north,east (numbers)"
    );
}

#[tokio::test]
async fn osm_returns_parsed_shops() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/interpreter"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "elements": [
                { "type": "node", "id": 1, "lat": 37.76, "lon": -122.42,
                  "tags": { "currency:XBT": "yes", "amenity": "cafe", "name": "Block Brew" } },
                { "type": "node", "id": 2, "lat": 37.77, "lon": -122.43 }
            ]
        })))
        .expect(1)
        .mount(&upstream)
        .await;

    let app = test_app(&upstream);
    let (status, json) = get(app, "/api/osm-crypto-shops?bbox=37.7,-122.5,37.85,-122.35").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["count"], 1);
    assert_eq!(json["cached"], false);
    assert!(json["timestamp"].as_i64().is_some_and(|t| t > 0));
    assert_eq!(json["shops"][0]["id"], "osm-node-1");
    assert_eq!(json["shops"][0]["source"], "osm");
    assert_eq!(json["shops"][0]["shop_type"], "cafe");
}

#[tokio::test]
async fn osm_upstream_failure_keeps_flat_error_shape() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/interpreter"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&upstream)
        .await;

    let app = test_app(&upstream);
    let (status, json) = get(app, "/api/osm-crypto-shops?bbox=1,2,3,4").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "Failed to fetch OSM data");
    assert!(json["message"].as_str().is_some_and(|m| m.contains("429")));
}

#[tokio::test]
async fn geocode_requires_query() {
    let upstream = MockServer::start().await;
    let app = test_app(&upstream);

    let (status, json) = get(app, "/api/geocode?type=geocode").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "bad_request");
}

#[tokio::test]
async fn geocode_rejects_unknown_type() {
    let upstream = MockServer::start().await;
    let app = test_app(&upstream);

    let (status, _) = get(app, "/api/geocode?q=market&type=reverse").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn geocode_passes_here_items_through() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/geocode"))
        .and(query_param("q", "1 Market St"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [ { "title": "1 Market St", "position": { "lat": 37.79, "lng": -122.39 } } ]
        })))
        .mount(&upstream)
        .await;

    let app = test_app(&upstream);
    let (status, json) = get(app, "/api/geocode?q=1%20Market%20St&type=geocode").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["items"][0]["position"]["lat"], 37.79);
}

#[tokio::test]
async fn generated_request_id_is_echoed_on_response_and_meta() {
    let upstream = MockServer::start().await;
    let response = test_app(&upstream)
        .oneshot(Request::builder().uri("/api/health").body(Body::empty()).expect("request"))
        .await
        .expect("response");

    let header = response
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(ToOwned::to_owned)
        .expect("x-request-id header");
    let body = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    let json: serde_json::Value = serde_json::from_slice(&body).expect("json");
    assert_eq!(json["meta"]["request_id"], header.as_str());
    assert_eq!(header.len(), 36, "expected a UUID, got {header}");
}

#[tokio::test]
async fn business_search_requires_query() {
    let upstream = MockServer::start().await;
    let app = app_with_keys(&upstream, None, Some("vs-key"));

    let (status, json) = get(app, "/api/business-search").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "bad_request");
}

#[tokio::test]
async fn business_search_without_valueserp_key_is_internal_error() {
    let upstream = MockServer::start().await;
    let app = test_app(&upstream);

    let (status, json) = get(app, "/api/business-search?q=sats").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"]["message"], "ValueSerp API key not configured");
}

#[tokio::test]
async fn business_search_returns_name_suggestions() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "sats coffee"))
        .and(query_param("api_key", "vs-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "local_results": [
                { "title": "Sats Coffee", "address": "500 Howard St", "rating": 4.7,
                  "reviews": 212, "business_type": "Coffee shop" },
                { "title": "Sats Kiosk", "city": "Oakland", "state": "CA" }
            ]
        })))
        .expect(1)
        .mount(&upstream)
        .await;

    let app = app_with_keys(&upstream, None, Some("vs-key"));
    let (status, json) = get(app, "/api/business-search?q=sats%20coffee").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"][0]["name"], "Sats Coffee");
    assert_eq!(json["data"][0]["type"], "Coffee shop");
    assert_eq!(json["data"][1]["address"], "Oakland, CA");
}

#[test]
fn not_configured_maps_to_service_unavailable() {
    let response = ApiError::new("req-1", "not_configured", "HERE key missing").into_response();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}
