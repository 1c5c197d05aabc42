//! Integration tests for `ShopFeedClient` against a wiremock backend.

use latte_core::{BoundingBox, Currency, LatLng, ShopSource};
use latte_map::{MapError, ShopFeedClient};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(server: &MockServer) -> ShopFeedClient {
    ShopFeedClient::new(&server.uri(), 5, "latte-test/0.1").expect("client")
}

#[tokio::test]
async fn nearby_shops_sends_center_and_radius() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/shops"))
        .and(query_param("lat", "37.7749"))
        .and(query_param("lng", "-122.4194"))
        .and(query_param("radius", "25.5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{
                "id": "b2f0", "name": "Satoshi Beans", "address": "1 Market St",
                "latitude": 37.79, "longitude": -122.39,
                "crypto_accepted": ["BTC", "Lightning"], "distance_km": 2.1,
                "approved": true
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let shops = test_client(&server)
        .nearby_shops(LatLng::new(37.7749, -122.4194), 25.5)
        .await
        .expect("nearby shops");

    assert_eq!(shops.len(), 1);
    assert_eq!(shops[0].source, ShopSource::User);
    assert_eq!(shops[0].crypto_accepted, vec![Currency::Btc, Currency::Lightning]);
    assert_eq!(shops[0].distance_km, Some(2.1));
}

#[tokio::test]
async fn nearby_shops_with_null_data_is_empty() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/shops"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": null })))
        .mount(&server)
        .await;

    let shops = test_client(&server)
        .nearby_shops(LatLng::new(0.0, 0.0), 10.0)
        .await
        .expect("null data is a success");
    assert!(shops.is_empty());
}

#[tokio::test]
async fn nearby_shops_tolerates_null_columns_and_skips_bad_rows() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/shops"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {
                    "id": "a1", "name": "Satoshi Beans", "address": "1 Market St",
                    "latitude": 37.79, "longitude": -122.39, "crypto_accepted": ["BTC"]
                },
                {
                    "id": "a2", "name": "Lightning Bagels", "address": null,
                    "latitude": 37.78, "longitude": -122.40, "crypto_accepted": null
                },
                { "id": "a3", "name": "No Coordinates" }
            ]
        })))
        .mount(&server)
        .await;

    let shops = test_client(&server)
        .nearby_shops(LatLng::new(37.7749, -122.4194), 10.0)
        .await
        .expect("nearby shops");

    let ids: Vec<&str> = shops.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, ["a1", "a2"]);
    assert_eq!(shops[1].address, "");
    assert!(shops[1].crypto_accepted.is_empty());
}

#[tokio::test]
async fn osm_shops_sends_bbox_and_reads_shops_field() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/osm-crypto-shops"))
        .and(query_param("bbox", "37.7,-122.5,37.85,-122.35"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "shops": [{
                "id": "osm-node-5", "name": "Block Brew", "address": "Address not available",
                "latitude": 37.76, "longitude": -122.42, "crypto_accepted": ["BTC"],
                "source": "osm", "osmId": 5, "osmType": "node", "shop_type": "cafe"
            }],
            "cached": false,
            "timestamp": 1_700_000_000_000_i64,
            "count": 1
        })))
        .expect(1)
        .mount(&server)
        .await;

    let bbox = BoundingBox {
        south: 37.7,
        west: -122.5,
        north: 37.85,
        east: -122.35,
    };
    let shops = test_client(&server).osm_shops(&bbox).await.expect("osm shops");

    assert_eq!(shops.len(), 1);
    assert!(shops[0].is_osm());
    assert_eq!(shops[0].osm_id, Some(5));
}

#[tokio::test]
async fn server_error_is_unexpected_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "error": "Failed to fetch OSM data", "message": "boom"
        })))
        .mount(&server)
        .await;

    let bbox = BoundingBox {
        south: 1.0,
        west: 2.0,
        north: 3.0,
        east: 4.0,
    };
    let err = test_client(&server).osm_shops(&bbox).await.unwrap_err();
    assert!(
        matches!(err, MapError::UnexpectedStatus { status: 500, .. }),
        "expected UnexpectedStatus(500), got: {err:?}"
    );
}

#[tokio::test]
async fn non_json_body_is_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<!doctype html>"))
        .mount(&server)
        .await;

    let err = test_client(&server)
        .nearby_shops(LatLng::new(0.0, 0.0), 10.0)
        .await
        .unwrap_err();
    assert!(matches!(err, MapError::Deserialize { .. }), "got: {err:?}");
}
