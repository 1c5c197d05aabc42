//! HTTP client for the two shop feeds the map draws from.

use std::time::Duration;

use latte_core::{BoundingBox, LatLng, Shop};
use reqwest::{Client, Url};
use serde::Deserialize;

use crate::error::MapError;

#[derive(Debug, Deserialize)]
struct UserShopsEnvelope {
    #[serde(default)]
    data: Option<Vec<serde_json::Value>>,
}

#[derive(Debug, Deserialize)]
struct OsmShopsEnvelope {
    #[serde(default)]
    shops: Option<Vec<serde_json::Value>>,
}

/// Decodes each row on its own so one malformed row does not empty the feed.
fn decode_rows(rows: Vec<serde_json::Value>, feed: &str) -> Vec<Shop> {
    rows.into_iter()
        .enumerate()
        .filter_map(|(index, row)| {
            serde_json::from_value::<Shop>(row)
                .map_err(|e| {
                    tracing::warn!(feed, index, error = %e, "skipping malformed shop row");
                })
                .ok()
        })
        .collect()
}

/// Client for `GET /api/shops` and `GET /api/osm-crypto-shops`.
pub struct ShopFeedClient {
    client: Client,
    base_url: Url,
}

impl ShopFeedClient {
    /// Creates a client for the backend at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::Http`] if the `reqwest::Client` cannot be built, or
    /// [`MapError::InvalidUrl`] if `base_url` does not parse.
    pub fn new(base_url: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, MapError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        let normalized = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalized).map_err(|e| MapError::InvalidUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self { client, base_url })
    }

    /// Fetches user-submitted shops within `radius_km` of `center`.
    ///
    /// A response whose `data` is missing or null yields an empty list. Rows
    /// that do not decode as a shop are skipped with a warning.
    ///
    /// # Errors
    ///
    /// - [`MapError::UnexpectedStatus`] on a non-2xx response.
    /// - [`MapError::Http`] on network failure.
    /// - [`MapError::Deserialize`] if the body is not a shop envelope.
    pub async fn nearby_shops(&self, center: LatLng, radius_km: f64) -> Result<Vec<Shop>, MapError> {
        let mut url = self.endpoint("api/shops")?;
        url.query_pairs_mut()
            .append_pair("lat", &center.lat.to_string())
            .append_pair("lng", &center.lng.to_string())
            .append_pair("radius", &radius_km.to_string());

        let envelope: UserShopsEnvelope = self.get_json(url, "user shops").await?;
        Ok(decode_rows(envelope.data.unwrap_or_default(), "user"))
    }

    /// Fetches OSM crypto shops inside `bbox` through the backend proxy.
    ///
    /// # Errors
    ///
    /// Same as [`ShopFeedClient::nearby_shops`].
    pub async fn osm_shops(&self, bbox: &BoundingBox) -> Result<Vec<Shop>, MapError> {
        let mut url = self.endpoint("api/osm-crypto-shops")?;
        url.query_pairs_mut().append_pair("bbox", &bbox.to_string());

        let envelope: OsmShopsEnvelope = self.get_json(url, "OSM shops").await?;
        Ok(decode_rows(envelope.shops.unwrap_or_default(), "osm"))
    }

    fn endpoint(&self, path: &str) -> Result<Url, MapError> {
        self.base_url.join(path).map_err(|e| MapError::InvalidUrl {
            url: format!("{}{path}", self.base_url),
            reason: e.to_string(),
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: Url,
        context: &str,
    ) -> Result<T, MapError> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(MapError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| MapError::Deserialize {
            context: context.to_owned(),
            source: e,
        })
    }
}
