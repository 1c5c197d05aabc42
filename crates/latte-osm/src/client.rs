//! HTTP client for the Overpass API interpreter endpoint.

use std::time::Duration;

use latte_core::{BoundingBox, Shop};
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use reqwest::{Client, Url};

use crate::error::OsmError;
use crate::parse::parse_elements;
use crate::query::build_overpass_query;
use crate::types::OverpassResponse;

const DEFAULT_INTERPRETER_URL: &str = "https://overpass-api.de/api/interpreter";

/// Client for the Overpass API.
///
/// Every call goes to the interpreter fresh; nothing is cached and nothing is
/// retried. Use [`OverpassClient::with_interpreter_url`] to point at a mirror
/// or at a mock server in tests.
pub struct OverpassClient {
    client: Client,
    interpreter_url: Url,
}

impl OverpassClient {
    /// Creates a client for the public `overpass-api.de` interpreter.
    ///
    /// # Errors
    ///
    /// Returns [`OsmError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, OsmError> {
        Self::with_interpreter_url(timeout_secs, user_agent, DEFAULT_INTERPRETER_URL)
    }

    /// Creates a client posting queries to `interpreter_url`.
    ///
    /// # Errors
    ///
    /// Returns [`OsmError::Http`] if the `reqwest::Client` cannot be built, or
    /// [`OsmError::InvalidUrl`] if `interpreter_url` does not parse.
    pub fn with_interpreter_url(
        timeout_secs: u64,
        user_agent: &str,
        interpreter_url: &str,
    ) -> Result<Self, OsmError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        let interpreter_url = Url::parse(interpreter_url).map_err(|e| OsmError::InvalidUrl {
            url: interpreter_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            interpreter_url,
        })
    }

    /// Fetches every crypto-accepting shop inside `bbox`.
    ///
    /// # Errors
    ///
    /// - [`OsmError::UnexpectedStatus`] on a non-2xx interpreter response.
    /// - [`OsmError::Http`] on network or TLS failure.
    /// - [`OsmError::Deserialize`] if the body is not an Overpass JSON document.
    pub async fn fetch_shops(&self, bbox: &BoundingBox) -> Result<Vec<Shop>, OsmError> {
        let query = build_overpass_query(bbox);
        let response = self.run_query(&query).await?;
        let shops = parse_elements(&response.elements);
        tracing::info!(%bbox, count = shops.len(), "fetched OSM crypto shops");
        Ok(shops)
    }

    /// Posts an Overpass QL query as a form-encoded `data` field and decodes
    /// the JSON response.
    ///
    /// # Errors
    ///
    /// Same as [`OverpassClient::fetch_shops`].
    pub async fn run_query(&self, query: &str) -> Result<OverpassResponse, OsmError> {
        let body = format!("data={}", utf8_percent_encode(query, NON_ALPHANUMERIC));

        let response = self
            .client
            .post(self.interpreter_url.clone())
            .header(
                reqwest::header::CONTENT_TYPE,
                "application/x-www-form-urlencoded",
            )
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "Overpass interpreter returned an error");
            return Err(OsmError::UnexpectedStatus {
                status: status.as_u16(),
                url: self.interpreter_url.to_string(),
            });
        }

        let text = response.text().await?;
        serde_json::from_str::<OverpassResponse>(&text).map_err(|e| OsmError::Deserialize {
            context: "Overpass interpreter response".to_string(),
            source: e,
        })
    }
}
