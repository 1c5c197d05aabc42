//! HTTP client for address autosuggest and geocoding.
//!
//! Business search goes to ValueSerp (Google local results) when a key is
//! configured, since it knows about individual shops; HERE covers plain
//! address suggestions and full geocoding, and acts as the fallback.

use std::str::FromStr;
use std::time::Duration;

use reqwest::{Client, Url};
use serde_json::json;

use crate::error::GeocodeError;
use crate::types::{
    transform_business_results, transform_valueserp, BusinessResult, BusinessSearchResponse,
    Position, SuggestionItem, ValueSerpResponse,
};

const HERE_AUTOSUGGEST_URL: &str = "https://autosuggest.search.hereapi.com/v1/autosuggest";
const HERE_GEOCODE_URL: &str = "https://geocode.search.hereapi.com/v1/geocode";
const VALUESERP_SEARCH_URL: &str = "https://api.valueserp.com/search";

/// Autosuggest bias point (San Francisco).
const AUTOSUGGEST_AT: &str = "37.7749,-122.4194";
const SUGGESTION_LIMIT: &str = "5";

/// Requested lookup mode of `GET /api/geocode`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeocodeKind {
    Autosuggest,
    Geocode,
}

impl FromStr for GeocodeKind {
    type Err = GeocodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "autosuggest" => Ok(GeocodeKind::Autosuggest),
            "geocode" => Ok(GeocodeKind::Geocode),
            other => Err(GeocodeError::InvalidKind(other.to_owned())),
        }
    }
}

/// Upstream endpoint URLs. [`GeocodeEndpoints::default`] targets production.
#[derive(Debug, Clone)]
pub struct GeocodeEndpoints {
    pub here_autosuggest: String,
    pub here_geocode: String,
    pub valueserp_search: String,
}

impl GeocodeEndpoints {
    /// Points every provider at one base URL (for testing with wiremock):
    /// `{base}/v1/autosuggest`, `{base}/v1/geocode`, `{base}/search`.
    #[must_use]
    pub fn with_base_url(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            here_autosuggest: format!("{base}/v1/autosuggest"),
            here_geocode: format!("{base}/v1/geocode"),
            valueserp_search: format!("{base}/search"),
        }
    }
}

impl Default for GeocodeEndpoints {
    fn default() -> Self {
        Self {
            here_autosuggest: HERE_AUTOSUGGEST_URL.to_owned(),
            here_geocode: HERE_GEOCODE_URL.to_owned(),
            valueserp_search: VALUESERP_SEARCH_URL.to_owned(),
        }
    }
}

fn parse_url(url: &str) -> Result<Url, GeocodeError> {
    Url::parse(url).map_err(|e| GeocodeError::InvalidUrl {
        url: url.to_owned(),
        reason: e.to_string(),
    })
}

/// Client for HERE and ValueSerp.
///
/// Either key may be absent. Requests that need a missing HERE key fail with
/// [`GeocodeError::NotConfigured`]; a missing ValueSerp key just skips the
/// business search.
pub struct GeocodeClient {
    client: Client,
    here_api_key: Option<String>,
    valueserp_api_key: Option<String>,
    endpoints: GeocodeEndpoints,
}

impl GeocodeClient {
    /// Creates a client against the production endpoints.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(
        timeout_secs: u64,
        user_agent: &str,
        here_api_key: Option<String>,
        valueserp_api_key: Option<String>,
    ) -> Result<Self, GeocodeError> {
        Self::with_endpoints(
            timeout_secs,
            user_agent,
            here_api_key,
            valueserp_api_key,
            GeocodeEndpoints::default(),
        )
    }

    /// Creates a client against custom endpoints.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Http`] if the `reqwest::Client` cannot be built.
    pub fn with_endpoints(
        timeout_secs: u64,
        user_agent: &str,
        here_api_key: Option<String>,
        valueserp_api_key: Option<String>,
        endpoints: GeocodeEndpoints,
    ) -> Result<Self, GeocodeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            here_api_key,
            valueserp_api_key,
            endpoints,
        })
    }

    /// Runs the lookup selected by `kind`.
    ///
    /// # Errors
    ///
    /// See [`GeocodeClient::autosuggest`] and [`GeocodeClient::geocode`].
    pub async fn lookup(
        &self,
        kind: GeocodeKind,
        query: &str,
    ) -> Result<serde_json::Value, GeocodeError> {
        match kind {
            GeocodeKind::Autosuggest => self.autosuggest(query).await,
            GeocodeKind::Geocode => self.geocode(query).await,
        }
    }

    /// Suggests places for a partially typed query.
    ///
    /// With a ValueSerp key, business results are tried first and any item
    /// without coordinates is enriched through HERE geocoding. An empty
    /// ValueSerp result or a ValueSerp failure falls back to HERE autosuggest.
    ///
    /// # Errors
    ///
    /// - [`GeocodeError::NotConfigured`] if HERE is needed but has no key.
    /// - [`GeocodeError::UnexpectedStatus`] / [`GeocodeError::Http`] /
    ///   [`GeocodeError::Deserialize`] from the HERE request.
    pub async fn autosuggest(&self, query: &str) -> Result<serde_json::Value, GeocodeError> {
        if self.valueserp_api_key.is_some() {
            match self.search_valueserp(query).await {
                Ok(items) if !items.is_empty() => {
                    let items = self.enrich_positions(items).await;
                    return Ok(json!({ "items": items }));
                }
                Ok(_) => {
                    tracing::debug!(query, "ValueSerp returned no places; using HERE autosuggest");
                }
                Err(e) => {
                    tracing::warn!(error = %e, "ValueSerp error, falling back to HERE autosuggest");
                }
            }
        }

        self.here_autosuggest(query).await
    }

    /// Geocodes a full address through HERE.
    ///
    /// # Errors
    ///
    /// - [`GeocodeError::NotConfigured`] without a HERE key.
    /// - [`GeocodeError::UnexpectedStatus`] on a non-2xx response.
    /// - [`GeocodeError::Http`] / [`GeocodeError::Deserialize`] otherwise.
    pub async fn geocode(&self, query: &str) -> Result<serde_json::Value, GeocodeError> {
        let key = self.here_key()?;
        let mut url = parse_url(&self.endpoints.here_geocode)?;
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("apiKey", key);
        self.get_json("HERE", url).await
    }

    async fn here_autosuggest(&self, query: &str) -> Result<serde_json::Value, GeocodeError> {
        let key = self.here_key()?;
        let mut url = parse_url(&self.endpoints.here_autosuggest)?;
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("at", AUTOSUGGEST_AT)
            .append_pair("apiKey", key)
            .append_pair("limit", SUGGESTION_LIMIT);
        self.get_json("HERE", url).await
    }

    /// Business-name suggestions for the shop submission form.
    ///
    /// # Errors
    ///
    /// - [`GeocodeError::NotConfigured`] without a ValueSerp key.
    /// - [`GeocodeError::UnexpectedStatus`] on a non-2xx response.
    /// - [`GeocodeError::Http`] / [`GeocodeError::Deserialize`] otherwise.
    pub async fn business_search(&self, query: &str) -> Result<Vec<BusinessResult>, GeocodeError> {
        let body = self.valueserp_search(query).await?;
        let response: BusinessSearchResponse =
            serde_json::from_value(body).map_err(|e| GeocodeError::Deserialize {
                context: format!("ValueSerp business search(q={query})"),
                source: e,
            })?;
        Ok(transform_business_results(response))
    }

    async fn search_valueserp(&self, query: &str) -> Result<Vec<SuggestionItem>, GeocodeError> {
        let body = self.valueserp_search(query).await?;
        let response: ValueSerpResponse =
            serde_json::from_value(body).map_err(|e| GeocodeError::Deserialize {
                context: format!("ValueSerp search(q={query})"),
                source: e,
            })?;
        Ok(transform_valueserp(response))
    }

    async fn valueserp_search(&self, query: &str) -> Result<serde_json::Value, GeocodeError> {
        let key = self
            .valueserp_api_key
            .as_deref()
            .ok_or(GeocodeError::NotConfigured("ValueSerp"))?;

        let mut url = parse_url(&self.endpoints.valueserp_search)?;
        url.query_pairs_mut()
            .append_pair("api_key", key)
            .append_pair("q", query)
            .append_pair("location", "United States")
            .append_pair("google_domain", "google.com")
            .append_pair("gl", "us")
            .append_pair("hl", "en")
            .append_pair("num", SUGGESTION_LIMIT)
            .append_pair("output", "json");

        self.get_json("ValueSerp", url).await
    }

    async fn enrich_positions(&self, items: Vec<SuggestionItem>) -> Vec<SuggestionItem> {
        futures::future::join_all(items.into_iter().map(|mut item| async move {
            if item.position.is_none() && !item.address.label.is_empty() {
                item.position = self.first_position(&item.address.label).await;
            }
            item
        }))
        .await
    }

    /// Position of the top HERE geocode hit for `address`; `None` on any
    /// failure or when HERE is not configured.
    async fn first_position(&self, address: &str) -> Option<Position> {
        let key = self.here_api_key.as_deref()?;
        let mut url = parse_url(&self.endpoints.here_geocode).ok()?;
        url.query_pairs_mut()
            .append_pair("q", address)
            .append_pair("apiKey", key)
            .append_pair("limit", "1");

        match self.get_json("HERE", url).await {
            Ok(body) => serde_json::from_value(body["items"][0]["position"].clone()).ok(),
            Err(e) => {
                tracing::warn!(error = %e, "HERE enrichment failed");
                None
            }
        }
    }

    fn here_key(&self) -> Result<&str, GeocodeError> {
        self.here_api_key
            .as_deref()
            .ok_or(GeocodeError::NotConfigured("HERE"))
    }

    async fn get_json(
        &self,
        provider: &'static str,
        url: Url,
    ) -> Result<serde_json::Value, GeocodeError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(GeocodeError::UnexpectedStatus {
                provider,
                status: status.as_u16(),
            });
        }

        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| GeocodeError::Deserialize {
            context: format!("{provider} response"),
            source: e,
        })
    }
}
