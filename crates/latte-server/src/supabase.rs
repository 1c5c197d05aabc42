//! Thin PostgREST client for the Supabase project that stores user shops.
//!
//! Rows are passed through as JSON: the backend adds nothing to them and the
//! map reads only the fields it knows.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Url};
use serde_json::{json, Value};

const SHOP_DETAIL_SELECT: &str = "*,shop_images(*),comments(*,profiles(display_name,avatar_url))";

#[derive(Debug, thiserror::Error)]
pub enum SupabaseError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}: {body}")]
    UnexpectedStatus {
        status: u16,
        url: String,
        body: String,
    },

    #[error("failed to deserialize response from {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid Supabase URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// Vote totals reported for a shop nobody has voted on.
#[must_use]
pub fn zero_votes() -> Value {
    json!({ "quality_score": 0, "bitcoin_verified_score": 0, "total_votes": 0 })
}

pub struct SupabaseClient {
    client: Client,
    rest_url: Url,
    anon_key: String,
}

impl SupabaseClient {
    /// Creates a client for the project at `project_url`, authenticating with
    /// the public anon key.
    ///
    /// # Errors
    ///
    /// Returns [`SupabaseError::Http`] if the `reqwest::Client` cannot be
    /// built, or [`SupabaseError::InvalidUrl`] if `project_url` does not parse.
    pub fn new(
        project_url: &str,
        anon_key: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, SupabaseError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        let base = format!("{}/rest/v1/", project_url.trim_end_matches('/'));
        let rest_url = Url::parse(&base).map_err(|e| SupabaseError::InvalidUrl {
            url: project_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            rest_url,
            anon_key: anon_key.to_owned(),
        })
    }

    /// Approved shops within `radius_km` of a point, via the
    /// `get_nearby_shops` RPC.
    ///
    /// # Errors
    ///
    /// Returns [`SupabaseError`] on transport failure, non-2xx or a body that
    /// is not a JSON array.
    pub async fn nearby_shops(
        &self,
        lat: f64,
        lng: f64,
        radius_km: f64,
    ) -> Result<Vec<Value>, SupabaseError> {
        let url = self.endpoint("rpc/get_nearby_shops")?;
        let request = self
            .client
            .post(url.clone())
            .json(&json!({ "lat": lat, "lng": lng, "radius_km": radius_km }));
        let rows: Option<Vec<Value>> = self.send(request, &url, "get_nearby_shops").await?;
        Ok(rows.unwrap_or_default())
    }

    /// All approved shops, newest first, optionally restricted to those
    /// accepting `crypto`.
    ///
    /// # Errors
    ///
    /// Same as [`SupabaseClient::nearby_shops`].
    pub async fn approved_shops(&self, crypto: Option<&str>) -> Result<Vec<Value>, SupabaseError> {
        let mut url = self.endpoint("shops")?;
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("select", "*")
                .append_pair("approved", "eq.true")
                .append_pair("order", "created_at.desc");
            if let Some(code) = crypto {
                query.append_pair("crypto_accepted", &format!("cs.{{{code}}}"));
            }
        }

        let request = self.client.get(url.clone());
        let rows: Option<Vec<Value>> = self.send(request, &url, "approved shops").await?;
        Ok(rows.unwrap_or_default())
    }

    /// One shop with its images and comments, or `None` if no row matches.
    ///
    /// # Errors
    ///
    /// Same as [`SupabaseClient::nearby_shops`].
    pub async fn shop(&self, id: &str) -> Result<Option<Value>, SupabaseError> {
        let mut url = self.endpoint("shops")?;
        url.query_pairs_mut()
            .append_pair("select", SHOP_DETAIL_SELECT)
            .append_pair("id", &format!("eq.{id}"));

        let request = self.client.get(url.clone());
        let rows: Option<Vec<Value>> = self.send(request, &url, "shop detail").await?;
        Ok(rows.and_then(|rows| rows.into_iter().next()))
    }

    /// Vote aggregates for a shop from the `calculate_shop_score` RPC. A shop
    /// without votes scores zero.
    ///
    /// # Errors
    ///
    /// Same as [`SupabaseClient::nearby_shops`].
    pub async fn shop_votes(&self, id: &str) -> Result<Value, SupabaseError> {
        let url = self.endpoint("rpc/calculate_shop_score")?;
        let request = self
            .client
            .post(url.clone())
            .json(&json!({ "shop_uuid": id }));
        let rows: Option<Vec<Value>> = self.send(request, &url, "calculate_shop_score").await?;

        Ok(rows
            .and_then(|rows| rows.into_iter().next())
            .unwrap_or_else(zero_votes))
    }

    fn endpoint(&self, path: &str) -> Result<Url, SupabaseError> {
        self.rest_url.join(path).map_err(|e| SupabaseError::InvalidUrl {
            url: format!("{}{path}", self.rest_url),
            reason: e.to_string(),
        })
    }

    async fn send<T: serde::de::DeserializeOwned>(
        &self,
        request: RequestBuilder,
        url: &Url,
        context: &str,
    ) -> Result<T, SupabaseError> {
        let response = request
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SupabaseError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.path().to_owned(),
                body,
            });
        }

        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| SupabaseError::Deserialize {
            context: context.to_owned(),
            source: e,
        })
    }
}
