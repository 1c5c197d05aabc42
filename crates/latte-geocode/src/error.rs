use thiserror::Error;

/// Errors returned by the geocoding client.
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider needed for this request has no API key configured.
    #[error("{0} API key not configured")]
    NotConfigured(&'static str),

    #[error("{provider} API error: {status}")]
    UnexpectedStatus { provider: &'static str, status: u16 },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid endpoint URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("invalid geocode type \"{0}\"; expected autosuggest or geocode")]
    InvalidKind(String),
}
