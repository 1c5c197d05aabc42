use thiserror::Error;

#[derive(Debug, Error)]
pub enum OsmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Overpass API error: {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid Overpass interpreter URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },
}
