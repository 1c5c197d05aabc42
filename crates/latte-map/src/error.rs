#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("failed to deserialize response from {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid API base URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// Failures of the client-local key-value store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("local store I/O failed for {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("local store at {path} is not a JSON string map: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}
