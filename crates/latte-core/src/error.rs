use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid bbox \"{input}\": {reason}")]
    InvalidBbox { input: String, reason: String },

    #[error("unknown map layer: {0}")]
    UnknownLayer(String),
}
