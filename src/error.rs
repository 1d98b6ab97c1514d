//! Error types for clustering runs and the glue around them.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClusterError {
    /// K is below 2 or exceeds the number of instances.
    #[error(
        "Invalid configuration: {clusters} clusters for {instances} instances (need 2 <= K <= N)"
    )]
    InvalidConfiguration { clusters: usize, instances: usize },

    /// The dataset is empty, ragged, or could not be decoded.
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Encoding error: {0}")]
    Encode(#[from] prost::EncodeError),

    #[error("Logger error: {0}")]
    Logger(#[from] log::SetLoggerError),
}

impl ClusterError {
    pub fn invalid_configuration(clusters: usize, instances: usize) -> Self {
        Self::InvalidConfiguration { clusters, instances }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedInput(message.into())
    }
}
