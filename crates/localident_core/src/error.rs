use std::path::PathBuf;

use thiserror::Error;

/// Failures loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown build mode `{0}` (expected `development` or `production`)")]
    InvalidMode(String),

    #[error("naming template is empty")]
    EmptyTemplate,

    #[error("digest length must be at least 1")]
    ZeroDigestLength,

    #[error("digest length {requested} exceeds the {max} characters the hash can fill")]
    DigestTooLong { requested: usize, max: usize },
}
