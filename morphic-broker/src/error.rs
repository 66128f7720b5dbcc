use std::io;

use thiserror::Error;

/// Errors produced at the fallible edges of the broker: decoding change
/// descriptors and reading or writing broker options.
#[derive(Debug, Error)]
pub enum BrokerError {
    #[error("broker options IO failed: {0}")]
    Io(#[from] io::Error),

    #[error("broker JSON failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown liveness `{0}`")]
    UnknownLiveness(String),

    #[error("setting change descriptor is missing `{0}`")]
    MissingField(&'static str),
}

pub type Result<T> = std::result::Result<T, BrokerError>;
