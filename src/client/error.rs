use std::convert::Infallible;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("failed to read body: {0}")]
    Body(String),
    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl From<Infallible> for ClientError {
    fn from(err: Infallible) -> Self {
        match err {}
    }
}
