use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

pub mod client;
pub mod types;

use types::{ContactMessage, PredictRequest, Prediction};

#[derive(Debug, Error)]
pub enum ApiError {
    /// Input rejected before any request was made.
    #[error("{0}")]
    Validation(String),

    #[error("backend returned {status}: {message}")]
    Backend { status: u16, message: String },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Response arrived but did not match the expected schema.
    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("invalid endpoint: {0}")]
    Endpoint(#[from] url::ParseError),
}

#[async_trait]
pub trait PredictionService {
    async fn predict(&self, request: &PredictRequest) -> Result<Prediction, ApiError>;
}

#[async_trait]
pub trait ContactService {
    /// Returns the backend's acknowledgement body.
    async fn send(&self, message: &ContactMessage) -> Result<Value, ApiError>;
}
