use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde_json::{json, Value};
use url::Url;

use super::types::{error_message, parse_prediction, ContactMessage, PredictRequest, Prediction};
use super::{ApiError, ContactService, PredictionService};
use crate::logging::{self, obj, v_num, v_str, Domain};

/// HTTP client for the `/predict` and `/contact` endpoints of one backend.
pub struct HttpBackend {
    client: Client,
    base: Url,
}

impl HttpBackend {
    pub fn new(base: Url) -> Self {
        Self { client: Client::new(), base: with_trailing_slash(base) }
    }

    pub fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.base.join(path)?)
    }

    async fn post_json<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<(StatusCode, String), ApiError> {
        let url = self.endpoint(path)?;
        let resp = self.client.post(url).json(body).send().await?;
        let status = resp.status();
        let text = resp.text().await?;
        Ok((status, text))
    }
}

fn with_trailing_slash(mut base: Url) -> Url {
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base
}

#[async_trait]
impl PredictionService for HttpBackend {
    async fn predict(&self, request: &PredictRequest) -> Result<Prediction, ApiError> {
        logging::info(
            Domain::Predict,
            "predict_request",
            obj(&[
                ("severity", v_str(&request.severity)),
                ("common_symptoms", json!(request.common_symptoms)),
                ("non_zero_features", json!(request.features.non_zero_count())),
            ]),
        );
        let (status, body) = self.post_json("predict", request).await?;
        if !status.is_success() {
            let reason = status.canonical_reason().unwrap_or("Server error");
            return Err(ApiError::Backend { status: status.as_u16(), message: error_message(&body, reason, "Server error") });
        }
        let prediction = parse_prediction(&body)?;
        logging::info(
            Domain::Predict,
            "predict_response",
            obj(&[
                ("prediction", json!(prediction.outcome.as_int())),
                ("probability", v_num(prediction.probability)),
            ]),
        );
        Ok(prediction)
    }
}

#[async_trait]
impl ContactService for HttpBackend {
    async fn send(&self, message: &ContactMessage) -> Result<Value, ApiError> {
        logging::info(Domain::Contact, "contact_request", obj(&[("email", v_str(message.email()))]));
        let (status, body) = self.post_json("contact", message).await?;
        if !status.is_success() {
            return Err(ApiError::Backend {
                status: status.as_u16(),
                message: error_message(&body, "Failed to send message.", "Failed to send message."),
            });
        }
        serde_json::from_str(&body).map_err(|e| ApiError::Malformed(format!("contact body: {}", e)))
    }
}
