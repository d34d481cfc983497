use crate::errors::{AppError, PREDICTION_FAILED, UNEXPECTED_RESPONSE};
use crate::models::{AccuracyResponse, PredictionRequest, PredictionResponse, ServiceErrorBody};
use reqwest::Client;
use tracing::{error, warn};

/// HTTP client for the prediction service's `/predict` and `/accuracy`.
#[derive(Clone)]
pub struct PredictorClient {
    http: Client,
    base_url: String,
}

impl PredictorClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    pub async fn predict(&self, request: &PredictionRequest) -> Result<PredictionResponse, AppError> {
        let url = self.endpoint("predict");
        let response = self
            .http
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|err| {
                error!("request to {url} failed: {err}");
                AppError::transport()
            })?;

        let status = response.status();
        let body = response.bytes().await.map_err(|err| {
            error!("reading response from {url} failed: {err}");
            AppError::transport()
        })?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ServiceErrorBody>(&body)
                .ok()
                .and_then(|body| body.error)
                .unwrap_or_else(|| PREDICTION_FAILED.to_string());
            warn!(%status, "prediction rejected: {message}");
            return Err(AppError::service(message));
        }

        serde_json::from_slice(&body).map_err(|err| {
            warn!("unexpected prediction body: {err}");
            AppError::service(UNEXPECTED_RESPONSE)
        })
    }

    /// `Ok(None)` when the service answers without a score.
    pub async fn accuracy(&self) -> Result<Option<f64>, AppError> {
        let url = self.endpoint("accuracy");
        let response = self.http.get(&url).send().await.map_err(|err| {
            error!("request to {url} failed: {err}");
            AppError::transport()
        })?;

        let body: AccuracyResponse = response.json().await.map_err(|err| {
            error!("unreadable accuracy body: {err}");
            AppError::service(UNEXPECTED_RESPONSE)
        })?;

        Ok(body.r2_score)
    }
}
