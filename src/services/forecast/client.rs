use std::time::Duration;

use crate::config::AppConfig;
use crate::models::forecast::PriceForecast;
use crate::models::selection::{AcceptanceConfirmation, SelectionResult};
use crate::services::forecast::interface::{ForecastOperations, LoadError, SubmitError};

/// HTTP implementation of the forecast transport: pricing engine for the
/// inbound fetch, booking service for the acceptance submission.
#[derive(Clone)]
pub struct HttpForecastClient {
    http_client: reqwest::Client,
    pricing_base_url: String,
    booking_base_url: String,
}

impl HttpForecastClient {
    pub fn new(config: &AppConfig) -> Result<Self, reqwest::Error> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.upstream_timeout_secs))
            .build()?;

        Ok(Self {
            http_client,
            pricing_base_url: config.pricing_api_url.trim_end_matches('/').to_string(),
            booking_base_url: config.booking_api_url.trim_end_matches('/').to_string(),
        })
    }
}

impl ForecastOperations for HttpForecastClient {
    async fn load_forecast(&self, request_id: &str) -> Result<PriceForecast, LoadError> {
        let url = format!("{}/api/price-forecast/{}", self.pricing_base_url, request_id);

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| LoadError::Upstream(e.to_string()))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(LoadError::NotFound);
        }
        if !response.status().is_success() {
            return Err(LoadError::Upstream(format!(
                "pricing engine returned {}",
                response.status()
            )));
        }

        response
            .json::<PriceForecast>()
            .await
            .map_err(|e| LoadError::Upstream(format!("unusable forecast payload: {}", e)))
    }

    async fn submit_acceptance(
        &self,
        result: &SelectionResult,
    ) -> Result<AcceptanceConfirmation, SubmitError> {
        let url = format!("{}/api/accept-price", self.booking_base_url);

        let response = self
            .http_client
            .post(&url)
            .json(result)
            .send()
            .await
            .map_err(|e| SubmitError::Upstream(e.to_string()))?;

        let status = response.status();
        if status.is_client_error() {
            let body = response.text().await.unwrap_or_default();
            return Err(SubmitError::Rejected(format!("{}: {}", status, body)));
        }
        if !status.is_success() {
            return Err(SubmitError::Upstream(format!(
                "booking service returned {}",
                status
            )));
        }

        response
            .json::<AcceptanceConfirmation>()
            .await
            .map_err(|e| SubmitError::Upstream(format!("unusable confirmation payload: {}", e)))
    }
}
