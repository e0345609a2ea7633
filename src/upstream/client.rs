use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::{sanitize_nan, UpstreamError};
use crate::domain::{
    FlowTarget, ForecastPoint, ForecastRecord, MeterReading, PeakTimeSummary, ResampledPoint,
    StatusSummary,
};

/// Typed client for the metering backend.
pub struct UpstreamClient {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct MeterCodesPayload {
    meter_codes: Vec<String>,
}

/// Body of `GET /peak_times`.
#[derive(Debug, Clone, Deserialize)]
pub struct PeakTimesPayload {
    #[serde(default)]
    pub peak_times: Vec<PeakTimeSummary>,
    #[serde(default)]
    pub resampled_data: Vec<ResampledPoint>,
    #[serde(default)]
    pub rolling_average_data: Vec<ResampledPoint>,
}

/// Body of `GET /hourly_forecast`.
#[derive(Debug, Clone, Deserialize)]
pub struct HourlyForecastPayload {
    #[serde(default)]
    pub forecast_data: Vec<ForecastPoint>,
    #[serde(default)]
    pub resampled_data: Vec<ResampledPoint>,
}

impl UpstreamClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub async fn meter_codes(&self) -> Result<Vec<String>, UpstreamError> {
        let payload: MeterCodesPayload = self.get("meter_codes", "/meter_codes").await?;
        Ok(payload.meter_codes)
    }

    pub async fn status(&self) -> Result<StatusSummary, UpstreamError> {
        self.get("status", "/status").await
    }

    pub async fn last_processed(&self) -> Result<Vec<MeterReading>, UpstreamError> {
        self.get("last_processed", "/last_processed").await
    }

    pub async fn daily_resampled(
        &self,
        meter_code: &str,
    ) -> Result<Vec<ResampledPoint>, UpstreamError> {
        self.get(
            "daily_resampled",
            &format!("/daily_resampled?meter_code={meter_code}"),
        )
        .await
    }

    pub async fn hourly_resampled(
        &self,
        meter_code: &str,
    ) -> Result<Vec<ResampledPoint>, UpstreamError> {
        self.get(
            "hourly_resampled",
            &format!("/hourly_resampled?meter_code={meter_code}"),
        )
        .await
    }

    pub async fn peak_times(&self, meter_code: &str) -> Result<PeakTimesPayload, UpstreamError> {
        self.get("peak_times", &format!("/peak_times?meter_code={meter_code}"))
            .await
    }

    pub async fn daily_forecast(
        &self,
        meter_code: &str,
        target: FlowTarget,
    ) -> Result<Vec<ForecastPoint>, UpstreamError> {
        self.get(
            "daily_forecast",
            &format!(
                "/daily_forecast?meter_code={meter_code}&target={}",
                target.as_str()
            ),
        )
        .await
    }

    pub async fn hourly_forecast(
        &self,
        meter_code: &str,
    ) -> Result<HourlyForecastPayload, UpstreamError> {
        self.get(
            "hourly_forecast",
            &format!("/hourly_forecast?meter_code={meter_code}"),
        )
        .await
    }

    /// Combined forecast feed across all meters and granularities.
    pub async fn forecast(&self) -> Result<Vec<ForecastRecord>, UpstreamError> {
        self.get("forecast", "/forecast").await
    }

    /// Fetch and parse one endpoint. Bodies are read as text and run
    /// through the `NaN` shim first; several endpoints are known to emit
    /// the literal token.
    async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        path: &str,
    ) -> Result<T, UpstreamError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(endpoint, %url, "fetching upstream");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| UpstreamError::Network { endpoint, source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status { endpoint, status });
        }

        let body = response
            .text()
            .await
            .map_err(|source| UpstreamError::Network { endpoint, source })?;

        serde_json::from_str(&sanitize_nan(&body))
            .map_err(|source| UpstreamError::Parse { endpoint, source })
    }
}
