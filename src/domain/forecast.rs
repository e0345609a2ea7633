use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Forecast granularity as reported by the backend's combined feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Daily,
    Hourly,
}

/// One row of the combined `/forecast` feed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ForecastRecord {
    #[serde(rename = "ds")]
    pub timestamp: String,
    #[serde(rename = "yhat")]
    pub predicted: f64,
    #[serde(rename = "yhat_lower")]
    pub lower: f64,
    #[serde(rename = "yhat_upper")]
    pub upper: f64,
    #[serde(rename = "MeterCode")]
    pub meter_code: String,
    #[serde(rename = "forecast_type")]
    pub granularity: Granularity,
}

/// One point of a per-meter forecast payload (`daily_forecast` /
/// `hourly_forecast`). Values are optional because the backend sometimes
/// emits literal `NaN` tokens which the client sanitizes to `null`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ForecastPoint {
    pub ds: String,
    #[serde(default)]
    pub yhat: Option<f64>,
    #[serde(default)]
    pub yhat_lower: Option<f64>,
    #[serde(default)]
    pub yhat_upper: Option<f64>,
}

/// Daily aggregate of forecast records, chart-ready.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DailyForecast {
    pub date: NaiveDate,
    pub predicted_mean: f64,
    pub lower_mean: f64,
    pub upper_mean: f64,
    /// `upper_mean - lower_mean`; a single-record day degenerates to that
    /// record's own band.
    pub confidence_band: f64,
}

/// One merged row of the historical/forecast comparison table. A timestamp
/// present on only one side leaves the other side `None`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MergedPoint {
    pub ds: String,
    pub historical: Option<f64>,
    pub predicted: Option<f64>,
    pub lower: Option<f64>,
    pub upper: Option<f64>,
}

/// One bar of the peak-usage chart: a dense 24-entry series, one per hour.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct HourlyAverage {
    /// Zero-padded "HH:00" label.
    pub hour: String,
    pub average: f64,
}
