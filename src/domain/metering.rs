use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One telemetry row from the metering backend.
///
/// The backend occasionally grows extra columns; anything beyond the known
/// fields is kept verbatim in `extra` so the latest-readings table can still
/// show it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MeterReading {
    #[serde(rename = "MeterCode")]
    pub meter_code: String,
    /// Raw backend timestamp, kept as a string; parsing happens where it is
    /// actually compared.
    #[serde(rename = "LocalTimeCol")]
    pub timestamp: String,
    #[serde(rename = "FR")]
    pub flow_rate: f64,
    #[serde(rename = "FV")]
    pub flow_volume: f64,
    #[serde(rename = "NetTotal")]
    pub net_total: f64,
    #[serde(rename = "Today", default)]
    pub today: f64,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// A single resampled data point (daily or hourly granularity).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResampledPoint {
    pub ds: String,
    #[serde(rename = "FV", default)]
    pub flow_volume: Option<f64>,
    #[serde(rename = "FR", default)]
    pub flow_rate: Option<f64>,
}

/// Which flow quantity a chart or selector is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlowTarget {
    #[serde(rename = "FV")]
    Volume,
    #[serde(rename = "FR")]
    Rate,
}

impl FlowTarget {
    /// Query-parameter form used by the backend (`target=FV|FR`).
    pub fn as_str(&self) -> &'static str {
        match self {
            FlowTarget::Volume => "FV",
            FlowTarget::Rate => "FR",
        }
    }

    pub fn of(&self, point: &ResampledPoint) -> Option<f64> {
        match self {
            FlowTarget::Volume => point.flow_volume,
            FlowTarget::Rate => point.flow_rate,
        }
    }
}

/// Per-meter peak usage summary. Hours are 0-23, absent when the backend
/// could not determine a peak.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PeakTimeSummary {
    pub fv_morning_peak_hour: Option<u32>,
    pub fv_morning_peak_value: Option<f64>,
    pub fv_night_peak_hour: Option<u32>,
    pub fv_night_peak_value: Option<f64>,
    pub fr_morning_peak_hour: Option<u32>,
    pub fr_morning_peak_value: Option<f64>,
    pub fr_night_peak_hour: Option<u32>,
    pub fr_night_peak_value: Option<f64>,
}

/// Backend-wide KPI figures. Every field is optional on the wire.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StatusSummary {
    pub total_historical_records: Option<u64>,
    pub last_processed_time_in_memory: Option<String>,
    pub total_meters: Option<u64>,
}
