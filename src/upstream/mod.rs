//! Client for the metering backend's REST API.
//!
//! All payloads are validated into typed schemas at this boundary; nothing
//! loosely typed flows inward. Forecast endpoints get the `NaN` shim from
//! [`sanitize`] applied before parsing.

pub mod client;
pub mod error;
pub mod sanitize;

pub use client::{HourlyForecastPayload, PeakTimesPayload, UpstreamClient};
pub use error::UpstreamError;
pub use sanitize::sanitize_nan;
