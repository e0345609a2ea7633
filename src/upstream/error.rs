use reqwest::StatusCode;
use thiserror::Error;

/// Failures talking to the metering backend. `Network` and `Status` are the
/// fetch-failed family; `Parse` means the body did not match the endpoint's
/// schema even after `NaN` sanitization.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("request to {endpoint} failed: {source}")]
    Network {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{endpoint} returned HTTP {status}")]
    Status {
        endpoint: &'static str,
        status: StatusCode,
    },

    #[error("could not parse {endpoint} response: {source}")]
    Parse {
        endpoint: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl UpstreamError {
    /// Whether the view should render this as an empty dataset with error
    /// text (parse failures) rather than a plain fetch error.
    pub fn is_parse(&self) -> bool {
        matches!(self, UpstreamError::Parse { .. })
    }
}
