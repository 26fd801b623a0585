use thiserror::Error;

/// Errors that abort a single poll cycle.
#[derive(Debug, Error)]
pub enum AisHubError {
    /// Request could not be sent or the body could not be read.
    #[error("AisHub request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// AisHub answered with a non-success status.
    #[error("AisHub returned {status} for {url}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },

    /// Response body is not valid JSON.
    #[error("Failed to parse AisHub response: {0}")]
    Parse(#[from] serde_json::Error),

    /// Response is JSON but not shaped like a station report.
    #[error("Malformed AisHub response: {0}")]
    MalformedReport(String),

    /// AisHub flagged the request as failed in the status object.
    /// `status` is the status object with the echoed `USERNAME` removed.
    #[error("error response from AisHub: {status}")]
    Upstream {
        message: Option<String>,
        status: serde_json::Value,
    },
}
