//! HTTP access to the AisHub stations API.

use std::time::Duration;

use tracing::debug;

use crate::config::AisHubConfig;
use crate::error::AisHubError;

const USER_AGENT: &str = concat!("signalk-aishub/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Async AisHub client. Cheap to clone; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct AisHubClient {
    client: reqwest::Client,
}

impl AisHubClient {
    pub fn new() -> Result<Self, AisHubError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { client })
    }

    /// Fetch the raw stations response for the configured station.
    ///
    /// Single attempt; a failed poll is retried by the next scheduled tick.
    /// Errors never carry the query string, which holds the API key.
    pub async fn fetch(&self, config: &AisHubConfig) -> Result<String, AisHubError> {
        let response = self
            .client
            .get(&config.url)
            .query(&config.query_parameters())
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;

        let mut url = response.url().clone();
        url.set_query(None);
        let status = response.status();
        debug!(%url, %status, "AisHub response");

        if !status.is_success() {
            return Err(AisHubError::Status {
                status,
                url: url.to_string(),
            });
        }
        Ok(response.text().await.map_err(reqwest::Error::without_url)?)
    }
}
