//! Homework-status API client.

use reqwest::blocking::Client;
use serde_json::Value;

use crate::config::WatchConfig;
use crate::errors::FetchError;

/// Source of homework-status payloads.
pub trait HomeworkApi {
    /// Fetch statuses changed since `from_date` (unix seconds).
    fn fetch(&self, from_date: i64) -> Result<Value, FetchError>;
}

impl<T: HomeworkApi + ?Sized> HomeworkApi for &T {
    fn fetch(&self, from_date: i64) -> Result<Value, FetchError> {
        (**self).fetch(from_date)
    }
}

/// Blocking client for the Practicum homework-status endpoint.
pub struct PracticumClient {
    client: Client,
    endpoint: String,
    token: String,
}

impl PracticumClient {
    /// Build a client with the configured connect and request timeouts.
    ///
    /// The request timeout bounds a stalled call so it cannot hold up the
    /// next poll indefinitely.
    pub fn new(config: &WatchConfig, token: &str) -> Result<Self, FetchError> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .user_agent(concat!("homework-watch/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FetchError::Transport(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            token: token.to_string(),
        })
    }
}

impl HomeworkApi for PracticumClient {
    fn fetch(&self, from_date: i64) -> Result<Value, FetchError> {
        tracing::debug!(endpoint = %self.endpoint, from_date, "Requesting homework statuses");

        let response = self
            .client
            .get(&self.endpoint)
            .header(reqwest::header::AUTHORIZATION, format!("OAuth {}", self.token))
            .query(&[("from_date", from_date)])
            .send()
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                code: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown error").to_string(),
            });
        }

        let body = response
            .text()
            .map_err(|e| FetchError::Transport(format!("failed to read response body: {e}")))?;

        serde_json::from_str(&body).map_err(|e| FetchError::Decode(e.to_string()))
    }
}
