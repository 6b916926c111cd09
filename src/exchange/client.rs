//! Exchange HTTP Client
//!
//! HTTP client wrapper for the exchange REST API. Sends one request per tool
//! call: no retries, no caching. Response bodies must be JSON and are
//! returned verbatim.

use crate::config::ProviderConfig;
use crate::error::{ConfigError, ExchangeError, ProviderError};
use crate::exchange::request::OutboundRequest;
use crate::operations::HttpMethod;
use reqwest::Client;
use std::time::Duration;

const USER_AGENT: &str = concat!("perpdex-provider/", env!("CARGO_PKG_VERSION"));

/// Exchange REST API HTTP client
#[derive(Clone)]
pub struct ExchangeClient {
    client: Client,
    base_url: String,
}

impl std::fmt::Debug for ExchangeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExchangeClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl ExchangeClient {
    /// Creates a client for the configured base URL and timeout
    pub fn new(config: &ProviderConfig) -> Result<Self, ProviderError> {
        Self::with_timeout(&config.base_url, config.timeout)
    }

    /// Creates a client with an explicit base URL and timeout
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ConfigError::InvalidSetting {
                name: "http client",
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Sends `request` and returns the JSON response body as text
    ///
    /// # Errors
    /// * `Connection` - network failure or timeout
    /// * `Status` - any non-2xx response, with its body
    /// * `Parse` - a 2xx response whose body is not JSON
    pub async fn send(&self, request: &OutboundRequest) -> Result<String, ExchangeError> {
        let url = format!("{}{}", self.base_url, request.path);

        let builder = match request.method {
            HttpMethod::Get => self.client.get(&url).query(&request.query),
            HttpMethod::Post => {
                let builder = self.client.post(&url);
                match &request.body {
                    Some(body) => builder.json(body),
                    None => builder,
                }
            }
        };

        tracing::debug!(
            operation = request.operation,
            method = %request.method,
            path = request.path,
            "Sending exchange request"
        );

        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::warn!(
                operation = request.operation,
                status = status.as_u16(),
                "Exchange rejected request"
            );
            return Err(ExchangeError::Status {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str::<serde_json::Value>(&body).map_err(|e| {
            ExchangeError::Parse(format!("Response is not valid JSON: {}", e))
        })?;

        Ok(body)
    }
}
