use std::time::Duration;

use crate::{BinanceConnector, DEFAULT_BASE_URL};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Builder for [`BinanceConnector`].
///
/// The base URL override exists for tests against a local mock server; the
/// custom-client hook lets callers share a configured `reqwest::Client`
/// (proxies, connection pools).
pub struct BinanceConnectorBuilder {
    base_url: String,
    client: Option<reqwest::Client>,
    timeout: Duration,
}

impl BinanceConnectorBuilder {
    /// Builder with the production endpoint and default timeout.
    #[must_use]
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            client: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Override the REST base URL (no trailing slash).
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Use an existing `reqwest::Client` instead of constructing one.
    #[must_use]
    pub fn custom_client(mut self, client: reqwest::Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Per-request timeout for the internally constructed client.
    /// Ignored when a custom client is supplied.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Construct the connector.
    #[must_use]
    pub fn build(self) -> BinanceConnector {
        let http = self.client.unwrap_or_else(|| {
            reqwest::Client::builder()
                .timeout(self.timeout)
                .build()
                .unwrap_or_default()
        });
        BinanceConnector::from_parts(http, self.base_url)
    }
}

impl Default for BinanceConnectorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
