//! barchive-binance
//!
//! Binance REST connector implementing `ExchangeConnector` for the
//! barchive ingestion pipeline: exchange metadata, paginated 1-minute
//! klines, and the oldest-available-date probe.
#![warn(missing_docs)]

/// Builder for configuring the connector (base URL, HTTP client, timeout).
pub mod builder;
mod wire;

use async_trait::async_trait;
use barchive_core::{ArchiveError, ExchangeConnector, ListedSymbol, RawKline};
use chrono::{DateTime, TimeDelta, Utc};
use reqwest::StatusCode;

pub use builder::BinanceConnectorBuilder;

/// Production Binance REST endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.binance.com";

/// Sampling interval of the archive. Downloads always run at the venue's
/// finest kline granularity.
pub const INTERVAL: &str = "1m";

const CONNECTOR_NAME: &str = "binance";

/// `ExchangeConnector` backed by the Binance spot REST API.
pub struct BinanceConnector {
    http: reqwest::Client,
    base_url: String,
}

impl BinanceConnector {
    /// Connector against the production endpoint with a default client.
    #[must_use]
    pub fn new_default() -> Self {
        Self::builder().build()
    }

    /// Returns an unconfigured builder.
    #[must_use]
    pub fn builder() -> BinanceConnectorBuilder {
        BinanceConnectorBuilder::new()
    }

    pub(crate) fn from_parts(http: reqwest::Client, base_url: String) -> Self {
        Self { http, base_url }
    }

    fn transport(msg: impl Into<String>) -> ArchiveError {
        ArchiveError::transport(CONNECTOR_NAME, msg)
    }

    /// Classify a non-success HTTP status.
    ///
    /// 429 is the venue's throttle signal; 418 is its repeat-offender ban
    /// code. Both map to `RateLimited` so the fetch loop backs off instead
    /// of burning its error budget.
    async fn classify_failure(resp: reqwest::Response) -> ArchiveError {
        let status = resp.status();
        if status == StatusCode::TOO_MANY_REQUESTS || status.as_u16() == 418 {
            return ArchiveError::RateLimited;
        }
        let body = resp.text().await.unwrap_or_default();
        Self::transport(format!("HTTP {status}: {body}"))
    }

    async fn fetch_klines(
        &self,
        symbol: &str,
        start_ms: i64,
        end_ms: i64,
        limit: u32,
    ) -> Result<Vec<RawKline>, ArchiveError> {
        let url = format!("{}/api/v3/klines", self.base_url);
        let resp = self
            .http
            .get(&url)
            .query(&[
                ("symbol", symbol),
                ("interval", INTERVAL),
                ("startTime", &start_ms.to_string()),
                ("endTime", &end_ms.to_string()),
                ("limit", &limit.to_string()),
            ])
            .send()
            .await
            .map_err(|e| Self::transport(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(Self::classify_failure(resp).await);
        }
        resp.json::<Vec<RawKline>>()
            .await
            .map_err(|e| ArchiveError::decode(e.to_string()))
    }
}

#[async_trait]
impl ExchangeConnector for BinanceConnector {
    fn name(&self) -> &'static str {
        CONNECTOR_NAME
    }

    async fn listed_symbols(&self) -> Result<Vec<ListedSymbol>, ArchiveError> {
        let url = format!("{}/api/v3/exchangeInfo", self.base_url);
        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| Self::transport(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(Self::classify_failure(resp).await);
        }
        let info: wire::ExchangeInfo = resp
            .json()
            .await
            .map_err(|e| ArchiveError::decode(e.to_string()))?;

        Ok(info
            .symbols
            .into_iter()
            .map(|s| ListedSymbol {
                tradable: s.status == wire::STATUS_TRADING,
                ticker: s.symbol,
            })
            .collect())
    }

    async fn klines(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        limit: u32,
    ) -> Result<Vec<RawKline>, ArchiveError> {
        self.fetch_klines(symbol, start.timestamp_millis(), end.timestamp_millis(), limit)
            .await
    }

    async fn oldest_available(&self, symbol: &str) -> DateTime<Utc> {
        let now = Utc::now();
        let fallback = now - TimeDelta::days(1);
        let probed = self
            .fetch_klines(symbol, 0, now.timestamp_millis(), 1)
            .await;
        match probed {
            Ok(records) => records
                .first()
                .and_then(|r| DateTime::from_timestamp_millis(r.open_time_ms))
                .unwrap_or(fallback),
            Err(_err) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(symbol, error = %_err, "oldest-date probe failed; defaulting to 24h ago");
                fallback
            }
        }
    }
}
