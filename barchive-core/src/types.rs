//! Canonical data model for the barchive ecosystem.

use chrono::{DateTime, TimeDelta, Utc};
use serde::de::{Deserializer, Error as _};
use serde::{Deserialize, Serialize};

use crate::ArchiveError;

/// One fixed-width kline record exactly as the venue sends it.
///
/// Prices and volumes stay as the wire's decimal strings so that two
/// byte-identical records compare equal; the [`crate::timeseries::normalize`]
/// pass relies on this for exact-duplicate removal. The trailing `ignore`
/// field is the venue's documented placeholder and is dropped during
/// normalization.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RawKline {
    /// Bar open time, millisecond epoch. Becomes the table key.
    pub open_time_ms: i64,
    /// Open price (decimal string).
    pub open: String,
    /// High price (decimal string).
    pub high: String,
    /// Low price (decimal string).
    pub low: String,
    /// Close price (decimal string).
    pub close: String,
    /// Base-asset volume (decimal string).
    pub volume: String,
    /// Bar close time, millisecond epoch.
    pub close_time_ms: i64,
    /// Quote-asset volume (decimal string).
    pub quote_asset_volume: String,
    /// Number of trades in the bar.
    pub trade_count: u64,
    /// Taker-buy base-asset volume (decimal string).
    pub taker_buy_base_volume: String,
    /// Taker-buy quote-asset volume (decimal string).
    pub taker_buy_quote_volume: String,
    /// Venue placeholder field ("ignore").
    pub ignore: String,
}

type WireKline = (
    i64,
    String,
    String,
    String,
    String,
    String,
    i64,
    String,
    u64,
    String,
    String,
    String,
);

impl<'de> Deserialize<'de> for RawKline {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let (
            open_time_ms,
            open,
            high,
            low,
            close,
            volume,
            close_time_ms,
            quote_asset_volume,
            trade_count,
            taker_buy_base_volume,
            taker_buy_quote_volume,
            ignore,
        ) = WireKline::deserialize(deserializer)?;
        if open_time_ms < 0 {
            return Err(D::Error::custom("negative open time"));
        }
        Ok(Self {
            open_time_ms,
            open,
            high,
            low,
            close,
            volume,
            close_time_ms,
            quote_asset_volume,
            trade_count,
            taker_buy_base_volume,
            taker_buy_quote_volume,
            ignore,
        })
    }
}

/// One canonical OHLCV bar, keyed by its open time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Bar open time. Unique within a [`BarTable`].
    pub open_time: DateTime<Utc>,
    /// Open price.
    pub open: f64,
    /// High price.
    pub high: f64,
    /// Low price.
    pub low: f64,
    /// Close price.
    pub close: f64,
    /// Base-asset volume.
    pub volume: f64,
    /// Bar close time.
    pub close_time: DateTime<Utc>,
    /// Quote-asset volume.
    pub quote_asset_volume: f64,
    /// Number of trades in the bar.
    pub trade_count: u64,
    /// Taker-buy base-asset volume.
    pub taker_buy_base_volume: f64,
    /// Taker-buy quote-asset volume.
    pub taker_buy_quote_volume: f64,
}

/// An ordered bar series with strictly increasing open times.
///
/// The table may carry a declared sampling step (`freq`); when absent, the
/// completeness auditor infers one from the data. Construction enforces the
/// one-bar-per-open-time invariant, so a "table not indexed by time" state
/// is unrepresentable here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BarTable {
    bars: Vec<Bar>,
    freq: Option<TimeDelta>,
}

impl BarTable {
    /// Build a table from bars in any order.
    ///
    /// Bars are sorted by open time; when several bars share one open time,
    /// the first occurrence wins.
    #[must_use]
    pub fn from_bars(bars: Vec<Bar>) -> Self {
        let mut map = std::collections::BTreeMap::new();
        for bar in bars {
            map.entry(bar.open_time).or_insert(bar);
        }
        Self {
            bars: map.into_values().collect(),
            freq: None,
        }
    }

    /// Attach a declared sampling step to the table.
    #[must_use]
    pub fn with_freq(mut self, freq: TimeDelta) -> Self {
        self.freq = Some(freq);
        self
    }

    /// The declared sampling step, if any.
    #[must_use]
    pub const fn freq(&self) -> Option<TimeDelta> {
        self.freq
    }

    /// Bars in ascending open-time order.
    #[must_use]
    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    /// Number of bars in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// True when the table holds no bars.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Open times in ascending order.
    pub fn open_times(&self) -> impl Iterator<Item = DateTime<Utc>> + '_ {
        self.bars.iter().map(|b| b.open_time)
    }

    /// Earliest and latest open times, when the table is non-empty.
    #[must_use]
    pub fn span(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        match (self.bars.first(), self.bars.last()) {
            (Some(first), Some(last)) => Some((first.open_time, last.open_time)),
            _ => None,
        }
    }
}

/// One instrument as listed in the venue's exchange metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListedSymbol {
    /// Venue ticker, e.g. `BTCUSDT`.
    pub ticker: String,
    /// Whether the venue currently reports the instrument as tradable.
    pub tradable: bool,
}

/// Progress record emitted after each window iteration of an ingestion job.
///
/// `estimated_total_calls` is fixed at job start and never recalculated, so
/// retries can push `percent_complete` past 100 and `estimated_remaining_secs`
/// below zero. That is accepted telemetry behavior, not corrected here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestStatus {
    /// Symbol being ingested.
    pub symbol: String,
    /// `calls_issued / estimated_total_calls * 100`, rounded to 2 decimals.
    pub percent_complete: f64,
    /// Requests issued so far, including failed and rate-limited attempts.
    pub calls_issued: u64,
    /// Upfront call estimate from the initial span.
    pub estimated_total_calls: u64,
    /// Wall-clock seconds since job start, rounded to 2 decimals.
    pub elapsed_secs: f64,
    /// Linear extrapolation of remaining seconds, rounded to 2 decimals.
    pub estimated_remaining_secs: f64,
}

/// Round to 2 decimal places, matching the reporting precision used across
/// status records and completeness reports.
#[must_use]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Parse a wire decimal string into `f64`.
///
/// # Errors
/// Returns [`ArchiveError::Decode`] when the field is not a valid number.
pub fn parse_wire_decimal(field: &'static str, raw: &str) -> Result<f64, ArchiveError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| ArchiveError::decode(format!("invalid {field}: {raw:?}")))
}
