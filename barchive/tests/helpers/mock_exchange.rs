#![allow(dead_code)]

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};

use barchive_core::{ArchiveError, ExchangeConnector, ListedSymbol, RawKline};

/// One scripted outcome for a `klines` call, consumed front to back.
pub enum KlineStep {
    /// Return this batch.
    Batch(Vec<RawKline>),
    /// Signal a rate limit.
    RateLimited,
    /// Fail with a transport error carrying this message.
    Fail(&'static str),
}

/// Scripted in-memory exchange used by the ingest and directory tests.
///
/// `klines` pops the next [`KlineStep`]; once the script is exhausted it
/// keeps succeeding with empty batches. `listed_symbols` pops from its
/// own script and panics when over-called, which is exactly the signal
/// the cache tests want.
pub struct ScriptedExchange {
    pub kline_script: Mutex<Vec<KlineStep>>,
    pub listing_script: Mutex<Vec<Result<Vec<ListedSymbol>, ArchiveError>>>,
    pub kline_calls: AtomicUsize,
    pub listing_calls: AtomicUsize,
    pub recorded_windows: Mutex<Vec<(DateTime<Utc>, DateTime<Utc>)>>,
    pub oldest: DateTime<Utc>,
}

impl ScriptedExchange {
    pub fn new() -> Self {
        Self {
            kline_script: Mutex::new(Vec::new()),
            listing_script: Mutex::new(Vec::new()),
            kline_calls: AtomicUsize::new(0),
            listing_calls: AtomicUsize::new(0),
            recorded_windows: Mutex::new(Vec::new()),
            oldest: DateTime::UNIX_EPOCH,
        }
    }

    pub fn with_kline_script(self, steps: Vec<KlineStep>) -> Self {
        *self.kline_script.lock().unwrap() = steps;
        self
    }

    pub fn with_listing_script(
        self,
        outcomes: Vec<Result<Vec<ListedSymbol>, ArchiveError>>,
    ) -> Self {
        *self.listing_script.lock().unwrap() = outcomes;
        self
    }

    pub fn kline_calls(&self) -> usize {
        self.kline_calls.load(Ordering::SeqCst)
    }

    pub fn listing_calls(&self) -> usize {
        self.listing_calls.load(Ordering::SeqCst)
    }

    pub fn recorded_windows(&self) -> Vec<(DateTime<Utc>, DateTime<Utc>)> {
        self.recorded_windows.lock().unwrap().clone()
    }
}

#[async_trait]
impl ExchangeConnector for ScriptedExchange {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn listed_symbols(&self) -> Result<Vec<ListedSymbol>, ArchiveError> {
        self.listing_calls.fetch_add(1, Ordering::SeqCst);
        let mut script = self.listing_script.lock().unwrap();
        assert!(!script.is_empty(), "listing script exhausted");
        script.remove(0)
    }

    async fn klines(
        &self,
        _symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        _limit: u32,
    ) -> Result<Vec<RawKline>, ArchiveError> {
        self.kline_calls.fetch_add(1, Ordering::SeqCst);
        self.recorded_windows.lock().unwrap().push((start, end));
        let mut script = self.kline_script.lock().unwrap();
        if script.is_empty() {
            return Ok(Vec::new());
        }
        match script.remove(0) {
            KlineStep::Batch(batch) => Ok(batch),
            KlineStep::RateLimited => Err(ArchiveError::RateLimited),
            KlineStep::Fail(msg) => Err(ArchiveError::transport("scripted", msg)),
        }
    }

    async fn oldest_available(&self, _symbol: &str) -> DateTime<Utc> {
        self.oldest
    }
}

/// Test clock that only moves when told to.
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn starting_at(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn advance(&self, by: TimeDelta) {
        *self.now.lock().unwrap() += by;
    }
}

impl barchive::Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

/// Raw kline with the given open time and otherwise boring values.
pub fn raw_kline(open_time_ms: i64) -> RawKline {
    RawKline {
        open_time_ms,
        open: "100.0".into(),
        high: "101.0".into(),
        low: "99.0".into(),
        close: "100.5".into(),
        volume: "12.0".into(),
        close_time_ms: open_time_ms + 59_999,
        quote_asset_volume: "1200.0".into(),
        trade_count: 42,
        taker_buy_base_volume: "6.0".into(),
        taker_buy_quote_volume: "600.0".into(),
        ignore: "0".into(),
    }
}
