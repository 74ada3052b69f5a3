//! Cached directory of symbols tradable on a venue.
//!
//! Symbol listings change rarely, so the directory memoizes the full
//! listing for a TTL (one hour by default) and serves the cached copy
//! until it expires. A refresh failure is returned to the caller;
//! expired entries are never served.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, TimeDelta, Utc};

use barchive_core::{ArchiveError, ExchangeConnector};

/// Source of "now" for TTL checks, swappable in tests.
pub trait Clock: Send + Sync {
    /// Current wall-clock time.
    fn now(&self) -> DateTime<Utc>;
}

/// [`Clock`] backed by the system clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

struct DirectoryEntry {
    symbols: Vec<String>,
    fetched_at: DateTime<Utc>,
}

/// TTL cache over a connector's symbol listing.
pub struct SymbolDirectory {
    connector: Arc<dyn ExchangeConnector>,
    clock: Arc<dyn Clock>,
    ttl: TimeDelta,
    cached: Mutex<Option<DirectoryEntry>>,
}

impl SymbolDirectory {
    /// Directory over `connector` with a one-hour TTL and the system clock.
    #[must_use]
    pub fn new(connector: Arc<dyn ExchangeConnector>) -> Self {
        Self {
            connector,
            clock: Arc::new(SystemClock),
            ttl: TimeDelta::hours(1),
            cached: Mutex::new(None),
        }
    }

    /// Replace the TTL.
    #[must_use]
    pub fn with_ttl(mut self, ttl: TimeDelta) -> Self {
        self.ttl = ttl;
        self
    }

    /// Replace the clock.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Tradable symbols on the venue, sorted ascending.
    ///
    /// Serves the cached listing while it is fresh; otherwise fetches a
    /// new one, filters it to tradable symbols, and replaces the cache.
    ///
    /// # Errors
    /// Propagates the connector error when a refresh is needed and the
    /// listing fetch fails. The stale entry is not served in that case.
    ///
    /// # Panics
    /// Panics if the internal mutex is poisoned.
    pub async fn available_symbols(&self) -> Result<Vec<String>, ArchiveError> {
        let now = self.clock.now();
        {
            let guard = self.cached.lock().expect("mutex poisoned");
            if let Some(entry) = guard.as_ref()
                && now - entry.fetched_at < self.ttl
            {
                return Ok(entry.symbols.clone());
            }
        }

        // Lock released across the await; a concurrent refresh is
        // harmless since the last writer installs an equivalent listing.
        let listed = self.connector.listed_symbols().await?;
        let mut symbols: Vec<String> = listed
            .into_iter()
            .filter(|s| s.tradable)
            .map(|s| s.ticker)
            .collect();
        symbols.sort_unstable();

        let mut guard = self.cached.lock().expect("mutex poisoned");
        *guard = Some(DirectoryEntry {
            symbols: symbols.clone(),
            fetched_at: now,
        });
        Ok(symbols)
    }
}
