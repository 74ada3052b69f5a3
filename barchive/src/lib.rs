//! Orchestrator for incremental OHLCV archive ingestion.
//!
//! A [`IngestJob`] tiles a requested span into fixed fifteen-hour
//! windows, fetches them strictly in order through an
//! [`ExchangeConnector`](barchive_core::ExchangeConnector), paces
//! itself between requests, and periodically flushes the normalized
//! table through an [`ArchiveSink`] so a killed process loses at most
//! one checkpoint interval of work. A [`SymbolDirectory`] answers
//! "what can I download here" with an hour of caching.
//!
//! The venue-facing half lives in connector crates such as
//! `barchive-binance`; the shared types and the normalization and
//! completeness routines live in [`barchive_core`].
//!
//! Backfilling a month of minute bars:
//! ```rust,ignore
//! use std::sync::Arc;
//! use barchive::IngestJob;
//! use barchive_binance::BinanceConnector;
//! use chrono::{TimeDelta, Utc};
//!
//! let connector = Arc::new(BinanceConnector::new_default());
//! let end = Utc::now();
//! let start = end - TimeDelta::days(30);
//! let table = IngestJob::new(connector).run("BTCUSDT", start, end).await?;
//! println!("{} bars", table.len());
//! ```

#![warn(missing_docs)]

pub mod directory;
pub mod ingest;
pub mod pacing;
pub mod sink;

pub use directory::{Clock, SymbolDirectory, SystemClock};
pub use ingest::{ERROR_BUDGET, IngestJob};
pub use pacing::{LONG_PAUSE_EVERY, RATE_LIMIT_COOLDOWN, RatePacer};
pub use sink::{ArchiveSink, NoopSink, StatusSink};

pub use barchive_core::{
    ArchiveError, Bar, BarTable, CompletenessReport, ExchangeConnector, IngestStatus,
    ListedSymbol, calculate_completeness,
};
