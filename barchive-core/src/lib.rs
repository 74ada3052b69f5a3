//! barchive-core
//!
//! Core types, traits, and utilities shared across the barchive ecosystem.
//!
//! - `types`: the canonical data model (raw klines, bars, bar tables,
//!   status records).
//! - `connector`: the `ExchangeConnector` trait implemented by venue
//!   crates.
//! - `window`: tiling of a date span into bounded fetch windows.
//! - `timeseries`: normalization, step inference, and the completeness
//!   audit.
//!
//! This crate is runtime-agnostic: connector implementations are
//! `async_trait` but nothing here spawns tasks or sleeps. The orchestrating
//! `barchive` crate assumes Tokio.
#![warn(missing_docs)]

/// The `ExchangeConnector` trait implemented by venue crates.
pub mod connector;
mod error;
/// Time-series normalization, inference, and audit utilities.
pub mod timeseries;
pub mod types;
/// Fetch-window planning.
pub mod window;

pub use connector::ExchangeConnector;
pub use error::ArchiveError;
pub use timeseries::completeness::{CompletenessReport, calculate_completeness};
pub use timeseries::infer::{coarse_step, infer_step_seconds};
pub use timeseries::normalize::normalize_klines;
pub use types::{Bar, BarTable, IngestStatus, ListedSymbol, RawKline, round2};
pub use window::{FETCH_WINDOW_HOURS, FetchWindow, MAX_RECORDS_PER_CALL, WindowPlan};
