//! Output seams for the ingest loop.
//!
//! The loop itself never touches storage or a UI. It hands normalized
//! snapshots to an [`ArchiveSink`] and per-iteration progress to a
//! [`StatusSink`]; callers plug in whatever persistence or reporting
//! they want. Both default to no-ops.

use barchive_core::{BarTable, IngestStatus};

/// Receives normalized bar tables as checkpoints and on completion.
///
/// Each call carries the full table accumulated so far, not a delta.
/// A later checkpoint for the same symbol supersedes earlier ones, so
/// an implementation that simply overwrites is already correct.
pub trait ArchiveSink: Send + Sync {
    /// Persist `table` for `symbol` as fetched from `source`.
    fn store(&self, table: &BarTable, symbol: &str, source: &str);
}

/// Receives a progress snapshot after every issued request.
pub trait StatusSink: Send + Sync {
    /// Observe the latest progress snapshot.
    fn update(&self, status: &IngestStatus);
}

/// Sink that discards everything it is given.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl ArchiveSink for NoopSink {
    fn store(&self, _table: &BarTable, _symbol: &str, _source: &str) {}
}

impl StatusSink for NoopSink {
    fn update(&self, _status: &IngestStatus) {}
}
