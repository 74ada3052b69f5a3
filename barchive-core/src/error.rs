use thiserror::Error;

/// Unified error type for the barchive workspace.
///
/// This wraps single-request transport failures, server-side throttling,
/// payload decoding problems, input validation errors, and the fatal
/// abort raised when an ingestion job exhausts its consecutive-error budget.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// Network or HTTP failure on a single request.
    ///
    /// Counts against the ingestion job's consecutive-error budget.
    #[error("{connector} transport failure: {msg}")]
    Transport {
        /// Connector name that failed.
        connector: String,
        /// Human-readable error message.
        msg: String,
    },

    /// The server signaled throttling (HTTP 429/418).
    ///
    /// Never fatal: the fetch loop retries the same window after a fixed
    /// cooldown, indefinitely.
    #[error("rate limited by server")]
    RateLimited,

    /// A response body could not be decoded into the expected shape.
    ///
    /// Counts against the ingestion job's consecutive-error budget.
    #[error("decode failure: {0}")]
    Decode(String),

    /// An ingestion job exceeded its consecutive-error budget and aborted.
    ///
    /// No partial result is returned with this error; whatever was already
    /// checkpointed is the caller's to keep or discard.
    #[error("download failed for {symbol} after {failures} consecutive errors: {last}")]
    FatalIngest {
        /// Symbol whose job aborted.
        symbol: String,
        /// Number of back-to-back failures at abort time.
        failures: u32,
        /// The failure that tripped the budget.
        last: Box<ArchiveError>,
    },

    /// Malformed input (empty table, invalid argument, ...).
    #[error("invalid input: {0}")]
    Validation(String),

    /// The job's stop signal was raised before completion.
    #[error("ingestion cancelled for {symbol}")]
    Cancelled {
        /// Symbol whose job was cancelled.
        symbol: String,
    },
}

impl ArchiveError {
    /// Helper: build a `Transport` error with the connector name and message.
    pub fn transport(connector: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Transport {
            connector: connector.into(),
            msg: msg.into(),
        }
    }

    /// Helper: build a `Decode` error.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Helper: build a `Validation` error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// True for server-signaled throttling, which is retried indefinitely
    /// and never counted against the error budget.
    #[must_use]
    pub const fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited)
    }

    /// True for per-request failures that consume the ingestion job's
    /// consecutive-error budget.
    #[must_use]
    pub const fn counts_against_budget(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::Decode(_))
    }
}
