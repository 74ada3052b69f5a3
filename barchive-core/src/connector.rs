//! The venue seam: one trait between the ingestion pipeline and a remote
//! exchange.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::{ArchiveError, ListedSymbol, RawKline};

/// A remote exchange capable of serving metadata and historical klines.
///
/// Implementations own the transport. The ingestion pipeline drives this
/// trait one request at a time and classifies failures through
/// [`ArchiveError`]: throttling must surface as
/// [`ArchiveError::RateLimited`], everything else transport-shaped as
/// [`ArchiveError::Transport`] or [`ArchiveError::Decode`].
#[async_trait]
pub trait ExchangeConnector: Send + Sync {
    /// Stable connector name, used in error messages and as the `source`
    /// tag handed to archive sinks.
    fn name(&self) -> &'static str;

    /// Fetch the venue's full instrument listing.
    ///
    /// Returns every listed instrument with its tradable flag; filtering
    /// and ordering are the caller's concern (see `SymbolDirectory`).
    ///
    /// # Errors
    /// Propagates transport and decode failures.
    async fn listed_symbols(&self) -> Result<Vec<ListedSymbol>, ArchiveError>;

    /// Fetch raw 1-minute klines for `symbol` over `[start, end)`, capped
    /// at `limit` records.
    ///
    /// # Errors
    /// [`ArchiveError::RateLimited`] on server throttling,
    /// [`ArchiveError::Transport`] on other HTTP/network failures,
    /// [`ArchiveError::Decode`] on malformed payloads.
    async fn klines(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        limit: u32,
    ) -> Result<Vec<RawKline>, ArchiveError>;

    /// Probe for the oldest bar the venue has for `symbol`.
    ///
    /// Infallible by contract: on any transport or parse failure the
    /// implementation degrades to a conservative default (24 hours ago)
    /// rather than propagating the error.
    async fn oldest_available(&self, symbol: &str) -> DateTime<Utc>;
}
