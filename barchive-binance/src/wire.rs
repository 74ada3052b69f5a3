//! Serde shapes for the venue's REST payloads.

use serde::Deserialize;

/// Subset of the `/api/v3/exchangeInfo` response the directory needs.
#[derive(Debug, Deserialize)]
pub(crate) struct ExchangeInfo {
    #[serde(default)]
    pub symbols: Vec<SymbolEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SymbolEntry {
    pub symbol: String,
    pub status: String,
}

/// Status string the venue uses for currently tradable instruments.
pub(crate) const STATUS_TRADING: &str = "TRADING";
