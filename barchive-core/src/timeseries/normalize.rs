use std::collections::HashSet;

use chrono::DateTime;

use crate::types::parse_wire_decimal;
use crate::{ArchiveError, Bar, BarTable, RawKline};

/// Project raw paginated records into the canonical bar table.
///
/// - Exact-duplicate rows (all twelve wire fields identical) collapse to
///   one, keeping the first occurrence.
/// - The first field (open time) is promoted to the table key; the trailing
///   sentinel field is dropped.
/// - All remaining fields are parsed to their canonical numeric types.
/// - Output is ordered by open time ascending; when distinct rows share an
///   open time, the first wins.
///
/// The pass is idempotent: normalizing records that are already unique and
/// ordered reproduces the same table.
///
/// # Errors
/// Returns [`ArchiveError::Decode`] when a numeric field fails to parse or
/// a timestamp is out of range.
pub fn normalize_klines(records: &[RawKline]) -> Result<BarTable, ArchiveError> {
    let mut seen: HashSet<&RawKline> = HashSet::with_capacity(records.len());
    let mut bars: Vec<Bar> = Vec::with_capacity(records.len());
    for record in records {
        if !seen.insert(record) {
            continue;
        }
        bars.push(to_bar(record)?);
    }
    Ok(BarTable::from_bars(bars))
}

fn to_bar(record: &RawKline) -> Result<Bar, ArchiveError> {
    let open_time = DateTime::from_timestamp_millis(record.open_time_ms)
        .ok_or_else(|| ArchiveError::decode(format!("open time out of range: {}", record.open_time_ms)))?;
    let close_time = DateTime::from_timestamp_millis(record.close_time_ms)
        .ok_or_else(|| ArchiveError::decode(format!("close time out of range: {}", record.close_time_ms)))?;
    Ok(Bar {
        open_time,
        open: parse_wire_decimal("open", &record.open)?,
        high: parse_wire_decimal("high", &record.high)?,
        low: parse_wire_decimal("low", &record.low)?,
        close: parse_wire_decimal("close", &record.close)?,
        volume: parse_wire_decimal("volume", &record.volume)?,
        close_time,
        quote_asset_volume: parse_wire_decimal("quote_asset_volume", &record.quote_asset_volume)?,
        trade_count: record.trade_count,
        taker_buy_base_volume: parse_wire_decimal(
            "taker_buy_base_volume",
            &record.taker_buy_base_volume,
        )?,
        taker_buy_quote_volume: parse_wire_decimal(
            "taker_buy_quote_volume",
            &record.taker_buy_quote_volume,
        )?,
    })
}
