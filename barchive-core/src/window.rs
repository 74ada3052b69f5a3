//! Tiling of an arbitrary `[start, end)` span into bounded fetch windows.

use chrono::{DateTime, TimeDelta, Utc};

/// Maximum duration of one fetch window, in hours.
///
/// At the fixed 1-minute sampling interval this yields 900 records per
/// window, safely under [`MAX_RECORDS_PER_CALL`], so a single request can
/// never be truncated server-side.
pub const FETCH_WINDOW_HOURS: i64 = 15;

/// Hard cap on records returned by one kline request.
pub const MAX_RECORDS_PER_CALL: u32 = 1000;

/// A half-open fetch window `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchWindow {
    /// Inclusive window start.
    pub start: DateTime<Utc>,
    /// Exclusive window end.
    pub end: DateTime<Utc>,
}

impl FetchWindow {
    /// Window start as a millisecond epoch, for the venue's query string.
    #[must_use]
    pub fn start_ms(&self) -> i64 {
        self.start.timestamp_millis()
    }

    /// Window end as a millisecond epoch.
    #[must_use]
    pub fn end_ms(&self) -> i64 {
        self.end.timestamp_millis()
    }
}

/// Sequential, non-overlapping windows of at most [`FETCH_WINDOW_HOURS`]
/// covering `[start, end)` exactly.
///
/// An `end` later than `now` is clamped to the current minute boundary
/// before tiling; `end <= start` yields an empty plan (zero iterations,
/// not an error). The final window is truncated to `end`.
#[derive(Debug, Clone)]
pub struct WindowPlan {
    cursor: DateTime<Utc>,
    end: DateTime<Utc>,
    estimated_calls: u64,
}

impl WindowPlan {
    /// Plan windows for `[start, end)` as observed at `now`.
    #[must_use]
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        let end = if end > now {
            truncate_to_minute(now)
        } else {
            end
        };
        let span_secs = (end - start).num_seconds();
        let window_secs = FETCH_WINDOW_HOURS * 3600;
        let estimated_calls = if span_secs > 0 {
            u64::try_from(span_secs)
                .unwrap_or(0)
                .div_ceil(window_secs.unsigned_abs())
        } else {
            0
        };
        Self {
            cursor: start,
            end,
            estimated_calls,
        }
    }

    /// Upfront number of calls for the full span, fixed at plan time.
    ///
    /// This is the denominator of the job's progress telemetry and is never
    /// recomputed, even when retries inflate the actual call count.
    #[must_use]
    pub const fn estimated_calls(&self) -> u64 {
        self.estimated_calls
    }

    /// The (possibly clamped) exclusive end of the plan.
    #[must_use]
    pub const fn end(&self) -> DateTime<Utc> {
        self.end
    }
}

impl Iterator for WindowPlan {
    type Item = FetchWindow;

    fn next(&mut self) -> Option<FetchWindow> {
        if self.cursor >= self.end {
            return None;
        }
        let window_end = (self.cursor + TimeDelta::hours(FETCH_WINDOW_HOURS)).min(self.end);
        let window = FetchWindow {
            start: self.cursor,
            end: window_end,
        };
        self.cursor = window_end;
        Some(window)
    }
}

fn truncate_to_minute(t: DateTime<Utc>) -> DateTime<Utc> {
    let secs = t.timestamp();
    DateTime::from_timestamp(secs - secs.rem_euclid(60), 0).unwrap_or(t)
}
