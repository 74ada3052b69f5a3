use chrono::{DateTime, TimeDelta, Utc};

/// Estimate the sampling step (in seconds) as the **minimum** positive gap
/// between adjacent timestamps.
///
/// The minimum is the robust estimator under sparse data: any larger gap
/// could itself be the artifact of a missing sample, so taking the mode or
/// the mean would overestimate the step on incomplete series. Input order
/// does not matter; duplicate timestamps are ignored. Returns `None` when
/// fewer than two distinct timestamps are present.
#[must_use]
pub fn infer_step_seconds(times: &[DateTime<Utc>]) -> Option<i64> {
    if times.len() < 2 {
        return None;
    }
    let mut sorted: Vec<DateTime<Utc>> = times.to_vec();
    sorted.sort_unstable();

    let mut min_gap: Option<i64> = None;
    let mut last = sorted[0];
    for &cur in sorted.iter().skip(1) {
        let dt: TimeDelta = cur - last;
        if dt > TimeDelta::zero() {
            let secs = dt.num_seconds();
            min_gap = Some(min_gap.map_or(secs, |m| m.min(secs)));
            last = cur;
        }
    }
    min_gap
}

/// Map a raw step in seconds to the coarse sampling unit the auditor
/// expects: whole days, then whole hours, then whole minutes, with a
/// 1-minute floor for sub-minute gaps.
#[must_use]
pub fn coarse_step(step_seconds: i64) -> TimeDelta {
    const DAY: i64 = 86_400;
    const HOUR: i64 = 3_600;
    const MINUTE: i64 = 60;

    if step_seconds >= DAY {
        TimeDelta::days(step_seconds / DAY)
    } else if step_seconds >= HOUR {
        TimeDelta::hours(step_seconds / HOUR)
    } else if step_seconds >= MINUTE {
        TimeDelta::minutes(step_seconds / MINUTE)
    } else {
        TimeDelta::minutes(1)
    }
}
