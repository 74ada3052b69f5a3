use serde::{Deserialize, Serialize};

use crate::timeseries::infer::{coarse_step, infer_step_seconds};
use crate::types::round2;
use crate::{ArchiveError, BarTable};

/// Result of a completeness audit over one bar table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompletenessReport {
    /// Share of expected samples that are missing, 0–100, 2 decimals.
    pub percent_missing: f64,
    /// Number of expected samples not present in the table.
    pub count_missing: u64,
}

/// Audit a bar table for missing samples.
///
/// The sampling step is the table's declared frequency when present;
/// otherwise it is inferred as the minimum positive gap between adjacent
/// open times, mapped to a coarse day/hour/minute unit (see
/// [`coarse_step`]). A single-bar table defaults to a 1-minute step. The
/// expected sequence spans `[min, max]` inclusive at that step; the report
/// compares expected against actual counts.
///
/// # Errors
/// Returns [`ArchiveError::Validation`] when the table is empty.
pub fn calculate_completeness(table: &BarTable) -> Result<CompletenessReport, ArchiveError> {
    let Some((min, max)) = table.span() else {
        return Err(ArchiveError::validation("bar table is empty"));
    };

    let step = match table.freq() {
        Some(freq) => freq,
        None => {
            let times: Vec<_> = table.open_times().collect();
            match infer_step_seconds(&times) {
                Some(secs) => coarse_step(secs),
                // Single data point; the original defaults to 1 minute.
                None => coarse_step(60),
            }
        }
    };

    let step_secs = step.num_seconds();
    if step_secs <= 0 {
        return Err(ArchiveError::validation(format!(
            "non-positive sampling step: {step_secs}s"
        )));
    }

    let span_secs = (max - min).num_seconds();
    let expected_len = u64::try_from(span_secs / step_secs)
        .map_err(|_| ArchiveError::validation("table span is negative"))?
        + 1;
    let actual_len = table.len() as u64;

    let count_missing = expected_len.saturating_sub(actual_len);
    let percent_missing = if expected_len == 0 {
        0.0
    } else {
        round2(count_missing as f64 / expected_len as f64 * 100.0)
    };

    Ok(CompletenessReport {
        percent_missing,
        count_missing,
    })
}
