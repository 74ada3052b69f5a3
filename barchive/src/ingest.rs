//! The download loop: windows in, checkpointed bar tables out.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use tokio::sync::watch;

use barchive_core::{
    ArchiveError, BarTable, ExchangeConnector, IngestStatus, MAX_RECORDS_PER_CALL, WindowPlan,
    normalize_klines, round2,
};

use crate::pacing::{LONG_PAUSE_EVERY, RATE_LIMIT_COOLDOWN, RatePacer};
use crate::sink::{ArchiveSink, NoopSink, StatusSink};

/// Consecutive failed requests tolerated before a run aborts.
///
/// The budget counts transport and decode failures only; rate-limit
/// responses wait out the cooldown and retry without consuming it. The
/// failure after the budget is exhausted aborts the run.
pub const ERROR_BUDGET: u32 = 3;

/// One symbol's archive download, configured and ready to run.
///
/// Construction is builder-style: [`IngestJob::new`] wires a connector
/// to no-op sinks and an environment-configured pacer, and the
/// `with_*` methods replace individual pieces.
pub struct IngestJob {
    connector: Arc<dyn ExchangeConnector>,
    pacer: RatePacer,
    store: Arc<dyn ArchiveSink>,
    status: Arc<dyn StatusSink>,
    stop: Option<watch::Receiver<bool>>,
}

impl IngestJob {
    /// Job over `connector` with default pacing and no-op sinks.
    #[must_use]
    pub fn new(connector: Arc<dyn ExchangeConnector>) -> Self {
        Self {
            connector,
            pacer: RatePacer::from_env(),
            store: Arc::new(NoopSink),
            status: Arc::new(NoopSink),
            stop: None,
        }
    }

    /// Replace the checkpoint sink.
    #[must_use]
    pub fn with_store(mut self, store: Arc<dyn ArchiveSink>) -> Self {
        self.store = store;
        self
    }

    /// Replace the progress sink.
    #[must_use]
    pub fn with_status(mut self, status: Arc<dyn StatusSink>) -> Self {
        self.status = status;
        self
    }

    /// Replace the pacer.
    #[must_use]
    pub fn with_pacer(mut self, pacer: RatePacer) -> Self {
        self.pacer = pacer;
        self
    }

    /// Attach a stop signal. Setting the watched value to `true`
    /// cancels the run at the next window boundary or mid-sleep.
    #[must_use]
    pub fn with_stop(mut self, stop: watch::Receiver<bool>) -> Self {
        self.stop = Some(stop);
        self
    }

    /// Download `[start, end)` for `symbol` and return the normalized table.
    ///
    /// The span is tiled into fifteen-hour windows fetched oldest
    /// first. Successful batches accumulate; rate-limit responses wait
    /// out a ten-second cooldown and retry the same window; other
    /// failures consume the error budget. Every [`LONG_PAUSE_EVERY`]-th
    /// issued request flushes a checkpoint through the archive sink,
    /// and every iteration reports progress and sleeps the paced delay.
    ///
    /// # Errors
    /// - [`ArchiveError::FatalIngest`] after more than [`ERROR_BUDGET`]
    ///   consecutive failures.
    /// - [`ArchiveError::Cancelled`] when the stop signal fires; the
    ///   last flushed checkpoint remains the durable frontier.
    /// - [`ArchiveError::Decode`] if an accumulated batch fails
    ///   normalization.
    pub async fn run(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<BarTable, ArchiveError> {
        let mut plan = WindowPlan::new(start, end, Utc::now());
        let estimated_total_calls = plan.estimated_calls();
        let started = Instant::now();
        let mut stop = self.stop.clone();

        let mut raw = Vec::new();
        let mut calls_issued: u64 = 0;
        let mut consecutive_errors: u32 = 0;

        let mut current = plan.next();
        while let Some(window) = current {
            self.ensure_live(symbol, stop.as_ref())?;
            #[cfg(feature = "tracing")]
            tracing::debug!(symbol, start = %window.start, end = %window.end, "fetching window");

            calls_issued += 1;
            match self
                .connector
                .klines(symbol, window.start, window.end, MAX_RECORDS_PER_CALL)
                .await
            {
                Ok(batch) => {
                    raw.extend(batch);
                    consecutive_errors = 0;
                    current = plan.next();
                }
                Err(err) if err.is_rate_limited() => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(symbol, error = %err, "rate limited, cooling down");
                    self.pause(symbol, RATE_LIMIT_COOLDOWN, stop.as_mut()).await?;
                    // The window stays current and is retried.
                }
                Err(err) => {
                    consecutive_errors += 1;
                    #[cfg(feature = "tracing")]
                    tracing::warn!(symbol, failures = consecutive_errors, error = %err, "window fetch failed");
                    if consecutive_errors > ERROR_BUDGET {
                        return Err(ArchiveError::FatalIngest {
                            symbol: symbol.to_owned(),
                            failures: consecutive_errors,
                            last: Box::new(err),
                        });
                    }
                }
            }

            if calls_issued % LONG_PAUSE_EVERY == 0 {
                let snapshot = normalize_klines(&raw)?;
                self.store.store(&snapshot, symbol, self.connector.name());
            }
            self.status.update(&progress_status(
                symbol,
                calls_issued,
                estimated_total_calls,
                started.elapsed(),
            ));
            self.pause(symbol, self.pacer.request_delay(calls_issued), stop.as_mut())
                .await?;
        }

        self.status
            .update(&final_status(symbol, calls_issued, started.elapsed()));
        let table = normalize_klines(&raw)?;
        self.store.store(&table, symbol, self.connector.name());
        #[cfg(feature = "tracing")]
        tracing::info!(symbol, bars = table.len(), calls = calls_issued, "ingest complete");
        Ok(table)
    }

    fn ensure_live(
        &self,
        symbol: &str,
        stop: Option<&watch::Receiver<bool>>,
    ) -> Result<(), ArchiveError> {
        if stop.is_some_and(|rx| *rx.borrow()) {
            return Err(ArchiveError::Cancelled {
                symbol: symbol.to_owned(),
            });
        }
        Ok(())
    }

    /// Sleep for `delay`, waking early with `Cancelled` if the stop
    /// signal flips to `true`. A dropped stop sender disarms the signal
    /// and the sleep completes normally.
    async fn pause(
        &self,
        symbol: &str,
        delay: Duration,
        stop: Option<&mut watch::Receiver<bool>>,
    ) -> Result<(), ArchiveError> {
        let Some(rx) = stop else {
            tokio::time::sleep(delay).await;
            return Ok(());
        };
        if *rx.borrow() {
            return Err(ArchiveError::Cancelled {
                symbol: symbol.to_owned(),
            });
        }
        let sleep = tokio::time::sleep(delay);
        tokio::pin!(sleep);
        loop {
            tokio::select! {
                () = &mut sleep => return Ok(()),
                changed = rx.changed() => match changed {
                    Ok(()) if *rx.borrow() => {
                        return Err(ArchiveError::Cancelled {
                            symbol: symbol.to_owned(),
                        });
                    }
                    Ok(()) => {}
                    Err(_) => {
                        sleep.as_mut().await;
                        return Ok(());
                    }
                },
            }
        }
    }
}

fn progress_status(
    symbol: &str,
    calls_issued: u64,
    estimated_total_calls: u64,
    elapsed: Duration,
) -> IngestStatus {
    // The estimate is fixed at job start. Retries can push the issued
    // count past it, in which case percent runs past 100 and the
    // remaining estimate goes negative; both are reported as-is.
    let elapsed_secs = elapsed.as_secs_f64();
    let remaining_calls = estimated_total_calls as f64 - calls_issued as f64;
    let per_call = elapsed_secs / calls_issued as f64;
    IngestStatus {
        symbol: symbol.to_owned(),
        percent_complete: round2(calls_issued as f64 / estimated_total_calls as f64 * 100.0),
        calls_issued,
        estimated_total_calls,
        elapsed_secs: round2(elapsed_secs),
        estimated_remaining_secs: round2(per_call * remaining_calls),
    }
}

fn final_status(symbol: &str, calls_issued: u64, elapsed: Duration) -> IngestStatus {
    // Retries can push the issued count past the plan's estimate, so
    // the final report replaces the estimate with the actual count.
    IngestStatus {
        symbol: symbol.to_owned(),
        percent_complete: 100.0,
        calls_issued,
        estimated_total_calls: calls_issued,
        elapsed_secs: round2(elapsed.as_secs_f64()),
        estimated_remaining_secs: 0.0,
    }
}
