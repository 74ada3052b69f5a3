mod helpers;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use tokio::sync::watch;

use barchive::{ArchiveSink, IngestJob, RatePacer};
use barchive_core::{ArchiveError, BarTable};
use helpers::ScriptedExchange;

fn t0() -> DateTime<Utc> {
    DateTime::from_timestamp(1_577_836_800, 0).expect("valid timestamp")
}

#[derive(Default)]
struct CountingStore(AtomicUsize);

impl ArchiveSink for CountingStore {
    fn store(&self, _table: &BarTable, _symbol: &str, _source: &str) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

#[tokio::test(start_paused = true)]
async fn preset_stop_cancels_before_any_request() {
    let exchange = Arc::new(ScriptedExchange::new());
    let (tx, rx) = watch::channel(true);

    let err = IngestJob::new(exchange.clone())
        .with_pacer(RatePacer::new(Duration::from_millis(50)))
        .with_stop(rx)
        .run("BTCUSDT", t0(), t0() + TimeDelta::hours(15))
        .await
        .expect_err("already stopped");

    match err {
        ArchiveError::Cancelled { symbol } => assert_eq!(symbol, "BTCUSDT"),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(exchange.kline_calls(), 0);
    drop(tx);
}

#[tokio::test(start_paused = true)]
async fn stop_signal_cancels_a_running_job() {
    let exchange = Arc::new(ScriptedExchange::new());
    let store = Arc::new(CountingStore::default());
    let (tx, rx) = watch::channel(false);

    // Far more windows than could complete before the signal fires.
    let end = t0() + TimeDelta::hours(15 * 600);
    let job = IngestJob::new(exchange.clone())
        .with_pacer(RatePacer::new(Duration::from_millis(50)))
        .with_store(store.clone())
        .with_stop(rx);
    let handle = tokio::spawn(async move { job.run("BTCUSDT", t0(), end).await });

    tokio::time::sleep(Duration::from_millis(10)).await;
    tx.send(true).expect("receiver alive");

    let err = handle
        .await
        .expect("task not panicked")
        .expect_err("cancelled");
    assert!(matches!(err, ArchiveError::Cancelled { .. }));
    // Under thirty calls, so no checkpoint was flushed and cancellation
    // does not flush a partial one either.
    assert!(exchange.kline_calls() < 30);
    assert_eq!(store.0.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn dropped_stop_sender_disarms_the_signal() {
    let exchange = Arc::new(ScriptedExchange::new());
    let (tx, rx) = watch::channel(false);
    drop(tx);

    let table = IngestJob::new(exchange.clone())
        .with_pacer(RatePacer::new(Duration::from_millis(50)))
        .with_stop(rx)
        .run("BTCUSDT", t0(), t0() + TimeDelta::hours(30))
        .await
        .expect("job keeps running without a sender");

    assert!(table.is_empty());
    assert_eq!(exchange.kline_calls(), 2);
}
