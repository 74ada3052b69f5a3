//! Download a week of minute bars for one symbol and audit the result.
//!
//! ```sh
//! cargo run --example backfill --features tracing -- BTCUSDT
//! ```

use std::sync::Arc;

use chrono::{TimeDelta, Utc};

use barchive::{
    ArchiveSink, BarTable, ExchangeConnector, IngestJob, IngestStatus, StatusSink,
    calculate_completeness,
};
use barchive_binance::BinanceConnector;

struct StdoutSink;

impl ArchiveSink for StdoutSink {
    fn store(&self, table: &BarTable, symbol: &str, source: &str) {
        tracing::info!(symbol, source, bars = table.len(), "checkpoint");
    }
}

impl StatusSink for StdoutSink {
    fn update(&self, status: &IngestStatus) {
        match serde_json::to_string(status) {
            Ok(line) => println!("{line}"),
            Err(err) => tracing::warn!(error = %err, "status serialization failed"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let symbol = std::env::args().nth(1).unwrap_or_else(|| "BTCUSDT".into());
    let connector = Arc::new(BinanceConnector::new_default());

    let oldest = connector.oldest_available(&symbol).await;
    let end = Utc::now();
    let start = (end - TimeDelta::days(7)).max(oldest);
    tracing::info!(%symbol, %start, %end, "starting backfill");

    let sink = Arc::new(StdoutSink);
    let job = IngestJob::new(connector)
        .with_store(sink.clone())
        .with_status(sink);
    let table = job.run(&symbol, start, end).await?;

    let report = calculate_completeness(&table)?;
    println!(
        "{symbol}: {} bars, {} missing ({}%)",
        table.len(),
        report.count_missing,
        report.percent_missing
    );
    Ok(())
}
