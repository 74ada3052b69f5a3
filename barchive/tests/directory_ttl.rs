mod helpers;

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};

use barchive::SymbolDirectory;
use barchive_core::{ArchiveError, ListedSymbol};
use helpers::{ManualClock, ScriptedExchange};

fn t0() -> DateTime<Utc> {
    DateTime::from_timestamp(1_577_836_800, 0).expect("valid timestamp")
}

fn listed(ticker: &str, tradable: bool) -> ListedSymbol {
    ListedSymbol {
        ticker: ticker.to_owned(),
        tradable,
    }
}

#[tokio::test]
async fn listing_is_served_from_cache_within_the_ttl() {
    let exchange = Arc::new(ScriptedExchange::new().with_listing_script(vec![Ok(vec![
        listed("ETHUSDT", true),
        listed("BTCUSDT", true),
    ])]));
    let clock = Arc::new(ManualClock::starting_at(t0()));
    let directory = SymbolDirectory::new(exchange.clone()).with_clock(clock.clone());

    let first = directory.available_symbols().await.expect("fresh fetch");
    clock.advance(TimeDelta::minutes(59));
    let second = directory.available_symbols().await.expect("cache hit");

    assert_eq!(first, vec!["BTCUSDT", "ETHUSDT"]);
    assert_eq!(second, first);
    assert_eq!(exchange.listing_calls(), 1);
}

#[tokio::test]
async fn expired_entry_is_refetched() {
    let exchange = Arc::new(ScriptedExchange::new().with_listing_script(vec![
        Ok(vec![listed("BTCUSDT", true)]),
        Ok(vec![listed("BTCUSDT", true), listed("SOLUSDT", true)]),
    ]));
    let clock = Arc::new(ManualClock::starting_at(t0()));
    let directory = SymbolDirectory::new(exchange.clone()).with_clock(clock.clone());

    let first = directory.available_symbols().await.expect("fresh fetch");
    clock.advance(TimeDelta::minutes(61));
    let second = directory.available_symbols().await.expect("refetch");

    assert_eq!(first, vec!["BTCUSDT"]);
    assert_eq!(second, vec!["BTCUSDT", "SOLUSDT"]);
    assert_eq!(exchange.listing_calls(), 2);
}

#[tokio::test]
async fn halted_symbols_are_filtered_and_the_rest_sorted() {
    let exchange = Arc::new(ScriptedExchange::new().with_listing_script(vec![Ok(vec![
        listed("ZRXUSDT", true),
        listed("HALTED", false),
        listed("ADAUSDT", true),
    ])]));
    let directory = SymbolDirectory::new(exchange)
        .with_clock(Arc::new(ManualClock::starting_at(t0())));

    let symbols = directory.available_symbols().await.expect("fresh fetch");
    assert_eq!(symbols, vec!["ADAUSDT", "ZRXUSDT"]);
}

#[tokio::test]
async fn refresh_failure_propagates_instead_of_serving_stale_data() {
    let exchange = Arc::new(ScriptedExchange::new().with_listing_script(vec![
        Ok(vec![listed("BTCUSDT", true)]),
        Err(ArchiveError::transport("scripted", "listing down")),
    ]));
    let clock = Arc::new(ManualClock::starting_at(t0()));
    let directory = SymbolDirectory::new(exchange).with_clock(clock.clone());

    directory.available_symbols().await.expect("fresh fetch");
    clock.advance(TimeDelta::hours(2));

    let err = directory
        .available_symbols()
        .await
        .expect_err("refresh failed");
    assert!(matches!(err, ArchiveError::Transport { .. }));
}

#[tokio::test]
async fn custom_ttl_is_honored() {
    let exchange = Arc::new(ScriptedExchange::new().with_listing_script(vec![
        Ok(vec![listed("BTCUSDT", true)]),
        Ok(vec![listed("BTCUSDT", true)]),
    ]));
    let clock = Arc::new(ManualClock::starting_at(t0()));
    let directory = SymbolDirectory::new(exchange.clone())
        .with_clock(clock.clone())
        .with_ttl(TimeDelta::minutes(5));

    directory.available_symbols().await.expect("fresh fetch");
    clock.advance(TimeDelta::minutes(6));
    directory.available_symbols().await.expect("refetch");

    assert_eq!(exchange.listing_calls(), 2);
}
