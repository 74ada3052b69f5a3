use barchive_binance::BinanceConnector;
use barchive_core::ExchangeConnector;
use httpmock::prelude::*;
use serde_json::json;

fn connector(server: &MockServer) -> BinanceConnector {
    BinanceConnector::builder().base_url(server.base_url()).build()
}

#[tokio::test]
async fn listing_maps_trading_status_to_tradable() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v3/exchangeInfo");
            then.status(200).json_body(json!({
                "timezone": "UTC",
                "symbols": [
                    {"symbol": "ETHUSDT", "status": "TRADING", "baseAsset": "ETH"},
                    {"symbol": "LUNAUSDT", "status": "BREAK", "baseAsset": "LUNA"},
                    {"symbol": "BTCUSDT", "status": "TRADING", "baseAsset": "BTC"}
                ]
            }));
        })
        .await;

    let symbols = connector(&server).listed_symbols().await.unwrap();
    mock.assert_async().await;

    assert_eq!(symbols.len(), 3);
    let tradable: Vec<&str> = symbols
        .iter()
        .filter(|s| s.tradable)
        .map(|s| s.ticker.as_str())
        .collect();
    assert_eq!(tradable, vec!["ETHUSDT", "BTCUSDT"]);
    assert!(!symbols.iter().find(|s| s.ticker == "LUNAUSDT").unwrap().tradable);
}

#[tokio::test]
async fn listing_failure_is_a_transport_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v3/exchangeInfo");
            then.status(500).body("boom");
        })
        .await;

    let err = connector(&server).listed_symbols().await.unwrap_err();
    assert!(matches!(err, barchive_core::ArchiveError::Transport { .. }), "got {err:?}");
}
