use funding_spread_scanner_rs::{FundingScannerError, PerpExchange, PerpTrait};

pub async fn test_get_snapshot_common<T: PerpTrait>(
    exchange: &T,
    symbol: &str,
    expected_symbol: &str,
    expected_exchange: PerpExchange,
) {
    let result = exchange.get_snapshot(symbol).await;
    assert!(result.is_ok(), "Should be able to get {} snapshot: {:?}", symbol, result.err());

    let snapshot = result.unwrap();
    assert_eq!(snapshot.symbol, expected_symbol);
    assert!(snapshot.mark_price > 0.0, "Mark price should be positive");
    assert!(snapshot.funding_rate.is_finite(), "Funding rate should be finite");
    assert_eq!(snapshot.exchange, expected_exchange);
    println!(
        "{} {} mark={} funding={}",
        snapshot.exchange, snapshot.symbol, snapshot.mark_price, snapshot.funding_rate
    );
}

pub async fn test_get_metrics_common<T: PerpTrait>(
    exchange: &T,
    symbol: &str,
    expected_symbol: &str,
    expected_exchange: PerpExchange,
) {
    let result = exchange.get_metrics(symbol).await;
    assert!(result.is_ok(), "Should be able to get {} metrics: {:?}", symbol, result.err());

    let metrics = result.unwrap();
    assert_eq!(metrics.symbol, expected_symbol);
    assert_eq!(metrics.exchange, expected_exchange);
    assert!(metrics.mark_price > 0.0, "Mark price should be positive");
    assert!(metrics.vol_base_24h >= 0.0, "Volume should not be negative");
    assert!(metrics.timestamp > 0, "Timestamp should be positive");

    // A liquid market settles funding hourly, so the long windows are always populated
    assert!(metrics.funding_rate_24h.is_some(), "24h average should exist");
    assert!(metrics.funding_rate_7d.is_some(), "7d average should exist");
    assert!(metrics.funding_rate_30d.is_some(), "30d average should exist");
    println!("{:#?}", metrics);
}

pub async fn test_unknown_symbol_common<T: PerpTrait>(exchange: &T, exchange_name: &str) {
    for symbol in ["INVALID123", "NOTREAL"] {
        let result = exchange.get_snapshot(symbol).await;
        match result {
            Err(FundingScannerError::NotFound(msg)) => {
                println!("Got not found: {}", msg);
            }
            Err(FundingScannerError::ApiError(msg)) => {
                // Some venues answer unknown symbols with a 4xx instead of an empty list
                assert!(
                    msg.contains(&format!("{} API error", exchange_name)),
                    "Error message should contain '{} API error'",
                    exchange_name
                );
            }
            other => panic!(
                "Expected NotFound for '{}' in {}, got: {:?}",
                symbol, exchange_name, other
            ),
        }
    }
}

pub async fn test_empty_symbol_common<T: PerpTrait>(exchange: &T) {
    let result = exchange.get_snapshot("").await;
    assert!(
        matches!(result, Err(FundingScannerError::InvalidSymbol(_))),
        "Empty symbol should be rejected before any request"
    );
}
