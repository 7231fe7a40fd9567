mod types;

use crate::common::{
    ExchangeTrait, FundingAverages, FundingSample, FundingScannerError, FundingSnapshot,
    FundingWindow, PerpExchange, PerpTrait, SymbolMetrics, create_http_client_with,
    format_symbol_for_exchange, get_timestamp_millis, optional_f64, require_f64,
};
use crate::config::VEST_API_BASE;
use crate::create_exchange;
use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use std::time::Duration;
use tracing::{debug, warn};

pub use types::{Vest24hTicker, VestFundingEntry, VestLatestTicker, VestTickersResponse};

const VEST_ROUTING_HEADER: &str = "xrestservermm";
const DEFAULT_ACCOUNT_GROUP: &str = "0";
const FUNDING_HISTORY_LIMIT: &str = "1000";
const FUNDING_HISTORY_INTERVAL: &str = "1h";

create_exchange!(Vest, VEST_API_BASE, vest_headers(DEFAULT_ACCOUNT_GROUP));

/// Every request carries `xrestservermm: restserver{account_group}`.
fn vest_headers(account_group: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    match HeaderValue::from_str(&format!("restserver{}", account_group)) {
        Ok(value) => {
            headers.insert(VEST_ROUTING_HEADER, value);
        }
        Err(e) => {
            warn!(account_group, error = %e, "invalid Vest account group, header not set");
        }
    }
    headers
}

impl Vest {
    pub fn with_settings(
        api_base: impl Into<String>,
        account_group: &str,
        timeout: Duration,
    ) -> Self {
        Self::from_parts(
            api_base,
            create_http_client_with(timeout, vest_headers(account_group)),
        )
    }

    pub async fn latest_ticker(
        &self,
        vest_symbol: &str,
    ) -> Result<VestLatestTicker, FundingScannerError> {
        let response: VestTickersResponse<VestLatestTicker> = self
            .get("ticker/latest", &[("symbols", vest_symbol)])
            .await?;
        first_ticker(response, vest_symbol)
    }

    pub async fn ticker_24h(
        &self,
        vest_symbol: &str,
    ) -> Result<Vest24hTicker, FundingScannerError> {
        let response: VestTickersResponse<Vest24hTicker> = self
            .get("ticker/24hr", &[("symbols", vest_symbol)])
            .await?;
        first_ticker(response, vest_symbol)
    }

    /// Hourly funding history in `[start_ms, end_ms]`; one request covers 30 days.
    pub async fn funding_history(
        &self,
        vest_symbol: &str,
        start_ms: u64,
        end_ms: u64,
    ) -> Result<Vec<VestFundingEntry>, FundingScannerError> {
        let start = start_ms.to_string();
        let end = end_ms.to_string();
        let query = [
            ("symbol", vest_symbol),
            ("startTime", start.as_str()),
            ("endTime", end.as_str()),
            ("limit", FUNDING_HISTORY_LIMIT),
            ("interval", FUNDING_HISTORY_INTERVAL),
        ];
        let entries: Vec<VestFundingEntry> = self.get("funding/history", &query).await?;

        debug!(symbol = vest_symbol, count = entries.len(), "fetched Vest funding history");
        Ok(entries)
    }
}

#[async_trait]
impl ExchangeTrait for Vest {
    fn api_base(&self) -> &str {
        &self.api_base
    }

    fn client(&self) -> &reqwest::Client {
        &self.client
    }

    fn exchange_name(&self) -> &str {
        "Vest"
    }

    async fn health_check(&self) -> Result<(), FundingScannerError> {
        // Vest exchangeInfo - lists symbols, no parameters needed
        self.get::<serde_json::Value, [(&str, &str)]>("exchangeInfo", &[])
            .await
            .map_err(|_| FundingScannerError::HealthCheckFailed)?;

        Ok(())
    }
}

#[async_trait]
impl PerpTrait for Vest {
    fn exchange(&self) -> PerpExchange {
        PerpExchange::Vest
    }

    async fn get_snapshot(&self, symbol: &str) -> Result<FundingSnapshot, FundingScannerError> {
        let vest_symbol = format_symbol_for_exchange(symbol, &PerpExchange::Vest)?;
        let ticker = self.latest_ticker(&vest_symbol).await?;
        snapshot_from_ticker(&vest_symbol, &ticker)
    }

    async fn get_metrics(&self, symbol: &str) -> Result<SymbolMetrics, FundingScannerError> {
        let vest_symbol = format_symbol_for_exchange(symbol, &PerpExchange::Vest)?;
        let now = get_timestamp_millis();
        let start = now.saturating_sub(FundingWindow::longest().duration_ms());

        let (latest, day, history) = tokio::try_join!(
            self.latest_ticker(&vest_symbol),
            self.ticker_24h(&vest_symbol),
            self.funding_history(&vest_symbol, start, now)
        )?;
        let samples: Vec<FundingSample> = history.iter().filter_map(|e| e.to_sample()).collect();

        metrics_from_tickers(&vest_symbol, &latest, &day, &samples, now)
    }
}

fn first_ticker<T>(
    response: VestTickersResponse<T>,
    vest_symbol: &str,
) -> Result<T, FundingScannerError> {
    response.tickers.into_iter().next().ok_or_else(|| {
        FundingScannerError::NotFound(format!("Perpetual '{}' not found on Vest", vest_symbol))
    })
}

pub fn snapshot_from_ticker(
    vest_symbol: &str,
    ticker: &VestLatestTicker,
) -> Result<FundingSnapshot, FundingScannerError> {
    if !ticker.symbol.is_empty() && ticker.symbol != vest_symbol {
        return Err(FundingScannerError::ApiError(format!(
            "Vest API error: asked for {} but got {}",
            vest_symbol, ticker.symbol
        )));
    }

    Ok(FundingSnapshot {
        symbol: vest_symbol.to_string(),
        exchange: PerpExchange::Vest,
        mark_price: require_f64(&ticker.mark_price, "mark price")?,
        funding_rate: require_f64(&ticker.one_hr_funding_rate, "funding rate")?,
    })
}

pub fn metrics_from_tickers(
    vest_symbol: &str,
    latest: &VestLatestTicker,
    day: &Vest24hTicker,
    samples: &[FundingSample],
    now_ms: u64,
) -> Result<SymbolMetrics, FundingScannerError> {
    let snapshot = snapshot_from_ticker(vest_symbol, latest)?;
    let averages = FundingAverages::from_samples(samples, now_ms);

    Ok(SymbolMetrics {
        symbol: snapshot.symbol,
        exchange: PerpExchange::Vest,
        mark_price: snapshot.mark_price,
        funding_rate_snapshot: snapshot.funding_rate,
        funding_rate_1h: averages.one_hour,
        funding_rate_24h: averages.one_day,
        funding_rate_7d: averages.seven_days,
        funding_rate_30d: averages.thirty_days,
        // Vest's public tickers do not publish open interest
        open_interest_usd: None,
        vol_base_24h: require_f64(&day.volume, "volume")?,
        vol_quote_24h: optional_f64(&day.quote_volume, "quote volume")?,
        timestamp: now_ms,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const NOW: u64 = 1_700_000_000_000;
    const HOUR: u64 = 60 * 60 * 1000;

    #[test]
    fn empty_ticker_list_is_not_found() {
        let response: VestTickersResponse<VestLatestTicker> =
            serde_json::from_value(json!({"tickers": []})).unwrap();
        assert!(matches!(
            first_ticker(response, "NOPE-PERP"),
            Err(FundingScannerError::NotFound(_))
        ));
    }

    #[test]
    fn metrics_from_vest_payloads() {
        let latest: VestTickersResponse<VestLatestTicker> = serde_json::from_value(json!({
            "tickers": [{"symbol": "BTC-PERP", "markPrice": "61000.5", "indexPrice": "61001.0",
                         "oneHrFundingRate": "0.000012", "status": "TRADING"}]
        }))
        .unwrap();
        let day: VestTickersResponse<Vest24hTicker> = serde_json::from_value(json!({
            "tickers": [{"symbol": "BTC-PERP", "volume": "12.5", "quoteVolume": "762506.25"}]
        }))
        .unwrap();
        let history: Vec<VestFundingEntry> = serde_json::from_value(json!([
            {"symbol": "BTC-PERP", "time": NOW - HOUR / 2, "oneHrFundingRate": "0.0001"},
            {"symbol": "BTC-PERP", "timestamp": NOW - 2 * HOUR, "oneHrFundingRate": "0.0003"},
            {"symbol": "BTC-PERP", "time": NOW - 3 * HOUR, "oneHrFundingRate": null},
            {"symbol": "BTC-PERP", "time": NOW - 8 * 24 * HOUR, "oneHrFundingRate": "0.001"}
        ]))
        .unwrap();
        let samples: Vec<FundingSample> = history.iter().filter_map(|e| e.to_sample()).collect();
        assert_eq!(samples.len(), 4);

        let latest = first_ticker(latest, "BTC-PERP").unwrap();
        let day = first_ticker(day, "BTC-PERP").unwrap();
        let metrics = metrics_from_tickers("BTC-PERP", &latest, &day, &samples, NOW).unwrap();

        assert_eq!(metrics.symbol, "BTC-PERP");
        assert_eq!(metrics.exchange, PerpExchange::Vest);
        assert_eq!(metrics.mark_price, 61000.5);
        assert_eq!(metrics.funding_rate_snapshot, 0.000012);
        assert_eq!(metrics.funding_rate_1h, Some(0.0001));
        assert!((metrics.funding_rate_24h.unwrap() - 0.0002).abs() < 1e-12);
        assert!((metrics.funding_rate_7d.unwrap() - 0.0002).abs() < 1e-12);
        assert!((metrics.funding_rate_30d.unwrap() - 0.0014 / 3.0).abs() < 1e-12);
        assert_eq!(metrics.open_interest_usd, None);
        assert_eq!(metrics.vol_base_24h, 12.5);
        assert_eq!(metrics.vol_quote_24h, Some(762506.25));
    }

    #[test]
    fn unparsable_snapshot_is_an_error() {
        let ticker: VestLatestTicker = serde_json::from_value(json!({
            "symbol": "ETH-PERP", "markPrice": "3000", "oneHrFundingRate": "n/a"
        }))
        .unwrap();
        assert!(matches!(
            snapshot_from_ticker("ETH-PERP", &ticker),
            Err(FundingScannerError::InvalidNumber(_))
        ));
    }

    #[test]
    fn ticker_without_symbol_is_accepted() {
        let response: VestTickersResponse<VestLatestTicker> = serde_json::from_value(json!({
            "tickers": [{"markPrice": "3000", "oneHrFundingRate": "-0.00002"}]
        }))
        .unwrap();
        let ticker = first_ticker(response, "ETH-PERP").unwrap();
        assert_eq!(ticker.symbol, "");

        let snapshot = snapshot_from_ticker("ETH-PERP", &ticker).unwrap();
        assert_eq!(snapshot.symbol, "ETH-PERP");
        assert_eq!(snapshot.funding_rate, -0.00002);
    }

    #[test]
    fn mismatched_ticker_symbol_is_rejected() {
        let ticker: VestLatestTicker = serde_json::from_value(json!({
            "symbol": "ETH-PERP", "markPrice": "3000", "oneHrFundingRate": "0.0001"
        }))
        .unwrap();
        assert!(matches!(
            snapshot_from_ticker("BTC-PERP", &ticker),
            Err(FundingScannerError::ApiError(_))
        ));
    }
}
