mod types;

use crate::common::{
    ExchangeTrait, FundingAverages, FundingSample, FundingScannerError, FundingSnapshot,
    FundingWindow, PerpExchange, PerpTrait, SymbolMetrics, create_http_client_with,
    format_symbol_for_exchange, get_timestamp_millis, normalize_symbol, optional_f64,
    require_f64,
};
use crate::config::HYPERLIQUID_API_BASE;
use crate::create_exchange;
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};

pub use types::{
    HyperliquidAsset, HyperliquidAssetCtx, HyperliquidFundingEntry, HyperliquidInfoRequest,
    HyperliquidMeta, HyperliquidMetaAndAssetCtxs,
};

/// `fundingHistory` returns at most this many entries per request.
const FUNDING_HISTORY_PAGE_LIMIT: usize = 500;
/// 30 days of hourly funding is 720 entries, so two pages normally suffice.
const FUNDING_HISTORY_MAX_PAGES: usize = 4;

create_exchange!(Hyperliquid, HYPERLIQUID_API_BASE);

impl Hyperliquid {
    pub fn with_settings(api_base: impl Into<String>, timeout: Duration) -> Self {
        Self::from_parts(
            api_base,
            create_http_client_with(timeout, reqwest::header::HeaderMap::new()),
        )
    }

    async fn info<T>(&self, request: &HyperliquidInfoRequest<'_>) -> Result<T, FundingScannerError>
    where
        T: for<'de> serde::Deserialize<'de> + Send,
    {
        self.post("info", request).await
    }

    pub async fn meta_and_asset_ctxs(
        &self,
    ) -> Result<HyperliquidMetaAndAssetCtxs, FundingScannerError> {
        self.info(&HyperliquidInfoRequest::MetaAndAssetCtxs).await
    }

    /// Perp names worth scanning, sorted ascending.
    pub async fn list_symbols(&self) -> Result<Vec<String>, FundingScannerError> {
        let (meta, _) = self.meta_and_asset_ctxs().await?;
        Ok(universe_symbols(&meta))
    }

    /// Funding history for `coin` in `[start_ms, end_ms]`, paging past the per-request cap.
    pub async fn funding_history(
        &self,
        coin: &str,
        start_ms: u64,
        end_ms: u64,
    ) -> Result<Vec<HyperliquidFundingEntry>, FundingScannerError> {
        let mut entries: Vec<HyperliquidFundingEntry> = Vec::new();
        let mut start_time = start_ms;

        for _ in 0..FUNDING_HISTORY_MAX_PAGES {
            let page: Vec<HyperliquidFundingEntry> = self
                .info(&HyperliquidInfoRequest::FundingHistory {
                    coin,
                    start_time,
                    end_time: end_ms,
                })
                .await?;

            let next = next_page_start(&page, end_ms);
            entries.extend(page);

            match next {
                Some(next) => start_time = next,
                None => break,
            }
        }

        debug!(coin, count = entries.len(), "fetched Hyperliquid funding history");
        Ok(entries)
    }
}

#[async_trait]
impl ExchangeTrait for Hyperliquid {
    fn api_base(&self) -> &str {
        &self.api_base
    }

    fn client(&self) -> &reqwest::Client {
        &self.client
    }

    fn exchange_name(&self) -> &str {
        "Hyperliquid"
    }

    async fn health_check(&self) -> Result<(), FundingScannerError> {
        // Hyperliquid meta - cheapest info request
        self.info::<serde_json::Value>(&HyperliquidInfoRequest::Meta)
            .await
            .map_err(|_| FundingScannerError::HealthCheckFailed)?;

        Ok(())
    }
}

#[async_trait]
impl PerpTrait for Hyperliquid {
    fn exchange(&self) -> PerpExchange {
        PerpExchange::Hyperliquid
    }

    async fn get_snapshot(&self, symbol: &str) -> Result<FundingSnapshot, FundingScannerError> {
        let coin = format_symbol_for_exchange(symbol, &PerpExchange::Hyperliquid)?;
        let universe = self.meta_and_asset_ctxs().await?;
        let ctx = find_asset_ctx(&universe, &coin)?;
        snapshot_from_ctx(&coin, ctx)
    }

    async fn get_metrics(&self, symbol: &str) -> Result<SymbolMetrics, FundingScannerError> {
        let coin = format_symbol_for_exchange(symbol, &PerpExchange::Hyperliquid)?;
        let universe = self.meta_and_asset_ctxs().await?;
        let ctx = find_asset_ctx(&universe, &coin)?;

        let now = get_timestamp_millis();
        let start = now.saturating_sub(FundingWindow::longest().duration_ms());
        let history = self.funding_history(&coin, start, now).await?;
        let samples: Vec<FundingSample> = history.iter().filter_map(|e| e.to_sample()).collect();

        metrics_from_ctx(&coin, ctx, &samples, now)
    }

    async fn get_all_snapshots(
        &self,
    ) -> Result<Option<HashMap<String, FundingSnapshot>>, FundingScannerError> {
        let universe = self.meta_and_asset_ctxs().await?;
        Ok(Some(snapshots_from_universe(&universe)))
    }
}

/// Start of the next `fundingHistory` page, or `None` once a short page or the end of the
/// range has been reached.
pub fn next_page_start(page: &[HyperliquidFundingEntry], end_ms: u64) -> Option<u64> {
    if page.len() < FUNDING_HISTORY_PAGE_LIMIT {
        return None;
    }
    let last = page.iter().filter_map(|e| e.to_sample()).map(|s| s.time).max()?;
    (last < end_ms).then_some(last + 1)
}

/// Universe names, skipping delisted markets and `k`-prefixed (per-thousand) contracts.
pub fn universe_symbols(meta: &HyperliquidMeta) -> Vec<String> {
    let mut symbols: Vec<String> = meta
        .universe
        .iter()
        .filter(|asset| !asset.is_delisted && !asset.name.starts_with('k'))
        .map(|asset| asset.name.clone())
        .collect();
    symbols.sort();
    symbols
}

pub fn find_asset_ctx<'a>(
    universe: &'a HyperliquidMetaAndAssetCtxs,
    coin: &str,
) -> Result<&'a HyperliquidAssetCtx, FundingScannerError> {
    let (meta, ctxs) = universe;
    meta.universe
        .iter()
        .zip(ctxs.iter())
        .find(|(asset, _)| asset.name == coin)
        .map(|(_, ctx)| ctx)
        .ok_or_else(|| {
            FundingScannerError::NotFound(format!(
                "Perpetual '{}' not found in Hyperliquid universe",
                coin
            ))
        })
}

/// Snapshots for every market in one `metaAndAssetCtxs` payload, keyed by normalized symbol.
/// Assets whose context is unusable are left out.
pub fn snapshots_from_universe(
    universe: &HyperliquidMetaAndAssetCtxs,
) -> HashMap<String, FundingSnapshot> {
    let (meta, ctxs) = universe;
    meta.universe
        .iter()
        .zip(ctxs.iter())
        .filter_map(|(asset, ctx)| match snapshot_from_ctx(&asset.name, ctx) {
            Ok(snapshot) => Some((normalize_symbol(&asset.name), snapshot)),
            Err(e) => {
                // delisted markets carry null prices, nothing to report
                if !asset.is_delisted {
                    warn!(coin = %asset.name, error = %e, "unusable Hyperliquid asset context");
                }
                None
            }
        })
        .collect()
}

pub fn snapshot_from_ctx(
    coin: &str,
    ctx: &HyperliquidAssetCtx,
) -> Result<FundingSnapshot, FundingScannerError> {
    Ok(FundingSnapshot {
        symbol: coin.to_string(),
        exchange: PerpExchange::Hyperliquid,
        mark_price: require_f64(&ctx.mark_px, "mark price")?,
        funding_rate: require_f64(&ctx.funding, "funding rate")?,
    })
}

pub fn metrics_from_ctx(
    coin: &str,
    ctx: &HyperliquidAssetCtx,
    samples: &[FundingSample],
    now_ms: u64,
) -> Result<SymbolMetrics, FundingScannerError> {
    let snapshot = snapshot_from_ctx(coin, ctx)?;
    // openInterest is quoted in contracts (base units)
    let open_interest_usd =
        optional_f64(&ctx.open_interest, "open interest")?.map(|oi| oi * snapshot.mark_price);
    let vol_base_24h = optional_f64(&ctx.day_base_vlm, "base volume")?.unwrap_or(0.0);
    let vol_quote_24h = optional_f64(&ctx.day_ntl_vlm, "notional volume")?;
    let averages = FundingAverages::from_samples(samples, now_ms);

    Ok(SymbolMetrics {
        symbol: snapshot.symbol,
        exchange: PerpExchange::Hyperliquid,
        mark_price: snapshot.mark_price,
        funding_rate_snapshot: snapshot.funding_rate,
        funding_rate_1h: averages.one_hour,
        funding_rate_24h: averages.one_day,
        funding_rate_7d: averages.seven_days,
        funding_rate_30d: averages.thirty_days,
        open_interest_usd,
        vol_base_24h,
        vol_quote_24h,
        timestamp: now_ms,
    })
}
