use crate::common::{
    FundingScannerError, FundingSnapshot, PerpExchange, PerpTrait, SymbolMetrics,
    normalize_symbol,
};
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::future::Future;
use std::str::FromStr;
use tracing::{debug, info, warn};

mod opportunity;
pub use opportunity::{SpreadDirection, SpreadResult};

/// How per-symbol fetches are driven. Both strategies share the same fetch code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExecutionStrategy {
    /// One symbol at a time, in input order.
    Sequential,
    /// Up to `concurrency` symbols in flight; completion order is arbitrary.
    Parallel { concurrency: usize },
}

/// Which extremum the scan selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScanMode {
    /// Largest |hl_rate - vest_rate| across both venues.
    MaxAbsSpread,
    /// Most negative Hyperliquid snapshot rate (single venue).
    MostNegativeSnapshot,
}

impl FromStr for ScanMode {
    type Err = FundingScannerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "spread" => Ok(ScanMode::MaxAbsSpread),
            "most-negative" => Ok(ScanMode::MostNegativeSnapshot),
            other => Err(FundingScannerError::Config(format!(
                "SCAN_MODE must be 'spread' or 'most-negative', got '{}'",
                other
            ))),
        }
    }
}

/// Where one venue's snapshots come from for the duration of a scan.
enum SnapshotSource<'a> {
    Bulk {
        exchange: PerpExchange,
        snapshots: HashMap<String, FundingSnapshot>,
    },
    PerSymbol(&'a dyn PerpTrait),
}

impl<'a> SnapshotSource<'a> {
    /// Uses the venue's bulk endpoint when it has one; a failed bulk fetch falls back to
    /// per-symbol requests.
    async fn prepare(venue: &'a dyn PerpTrait) -> SnapshotSource<'a> {
        match venue.get_all_snapshots().await {
            Ok(Some(snapshots)) => {
                debug!(
                    exchange = %venue.exchange(),
                    count = snapshots.len(),
                    "loaded bulk funding snapshots"
                );
                SnapshotSource::Bulk {
                    exchange: venue.exchange(),
                    snapshots,
                }
            }
            Ok(None) => SnapshotSource::PerSymbol(venue),
            Err(e) => {
                warn!(
                    exchange = %venue.exchange(),
                    error = %e,
                    "bulk snapshot fetch failed, fetching per symbol"
                );
                SnapshotSource::PerSymbol(venue)
            }
        }
    }

    async fn get(&self, symbol: &str) -> Result<FundingSnapshot, FundingScannerError> {
        match self {
            SnapshotSource::Bulk {
                exchange,
                snapshots,
            } => {
                let base = normalize_symbol(symbol);
                snapshots.get(&base).cloned().ok_or_else(|| {
                    FundingScannerError::NotFound(format!(
                        "Perpetual '{}' not found on {}",
                        base, exchange
                    ))
                })
            }
            SnapshotSource::PerSymbol(venue) => venue.get_snapshot(symbol).await,
        }
    }
}

/// Funding scanner - fetches funding snapshots per symbol and picks the extremal entry
pub struct FundingScanner;

impl FundingScanner {
    /// Runs `fetch` once per symbol under the given strategy and returns every output.
    pub async fn fetch_all<T, F, Fut>(
        symbols: &[String],
        strategy: ExecutionStrategy,
        fetch: F,
    ) -> Vec<T>
    where
        F: Fn(String) -> Fut,
        Fut: Future<Output = T>,
    {
        match strategy {
            ExecutionStrategy::Sequential => {
                let mut results = Vec::with_capacity(symbols.len());
                for symbol in symbols {
                    results.push(fetch(symbol.clone()).await);
                }
                results
            }
            ExecutionStrategy::Parallel { concurrency } => {
                stream::iter(symbols.iter().cloned())
                    .map(fetch)
                    .buffer_unordered(concurrency.max(1))
                    .collect()
                    .await
            }
        }
    }

    /// Fetches both venues' snapshots for every symbol and returns the valid spreads,
    /// sorted by symbol. Symbols where either venue fails are logged and skipped.
    ///
    /// Venues with a bulk snapshot endpoint are queried once per scan instead of per symbol.
    pub async fn collect_spreads(
        hyperliquid: &dyn PerpTrait,
        vest: &dyn PerpTrait,
        symbols: &[String],
        strategy: ExecutionStrategy,
    ) -> Vec<SpreadResult> {
        let (hl_source, vest_source) = tokio::join!(
            SnapshotSource::prepare(hyperliquid),
            SnapshotSource::prepare(vest)
        );
        let (hl_source, vest_source) = (&hl_source, &vest_source);

        let results = Self::fetch_all(symbols, strategy, move |symbol| async move {
            let (hl, vs) = tokio::join!(hl_source.get(&symbol), vest_source.get(&symbol));
            match (hl, vs) {
                (Ok(hl), Ok(vs)) => Some(SpreadResult::from_snapshots(
                    normalize_symbol(&symbol),
                    &hl,
                    &vs,
                )),
                (hl, vs) => {
                    let legs = [(hyperliquid.exchange(), hl), (vest.exchange(), vs)];
                    for (exchange, result) in legs {
                        if let Err(e) = result {
                            warn!(
                                symbol = %symbol,
                                exchange = %exchange,
                                error = %e,
                                "skipping symbol"
                            );
                        }
                    }
                    None
                }
            }
        })
        .await;

        let mut spreads: Vec<SpreadResult> = results.into_iter().flatten().collect();
        spreads.sort_by(|a, b| a.symbol.cmp(&b.symbol));

        info!(
            scanned = symbols.len(),
            valid = spreads.len(),
            "funding spread scan complete"
        );
        spreads
    }

    /// Fetches one venue's snapshot for every symbol; failures are logged and skipped.
    pub async fn collect_snapshots(
        exchange: &dyn PerpTrait,
        symbols: &[String],
        strategy: ExecutionStrategy,
    ) -> Vec<FundingSnapshot> {
        let source = SnapshotSource::prepare(exchange).await;
        let source = &source;

        let results = Self::fetch_all(symbols, strategy, move |symbol| async move {
            match source.get(&symbol).await {
                Ok(snapshot) => Some(snapshot),
                Err(e) => {
                    warn!(
                        symbol = %symbol,
                        exchange = %exchange.exchange(),
                        error = %e,
                        "skipping symbol"
                    );
                    None
                }
            }
        })
        .await;

        let mut snapshots: Vec<FundingSnapshot> = results.into_iter().flatten().collect();
        snapshots.sort_by(|a, b| a.symbol.cmp(&b.symbol));

        info!(
            exchange = %exchange.exchange(),
            scanned = symbols.len(),
            valid = snapshots.len(),
            "funding snapshot scan complete"
        );
        snapshots
    }

    /// Orders by |diff| descending, then symbol ascending.
    pub fn compare_spreads(a: &SpreadResult, b: &SpreadResult) -> Ordering {
        b.abs_diff()
            .partial_cmp(&a.abs_diff())
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.symbol.cmp(&b.symbol))
    }

    pub fn rank_spreads(spreads: &[SpreadResult]) -> Vec<SpreadResult> {
        let mut ranked = spreads.to_vec();
        ranked.sort_by(Self::compare_spreads);
        ranked
    }

    /// Entry with the largest absolute spread; ties go to the alphabetically first symbol.
    pub fn best_spread(spreads: &[SpreadResult]) -> Option<SpreadResult> {
        spreads.iter().min_by(|a, b| Self::compare_spreads(a, b)).cloned()
    }

    /// Orders by funding rate ascending, then symbol ascending.
    pub fn compare_snapshots(a: &FundingSnapshot, b: &FundingSnapshot) -> Ordering {
        a.funding_rate
            .partial_cmp(&b.funding_rate)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.symbol.cmp(&b.symbol))
    }

    /// Snapshot with the lowest funding rate; ties go to the alphabetically first symbol.
    pub fn most_negative(snapshots: &[FundingSnapshot]) -> Option<FundingSnapshot> {
        snapshots
            .iter()
            .min_by(|a, b| Self::compare_snapshots(a, b))
            .cloned()
    }

    /// Best cross-venue spread over `symbols`, or `None` if no symbol had data on both sides.
    pub async fn scan(
        hyperliquid: &dyn PerpTrait,
        vest: &dyn PerpTrait,
        symbols: &[String],
        strategy: ExecutionStrategy,
    ) -> Option<SpreadResult> {
        let spreads = Self::collect_spreads(hyperliquid, vest, symbols, strategy).await;
        Self::best_spread(&spreads)
    }

    /// Every valid spread, most extreme first.
    pub async fn ranked_spreads(
        hyperliquid: &dyn PerpTrait,
        vest: &dyn PerpTrait,
        symbols: &[String],
        strategy: ExecutionStrategy,
    ) -> Vec<SpreadResult> {
        let spreads = Self::collect_spreads(hyperliquid, vest, symbols, strategy).await;
        Self::rank_spreads(&spreads)
    }

    /// Full metrics for the symbol with the most negative snapshot rate on `exchange`.
    ///
    /// Candidates are tried from most negative upward, so a failed detail fetch falls
    /// through to the next symbol instead of aborting the scan.
    pub async fn scan_most_negative(
        exchange: &dyn PerpTrait,
        symbols: &[String],
        strategy: ExecutionStrategy,
    ) -> Option<SymbolMetrics> {
        let mut snapshots = Self::collect_snapshots(exchange, symbols, strategy).await;
        snapshots.sort_by(Self::compare_snapshots);

        for candidate in &snapshots {
            match exchange.get_metrics(&candidate.symbol).await {
                Ok(metrics) => return Some(metrics),
                Err(e) => {
                    warn!(
                        symbol = %candidate.symbol,
                        exchange = %exchange.exchange(),
                        error = %e,
                        "failed to fetch metrics, trying next candidate"
                    );
                }
            }
        }
        None
    }
}
