//! `funding-spread-scanner-rs`
//!
//! Fetch perpetual funding rates from Hyperliquid and Vest, average them over trailing
//! windows, and rank symbols by cross-exchange funding spread.
//!
//! ## Quickstart (single symbol)
//!
//! ```no_run
//! use funding_spread_scanner_rs::{Hyperliquid, PerpTrait};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), funding_spread_scanner_rs::FundingScannerError> {
//! let metrics = Hyperliquid::new().get_metrics("BTC").await?;
//! println!(
//!     "{} funding={} 24h avg={:?}",
//!     metrics.symbol, metrics.funding_rate_snapshot, metrics.funding_rate_24h
//! );
//! # Ok(())
//! # }
//! ```
//!
//! ## Quickstart (spread scan)
//!
//! ```no_run
//! use funding_spread_scanner_rs::{ExecutionStrategy, FundingScanner, Hyperliquid, Vest};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), funding_spread_scanner_rs::FundingScannerError> {
//! let hyperliquid = Hyperliquid::new();
//! let vest = Vest::new();
//! let symbols = hyperliquid.list_symbols().await?;
//!
//! let best = FundingScanner::scan(
//!     &hyperliquid,
//!     &vest,
//!     &symbols,
//!     ExecutionStrategy::Parallel { concurrency: 8 },
//! )
//! .await;
//! if let Some(best) = best {
//!     println!("{} spread={:.6}", best.symbol, best.diff);
//! }
//! # Ok(())
//! # }
//! ```

pub mod common;
pub mod config;
pub mod perp;
pub mod report;
pub mod scanner;

// Re-export common types
pub use perp::{Hyperliquid, Vest};

pub use common::{
    ExchangeTrait, FundingAverages, FundingSample, FundingScannerError, FundingSnapshot,
    FundingWindow, PerpExchange, PerpTrait, SymbolMetrics, normalize_symbol, window_average,
};
pub use config::{ScannerConfig, load_dotenv};
pub use report::apy;
pub use scanner::{ExecutionStrategy, FundingScanner, ScanMode, SpreadDirection, SpreadResult};
