//! Runtime settings for the scanner binary, read from the environment (and `.env`).

use crate::common::{DEFAULT_TIMEOUT, FundingScannerError};
use crate::scanner::{ExecutionStrategy, ScanMode};
use std::time::Duration;

pub const HYPERLIQUID_API_BASE: &str = "https://api.hyperliquid.xyz";
pub const VEST_API_BASE: &str = "https://serverprod.vest.exchange/v2";

const DEFAULT_CONCURRENCY: usize = 8;
const DEFAULT_TOP_N: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct ScannerConfig {
    pub hyperliquid_api_base: String,
    pub vest_api_base: String,
    /// Vest routes REST traffic by account group (`xrestservermm: restserver{group}`).
    pub vest_account_group: String,
    pub mode: ScanMode,
    pub execution: ExecutionStrategy,
    pub http_timeout: Duration,
    /// Rows in the ranking table; 0 prints only the best entry.
    pub report_top_n: usize,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            hyperliquid_api_base: HYPERLIQUID_API_BASE.to_string(),
            vest_api_base: VEST_API_BASE.to_string(),
            vest_account_group: "0".to_string(),
            mode: ScanMode::MaxAbsSpread,
            execution: ExecutionStrategy::Parallel {
                concurrency: DEFAULT_CONCURRENCY,
            },
            http_timeout: DEFAULT_TIMEOUT,
            report_top_n: DEFAULT_TOP_N,
        }
    }
}

/// Load variables from a `.env` file in the working directory, if present.
pub fn load_dotenv() {
    let _ = dotenvy::dotenv();
}

impl ScannerConfig {
    pub fn from_env() -> Result<Self, FundingScannerError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Unset or blank keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, FundingScannerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let mut config = Self::default();

        if let Some(url) = get("HYPERLIQUID_API_URL") {
            config.hyperliquid_api_base = url;
        }
        if let Some(url) = get("VEST_API_URL") {
            config.vest_api_base = url;
        }
        if let Some(group) = get("VEST_ACCOUNT_GROUP") {
            config.vest_account_group = group;
        }
        if let Some(mode) = get("SCAN_MODE") {
            config.mode = mode.parse()?;
        }

        let concurrency = match get("SCAN_CONCURRENCY") {
            Some(raw) => parse_usize("SCAN_CONCURRENCY", &raw)?,
            None => DEFAULT_CONCURRENCY,
        };
        if concurrency == 0 {
            return Err(FundingScannerError::Config(
                "SCAN_CONCURRENCY must be at least 1".to_string(),
            ));
        }
        config.execution = match get("SCAN_EXECUTION").as_deref() {
            None | Some("parallel") => ExecutionStrategy::Parallel { concurrency },
            Some("sequential") => ExecutionStrategy::Sequential,
            Some(other) => {
                return Err(FundingScannerError::Config(format!(
                    "SCAN_EXECUTION must be 'parallel' or 'sequential', got '{}'",
                    other
                )));
            }
        };

        if let Some(raw) = get("HTTP_TIMEOUT_SECS") {
            let secs = parse_usize("HTTP_TIMEOUT_SECS", &raw)?;
            if secs == 0 {
                return Err(FundingScannerError::Config(
                    "HTTP_TIMEOUT_SECS must be at least 1".to_string(),
                ));
            }
            config.http_timeout = Duration::from_secs(secs as u64);
        }
        if let Some(raw) = get("REPORT_TOP_N") {
            config.report_top_n = parse_usize("REPORT_TOP_N", &raw)?;
        }

        Ok(config)
    }
}

fn parse_usize(key: &str, raw: &str) -> Result<usize, FundingScannerError> {
    raw.parse::<usize>().map_err(|_| {
        FundingScannerError::Config(format!(
            "{} must be a non-negative integer, got '{}'",
            key, raw
        ))
    })
}
