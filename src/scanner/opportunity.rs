use crate::common::FundingSnapshot;
use serde::{Deserialize, Serialize};

/// Which legs to hold for a funding spread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpreadDirection {
    LongHlShortVest,
    LongVestShortHl,
}

impl SpreadDirection {
    pub fn label(&self) -> &'static str {
        match self {
            SpreadDirection::LongHlShortVest => "Long HL / Short Vest",
            SpreadDirection::LongVestShortHl => "Long Vest / Short HL",
        }
    }
}

/// Cross-exchange funding spread for one symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpreadResult {
    /// Base symbol (e.g., "BTC")
    pub symbol: String,
    /// Hyperliquid snapshot funding rate (hourly)
    pub hl_rate: f64,
    /// Vest snapshot funding rate (hourly)
    pub vest_rate: f64,
    /// hl_rate - vest_rate
    pub diff: f64,
}

impl SpreadResult {
    pub fn new(symbol: impl Into<String>, hl_rate: f64, vest_rate: f64) -> Self {
        Self {
            symbol: symbol.into(),
            hl_rate,
            vest_rate,
            diff: hl_rate - vest_rate,
        }
    }

    pub fn from_snapshots(
        symbol: impl Into<String>,
        hl: &FundingSnapshot,
        vest: &FundingSnapshot,
    ) -> Self {
        Self::new(symbol, hl.funding_rate, vest.funding_rate)
    }

    pub fn abs_diff(&self) -> f64 {
        self.diff.abs()
    }

    /// A zero spread has no preferred side and falls through to `LongVestShortHl`.
    pub fn direction(&self) -> SpreadDirection {
        if self.diff > 0.0 {
            SpreadDirection::LongHlShortVest
        } else {
            SpreadDirection::LongVestShortHl
        }
    }
}
