use crate::common::{FundingSample, value_as_f64, value_as_millis};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
pub struct VestTickersResponse<T> {
    pub tickers: Vec<T>,
}

#[derive(Debug, Deserialize)]
pub struct VestLatestTicker {
    /// Echo of the requested symbol; some responses omit it.
    #[serde(default)]
    pub symbol: String,
    #[serde(rename = "markPrice", default)]
    pub mark_price: Value,
    #[serde(rename = "oneHrFundingRate", default)]
    pub one_hr_funding_rate: Value,
}

#[derive(Debug, Deserialize)]
pub struct Vest24hTicker {
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub volume: Value,
    #[serde(rename = "quoteVolume", default)]
    pub quote_volume: Value,
}

/// Funding history rows; older payloads used `timestamp` instead of `time`.
#[derive(Debug, Deserialize)]
pub struct VestFundingEntry {
    #[serde(alias = "timestamp", default)]
    pub time: Value,
    #[serde(rename = "oneHrFundingRate", default)]
    pub one_hr_funding_rate: Value,
}

impl VestFundingEntry {
    pub fn to_sample(&self) -> Option<FundingSample> {
        Some(FundingSample {
            time: value_as_millis(&self.time)?,
            rate: value_as_f64(&self.one_hr_funding_rate),
        })
    }
}
