use crate::common::{FundingSample, value_as_f64, value_as_millis};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `POST /info` request bodies.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum HyperliquidInfoRequest<'a> {
    Meta,
    MetaAndAssetCtxs,
    FundingHistory {
        coin: &'a str,
        #[serde(rename = "startTime")]
        start_time: u64,
        #[serde(rename = "endTime")]
        end_time: u64,
    },
}

#[derive(Debug, Deserialize)]
pub struct HyperliquidMeta {
    pub universe: Vec<HyperliquidAsset>,
}

#[derive(Debug, Deserialize)]
pub struct HyperliquidAsset {
    pub name: String,
    #[serde(rename = "isDelisted", default)]
    pub is_delisted: bool,
}

/// Per-asset context, index-aligned with `HyperliquidMeta::universe`. Numbers arrive as strings.
#[derive(Debug, Deserialize)]
pub struct HyperliquidAssetCtx {
    #[serde(rename = "markPx", default)]
    pub mark_px: Value,
    #[serde(default)]
    pub funding: Value,
    #[serde(rename = "openInterest", default)]
    pub open_interest: Value,
    #[serde(rename = "dayNtlVlm", default)]
    pub day_ntl_vlm: Value,
    #[serde(rename = "dayBaseVlm", default)]
    pub day_base_vlm: Value,
}

pub type HyperliquidMetaAndAssetCtxs = (HyperliquidMeta, Vec<HyperliquidAssetCtx>);

#[derive(Debug, Deserialize)]
pub struct HyperliquidFundingEntry {
    #[serde(default)]
    pub coin: String,
    #[serde(rename = "fundingRate", default)]
    pub funding_rate: Value,
    #[serde(default)]
    pub time: Value,
}

impl HyperliquidFundingEntry {
    /// Entries without a usable timestamp cannot be windowed and are dropped.
    pub fn to_sample(&self) -> Option<FundingSample> {
        Some(FundingSample {
            time: value_as_millis(&self.time)?,
            rate: value_as_f64(&self.funding_rate),
        })
    }
}
