// src/common/utils.rs
use crate::common::{FundingScannerError, PerpExchange};
use serde_json::Value;

const PERP_SUFFIX: &str = "-PERP";

/// Reads a JSON number or numeric string. Anything else (null, bool, garbage text) is `None`.
pub fn value_as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|v| v.is_finite())
}

// Required numeric field: missing or unparsable is an InvalidNumber error
pub fn require_f64(value: &Value, field_name: &str) -> Result<f64, FundingScannerError> {
    value_as_f64(value).ok_or_else(|| {
        FundingScannerError::InvalidNumber(format!("Invalid {} format: {}", field_name, value))
    })
}

// Optional numeric field: missing (null) is None, present but unparsable is an error
pub fn optional_f64(value: &Value, field_name: &str) -> Result<Option<f64>, FundingScannerError> {
    if value.is_null() {
        return Ok(None);
    }
    require_f64(value, field_name).map(Some)
}

/// Reads a JSON integer or integer string as milliseconds.
pub fn value_as_millis(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| n.as_f64().map(|f| f as u64)),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    }
}

/// Canonical base symbol: trimmed, uppercase, no `-PERP` suffix. Idempotent.
pub fn normalize_symbol(symbol: &str) -> String {
    let upper = symbol.trim().to_uppercase();
    match upper.strip_suffix(PERP_SUFFIX) {
        Some(base) => base.to_string(),
        None => upper,
    }
}

// Format a symbol the way each venue names its perp
pub fn format_symbol_for_exchange(
    symbol: &str,
    exchange: &PerpExchange,
) -> Result<String, FundingScannerError> {
    let base = normalize_symbol(symbol);
    if base.is_empty() {
        return Err(FundingScannerError::InvalidSymbol(
            "Symbol cannot be empty".to_string(),
        ));
    }

    Ok(match exchange {
        PerpExchange::Hyperliquid => base,
        PerpExchange::Vest => format!("{}{}", base, PERP_SUFFIX),
    })
}

// get timestamp in milliseconds
pub fn get_timestamp_millis() -> u64 {
    chrono::Utc::now()
        .timestamp_millis()
        .try_into()
        .unwrap_or(0)
}
