pub mod client;
pub mod errors;
pub mod exchange;
pub mod metrics;
pub mod utils;

// Re-export
pub use client::{DEFAULT_TIMEOUT, create_http_client, create_http_client_with};
pub use errors::FundingScannerError;
pub use exchange::{ExchangeTrait, PerpExchange, PerpTrait};
pub use metrics::{
    FundingAverages, FundingSample, FundingSnapshot, FundingWindow, SymbolMetrics, window_average,
};
pub use utils::{
    format_symbol_for_exchange, get_timestamp_millis, normalize_symbol, optional_f64, require_f64,
    value_as_f64, value_as_millis,
};
