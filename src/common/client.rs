use reqwest::header::HeaderMap;
use std::time::Duration;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

pub fn create_http_client() -> reqwest::Client {
    create_http_client_with(DEFAULT_TIMEOUT, HeaderMap::new())
}

// Falls back to reqwest's defaults if the builder rejects the settings (bad TLS backend etc.)
pub fn create_http_client_with(timeout: Duration, headers: HeaderMap) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .default_headers(headers)
        .build()
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, "failed to build HTTP client, using defaults");
            reqwest::Client::new()
        })
}
