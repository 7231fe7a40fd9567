use crate::common::{FundingScannerError, FundingSnapshot, SymbolMetrics};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// Common exchange enum definition

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum PerpExchange {
    Hyperliquid,
    Vest,
}

impl PerpExchange {
    pub fn name(&self) -> &'static str {
        match self {
            PerpExchange::Hyperliquid => "Hyperliquid",
            PerpExchange::Vest => "Vest",
        }
    }
}

impl std::fmt::Display for PerpExchange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// Common exchange trait definition
#[async_trait]
pub trait ExchangeTrait: Send + Sync {
    // Exchange specific methods
    fn api_base(&self) -> &str;
    fn client(&self) -> &reqwest::Client;
    fn exchange_name(&self) -> &str;

    // Default implementations
    async fn get<T, Q>(&self, endpoint: &str, query: &Q) -> Result<T, FundingScannerError>
    where
        T: for<'de> serde::Deserialize<'de> + Send,
        Q: Serialize + ?Sized + Sync,
    {
        let url = format!("{}/{}", self.api_base(), endpoint);
        let response = self.client().get(&url).query(query).send().await?;
        self.read_json(response).await
    }

    async fn post<T, B>(&self, endpoint: &str, body: &B) -> Result<T, FundingScannerError>
    where
        T: for<'de> serde::Deserialize<'de> + Send,
        B: Serialize + ?Sized + Sync,
    {
        let url = format!("{}/{}", self.api_base(), endpoint);
        let response = self.client().post(&url).json(body).send().await?;
        self.read_json(response).await
    }

    async fn read_json<T>(&self, response: reqwest::Response) -> Result<T, FundingScannerError>
    where
        T: for<'de> serde::Deserialize<'de> + Send,
    {
        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(FundingScannerError::ApiError(format!(
                "{} API error: {} - {}",
                self.exchange_name(),
                status,
                error_text
            )));
        }

        // Decode via bytes so malformed bodies surface as ParseError rather than HttpError
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    // Trait methods
    async fn health_check(&self) -> Result<(), FundingScannerError>;
}

/// Funding data source for one perpetual-futures venue.
///
/// Implementations are stateless apart from their HTTP client, so one instance can serve
/// many concurrent calls.
#[async_trait]
pub trait PerpTrait: Send + Sync {
    fn exchange(&self) -> PerpExchange;

    /// Mark price and current (unsettled) funding rate only.
    async fn get_snapshot(&self, symbol: &str) -> Result<FundingSnapshot, FundingScannerError>;

    /// Snapshot plus volume, open interest and trailing window averages.
    async fn get_metrics(&self, symbol: &str) -> Result<SymbolMetrics, FundingScannerError>;

    /// Snapshots of every listed market from one upstream call, keyed by normalized symbol.
    ///
    /// `Ok(None)` means the venue has no bulk endpoint and callers go through
    /// [PerpTrait::get_snapshot] per symbol.
    async fn get_all_snapshots(
        &self,
    ) -> Result<Option<HashMap<String, FundingSnapshot>>, FundingScannerError> {
        Ok(None)
    }
}

// EXCHANGE MACRO EXPORTS
#[macro_export]
macro_rules! create_exchange {
    (
        $struct_name:ident, $default_api_base:expr
    ) => {
        $crate::create_exchange!(
            $struct_name,
            $default_api_base,
            reqwest::header::HeaderMap::new()
        );
    };
    (
        $struct_name:ident, $default_api_base:expr, $default_headers:expr
    ) => {
        pub struct $struct_name {
            client: reqwest::Client,
            api_base: String,
        }

        impl $struct_name {
            pub fn new() -> Self {
                Self::from_parts(
                    $default_api_base,
                    $crate::common::create_http_client_with(
                        $crate::common::DEFAULT_TIMEOUT,
                        $default_headers,
                    ),
                )
            }

            /// Point at a different API base (testnet, proxy) with a caller-built client.
            pub fn from_parts(api_base: impl Into<String>, client: reqwest::Client) -> Self {
                Self {
                    client,
                    api_base: api_base.into().trim_end_matches('/').to_string(),
                }
            }
        }

        impl Default for $struct_name {
            fn default() -> Self {
                Self::new()
            }
        }
    };
}
