#[derive(thiserror::Error, Debug)]
pub enum FundingScannerError {
    #[error("Health check failed")]
    HealthCheckFailed,

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Parse error: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Invalid number: {0}")]
    InvalidNumber(String),

    #[error("Symbol not found: {0}")]
    NotFound(String),

    #[error("Invalid symbol: {0}")]
    InvalidSymbol(String),

    #[error("Config error: {0}")]
    Config(String),
}

