use funding_spread_scanner_rs::report::{most_negative_report, spread_report};
use funding_spread_scanner_rs::{
    FundingScanner, FundingScannerError, Hyperliquid, ScanMode, ScannerConfig, Vest, load_dotenv,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), FundingScannerError> {
    load_dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = ScannerConfig::from_env()?;
    info!(mode = ?config.mode, execution = ?config.execution, "starting funding scan");

    let hyperliquid = Hyperliquid::with_settings(&config.hyperliquid_api_base, config.http_timeout);
    let symbols = hyperliquid.list_symbols().await?;
    info!(count = symbols.len(), "loaded Hyperliquid universe");

    let report = match config.mode {
        ScanMode::MaxAbsSpread => {
            let vest = Vest::with_settings(
                &config.vest_api_base,
                &config.vest_account_group,
                config.http_timeout,
            );
            let ranked =
                FundingScanner::ranked_spreads(&hyperliquid, &vest, &symbols, config.execution)
                    .await;
            spread_report(&ranked, config.report_top_n)
        }
        ScanMode::MostNegativeSnapshot => {
            let worst =
                FundingScanner::scan_most_negative(&hyperliquid, &symbols, config.execution).await;
            most_negative_report(worst.as_ref())
        }
    };

    println!("{}", report);
    Ok(())
}
