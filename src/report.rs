//! Plain-text rendering of scan results.
//!
//! Funding rates are hourly; [apy] extrapolates them linearly to a year
//! (`rate * 24 * 365`, no compounding).

use crate::common::{FundingWindow, SymbolMetrics};
use crate::scanner::SpreadResult;

pub const HOURS_PER_YEAR: f64 = 24.0 * 365.0;
pub const NO_OPPORTUNITIES: &str = "No valid arbitrage opportunities found.";
pub const NO_METRICS: &str = "No metrics retrieved.";

/// Simple annualized yield of an hourly rate, as a fraction (0.876 = 87.6%).
pub fn apy(hourly_rate: f64) -> f64 {
    hourly_rate * HOURS_PER_YEAR
}

fn fmt_rate(rate: Option<f64>) -> String {
    match rate {
        Some(r) => format!("{:.6}", r),
        None => "n/a".to_string(),
    }
}

fn fmt_usd(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.2}", v),
        None => "n/a".to_string(),
    }
}

fn fmt_pct(fraction: f64) -> String {
    format!("{:.2}%", fraction * 100.0)
}

pub fn format_spread(result: &SpreadResult) -> String {
    [
        format!(
            "Best arbitrage on {}: {}",
            result.symbol,
            result.direction().label()
        ),
        format!("  HL snapshot funding:   {:.6}", result.hl_rate),
        format!("  Vest snapshot funding: {:.6}", result.vest_rate),
        format!("  Funding spread:        {:.6}", result.diff),
        format!("  Spread APY:            {}", fmt_pct(apy(result.abs_diff()))),
    ]
    .join("\n")
}

/// Top `limit` spreads as a fixed-width table. Empty input yields an empty string.
pub fn format_ranking(ranked: &[SpreadResult], limit: usize) -> String {
    if ranked.is_empty() || limit == 0 {
        return String::new();
    }

    let header = format!(
        "{:<4} {:<10} {:>12} {:>12} {:>12} {:>10}  {}",
        "#", "Symbol", "HL", "Vest", "Spread", "APY", "Direction"
    );
    let rows = ranked.iter().take(limit).enumerate().map(|(i, result)| {
        format!(
            "{:<4} {:<10} {:>12.6} {:>12.6} {:>12.6} {:>10}  {}",
            i + 1,
            result.symbol,
            result.hl_rate,
            result.vest_rate,
            result.diff,
            fmt_pct(apy(result.abs_diff())),
            result.direction().label()
        )
    });

    std::iter::once(header)
        .chain(rows)
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_metrics(metrics: &SymbolMetrics) -> String {
    let mut lines = vec![
        format!("  symbol: {}", metrics.symbol),
        format!("  exchange: {}", metrics.exchange),
        format!("  mark_price: {}", metrics.mark_price),
        format!(
            "  funding_rate_snapshot: {:.6} (APY {})",
            metrics.funding_rate_snapshot,
            fmt_pct(apy(metrics.funding_rate_snapshot))
        ),
    ];
    lines.extend(FundingWindow::ALL.iter().map(|window| {
        format!(
            "  funding_rate_{}: {}",
            window.label(),
            fmt_rate(metrics.funding_average(*window))
        )
    }));
    lines.push(format!(
        "  open_interest_usd: {}",
        fmt_usd(metrics.open_interest_usd)
    ));
    lines.push(format!("  vol_base_24h: {}", metrics.vol_base_24h));
    lines.push(format!("  vol_quote_24h: {}", fmt_usd(metrics.vol_quote_24h)));
    lines.join("\n")
}

/// Report for the spread scan: best entry plus an optional ranking table.
pub fn spread_report(ranked: &[SpreadResult], top_n: usize) -> String {
    let Some(best) = ranked.first() else {
        return NO_OPPORTUNITIES.to_string();
    };

    let mut out = format_spread(best);
    if top_n > 1 && ranked.len() > 1 {
        out.push_str("\n\nTop spreads:\n");
        out.push_str(&format_ranking(ranked, top_n));
    }
    out
}

/// Report for the single-venue scan.
pub fn most_negative_report(metrics: Option<&SymbolMetrics>) -> String {
    match metrics {
        Some(m) => format!(
            "Pair with most negative current funding rate:\n{}",
            format_metrics(m)
        ),
        None => NO_METRICS.to_string(),
    }
}
