use crate::common::exchange::PerpExchange;
use serde::{Deserialize, Serialize};

const HOUR_MS: u64 = 60 * 60 * 1000;

/// Trailing lookback windows for funding averages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FundingWindow {
    OneHour,
    OneDay,
    SevenDays,
    ThirtyDays,
}

impl FundingWindow {
    pub const ALL: [FundingWindow; 4] = [
        FundingWindow::OneHour,
        FundingWindow::OneDay,
        FundingWindow::SevenDays,
        FundingWindow::ThirtyDays,
    ];

    pub fn duration_ms(&self) -> u64 {
        match self {
            FundingWindow::OneHour => HOUR_MS,
            FundingWindow::OneDay => 24 * HOUR_MS,
            FundingWindow::SevenDays => 7 * 24 * HOUR_MS,
            FundingWindow::ThirtyDays => 30 * 24 * HOUR_MS,
        }
    }

    /// The widest window; history is fetched once over this span.
    pub fn longest() -> FundingWindow {
        FundingWindow::ThirtyDays
    }

    pub fn label(&self) -> &'static str {
        match self {
            FundingWindow::OneHour => "1h",
            FundingWindow::OneDay => "24h",
            FundingWindow::SevenDays => "7d",
            FundingWindow::ThirtyDays => "30d",
        }
    }
}

/// One funding history entry. `rate` is `None` when the upstream value was missing or unparsable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FundingSample {
    pub time: u64,
    pub rate: Option<f64>,
}

/// Arithmetic mean of the usable rates with `time >= now_ms - window`.
/// Returns `None` when no sample qualifies.
pub fn window_average(
    samples: &[FundingSample],
    now_ms: u64,
    window: FundingWindow,
) -> Option<f64> {
    let cutoff = now_ms.saturating_sub(window.duration_ms());
    let (sum, count) = samples
        .iter()
        .filter(|s| s.time >= cutoff)
        .filter_map(|s| s.rate)
        .fold((0.0_f64, 0usize), |(sum, count), rate| (sum + rate, count + 1));

    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/// Averages for every [FundingWindow], each computed independently from the same samples.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FundingAverages {
    pub one_hour: Option<f64>,
    pub one_day: Option<f64>,
    pub seven_days: Option<f64>,
    pub thirty_days: Option<f64>,
}

impl FundingAverages {
    pub fn from_samples(samples: &[FundingSample], now_ms: u64) -> Self {
        Self {
            one_hour: window_average(samples, now_ms, FundingWindow::OneHour),
            one_day: window_average(samples, now_ms, FundingWindow::OneDay),
            seven_days: window_average(samples, now_ms, FundingWindow::SevenDays),
            thirty_days: window_average(samples, now_ms, FundingWindow::ThirtyDays),
        }
    }

    pub fn get(&self, window: FundingWindow) -> Option<f64> {
        match window {
            FundingWindow::OneHour => self.one_hour,
            FundingWindow::OneDay => self.one_day,
            FundingWindow::SevenDays => self.seven_days,
            FundingWindow::ThirtyDays => self.thirty_days,
        }
    }
}

/// Current quote for a perp: enough to rank spreads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FundingSnapshot {
    pub symbol: String,
    pub exchange: PerpExchange,
    pub mark_price: f64,
    /// Hourly funding rate currently quoted (not yet settled).
    pub funding_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymbolMetrics {
    pub symbol: String,
    pub exchange: PerpExchange,
    /// USD
    pub mark_price: f64,
    pub funding_rate_snapshot: f64,
    pub funding_rate_1h: Option<f64>,
    pub funding_rate_24h: Option<f64>,
    pub funding_rate_7d: Option<f64>,
    pub funding_rate_30d: Option<f64>,
    /// Open interest in USD, when the venue exposes it.
    pub open_interest_usd: Option<f64>,
    /// 24h volume in base asset units.
    pub vol_base_24h: f64,
    /// 24h volume in quote (USD) units, when the venue exposes it.
    pub vol_quote_24h: Option<f64>,
    pub timestamp: u64,
}

impl SymbolMetrics {
    pub fn funding_average(&self, window: FundingWindow) -> Option<f64> {
        match window {
            FundingWindow::OneHour => self.funding_rate_1h,
            FundingWindow::OneDay => self.funding_rate_24h,
            FundingWindow::SevenDays => self.funding_rate_7d,
            FundingWindow::ThirtyDays => self.funding_rate_30d,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: u64 = 1_700_000_000_000;
    const MINUTE: u64 = 60 * 1000;

    fn sample(ago_ms: u64, rate: Option<f64>) -> FundingSample {
        FundingSample {
            time: NOW - ago_ms,
            rate,
        }
    }

    #[test]
    fn one_hour_window_only_counts_recent_entries() {
        let history = vec![sample(30 * MINUTE, Some(0.0001)), sample(2 * HOUR_MS, Some(0.0003))];

        assert_eq!(
            window_average(&history, NOW, FundingWindow::OneHour),
            Some(0.0001)
        );
        let day = window_average(&history, NOW, FundingWindow::OneDay).unwrap();
        assert!((day - 0.0002).abs() < 1e-12);
    }

    #[test]
    fn empty_window_is_none_not_zero() {
        assert_eq!(window_average(&[], NOW, FundingWindow::ThirtyDays), None);

        let stale = vec![sample(40 * 24 * HOUR_MS, Some(0.01))];
        assert_eq!(window_average(&stale, NOW, FundingWindow::ThirtyDays), None);
    }

    #[test]
    fn unparsable_samples_are_skipped() {
        let history = vec![
            sample(10 * MINUTE, None),
            sample(20 * MINUTE, Some(0.0004)),
            sample(40 * MINUTE, None),
        ];
        assert_eq!(
            window_average(&history, NOW, FundingWindow::OneHour),
            Some(0.0004)
        );

        let only_bad = vec![sample(10 * MINUTE, None)];
        assert_eq!(window_average(&only_bad, NOW, FundingWindow::OneHour), None);
    }

    #[test]
    fn boundary_entry_is_inclusive() {
        let history = vec![sample(HOUR_MS, Some(0.0002))];
        assert_eq!(
            window_average(&history, NOW, FundingWindow::OneHour),
            Some(0.0002)
        );
    }

    #[test]
    fn windows_are_independent() {
        let history: Vec<FundingSample> = (0..(30 * 24))
            .map(|h| sample(h * HOUR_MS + MINUTE, Some(if h < 24 { 0.001 } else { 0.0 })))
            .collect();

        let averages = FundingAverages::from_samples(&history, NOW);
        assert_eq!(averages.one_hour, Some(0.001));
        assert!((averages.one_day.unwrap() - 0.001).abs() < 1e-12);
        let week = averages.seven_days.unwrap();
        assert!((week - 0.001 * 24.0 / 168.0).abs() < 1e-12);
        let month = averages.get(FundingWindow::ThirtyDays).unwrap();
        assert!((month - 0.001 * 24.0 / 720.0).abs() < 1e-12);
    }
}
