use common::Candle;
use serde::{Deserialize, Serialize};

pub const RSI_PERIOD: usize = 14;

/// Short-horizon drift of the RSI itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RsiTrend {
    Rising,
    Falling,
    Flat,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RsiReading {
    /// 0–100.
    pub value: f64,
    pub trend: RsiTrend,
}

impl RsiReading {
    fn neutral() -> Self {
        Self {
            value: 50.0,
            trend: RsiTrend::Flat,
        }
    }
}

/// RSI with Wilder's smoothed moving average (same as TradingView / standard RSI).
///
/// Returns the neutral reading (50, flat) below `period + 1` candles.
/// `avg_loss == 0` maps to 100 by convention.
pub fn rsi(candles: &[Candle], period: usize) -> RsiReading {
    if candles.len() < period + 1 || period < 2 {
        return RsiReading::neutral();
    }

    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
    let series = rsi_series(&closes, period);

    let value = match series.last() {
        Some(&v) => v,
        None => return RsiReading::neutral(),
    };

    // Trend from the slope of the trailing 5 RSI values
    let tail_len = series.len().min(5);
    let tail = &series[series.len() - tail_len..];
    let s = crate::slope(tail);
    let trend = if s > 0.5 {
        RsiTrend::Rising
    } else if s < -0.5 {
        RsiTrend::Falling
    } else {
        RsiTrend::Flat
    };

    RsiReading { value, trend }
}

/// Full Wilder RSI series; one value per close starting at index `period`.
fn rsi_series(closes: &[f64], period: usize) -> Vec<f64> {
    let changes: Vec<f64> = closes.windows(2).map(|w| w[1] - w[0]).collect();
    if changes.len() < period {
        return Vec::new();
    }

    let initial = &changes[..period];
    let mut avg_gain = initial.iter().filter(|&&c| c > 0.0).sum::<f64>() / period as f64;
    let mut avg_loss =
        initial.iter().filter(|&&c| c < 0.0).map(|c| c.abs()).sum::<f64>() / period as f64;

    let mut out = Vec::with_capacity(changes.len() - period + 1);
    out.push(rsi_value(avg_gain, avg_loss));

    for &change in &changes[period..] {
        let gain = if change > 0.0 { change } else { 0.0 };
        let loss = if change < 0.0 { change.abs() } else { 0.0 };
        avg_gain = (avg_gain * (period - 1) as f64 + gain) / period as f64;
        avg_loss = (avg_loss * (period - 1) as f64 + loss) / period as f64;
        out.push(rsi_value(avg_gain, avg_loss));
    }
    out
}

fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    100.0 - 100.0 / (1.0 + rs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::candles_from_closes;
    use proptest::prelude::*;

    #[test]
    fn neutral_default_below_minimum() {
        let candles = candles_from_closes(&[100.0; 14]);
        let reading = rsi(&candles, RSI_PERIOD);
        assert_eq!(reading.value, 50.0);
        assert_eq!(reading.trend, RsiTrend::Flat);
    }

    #[test]
    fn all_gains_returns_100_and_rising_or_flat() {
        let closes: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        let reading = rsi(&candles_from_closes(&closes), RSI_PERIOD);
        assert!((reading.value - 100.0).abs() < 1e-9);
        // RSI pinned at 100 has zero slope
        assert_eq!(reading.trend, RsiTrend::Flat);
    }

    #[test]
    fn all_losses_near_zero_and_falling_or_flat() {
        let closes: Vec<f64> = (0..30).map(|i| 200.0 - i as f64).collect();
        let reading = rsi(&candles_from_closes(&closes), RSI_PERIOD);
        assert!(reading.value < 1.0, "got {}", reading.value);
        assert_ne!(reading.trend, RsiTrend::Rising);
    }

    #[test]
    fn recovery_turns_trend_rising() {
        let mut closes: Vec<f64> = (0..25).map(|i| 200.0 - i as f64 * 2.0).collect();
        closes.extend((0..10).map(|i| 150.0 + i as f64 * 3.0));
        let reading = rsi(&candles_from_closes(&closes), RSI_PERIOD);
        assert_eq!(reading.trend, RsiTrend::Rising);
    }

    proptest! {
        /// RSI stays within [0, 100] for any finite series.
        #[test]
        fn rsi_bounded(closes in proptest::collection::vec(0.01f64..10_000.0, 0..120)) {
            let reading = rsi(&candles_from_closes(&closes), RSI_PERIOD);
            prop_assert!((0.0..=100.0).contains(&reading.value));
        }
    }
}
