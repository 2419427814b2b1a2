use common::{Candle, Direction};
use serde::{Deserialize, Serialize};

use crate::ema;

pub const MACD_FAST: usize = 12;
pub const MACD_SLOW: usize = 26;
pub const MACD_SIGNAL: usize = 9;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MacdReading {
    pub macd_line: f64,
    pub signal_line: f64,
    pub histogram: f64,
    /// Set when the MACD line crossed the signal line on the latest bar.
    pub crossover: Option<Direction>,
}

impl MacdReading {
    fn neutral() -> Self {
        Self {
            macd_line: 0.0,
            signal_line: 0.0,
            histogram: 0.0,
            crossover: None,
        }
    }
}

/// MACD line = EMA(12) − EMA(26); signal = EMA(9) of the MACD history.
/// Crossover from the sign change of (MACD − signal) across the last two bars.
/// Below `slow + signal` candles the neutral reading is returned.
pub fn macd(candles: &[Candle]) -> MacdReading {
    macd_with(candles, MACD_FAST, MACD_SLOW, MACD_SIGNAL)
}

pub fn macd_with(candles: &[Candle], fast: usize, slow: usize, signal: usize) -> MacdReading {
    if candles.len() < slow + signal || fast >= slow {
        return MacdReading::neutral();
    }
    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();

    // MACD line for the trailing bars that can seed the signal EMA plus one
    // extra bar for crossover detection
    let macd_series_len = signal + 1;
    let start = closes.len().saturating_sub(slow + macd_series_len - 1);
    let window = &closes[start..];

    let macd_line: Vec<f64> = (slow - 1..window.len())
        .map(|i| {
            let slice = &window[..=i];
            ema(slice, fast) - ema(slice, slow)
        })
        .collect();

    if macd_line.len() < signal + 1 {
        return MacdReading::neutral();
    }

    let signal_line: Vec<f64> = (signal - 1..macd_line.len())
        .map(|i| ema(&macd_line[..=i], signal))
        .collect();

    if signal_line.len() < 2 {
        return MacdReading::neutral();
    }

    let curr_macd = macd_line[macd_line.len() - 1];
    let prev_macd = macd_line[macd_line.len() - 2];
    let curr_sig = signal_line[signal_line.len() - 1];
    let prev_sig = signal_line[signal_line.len() - 2];

    let crossover = if prev_macd <= prev_sig && curr_macd > curr_sig {
        Some(Direction::Bullish)
    } else if prev_macd >= prev_sig && curr_macd < curr_sig {
        Some(Direction::Bearish)
    } else {
        None
    };

    MacdReading {
        macd_line: curr_macd,
        signal_line: curr_sig,
        histogram: curr_macd - curr_sig,
        crossover,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::candles_from_closes;

    #[test]
    fn neutral_with_insufficient_data() {
        let candles = candles_from_closes(&[100.0; 30]); // need >= 35
        let reading = macd(&candles);
        assert_eq!(reading.histogram, 0.0);
        assert!(reading.crossover.is_none());
    }

    #[test]
    fn uptrend_keeps_macd_above_signal() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
        let reading = macd(&candles_from_closes(&closes));
        assert!(reading.macd_line > 0.0);
        assert!(reading.histogram >= 0.0);
    }

    #[test]
    fn bullish_crossover_after_reversal() {
        let mut closes: Vec<f64> = (0..20).map(|i| 100.0 - i as f64 * 0.5).collect();
        closes.extend((0..20).map(|i| 90.0 + i as f64 * 2.0));

        let mut seen_bullish = false;
        for n in 10..=closes.len() {
            let reading = macd_with(&candles_from_closes(&closes[..n]), 3, 6, 3);
            if reading.crossover == Some(Direction::Bullish) {
                seen_bullish = true;
            }
        }
        assert!(seen_bullish, "expected a bullish crossover during the rally");
    }
}
