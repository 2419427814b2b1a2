use common::Candle;
use serde::{Deserialize, Serialize};

pub const ATR_PERIOD: usize = 14;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AtrReading {
    pub value: f64,
    /// ATR / latest close × 100.
    pub volatility_pct: f64,
}

/// 14-bar mean true range. Below `period + 1` candles both fields are zero.
pub fn atr(candles: &[Candle], period: usize) -> AtrReading {
    if candles.len() < period + 1 || period == 0 {
        return AtrReading {
            value: 0.0,
            volatility_pct: 0.0,
        };
    }

    let true_ranges: Vec<f64> = candles
        .windows(2)
        .map(|pair| {
            let prev_close = pair[0].close;
            let c = &pair[1];
            (c.high - c.low)
                .max((c.high - prev_close).abs())
                .max((c.low - prev_close).abs())
        })
        .collect();

    let tail = &true_ranges[true_ranges.len() - period.min(true_ranges.len())..];
    let value = tail.iter().sum::<f64>() / tail.len() as f64;

    let last_close = candles.last().map(|c| c.close).unwrap_or(0.0);
    let volatility_pct = if last_close > 0.0 {
        value / last_close * 100.0
    } else {
        0.0
    };

    AtrReading {
        value,
        volatility_pct,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::candles_from_closes;

    #[test]
    fn zero_below_minimum() {
        let reading = atr(&candles_from_closes(&[100.0; 10]), ATR_PERIOD);
        assert_eq!(reading.value, 0.0);
    }

    #[test]
    fn wilder_swings_raise_volatility() {
        let calm: Vec<f64> = (0..20).map(|i| 100.0 + (i % 2) as f64 * 0.1).collect();
        let wild: Vec<f64> = (0..20)
            .map(|i| if i % 2 == 0 { 80.0 } else { 120.0 })
            .collect();
        let calm_atr = atr(&candles_from_closes(&calm), ATR_PERIOD);
        let wild_atr = atr(&candles_from_closes(&wild), ATR_PERIOD);
        assert!(wild_atr.volatility_pct > calm_atr.volatility_pct);
        assert!(wild_atr.value > 0.0);
    }
}
