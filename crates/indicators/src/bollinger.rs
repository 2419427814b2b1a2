use common::Candle;
use serde::{Deserialize, Serialize};

pub const BOLLINGER_PERIOD: usize = 20;
pub const BOLLINGER_STDDEV: f64 = 2.0;
/// Bandwidth% below which the bands count as squeezed.
pub const SQUEEZE_BANDWIDTH_PCT: f64 = 4.0;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BollingerBands {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
    /// (upper − lower) / middle × 100.
    pub bandwidth_pct: f64,
    pub squeeze: bool,
}

/// 20-bar mean ± 2σ. Below 20 candles all bands collapse onto the latest
/// close (zero bandwidth). The squeeze flag is always `bandwidth_pct < 4`.
pub fn bollinger(candles: &[Candle]) -> BollingerBands {
    let last_close = candles.last().map(|c| c.close).unwrap_or(0.0);
    if candles.len() < BOLLINGER_PERIOD {
        return BollingerBands {
            upper: last_close,
            middle: last_close,
            lower: last_close,
            bandwidth_pct: 0.0,
            squeeze: true,
        };
    }

    let window = &candles[candles.len() - BOLLINGER_PERIOD..];
    let mean = window.iter().map(|c| c.close).sum::<f64>() / BOLLINGER_PERIOD as f64;
    let variance = window
        .iter()
        .map(|c| (c.close - mean).powi(2))
        .sum::<f64>()
        / BOLLINGER_PERIOD as f64;
    let sigma = variance.sqrt();

    let upper = mean + BOLLINGER_STDDEV * sigma;
    let lower = mean - BOLLINGER_STDDEV * sigma;
    let bandwidth_pct = if mean.abs() > f64::EPSILON {
        (upper - lower) / mean * 100.0
    } else {
        0.0
    };

    BollingerBands {
        upper,
        middle: mean,
        lower,
        bandwidth_pct,
        squeeze: bandwidth_pct < SQUEEZE_BANDWIDTH_PCT,
    }
}
