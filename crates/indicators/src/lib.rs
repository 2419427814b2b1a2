//! Pure indicator math over an OHLCV candle window.
//!
//! Every function takes an oldest-first `&[Candle]` slice and returns a
//! neutral default when the window is too short — insufficient data is not
//! an error anywhere in this crate.

pub mod atr;
pub mod bollinger;
pub mod macd;
pub mod moving_averages;
pub mod obv;
pub mod order_flow;
pub mod rsi;
pub mod summary;
pub mod vwap;

pub use atr::{atr, AtrReading};
pub use bollinger::{bollinger, BollingerBands};
pub use macd::{macd, MacdReading};
pub use moving_averages::{moving_averages, MaCross, MovingAverages};
pub use obv::{obv, ObvReading};
pub use order_flow::{order_flow, OrderFlowStats};
pub use rsi::{rsi, RsiReading, RsiTrend};
pub use summary::IndicatorSummary;
pub use vwap::{vwap, VwapReading, VwapZone};

/// Simple moving average of the last `period` values. `None` when short.
pub(crate) fn sma(values: &[f64], period: usize) -> Option<f64> {
    if values.len() < period || period == 0 {
        return None;
    }
    Some(values[values.len() - period..].iter().sum::<f64>() / period as f64)
}

/// Exponential moving average of the last `period` values, seeded with an SMA.
pub(crate) fn ema(values: &[f64], period: usize) -> f64 {
    if values.is_empty() || period == 0 {
        return 0.0;
    }
    let k = 2.0 / (period as f64 + 1.0);
    let start = values.len().saturating_sub(period * 3); // enough history
    let slice = &values[start..];

    let seed_len = period.min(slice.len());
    let mut ema_val: f64 = slice[..seed_len].iter().sum::<f64>() / seed_len as f64;

    for &v in &slice[seed_len..] {
        ema_val = v * k + ema_val * (1.0 - k);
    }
    ema_val
}

/// OLS slope of y over x = 0..n.
pub(crate) fn slope(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }
    let n_f = n as f64;
    let x_mean = (n_f - 1.0) / 2.0;
    let y_mean = values.iter().sum::<f64>() / n_f;
    let mut num = 0.0;
    let mut den = 0.0;
    for (i, &y) in values.iter().enumerate() {
        let dx = i as f64 - x_mean;
        num += dx * (y - y_mean);
        den += dx * dx;
    }
    if den == 0.0 {
        0.0
    } else {
        num / den
    }
}

#[cfg(test)]
pub(crate) mod test_util {
    use chrono::{Duration, TimeZone, Utc};
    use common::Candle;

    /// Build a candle series from close prices with a small synthetic range.
    pub fn candles_from_closes(closes: &[f64]) -> Vec<Candle> {
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| {
                let open = if i == 0 { close } else { closes[i - 1] };
                Candle {
                    time: t0 + Duration::minutes(i as i64),
                    open,
                    high: open.max(close) * 1.005,
                    low: open.min(close) * 0.995,
                    close,
                    volume: 100.0,
                }
            })
            .collect()
    }
}
