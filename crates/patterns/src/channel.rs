use common::{Candle, ChannelKind, ChannelModel, Direction};

use crate::regression::{fit_highs, fit_lows};

const MIN_BARS: usize = 20;
/// Upper/lower slopes must stay within this ratio band to count as parallel.
const PARALLEL_RATIO: (f64, f64) = (0.5, 2.0);
/// Normalized slope below which the channel reads horizontal.
const HORIZONTAL_SLOPE: f64 = 0.10;
/// Bars within this fraction of their line count toward channel strength.
const TOUCH_TOL: f64 = 0.02;
/// Close must clear the projected line by this fraction to break out.
const BREAKOUT_TOL: f64 = 0.01;

/// Parallel regression channel over the window's highs and lows.
///
/// Returns `None` when the window is short, the fit lines diverge from
/// parallel, or prices are degenerate.
pub fn detect_channel(candles: &[Candle]) -> Option<ChannelModel> {
    let n = candles.len();
    if n < MIN_BARS {
        return None;
    }

    let upper = fit_highs(candles);
    let lower = fit_lows(candles);

    let mean_price = candles.iter().map(|c| c.close).sum::<f64>() / n as f64;
    if mean_price <= 0.0 {
        return None;
    }

    // Normalized slope = relative price change across the whole window
    let norm_upper = upper.slope * (n - 1) as f64 / mean_price;
    let norm_lower = lower.slope * (n - 1) as f64 / mean_price;

    let both_flat = norm_upper.abs() < HORIZONTAL_SLOPE && norm_lower.abs() < HORIZONTAL_SLOPE;
    if !both_flat {
        // Sloped lines must run parallel: same sign, bounded ratio
        if upper.slope * lower.slope <= 0.0 {
            return None;
        }
        let ratio = upper.slope / lower.slope;
        if ratio <= PARALLEL_RATIO.0 || ratio >= PARALLEL_RATIO.1 {
            return None;
        }
    }

    let kind = if both_flat {
        ChannelKind::Horizontal
    } else if (norm_upper + norm_lower) / 2.0 > 0.0 {
        ChannelKind::Ascending
    } else {
        ChannelKind::Descending
    };

    // Strength = fraction of bars hugging either boundary
    let touches = candles
        .iter()
        .enumerate()
        .filter(|(i, c)| {
            let x = *i as f64;
            let u = upper.value_at(x);
            let l = lower.value_at(x);
            (u > 0.0 && (c.high - u).abs() / u < TOUCH_TOL)
                || (l > 0.0 && (c.low - l).abs() / l < TOUCH_TOL)
        })
        .count();
    let strength = touches as f64 / n as f64;

    let last_close = candles[n - 1].close;
    let x_last = (n - 1) as f64;
    let breakout = if last_close > upper.value_at(x_last) * (1.0 + BREAKOUT_TOL) {
        Some(Direction::Bullish)
    } else if last_close < lower.value_at(x_last) * (1.0 - BREAKOUT_TOL) {
        Some(Direction::Bearish)
    } else {
        None
    };

    Some(ChannelModel {
        kind,
        upper,
        lower,
        strength,
        breakout,
    })
}
