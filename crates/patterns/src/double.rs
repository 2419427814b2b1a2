use common::{Candle, Direction, PatternCategory, PatternMatch};

use crate::extrema::{find_local_extrema, peaks, troughs, Extremum};

/// The two tops/bottoms must match within this fraction.
const LEVEL_MATCH_TOL: f64 = 0.03;
/// The intervening extremum must sit at least this far beyond the levels.
const PULLBACK_MIN: f64 = 0.05;
/// Latest extremum must fall within this many bars of the window end.
const RECENCY_BARS: usize = 8;

const EXTREMA_ORDER: usize = 2;

/// Double top: two matching peaks separated by a pullback of at least 5%.
/// Bearish reversal; a close under the pullback low confirms it.
pub fn detect_double_top(candles: &[Candle]) -> Option<PatternMatch> {
    let extrema = find_local_extrema(candles, EXTREMA_ORDER);
    detect(
        candles,
        &peaks(&extrema),
        &troughs(&extrema),
        Direction::Bearish,
    )
}

/// Double bottom — the bullish mirror over troughs.
pub fn detect_double_bottom(candles: &[Candle]) -> Option<PatternMatch> {
    let extrema = find_local_extrema(candles, EXTREMA_ORDER);
    detect(
        candles,
        &troughs(&extrema),
        &peaks(&extrema),
        Direction::Bullish,
    )
}

fn detect(
    candles: &[Candle],
    levels: &[Extremum],
    opposite: &[Extremum],
    direction: Direction,
) -> Option<PatternMatch> {
    if levels.len() < 2 {
        return None;
    }
    let n = candles.len();
    let first = levels[levels.len() - 2];
    let second = levels[levels.len() - 1];

    if n - 1 - second.index > RECENCY_BARS {
        return None;
    }

    let reference = first.price.max(second.price);
    if reference <= 0.0 {
        return None;
    }
    if (first.price - second.price).abs() / reference > LEVEL_MATCH_TOL {
        return None;
    }

    // The pullback between the two levels must be deep (top) or high (bottom)
    let between = opposite
        .iter()
        .find(|e| e.index > first.index && e.index < second.index)?;
    let level_avg = (first.price + second.price) / 2.0;
    let pullback_depth = match direction {
        Direction::Bearish => (level_avg - between.price) / level_avg,
        _ => (between.price - level_avg) / level_avg,
    };
    if pullback_depth < PULLBACK_MIN {
        return None;
    }

    let last_close = candles[n - 1].close;
    let height = (level_avg - between.price).abs();
    let (confirmed, price_target, stop_loss) = match direction {
        Direction::Bearish => (
            last_close < between.price,
            between.price - height,
            reference,
        ),
        _ => (
            last_close > between.price,
            between.price + height,
            first.price.min(second.price),
        ),
    };

    let mut confidence = 65.0;
    if confirmed {
        confidence += 10.0;
    }

    let name = match direction {
        Direction::Bearish => "double_top",
        _ => "double_bottom",
    };

    Some(PatternMatch {
        name: name.to_string(),
        category: PatternCategory::Reversal,
        direction,
        confidence,
        price_target: Some(price_target),
        stop_loss: Some(stop_loss),
    })
}
