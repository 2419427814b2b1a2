use common::{Candle, Direction, PatternCategory, PatternMatch};

/// Body under this fraction of the range reads as a doji.
const DOJI_BODY_MAX: f64 = 0.10;
/// Wick must stretch at least this multiple of the body for hammer shapes.
const WICK_BODY_MIN: f64 = 2.0;
/// Star middle body must stay under this fraction of the first body.
const STAR_BODY_MAX: f64 = 0.30;
/// Proximity band to the recent swing extreme that activates reversal shapes.
const SWING_PROXIMITY: f64 = 0.03;
/// Bars scanned back for the swing extreme context.
const SWING_LOOKBACK: usize = 10;

/// Candlestick shapes on the latest one to three bars, read in the context
/// of the recent swing: hammer-type shapes only fire near the swing low,
/// star-type shapes near the swing high. Reversal shapes in context get a
/// confidence boost.
pub fn detect_candlesticks(candles: &[Candle]) -> Vec<PatternMatch> {
    let n = candles.len();
    if n < 2 {
        return Vec::new();
    }

    let last = &candles[n - 1];
    let prev = &candles[n - 2];

    let lookback = &candles[n.saturating_sub(SWING_LOOKBACK)..];
    let swing_low = lookback.iter().map(|c| c.low).fold(f64::INFINITY, f64::min);
    let swing_high = lookback
        .iter()
        .map(|c| c.high)
        .fold(f64::NEG_INFINITY, f64::max);
    let near_low = swing_low > 0.0 && (last.low - swing_low) / swing_low < SWING_PROXIMITY;
    let near_high = swing_high > 0.0 && (swing_high - last.high) / swing_high < SWING_PROXIMITY;

    let mut out = Vec::new();
    let range = last.range();
    if range <= 0.0 {
        return out;
    }
    let body = last.body();

    if body <= range * DOJI_BODY_MAX {
        out.push(shape("doji", Direction::Neutral, 40.0));
    } else {
        let long_lower = last.lower_wick() >= body * WICK_BODY_MIN && last.upper_wick() <= body;
        let long_upper = last.upper_wick() >= body * WICK_BODY_MIN && last.lower_wick() <= body;

        if long_lower && near_low {
            out.push(shape("hammer", Direction::Bullish, boost(60.0, true)));
        }
        // The same shape is an inverted hammer at the low, a shooting star at the high
        if long_upper && near_low {
            out.push(shape("inverted_hammer", Direction::Bullish, boost(55.0, true)));
        }
        if long_upper && near_high {
            out.push(shape("shooting_star", Direction::Bearish, boost(60.0, true)));
        }
    }

    // Engulfing over the last two bars
    if prev.is_bearish()
        && last.is_bullish()
        && last.close >= prev.open
        && last.open <= prev.close
        && last.body() > prev.body()
    {
        out.push(shape("bullish_engulfing", Direction::Bullish, boost(65.0, near_low)));
    }
    if prev.is_bullish()
        && last.is_bearish()
        && last.close <= prev.open
        && last.open >= prev.close
        && last.body() > prev.body()
    {
        out.push(shape("bearish_engulfing", Direction::Bearish, boost(65.0, near_high)));
    }

    if n >= 3 {
        let first = &candles[n - 3];
        out.extend(star(first, prev, last, near_low, near_high));
        out.extend(three_in_a_row(first, prev, last));
    }

    out
}

fn shape(name: &str, direction: Direction, confidence: f64) -> PatternMatch {
    PatternMatch {
        name: name.to_string(),
        category: PatternCategory::Candlestick,
        direction,
        confidence,
        price_target: None,
        stop_loss: None,
    }
}

fn boost(base: f64, in_context: bool) -> f64 {
    if in_context {
        base + 10.0
    } else {
        base
    }
}

/// Morning star / evening star on three bars: a committed move, a pause,
/// and a reversal closing past the midpoint of the first body.
fn star(
    first: &Candle,
    middle: &Candle,
    last: &Candle,
    near_low: bool,
    near_high: bool,
) -> Option<PatternMatch> {
    let first_body = first.body();
    if first_body <= 0.0 || middle.body() > first_body * STAR_BODY_MAX {
        return None;
    }
    let first_mid = (first.open + first.close) / 2.0;

    if first.is_bearish() && last.is_bullish() && last.close > first_mid {
        return Some(shape("morning_star", Direction::Bullish, boost(70.0, near_low)));
    }
    if first.is_bullish() && last.is_bearish() && last.close < first_mid {
        return Some(shape("evening_star", Direction::Bearish, boost(70.0, near_high)));
    }
    None
}

/// Three white soldiers / three black crows: three committed candles in the
/// same direction with advancing closes and modest counter-wicks.
fn three_in_a_row(a: &Candle, b: &Candle, c: &Candle) -> Option<PatternMatch> {
    let committed =
        |x: &Candle| x.range() > 0.0 && x.body() >= x.range() * 0.5;
    if !(committed(a) && committed(b) && committed(c)) {
        return None;
    }

    if a.is_bullish()
        && b.is_bullish()
        && c.is_bullish()
        && b.close > a.close
        && c.close > b.close
        && b.upper_wick() <= b.body() * 0.5
        && c.upper_wick() <= c.body() * 0.5
    {
        return Some(shape("three_white_soldiers", Direction::Bullish, 72.0));
    }
    if a.is_bearish()
        && b.is_bearish()
        && c.is_bearish()
        && b.close < a.close
        && c.close < b.close
        && b.lower_wick() <= b.body() * 0.5
        && c.lower_wick() <= c.body() * 0.5
    {
        return Some(shape("three_black_crows", Direction::Bearish, 72.0));
    }
    None
}
