use common::{Candle, Direction, PatternCategory, PatternMatch};

use crate::extrema::{find_local_extrema, peaks, troughs, Extremum};

/// Shoulders must match within this fraction of each other.
const SHOULDER_SYMMETRY_TOL: f64 = 0.05;
/// Head must clear the shoulder average by this fraction.
const HEAD_PROMINENCE_MIN: f64 = 0.03;
/// Rightmost extremum must fall within this many bars of the window end.
const RECENCY_BARS: usize = 10;

const EXTREMA_ORDER: usize = 2;

/// Head & shoulders: three peaks with a dominant middle, matching shoulders,
/// and a neckline drawn through the connecting troughs. Bearish reversal,
/// confirmed when the latest close breaks the neckline.
pub fn detect_head_and_shoulders(candles: &[Candle]) -> Option<PatternMatch> {
    let extrema = find_local_extrema(candles, EXTREMA_ORDER);
    let peaks = peaks(&extrema);
    let troughs = troughs(&extrema);
    detect(candles, &peaks, &troughs, Direction::Bearish)
}

/// Inverse head & shoulders on troughs — the bullish mirror.
pub fn detect_inverse_head_and_shoulders(candles: &[Candle]) -> Option<PatternMatch> {
    let extrema = find_local_extrema(candles, EXTREMA_ORDER);
    let peaks = peaks(&extrema);
    let troughs = troughs(&extrema);
    detect(candles, &troughs, &peaks, Direction::Bullish)
}

fn detect(
    candles: &[Candle],
    primary: &[Extremum],
    connecting: &[Extremum],
    direction: Direction,
) -> Option<PatternMatch> {
    if primary.len() < 3 {
        return None;
    }
    let n = candles.len();
    let [left, head, right] = [
        primary[primary.len() - 3],
        primary[primary.len() - 2],
        primary[primary.len() - 1],
    ];

    // Stale structures don't count
    if n - 1 - right.index > RECENCY_BARS {
        return None;
    }

    // For a top the head towers over both shoulders; inverted for a bottom
    let head_dominates = match direction {
        Direction::Bearish => head.price > left.price && head.price > right.price,
        _ => head.price < left.price && head.price < right.price,
    };
    if !head_dominates {
        return None;
    }

    let shoulder_avg = (left.price + right.price) / 2.0;
    if shoulder_avg <= 0.0 {
        return None;
    }
    let symmetry = (left.price - right.price).abs() / shoulder_avg;
    if symmetry > SHOULDER_SYMMETRY_TOL {
        return None;
    }

    let prominence = (head.price - shoulder_avg).abs() / shoulder_avg;
    if prominence < HEAD_PROMINENCE_MIN {
        return None;
    }

    // Neckline = midpoint of the connecting extremes between the shoulders
    let between: Vec<&Extremum> = connecting
        .iter()
        .filter(|e| e.index > left.index && e.index < right.index)
        .collect();
    if between.is_empty() {
        return None;
    }
    let neckline =
        between.iter().map(|e| e.price).sum::<f64>() / between.len() as f64;

    let last_close = candles[n - 1].close;
    let height = (head.price - neckline).abs();
    let (broke_out, price_target, stop_loss) = match direction {
        Direction::Bearish => (
            last_close < neckline,
            neckline - height,
            right.price,
        ),
        _ => (last_close > neckline, neckline + height, right.price),
    };

    // Tighter symmetry reads as a cleaner structure
    let mut confidence = 60.0 + (SHOULDER_SYMMETRY_TOL - symmetry) / SHOULDER_SYMMETRY_TOL * 10.0;
    if broke_out {
        confidence += 15.0;
    }

    let name = match direction {
        Direction::Bearish => "head_and_shoulders",
        _ => "inverse_head_and_shoulders",
    };

    Some(PatternMatch {
        name: name.to_string(),
        category: PatternCategory::Reversal,
        direction,
        confidence: confidence.min(90.0),
        price_target: Some(price_target),
        stop_loss: Some(stop_loss),
    })
}
