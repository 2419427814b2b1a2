use common::{Candle, Direction, PatternCategory, PatternMatch};

use crate::extrema::{find_local_extrema, peaks, troughs};
use crate::regression::linear_regression;

const EXTREMA_ORDER: usize = 2;
/// Swing points regressed on each boundary.
const SWING_POINTS: usize = 4;
/// A boundary counts as flat when its slope is under this fraction of the other's.
const FLAT_RATIO: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TriangleKind {
    Ascending,
    Descending,
    Symmetrical,
}

/// Triangle from regression over the last four swing highs and lows.
///
/// Classified by relative slope magnitude; rejected once the projected apex
/// is already behind the latest bar. Direction follows the type unless a
/// boundary breakout overrides it.
pub fn detect_triangle(candles: &[Candle]) -> Option<PatternMatch> {
    let extrema = find_local_extrema(candles, EXTREMA_ORDER);
    let peaks = peaks(&extrema);
    let troughs = troughs(&extrema);
    if peaks.len() < SWING_POINTS || troughs.len() < SWING_POINTS {
        return None;
    }

    let upper_pts: Vec<(f64, f64)> = peaks[peaks.len() - SWING_POINTS..]
        .iter()
        .map(|e| (e.index as f64, e.price))
        .collect();
    let lower_pts: Vec<(f64, f64)> = troughs[troughs.len() - SWING_POINTS..]
        .iter()
        .map(|e| (e.index as f64, e.price))
        .collect();

    let upper = linear_regression(&upper_pts);
    let lower = linear_regression(&lower_pts);

    let u = upper.slope;
    let l = lower.slope;
    let kind = if l > 0.0 && u.abs() < l.abs() * FLAT_RATIO {
        TriangleKind::Ascending
    } else if u < 0.0 && l.abs() < u.abs() * FLAT_RATIO {
        TriangleKind::Descending
    } else if u < 0.0 && l > 0.0 {
        TriangleKind::Symmetrical
    } else {
        return None;
    };

    // Apex behind the latest bar means the pattern already resolved
    let last_x = (candles.len() - 1) as f64;
    if (u - l).abs() > f64::EPSILON {
        let apex_x = (lower.intercept - upper.intercept) / (u - l);
        if apex_x <= last_x {
            return None;
        }
    }

    let last_close = candles[candles.len() - 1].close;
    let upper_now = upper.value_at(last_x);
    let lower_now = lower.value_at(last_x);

    let breakout = if last_close > upper_now {
        Some(Direction::Bullish)
    } else if last_close < lower_now {
        Some(Direction::Bearish)
    } else {
        None
    };

    let direction = breakout.unwrap_or(match kind {
        TriangleKind::Ascending => Direction::Bullish,
        TriangleKind::Descending => Direction::Bearish,
        TriangleKind::Symmetrical => Direction::Neutral,
    });

    // Pattern height at its first swing point projects the measured move
    let start_x = upper_pts[0].0.min(lower_pts[0].0);
    let height = (upper.value_at(start_x) - lower.value_at(start_x)).abs();
    let price_target = match direction {
        Direction::Bullish => Some(upper_now + height),
        Direction::Bearish => Some(lower_now - height),
        Direction::Neutral => None,
    };

    let confidence = if breakout.is_some() { 70.0 } else { 55.0 };
    let (name, category) = match kind {
        TriangleKind::Ascending => ("ascending_triangle", PatternCategory::Continuation),
        TriangleKind::Descending => ("descending_triangle", PatternCategory::Continuation),
        TriangleKind::Symmetrical => ("symmetrical_triangle", PatternCategory::Bilateral),
    };

    Some(PatternMatch {
        name: name.to_string(),
        category,
        direction,
        confidence,
        price_target,
        stop_loss: match direction {
            Direction::Bullish => Some(lower_now),
            Direction::Bearish => Some(upper_now),
            Direction::Neutral => None,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::candles_from_closes;

    /// Alternating swings between a converging top and bottom boundary.
    /// `cycle` bars between swing points keeps extrema order-2 clean.
    fn converging_series(
        top: impl Fn(usize) -> f64,
        bottom: impl Fn(usize) -> f64,
        swings: usize,
    ) -> Vec<f64> {
        let mut closes = Vec::new();
        for s in 0..swings {
            let (a, b) = (bottom(s), top(s));
            // three bars up to the top, three bars back to the bottom
            closes.push(a + (b - a) / 3.0);
            closes.push(a + (b - a) * 2.0 / 3.0);
            closes.push(b);
            closes.push(b - (b - a) / 3.0);
            closes.push(b - (b - a) * 2.0 / 3.0);
            closes.push(bottom(s + 1));
        }
        closes
    }

    #[test]
    fn ascending_triangle_flat_top_rising_lows() {
        let closes = converging_series(|_| 110.0, |s| 100.0 + s as f64 * 1.5, 6);
        let m = detect_triangle(&candles_from_closes(&closes)).expect("triangle");
        assert_eq!(m.name, "ascending_triangle");
        assert_eq!(m.direction, Direction::Bullish);
    }

    #[test]
    fn descending_triangle_flat_bottom_falling_highs() {
        let closes = converging_series(|s| 110.0 - s as f64 * 1.5, |_| 100.0, 6);
        let m = detect_triangle(&candles_from_closes(&closes)).expect("triangle");
        assert_eq!(m.name, "descending_triangle");
        assert_eq!(m.direction, Direction::Bearish);
    }

    #[test]
    fn symmetrical_triangle_is_neutral_until_breakout() {
        let closes = converging_series(
            |s| 110.0 - s as f64 * 0.8,
            |s| 100.0 + s as f64 * 0.8,
            6,
        );
        let m = detect_triangle(&candles_from_closes(&closes)).expect("triangle");
        assert_eq!(m.name, "symmetrical_triangle");
        assert_eq!(m.direction, Direction::Neutral);
        assert_eq!(m.confidence, 55.0);
    }

    #[test]
    fn breakout_overrides_symmetrical_direction() {
        let mut closes = converging_series(
            |s| 110.0 - s as f64 * 0.8,
            |s| 100.0 + s as f64 * 0.8,
            6,
        );
        closes.push(116.0); // rip through the upper boundary
        let m = detect_triangle(&candles_from_closes(&closes)).expect("triangle");
        assert_eq!(m.direction, Direction::Bullish);
        assert_eq!(m.confidence, 70.0);
    }

    #[test]
    fn diverging_swings_are_not_a_triangle() {
        let closes = converging_series(
            |s| 110.0 + s as f64 * 2.0,
            |s| 100.0 - s as f64 * 2.0,
            6,
        );
        assert!(detect_triangle(&candles_from_closes(&closes)).is_none());
    }
}
