use common::{Candle, Direction, PatternCategory, PatternMatch};

use crate::regression::{fit_highs, fit_lows};

const MIN_BARS: usize = 20;
/// End width must shrink under this fraction of the start width.
const CONVERGENCE_MAX: f64 = 0.90;

/// Rising or falling wedge from full-window regression on highs and lows.
///
/// Valid only when both boundary slopes share a sign and the band narrows.
/// The reversal is confirmed only by a counter-trend breakout; an unbroken
/// wedge is reported as forming with lower confidence.
pub fn detect_wedge(candles: &[Candle]) -> Option<PatternMatch> {
    let n = candles.len();
    if n < MIN_BARS {
        return None;
    }

    let upper = fit_highs(candles);
    let lower = fit_lows(candles);

    if upper.slope * lower.slope <= 0.0 {
        return None;
    }

    let last_x = (n - 1) as f64;
    let start_width = upper.value_at(0.0) - lower.value_at(0.0);
    let end_width = upper.value_at(last_x) - lower.value_at(last_x);
    if start_width <= 0.0 || end_width <= 0.0 {
        return None;
    }
    if end_width >= start_width * CONVERGENCE_MAX {
        return None;
    }

    let rising = upper.slope > 0.0;
    let direction = if rising {
        Direction::Bearish
    } else {
        Direction::Bullish
    };

    let last_close = candles[n - 1].close;
    let confirmed = if rising {
        last_close < lower.value_at(last_x)
    } else {
        last_close > upper.value_at(last_x)
    };

    let price_target = if rising {
        Some(lower.value_at(last_x) - start_width)
    } else {
        Some(upper.value_at(last_x) + start_width)
    };

    Some(PatternMatch {
        name: if rising { "rising_wedge" } else { "falling_wedge" }.to_string(),
        category: PatternCategory::Reversal,
        direction,
        confidence: if confirmed { 75.0 } else { 55.0 },
        price_target,
        stop_loss: Some(if rising {
            upper.value_at(last_x)
        } else {
            lower.value_at(last_x)
        }),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use common::Candle;

    /// Candles whose high/low boundaries converge while drifting.
    fn wedge_candles(base: f64, drift: f64, start_width: f64, n: usize) -> Vec<Candle> {
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        (0..n)
            .map(|i| {
                let x = i as f64;
                let width = start_width * (1.0 - 0.7 * x / (n - 1) as f64);
                let mid = base + drift * x;
                let close = mid + if i % 2 == 0 { width * 0.3 } else { -width * 0.3 };
                Candle {
                    time: t0 + Duration::minutes(i as i64),
                    open: mid,
                    high: mid + width / 2.0,
                    low: mid - width / 2.0,
                    close,
                    volume: 100.0,
                }
            })
            .collect()
    }

    #[test]
    fn rising_wedge_reads_bearish() {
        let candles = wedge_candles(100.0, 1.0, 20.0, 30);
        let m = detect_wedge(&candles).expect("wedge");
        assert_eq!(m.name, "rising_wedge");
        assert_eq!(m.direction, Direction::Bearish);
        assert_eq!(m.confidence, 55.0);
    }

    #[test]
    fn falling_wedge_reads_bullish() {
        let candles = wedge_candles(200.0, -1.0, 20.0, 30);
        let m = detect_wedge(&candles).expect("wedge");
        assert_eq!(m.name, "falling_wedge");
        assert_eq!(m.direction, Direction::Bullish);
    }

    #[test]
    fn counter_trend_break_confirms() {
        let mut candles = wedge_candles(100.0, 1.0, 20.0, 30);
        // Close collapses through the lower boundary
        let last = candles.last_mut().unwrap();
        last.close = last.low - 8.0;
        last.low = last.close;
        let m = detect_wedge(&candles).expect("wedge");
        assert_eq!(m.direction, Direction::Bearish);
        assert_eq!(m.confidence, 75.0);
    }

    #[test]
    fn parallel_drift_is_not_a_wedge() {
        // Constant width — no convergence
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let candles: Vec<Candle> = (0..30)
            .map(|i| {
                let mid = 100.0 + i as f64;
                Candle {
                    time: t0 + Duration::minutes(i as i64),
                    open: mid,
                    high: mid + 5.0,
                    low: mid - 5.0,
                    close: mid,
                    volume: 100.0,
                }
            })
            .collect();
        assert!(detect_wedge(&candles).is_none());
    }

    #[test]
    fn opposite_slopes_are_not_a_wedge() {
        // Expanding symmetrical range has opposite-sign boundaries
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let candles: Vec<Candle> = (0..30)
            .map(|i| {
                let spread = 2.0 + i as f64 * 0.5;
                Candle {
                    time: t0 + Duration::minutes(i as i64),
                    open: 100.0,
                    high: 100.0 + spread,
                    low: 100.0 - spread,
                    close: 100.0,
                    volume: 100.0,
                }
            })
            .collect();
        assert!(detect_wedge(&candles).is_none());
    }
}
