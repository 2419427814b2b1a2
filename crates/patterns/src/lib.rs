//! Geometric and candlestick pattern recognition over a candle window.
//!
//! Detectors return `None` (or an empty list) when the window is too short
//! or the shape is absent — no match is never an error. All windows are
//! oldest-first.

pub mod candlestick;
pub mod channel;
pub mod double;
pub mod extrema;
pub mod head_shoulders;
pub mod regression;
pub mod triangle;
pub mod wedge;

pub use candlestick::detect_candlesticks;
pub use channel::detect_channel;
pub use double::{detect_double_bottom, detect_double_top};
pub use extrema::{find_local_extrema, Extremum, ExtremumKind};
pub use head_shoulders::{detect_head_and_shoulders, detect_inverse_head_and_shoulders};
pub use regression::linear_regression;
pub use triangle::detect_triangle;
pub use wedge::detect_wedge;

use common::{Candle, ChannelModel, Direction, PatternMatch};
use serde::{Deserialize, Serialize};

/// Run every chart and candlestick detector over the window.
pub fn scan(candles: &[Candle]) -> Vec<PatternMatch> {
    let mut matches = Vec::new();
    matches.extend(detect_head_and_shoulders(candles));
    matches.extend(detect_inverse_head_and_shoulders(candles));
    matches.extend(detect_double_top(candles));
    matches.extend(detect_double_bottom(candles));
    matches.extend(detect_triangle(candles));
    matches.extend(detect_wedge(candles));
    matches.extend(detect_candlesticks(candles));
    matches
}

/// Confidence-weighted aggregate of all detected patterns plus the channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DominantSignal {
    pub direction: Direction,
    pub bullish_weight: f64,
    pub bearish_weight: f64,
    /// 0–100 pattern component of the TA read, 50 neutral.
    pub score: f64,
}

/// Split matches by direction into confidence-weighted sums, add a
/// channel-derived term, and call the side that wins by more than 0.5.
pub fn dominant_signal(matches: &[PatternMatch], channel: Option<&ChannelModel>) -> DominantSignal {
    let mut bullish_weight = 0.0;
    let mut bearish_weight = 0.0;

    for m in matches {
        match m.direction {
            Direction::Bullish => bullish_weight += m.confidence / 100.0,
            Direction::Bearish => bearish_weight += m.confidence / 100.0,
            Direction::Neutral => {}
        }
    }

    if let Some(ch) = channel {
        let term = ch.strength;
        match ch.breakout {
            Some(Direction::Bullish) => bullish_weight += term,
            Some(Direction::Bearish) => bearish_weight += term,
            _ => match ch.kind {
                common::ChannelKind::Ascending => bullish_weight += term * 0.5,
                common::ChannelKind::Descending => bearish_weight += term * 0.5,
                common::ChannelKind::Horizontal => {}
            },
        }
    }

    let margin = bullish_weight - bearish_weight;
    let direction = if margin > 0.5 {
        Direction::Bullish
    } else if margin < -0.5 {
        Direction::Bearish
    } else {
        Direction::Neutral
    };

    DominantSignal {
        direction,
        bullish_weight,
        bearish_weight,
        score: (50.0 + margin * 15.0).clamp(0.0, 100.0),
    }
}

#[cfg(test)]
pub(crate) mod test_util {
    use chrono::{Duration, TimeZone, Utc};
    use common::Candle;

    /// Candle series whose highs/lows track the closes with a ±0.3% band.
    /// Good enough for extrema and line-fit tests.
    pub fn candles_from_closes(closes: &[f64]) -> Vec<Candle> {
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| Candle {
                time: t0 + Duration::minutes(i as i64),
                open: if i == 0 { close } else { closes[i - 1] },
                high: close * 1.003,
                low: close * 0.997,
                close,
                volume: 100.0,
            })
            .collect()
    }

    /// Fully explicit candle for candlestick-shape tests.
    pub fn bar(i: i64, open: f64, high: f64, low: f64, close: f64) -> Candle {
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        Candle {
            time: t0 + Duration::minutes(i),
            open,
            high,
            low,
            close,
            volume: 100.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{ChannelKind, PatternCategory, TrendLine};

    fn matched(direction: Direction, confidence: f64) -> PatternMatch {
        PatternMatch {
            name: "test".into(),
            category: PatternCategory::Reversal,
            direction,
            confidence,
            price_target: None,
            stop_loss: None,
        }
    }

    #[test]
    fn small_margin_stays_neutral() {
        let matches = vec![matched(Direction::Bullish, 60.0), matched(Direction::Bearish, 40.0)];
        let signal = dominant_signal(&matches, None);
        // 0.6 vs 0.4 — margin 0.2, below the 0.5 bar
        assert_eq!(signal.direction, Direction::Neutral);
    }

    #[test]
    fn stacked_bullish_patterns_win() {
        let matches = vec![
            matched(Direction::Bullish, 80.0),
            matched(Direction::Bullish, 70.0),
        ];
        let signal = dominant_signal(&matches, None);
        assert_eq!(signal.direction, Direction::Bullish);
        assert!(signal.score > 50.0);
    }

    #[test]
    fn channel_breakout_tips_the_balance() {
        let line = TrendLine {
            slope: 0.0,
            intercept: 100.0,
            r_squared: 0.9,
        };
        let channel = ChannelModel {
            kind: ChannelKind::Horizontal,
            upper: line,
            lower: line,
            strength: 0.8,
            breakout: Some(Direction::Bearish),
        };
        let matches = vec![matched(Direction::Bearish, 40.0)];
        let signal = dominant_signal(&matches, Some(&channel));
        assert_eq!(signal.direction, Direction::Bearish);
    }
}
