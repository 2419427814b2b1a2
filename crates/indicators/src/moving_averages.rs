use common::Candle;
use serde::{Deserialize, Serialize};

use crate::sma;

/// MA5/MA20 crossover on the latest bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaCross {
    Golden,
    Death,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MovingAverages {
    pub ma5: f64,
    pub ma10: f64,
    pub ma20: f64,
    pub cross: Option<MaCross>,
}

/// SMA 5/10/20 with golden/death-cross detection from the sign change of
/// (MA5 − MA20) across the last two bars. Below 20 candles each missing
/// average falls back to the latest close and no cross is reported.
pub fn moving_averages(candles: &[Candle]) -> MovingAverages {
    let last_close = candles.last().map(|c| c.close).unwrap_or(0.0);
    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();

    let ma5 = sma(&closes, 5).unwrap_or(last_close);
    let ma10 = sma(&closes, 10).unwrap_or(last_close);
    let ma20 = sma(&closes, 20).unwrap_or(last_close);

    // Cross needs MA5/MA20 at the previous bar as well
    let cross = if closes.len() >= 21 {
        let prev = &closes[..closes.len() - 1];
        let prev_diff = sma(prev, 5).unwrap_or(last_close) - sma(prev, 20).unwrap_or(last_close);
        let curr_diff = ma5 - ma20;
        if prev_diff <= 0.0 && curr_diff > 0.0 {
            Some(MaCross::Golden)
        } else if prev_diff >= 0.0 && curr_diff < 0.0 {
            Some(MaCross::Death)
        } else {
            None
        }
    } else {
        None
    };

    MovingAverages { ma5, ma10, ma20, cross }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::candles_from_closes;

    #[test]
    fn short_window_falls_back_to_close() {
        let candles = candles_from_closes(&[10.0, 11.0, 12.0]);
        let mas = moving_averages(&candles);
        assert_eq!(mas.ma20, 12.0);
        assert!(mas.cross.is_none());
    }

    #[test]
    fn golden_cross_on_v_shaped_recovery() {
        // Long decline keeps MA5 below MA20, then a sharp rally flips the sign
        let mut closes: Vec<f64> = (0..30).map(|i| 200.0 - i as f64 * 2.0).collect();
        closes.extend((1..8).map(|i| 140.0 + i as f64 * 12.0));

        let mut crossed = false;
        for n in 21..=closes.len() {
            if moving_averages(&candles_from_closes(&closes[..n])).cross == Some(MaCross::Golden) {
                crossed = true;
            }
        }
        assert!(crossed, "expected a golden cross somewhere in the rally");
    }

    #[test]
    fn death_cross_on_breakdown() {
        let mut closes: Vec<f64> = (0..30).map(|i| 100.0 + i as f64 * 2.0).collect();
        closes.extend((1..8).map(|i| 158.0 - i as f64 * 12.0));

        let mut crossed = false;
        for n in 21..=closes.len() {
            if moving_averages(&candles_from_closes(&closes[..n])).cross == Some(MaCross::Death) {
                crossed = true;
            }
        }
        assert!(crossed, "expected a death cross somewhere in the breakdown");
    }
}
