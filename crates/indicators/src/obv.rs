use common::Candle;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObvTrend {
    Rising,
    Falling,
    Flat,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ObvReading {
    pub value: f64,
    pub trend: ObvTrend,
}

/// On-balance volume: cumulative ±volume on close direction.
///
/// Trend compares the 10-bar OBV delta against 10% of the series' average
/// magnitude. Below two candles the reading is zero/flat.
pub fn obv(candles: &[Candle]) -> ObvReading {
    if candles.len() < 2 {
        return ObvReading {
            value: 0.0,
            trend: ObvTrend::Flat,
        };
    }

    let mut series = Vec::with_capacity(candles.len());
    let mut running = 0.0;
    series.push(running);
    for pair in candles.windows(2) {
        if pair[1].close > pair[0].close {
            running += pair[1].volume;
        } else if pair[1].close < pair[0].close {
            running -= pair[1].volume;
        }
        series.push(running);
    }

    let value = running;
    let lookback = series.len().min(10);
    let delta = value - series[series.len() - lookback];
    let avg_magnitude =
        series.iter().map(|v| v.abs()).sum::<f64>() / series.len() as f64;

    let threshold = avg_magnitude * 0.10;
    let trend = if delta > threshold && threshold > 0.0 {
        ObvTrend::Rising
    } else if delta < -threshold && threshold > 0.0 {
        ObvTrend::Falling
    } else {
        ObvTrend::Flat
    };

    ObvReading { value, trend }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::candles_from_closes;

    #[test]
    fn empty_window_is_flat() {
        let reading = obv(&[]);
        assert_eq!(reading.value, 0.0);
        assert_eq!(reading.trend, ObvTrend::Flat);
    }

    #[test]
    fn steady_accumulation_reads_rising() {
        let closes: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        let reading = obv(&candles_from_closes(&closes));
        assert!(reading.value > 0.0);
        assert_eq!(reading.trend, ObvTrend::Rising);
    }

    #[test]
    fn distribution_reads_falling() {
        let closes: Vec<f64> = (0..30).map(|i| 200.0 - i as f64).collect();
        let reading = obv(&candles_from_closes(&closes));
        assert!(reading.value < 0.0);
        assert_eq!(reading.trend, ObvTrend::Falling);
    }
}
