use common::Candle;
use serde::{Deserialize, Serialize};

/// Distance band, percent, inside which price counts as "at" VWAP.
pub const VWAP_AT_BAND_PCT: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VwapZone {
    Above,
    At,
    Below,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct VwapReading {
    pub value: f64,
    /// (price − vwap) / vwap × 100.
    pub distance_pct: f64,
    pub zone: VwapZone,
}

/// Volume-weighted average price from cumulative typical-price × volume.
/// An empty or zero-volume window reads as "at" with zero distance.
pub fn vwap(candles: &[Candle]) -> VwapReading {
    let last_close = candles.last().map(|c| c.close).unwrap_or(0.0);

    let mut pv = 0.0;
    let mut vol = 0.0;
    for c in candles {
        pv += c.typical_price() * c.volume;
        vol += c.volume;
    }

    if vol <= 0.0 {
        return VwapReading {
            value: last_close,
            distance_pct: 0.0,
            zone: VwapZone::At,
        };
    }

    let value = pv / vol;
    let distance_pct = if value.abs() > f64::EPSILON {
        (last_close - value) / value * 100.0
    } else {
        0.0
    };

    let zone = if distance_pct > VWAP_AT_BAND_PCT {
        VwapZone::Above
    } else if distance_pct < -VWAP_AT_BAND_PCT {
        VwapZone::Below
    } else {
        VwapZone::At
    };

    VwapReading {
        value,
        distance_pct,
        zone,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::candles_from_closes;

    #[test]
    fn empty_window_reads_at() {
        let reading = vwap(&[]);
        assert_eq!(reading.zone, VwapZone::At);
        assert_eq!(reading.distance_pct, 0.0);
    }

    #[test]
    fn rally_finishes_above_vwap() {
        let closes: Vec<f64> = (0..30).map(|i| 100.0 + i as f64 * 2.0).collect();
        let reading = vwap(&candles_from_closes(&closes));
        assert_eq!(reading.zone, VwapZone::Above);
        assert!(reading.distance_pct > VWAP_AT_BAND_PCT);
    }

    #[test]
    fn flat_series_sits_at_vwap() {
        let reading = vwap(&candles_from_closes(&[50.0; 20]));
        assert_eq!(reading.zone, VwapZone::At);
    }
}
