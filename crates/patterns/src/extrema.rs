use common::Candle;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtremumKind {
    Peak,
    Trough,
}

/// A local price extremum inside the candle window.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Extremum {
    pub index: usize,
    pub price: f64,
    pub kind: ExtremumKind,
}

/// Local maxima over highs and minima over lows with strict dominance over
/// `order` neighbors on each side. Bars without a full neighborhood are
/// skipped, so the first and last `order` bars never qualify.
pub fn find_local_extrema(candles: &[Candle], order: usize) -> Vec<Extremum> {
    let n = candles.len();
    if order == 0 || n < 2 * order + 1 {
        return Vec::new();
    }

    let mut out = Vec::new();
    for i in order..n - order {
        let high = candles[i].high;
        let low = candles[i].low;

        let is_peak = (i - order..=i + order)
            .filter(|&j| j != i)
            .all(|j| candles[j].high < high);
        if is_peak {
            out.push(Extremum {
                index: i,
                price: high,
                kind: ExtremumKind::Peak,
            });
            continue;
        }

        let is_trough = (i - order..=i + order)
            .filter(|&j| j != i)
            .all(|j| candles[j].low > low);
        if is_trough {
            out.push(Extremum {
                index: i,
                price: low,
                kind: ExtremumKind::Trough,
            });
        }
    }
    out
}

/// Only the peaks, oldest first.
pub fn peaks(extrema: &[Extremum]) -> Vec<Extremum> {
    extrema
        .iter()
        .copied()
        .filter(|e| e.kind == ExtremumKind::Peak)
        .collect()
}

/// Only the troughs, oldest first.
pub fn troughs(extrema: &[Extremum]) -> Vec<Extremum> {
    extrema
        .iter()
        .copied()
        .filter(|e| e.kind == ExtremumKind::Trough)
        .collect()
}
