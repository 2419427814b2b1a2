use common::{Direction, OrderFlowTuning, SwapTrade, TradeSide};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderFlowStats {
    pub buy_volume: f64,
    pub sell_volume: f64,
    /// Buy volume / total volume, 0.5 when the window is empty.
    pub buy_ratio: f64,
    /// Size above which a trade counts as large for this window.
    pub large_order_threshold: f64,
    pub large_buy_volume: f64,
    pub large_sell_volume: f64,
    pub large_order_count: usize,
    /// Set when one side's large-order volume dominates the other.
    pub whale_direction: Option<Direction>,
}

impl OrderFlowStats {
    fn neutral() -> Self {
        Self {
            buy_volume: 0.0,
            sell_volume: 0.0,
            buy_ratio: 0.5,
            large_order_threshold: 0.0,
            large_buy_volume: 0.0,
            large_sell_volume: 0.0,
            large_order_count: 0,
            whale_direction: None,
        }
    }
}

/// Classify recent swaps into buy/sell volume and flag whale activity.
///
/// A trade is large when its size sits above the configured percentile of
/// the window's trade sizes. Whale direction is declared when one side's
/// large-order volume exceeds the other's by the dominance ratio.
pub fn order_flow(trades: &[SwapTrade], tuning: &OrderFlowTuning) -> OrderFlowStats {
    if trades.is_empty() {
        return OrderFlowStats::neutral();
    }

    let mut buy_volume = 0.0;
    let mut sell_volume = 0.0;
    for t in trades {
        match t.side {
            TradeSide::Buy => buy_volume += t.base_amount,
            TradeSide::Sell => sell_volume += t.base_amount,
        }
    }
    let total = buy_volume + sell_volume;
    let buy_ratio = if total > 0.0 { buy_volume / total } else { 0.5 };

    let large_order_threshold = percentile(
        trades.iter().map(|t| t.base_amount).collect(),
        tuning.whale_percentile,
    );

    let mut large_buy_volume = 0.0;
    let mut large_sell_volume = 0.0;
    let mut large_order_count = 0;
    for t in trades {
        if t.base_amount >= large_order_threshold && large_order_threshold > 0.0 {
            large_order_count += 1;
            match t.side {
                TradeSide::Buy => large_buy_volume += t.base_amount,
                TradeSide::Sell => large_sell_volume += t.base_amount,
            }
        }
    }

    let ratio = tuning.whale_dominance_ratio;
    let whale_direction = if large_buy_volume > large_sell_volume * ratio && large_buy_volume > 0.0
    {
        Some(Direction::Bullish)
    } else if large_sell_volume > large_buy_volume * ratio && large_sell_volume > 0.0 {
        Some(Direction::Bearish)
    } else {
        None
    };

    OrderFlowStats {
        buy_volume,
        sell_volume,
        buy_ratio,
        large_order_threshold,
        large_buy_volume,
        large_sell_volume,
        large_order_count,
        whale_direction,
    }
}

/// Nearest-rank percentile of trade sizes, q in [0, 1].
fn percentile(mut sizes: Vec<f64>, q: f64) -> f64 {
    if sizes.is_empty() {
        return 0.0;
    }
    sizes.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let idx = ((sizes.len() as f64 * q).floor() as usize).min(sizes.len() - 1);
    sizes[idx]
}
