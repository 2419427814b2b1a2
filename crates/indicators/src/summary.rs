use common::{Candle, Direction, OrderFlowTuning, SwapTrade};
use serde::{Deserialize, Serialize};

use crate::{
    atr, bollinger, macd, moving_averages, obv, order_flow, rsi, vwap, AtrReading,
    BollingerBands, MaCross, MacdReading, MovingAverages, ObvReading, OrderFlowStats, RsiReading,
    VwapReading,
};
use crate::obv::ObvTrend;
use crate::rsi::RsiTrend;
use crate::vwap::VwapZone;

/// All indicator readings for one cycle plus the composite scores consumed
/// by the decision engine. 50 is neutral for both scores.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicatorSummary {
    pub rsi: RsiReading,
    pub moving_averages: MovingAverages,
    pub macd: MacdReading,
    pub bollinger: BollingerBands,
    pub obv: ObvReading,
    pub vwap: VwapReading,
    pub atr: AtrReading,
    pub order_flow: OrderFlowStats,
    /// 0–100 blend of the directional indicator signals.
    pub ta_score: f64,
    /// 0–100 short-horizon momentum read.
    pub momentum_score: f64,
}

impl IndicatorSummary {
    pub fn compute(
        candles: &[Candle],
        trades: &[SwapTrade],
        tuning: &OrderFlowTuning,
    ) -> Self {
        let rsi = rsi(candles, crate::rsi::RSI_PERIOD);
        let moving_averages = moving_averages(candles);
        let macd = macd(candles);
        let bollinger = bollinger(candles);
        let obv = obv(candles);
        let vwap = vwap(candles);
        let atr = atr(candles, crate::atr::ATR_PERIOD);
        let order_flow = order_flow(trades, tuning);

        let ta_score = ta_score(&rsi, &moving_averages, &macd, &obv, &vwap, &order_flow);
        let momentum_score = momentum_score(candles, &rsi, &macd);

        Self {
            rsi,
            moving_averages,
            macd,
            bollinger,
            obv,
            vwap,
            atr,
            order_flow,
            ta_score,
            momentum_score,
        }
    }
}

fn ta_score(
    rsi: &RsiReading,
    mas: &MovingAverages,
    macd: &MacdReading,
    obv: &ObvReading,
    vwap: &VwapReading,
    flow: &OrderFlowStats,
) -> f64 {
    let mut score: f64 = 50.0;

    // Mean-reversion read of RSI extremes plus its drift
    if rsi.value < 30.0 {
        score += 10.0;
    } else if rsi.value > 70.0 {
        score -= 10.0;
    }
    match rsi.trend {
        RsiTrend::Rising => score += 5.0,
        RsiTrend::Falling => score -= 5.0,
        RsiTrend::Flat => {}
    }

    match mas.cross {
        Some(MaCross::Golden) => score += 10.0,
        Some(MaCross::Death) => score -= 10.0,
        None => {
            if mas.ma5 > mas.ma20 {
                score += 5.0;
            } else if mas.ma5 < mas.ma20 {
                score -= 5.0;
            }
        }
    }

    match macd.crossover {
        Some(Direction::Bullish) => score += 10.0,
        Some(Direction::Bearish) => score -= 10.0,
        _ => {
            if macd.histogram > 0.0 {
                score += 5.0;
            } else if macd.histogram < 0.0 {
                score -= 5.0;
            }
        }
    }

    match obv.trend {
        ObvTrend::Rising => score += 5.0,
        ObvTrend::Falling => score -= 5.0,
        ObvTrend::Flat => {}
    }

    match vwap.zone {
        VwapZone::Above => score += 5.0,
        VwapZone::Below => score -= 5.0,
        VwapZone::At => {}
    }

    match flow.whale_direction {
        Some(Direction::Bullish) => score += 10.0,
        Some(Direction::Bearish) => score -= 10.0,
        _ => {}
    }

    score.clamp(0.0, 100.0)
}

fn momentum_score(candles: &[Candle], rsi: &RsiReading, macd: &MacdReading) -> f64 {
    let mut score: f64 = 50.0;

    if candles.len() >= 2 {
        let lookback = candles.len().min(10);
        let past = candles[candles.len() - lookback].close;
        let now = candles[candles.len() - 1].close;
        if past > 0.0 {
            let change_pct = (now - past) / past * 100.0;
            score += (change_pct * 2.0).clamp(-40.0, 40.0);
        }
    }

    match rsi.trend {
        RsiTrend::Rising => score += 5.0,
        RsiTrend::Falling => score -= 5.0,
        RsiTrend::Flat => {}
    }
    if macd.histogram > 0.0 {
        score += 5.0;
    } else if macd.histogram < 0.0 {
        score -= 5.0;
    }

    score.clamp(0.0, 100.0)
}
