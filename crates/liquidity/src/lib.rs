//! Constant-product exit-liquidity model.
//!
//! Approximates AMM price impact as `amount / (liquidity/2 + amount)` — half
//! the quoted pool liquidity sits on each side of the pair — and inverts it
//! to bound position sizes by a slippage target.

use common::{
    ExitDifficulty, ExitLiquidityProfile, LiquidityTuning, RiskTier, TokenSnapshot,
};
use serde::{Deserialize, Serialize};

/// Impact below which a full exit counts as possible at all.
const CAN_EXIT_IMPACT: f64 = 0.50;
/// Impact at or above this sits beyond the risky tier for the entry gate.
const RISKY_IMPACT: f64 = 0.20;
/// Entry gate floors.
const MIN_LP_RATIO: f64 = 0.03;
const MIN_LIQUIDITY: f64 = 200.0;

/// Price impact of selling `amount` into a pool of `liquidity`.
/// Zero or negative liquidity means the position cannot move: impact 1.0.
pub fn price_impact(amount: f64, liquidity: f64) -> f64 {
    if liquidity <= 0.0 {
        return 1.0;
    }
    if amount <= 0.0 {
        return 0.0;
    }
    amount / (liquidity / 2.0 + amount)
}

/// Largest trade whose impact stays at `target_slippage`, the inverse of
/// [`price_impact`]. Targets outside (0, 1) or empty pools yield zero.
pub fn max_trade_for_slippage(liquidity: f64, target_slippage: f64) -> f64 {
    if liquidity <= 0.0 || target_slippage <= 0.0 || target_slippage >= 1.0 {
        return 0.0;
    }
    target_slippage * (liquidity / 2.0) / (1.0 - target_slippage)
}

/// Full exit profile for a proposed position against a pool.
pub fn analyze(
    liquidity: f64,
    position_size: f64,
    lp_ratio: f64,
    tuning: &LiquidityTuning,
) -> ExitLiquidityProfile {
    let impact = price_impact(position_size, liquidity);

    let exit_difficulty = if impact < 0.02 {
        ExitDifficulty::Easy
    } else if impact < 0.05 {
        ExitDifficulty::Moderate
    } else if impact < 0.20 {
        ExitDifficulty::Hard
    } else {
        ExitDifficulty::Impossible
    };

    let worst_case = (impact * tuning.panic_sell_multiplier).min(1.0);

    let max_safe_size = max_trade_for_slippage(liquidity, tuning.safe_slippage);
    let recommended_size = max_trade_for_slippage(liquidity, tuning.acceptable_slippage);

    let per_tick = liquidity * tuning.exit_per_tick_ratio;
    let estimated_exit_time_units = if position_size <= 0.0 || per_tick <= 0.0 {
        if liquidity <= 0.0 && position_size > 0.0 {
            u32::MAX
        } else {
            0
        }
    } else {
        (position_size / per_tick).ceil() as u32
    };

    let liquidity_score = liquidity_score(liquidity, position_size, lp_ratio);

    ExitLiquidityProfile {
        can_exit: impact < CAN_EXIT_IMPACT,
        exit_difficulty,
        price_impact_pct: impact * 100.0,
        worst_case_impact_pct: worst_case * 100.0,
        max_safe_size,
        recommended_size,
        estimated_exit_time_units,
        liquidity_score,
        risk_tier: risk_tier(liquidity_score),
    }
}

/// 0–100 blend: LP ratio (35), absolute pool depth (35), position/pool
/// ratio (30).
fn liquidity_score(liquidity: f64, position_size: f64, lp_ratio: f64) -> f64 {
    let lp_component = (lp_ratio / 0.10).clamp(0.0, 1.0) * 35.0;

    let depth_component = if liquidity >= 100_000.0 {
        35.0
    } else if liquidity >= 50_000.0 {
        30.0
    } else if liquidity >= 10_000.0 {
        25.0
    } else if liquidity >= 5_000.0 {
        18.0
    } else if liquidity >= 1_000.0 {
        10.0
    } else if liquidity >= MIN_LIQUIDITY {
        5.0
    } else {
        0.0
    };

    let ratio = if liquidity > 0.0 {
        position_size / liquidity
    } else {
        f64::INFINITY
    };
    let ratio_component = if ratio <= 0.01 {
        30.0
    } else if ratio <= 0.05 {
        22.0
    } else if ratio <= 0.10 {
        15.0
    } else if ratio <= 0.20 {
        8.0
    } else {
        0.0
    };

    (lp_component + depth_component + ratio_component).clamp(0.0, 100.0)
}

fn risk_tier(score: f64) -> RiskTier {
    if score >= 80.0 {
        RiskTier::Low
    } else if score >= 60.0 {
        RiskTier::Moderate
    } else if score >= 40.0 {
        RiskTier::Elevated
    } else if score >= 20.0 {
        RiskTier::High
    } else {
        RiskTier::Extreme
    }
}

/// Why the fast-path entry gate turned a candidate down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateRejection {
    LowLpRatio,
    ThinLiquidity,
    ExcessiveImpact,
}

impl std::fmt::Display for GateRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GateRejection::LowLpRatio => write!(f, "LP ratio under floor"),
            GateRejection::ThinLiquidity => write!(f, "pool liquidity under floor"),
            GateRejection::ExcessiveImpact => write!(f, "entry impact beyond risky tier"),
        }
    }
}

/// Fast-path gate run before any deeper analysis of a candidate token.
pub fn entry_gate(snapshot: &TokenSnapshot, proposed_size: f64) -> Result<(), GateRejection> {
    if snapshot.lp_ratio < MIN_LP_RATIO {
        return Err(GateRejection::LowLpRatio);
    }
    if snapshot.liquidity_usd < MIN_LIQUIDITY {
        return Err(GateRejection::ThinLiquidity);
    }
    if price_impact(proposed_size, snapshot.liquidity_usd) >= RISKY_IMPACT {
        return Err(GateRejection::ExcessiveImpact);
    }
    Ok(())
}
