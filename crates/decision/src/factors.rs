use common::{DecisionWeights, ExitLiquidityProfile, NarrativeInsight, TokenSnapshot};
use indicators::IndicatorSummary;
use patterns::DominantSignal;

/// Everything one evaluation cycle looks at for a single token.
/// All fields are snapshots; the engine never fetches.
#[derive(Debug, Clone)]
pub struct DecisionInputs {
    pub snapshot: TokenSnapshot,
    pub indicators: IndicatorSummary,
    pub patterns: DominantSignal,
    pub exit: ExitLiquidityProfile,
    pub narrative: NarrativeInsight,
    /// USD size the agent would open if it decides to trade.
    pub proposed_size: f64,
}

const SCAM_NARRATIVE_PENALTY: f64 = 0.2;

/// The seven factor sub-scores, each 0-100.
#[derive(Debug, Clone, Copy)]
pub struct FactorScores {
    pub holders: f64,
    pub ta: f64,
    pub liquidity: f64,
    pub momentum: f64,
    pub narrative: f64,
    pub exit_safety: f64,
    pub scam_safety: f64,
}

impl FactorScores {
    pub fn compute(inputs: &DecisionInputs) -> Self {
        Self {
            holders: holder_score(inputs.snapshot.holder_count),
            ta: 0.6 * inputs.indicators.ta_score + 0.4 * inputs.patterns.score,
            liquidity: lp_ratio_score(inputs.snapshot.lp_ratio),
            momentum: inputs.indicators.momentum_score,
            narrative: narrative_score(&inputs.narrative),
            exit_safety: inputs.exit.liquidity_score,
            scam_safety: inputs.snapshot.scam_risk_score,
        }
    }

    /// Weighted sum, normalized so a weight vector that does not sum to
    /// exactly 1 still yields a 0-100 score.
    pub fn weighted(&self, weights: &DecisionWeights) -> f64 {
        let total = weights.sum();
        if total <= 0.0 {
            return 50.0;
        }
        (self.holders * weights.holders
            + self.ta * weights.ta
            + self.liquidity * weights.liquidity
            + self.momentum * weights.momentum
            + self.narrative * weights.narrative
            + self.exit_safety * weights.exit_safety
            + self.scam_safety * weights.scam_safety)
            / total
    }
}

/// Fixed holder-count tiers. Micro-cap counts, not exchange-scale ones.
fn holder_score(holders: u64) -> f64 {
    match holders {
        0..=49 => 10.0,
        50..=199 => 30.0,
        200..=999 => 50.0,
        1_000..=4_999 => 70.0,
        5_000..=19_999 => 85.0,
        _ => 95.0,
    }
}

fn lp_ratio_score(lp_ratio: f64) -> f64 {
    if lp_ratio < 0.01 {
        10.0
    } else if lp_ratio < 0.03 {
        35.0
    } else if lp_ratio < 0.06 {
        60.0
    } else if lp_ratio < 0.10 {
        80.0
    } else {
        90.0
    }
}

fn narrative_score(narrative: &NarrativeInsight) -> f64 {
    if narrative.likely_scam {
        narrative.score * SCAM_NARRATIVE_PENALTY
    } else {
        narrative.score
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::NarrativeKind;

    #[test]
    fn holder_tiers_are_monotone() {
        let counts = [10, 60, 500, 2_000, 10_000, 50_000];
        let scores: Vec<f64> = counts.iter().map(|&c| holder_score(c)).collect();
        for pair in scores.windows(2) {
            assert!(pair[1] > pair[0]);
        }
    }

    #[test]
    fn scam_narrative_is_crushed() {
        let honest = NarrativeInsight {
            score: 80.0,
            kind: NarrativeKind::Growing,
            likely_scam: false,
            raid_detected: false,
        };
        let scam = NarrativeInsight {
            likely_scam: true,
            ..honest.clone()
        };
        assert_eq!(narrative_score(&honest), 80.0);
        assert_eq!(narrative_score(&scam), 16.0);
    }

    #[test]
    fn weighted_handles_degenerate_weights() {
        let scores = FactorScores {
            holders: 50.0,
            ta: 50.0,
            liquidity: 50.0,
            momentum: 50.0,
            narrative: 50.0,
            exit_safety: 50.0,
            scam_safety: 50.0,
        };
        let zero = DecisionWeights {
            holders: 0.0,
            ta: 0.0,
            liquidity: 0.0,
            momentum: 0.0,
            narrative: 0.0,
            exit_safety: 0.0,
            scam_safety: 0.0,
        };
        assert_eq!(scores.weighted(&zero), 50.0);
        // Uniform inputs score the same under any positive weighting.
        assert!((scores.weighted(&DecisionWeights::default()) - 50.0).abs() < 1e-9);
    }
}
