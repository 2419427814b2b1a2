use rand::Rng;
use tracing::debug;

use common::{AgentDecision, AgentProfile, Direction, NarrativeKind, OverrideRule, RiskTier};
use psyche::{mental_modifiers, AgentMentalState};

use crate::factors::{DecisionInputs, FactorScores};

/// scam_risk_score below this forces a bearish call for every agent.
const SCAM_FORCE_BELOW: f64 = 20.0;
/// Half-width of the random intuition term before stability scaling.
const INTUITION_SPAN: f64 = 5.0;
/// Confidence assigned when the score lands between the thresholds.
const NEUTRAL_CONFIDENCE: f64 = 30.0;
/// Confidence gained per point of score past a threshold.
const CONFIDENCE_SLOPE: f64 = 2.0;
const CONFIDENCE_CAP: f64 = 95.0;
/// Narrative score bounds for the contrarian fade rule.
const SENTIMENT_NEG_EXTREME: f64 = 15.0;
const SENTIMENT_POS_EXTREME: f64 = 85.0;

/// Stateless evaluator. All per-agent variation comes in through the
/// profile and mental state; all randomness through the caller's rng.
pub struct DecisionEngine;

impl DecisionEngine {
    pub fn evaluate(
        profile: &AgentProfile,
        inputs: &DecisionInputs,
        mental: &AgentMentalState,
        rng: &mut impl Rng,
    ) -> AgentDecision {
        evaluate(profile, inputs, mental, rng)
    }
}

/// One (agent, token) evaluation cycle.
pub fn evaluate(
    profile: &AgentProfile,
    inputs: &DecisionInputs,
    mental: &AgentMentalState,
    rng: &mut impl Rng,
) -> AgentDecision {
    let token = inputs.snapshot.symbol.clone();

    let mods = mental_modifiers(mental, &profile.traits);
    if let Some(reason) = mods.skip_reason {
        debug!(agent = %profile.id, token = %token, %reason, "skipping cycle");
        return AgentDecision::skip(&profile.id, token, reason);
    }

    let factors = FactorScores::compute(inputs);
    let raw = factors.weighted(&profile.weights);

    let mut reasoning = Vec::new();

    // Psychology bends the score before classification. Stability damps
    // both the emotional and the intuition term.
    let sway = 1.0 - profile.traits.emotional_stability;
    let bias_term = mental.emotional_bias * sway;
    let mut score = raw + bias_term;
    score *= confidence_band(mental.confidence);
    let intuition = rng.gen_range(-INTUITION_SPAN..=INTUITION_SPAN) * sway;
    score = (score + intuition).clamp(0.0, 100.0);

    if bias_term.abs() >= 2.0 {
        let mood = if bias_term > 0.0 { "optimism" } else { "caution" };
        reasoning.push(format!("{mood} shifted the score by {bias_term:+.1}"));
    }

    let bullish_at = profile.bullish_threshold + mods.threshold_modifier;
    let bearish_at = profile.bearish_threshold + mods.threshold_modifier;

    let (mut opinion, mut confidence) = if score >= bullish_at {
        (
            Direction::Bullish,
            (50.0 + (score - bullish_at) * CONFIDENCE_SLOPE).min(CONFIDENCE_CAP),
        )
    } else if score <= bearish_at {
        (
            Direction::Bearish,
            (50.0 + (bearish_at - score) * CONFIDENCE_SLOPE).min(CONFIDENCE_CAP),
        )
    } else {
        (Direction::Neutral, NEUTRAL_CONFIDENCE)
    };
    reasoning.push(format!(
        "score {score:.1} vs thresholds {bearish_at:.1}/{bullish_at:.1}"
    ));

    apply_overrides(
        profile,
        inputs,
        &mut opinion,
        &mut confidence,
        &mut reasoning,
    );

    // Scam safety is non-negotiable regardless of archetype.
    if inputs.snapshot.scam_risk_score < SCAM_FORCE_BELOW {
        opinion = Direction::Bearish;
        confidence = confidence.max(90.0);
        reasoning.push("scam risk score critically low".to_string());
    }

    let mut size = mods.position_size_modifier * (0.5 + confidence / 100.0);
    if inputs.proposed_size > 0.0 {
        // Never size past what the pool lets the agent exit comfortably.
        size = size.min(inputs.exit.recommended_size / inputs.proposed_size);
    }
    let size = size.clamp(0.3, 1.5);

    reasoning.truncate(4);

    let should_trade = opinion == Direction::Bullish && confidence >= 50.0;
    debug!(
        agent = %profile.id,
        token = %token,
        %opinion,
        confidence,
        size,
        should_trade,
        "decision"
    );

    AgentDecision {
        agent: profile.id.clone(),
        token,
        opinion,
        confidence,
        position_size_multiplier: size,
        should_trade,
        skip_reason: None,
        reasoning,
    }
}

/// Confident agents press their reads a little harder, shaken ones trust
/// them less.
fn confidence_band(mental_confidence: f64) -> f64 {
    if mental_confidence > 80.0 {
        1.10
    } else if mental_confidence < 40.0 {
        0.90
    } else {
        1.0
    }
}

fn apply_overrides(
    profile: &AgentProfile,
    inputs: &DecisionInputs,
    opinion: &mut Direction,
    confidence: &mut f64,
    reasoning: &mut Vec<String>,
) {
    for rule in &profile.overrides {
        match *rule {
            OverrideRule::ForceBearishOnExtremeExitRisk => {
                if inputs.exit.risk_tier == RiskTier::Extreme {
                    *opinion = Direction::Bearish;
                    *confidence = confidence.max(85.0);
                    reasoning.push("extreme exit risk forces bearish stance".to_string());
                }
            }
            OverrideRule::DampBullishOnHighExitRisk => {
                if *opinion == Direction::Bullish && inputs.exit.risk_tier >= RiskTier::High {
                    *confidence *= 0.5;
                    reasoning.push("high exit risk halves bullish conviction".to_string());
                }
            }
            OverrideRule::ForceNeutralOnDeadNarrative { floor } => {
                let dead = inputs.narrative.kind == NarrativeKind::Dead
                    || inputs.narrative.score < floor;
                if dead && *opinion == Direction::Bullish {
                    *opinion = Direction::Neutral;
                    *confidence = confidence.min(NEUTRAL_CONFIDENCE);
                    reasoning.push("narrative is dead, ignoring the chart".to_string());
                }
            }
            OverrideRule::AmplifyOnFreshNarrative { social_floor } => {
                if *opinion == Direction::Bullish
                    && inputs.narrative.kind == NarrativeKind::Fresh
                    && inputs.snapshot.social_score >= social_floor
                {
                    let chase = 1.1 + 0.2 * profile.traits.fomo_proneness;
                    *confidence = (*confidence * chase).min(95.0);
                    reasoning.push("fresh narrative with strong social pull".to_string());
                }
            }
            OverrideRule::ContrarianFadeExtremes => {
                if *opinion == Direction::Bearish
                    && inputs.narrative.score < SENTIMENT_NEG_EXTREME
                {
                    *opinion = Direction::Neutral;
                    *confidence = confidence.min(NEUTRAL_CONFIDENCE);
                    reasoning.push("max-pain sentiment, stepping off the short".to_string());
                } else if *opinion == Direction::Bullish
                    && inputs.narrative.score > SENTIMENT_POS_EXTREME
                    && inputs.narrative.raid_detected
                {
                    *opinion = Direction::Neutral;
                    *confidence = confidence.min(NEUTRAL_CONFIDENCE);
                    reasoning.push("euphoria plus raid activity, fading the crowd".to_string());
                }
            }
        }
    }
}
