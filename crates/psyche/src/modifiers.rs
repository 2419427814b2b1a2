use common::PersonalityTraits;

use crate::state::AgentMentalState;

const FATIGUE_SKIP: f64 = 80.0;
const BUDGET_SKIP: f64 = 10.0;
const SIZE_MIN: f64 = 0.3;
const SIZE_MAX: f64 = 1.5;

/// How the current mental state should bend a decision.
///
/// `threshold_modifier` is added to the agent's bullish threshold
/// (positive = more cautious). `position_size_modifier` multiplies the
/// base position size and is clamped to [0.3, 1.5]. A populated
/// `skip_reason` means the agent should not trade at all right now.
#[derive(Debug, Clone, PartialEq)]
pub struct MentalModifiers {
    pub threshold_modifier: f64,
    pub position_size_modifier: f64,
    pub skip_reason: Option<String>,
}

impl MentalModifiers {
    pub fn should_skip(&self) -> bool {
        self.skip_reason.is_some()
    }
}

/// Translate raw state into decision modifiers, then let personality
/// traits scale the result in a second pass.
pub fn mental_modifiers(state: &AgentMentalState, traits: &PersonalityTraits) -> MentalModifiers {
    if state.mental_fatigue > FATIGUE_SKIP {
        return skip(format!(
            "mental fatigue too high ({:.0}/100)",
            state.mental_fatigue
        ));
    }
    if state.daily_risk_budget < BUDGET_SKIP {
        return skip(format!(
            "daily risk budget exhausted ({:.0} left)",
            state.daily_risk_budget
        ));
    }

    let mut threshold = 0.0_f64;
    let mut size = 1.0_f64;

    // Fatigue tightens the filter well before it forces a skip.
    let mut fatigue_term = 0.0;
    if state.mental_fatigue > 60.0 {
        fatigue_term += 10.0;
        size *= 0.8;
    } else if state.mental_fatigue > 40.0 {
        fatigue_term += 5.0;
    }

    if state.daily_risk_budget < 30.0 {
        threshold += 10.0;
        size *= 0.7;
    } else if state.daily_risk_budget < 50.0 {
        threshold += 5.0;
    }

    if state.loss_streak >= 3 {
        threshold += 20.0;
        size *= 0.6;
    } else if state.loss_streak >= 2 {
        threshold += 10.0;
        size *= 0.75;
    }

    if state.win_streak >= 3 {
        threshold -= 10.0;
        size *= 1.2;
    } else if state.win_streak >= 2 {
        threshold -= 5.0;
    }

    if state.confidence < 40.0 {
        threshold += 10.0;
        size *= 0.8;
    } else if state.confidence > 80.0 {
        threshold -= 5.0;
        size *= 1.15;
    }

    // Optimism lowers the bar, caution raises it.
    threshold -= state.emotional_bias * 0.5;

    if state.last_trade_pnl < -20.0 {
        threshold += 10.0;
    }

    // Second pass: traits scale the swing, not the direction.
    threshold += fatigue_term * (1.5 - traits.fatigue_resistance);
    threshold *= 1.5 - traits.emotional_stability;
    size = 1.0 + (size - 1.0) * (0.5 + traits.risk_tolerance);

    MentalModifiers {
        threshold_modifier: threshold,
        position_size_modifier: size.clamp(SIZE_MIN, SIZE_MAX),
        skip_reason: None,
    }
}

fn skip(reason: String) -> MentalModifiers {
    MentalModifiers {
        threshold_modifier: 0.0,
        position_size_modifier: 0.0,
        skip_reason: Some(reason),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn base_state() -> AgentMentalState {
        AgentMentalState::fresh(NaiveDate::from_ymd_opt(2026, 3, 1).unwrap())
    }

    #[test]
    fn fresh_state_is_neutral() {
        let mods = mental_modifiers(&base_state(), &PersonalityTraits::default());
        assert!(!mods.should_skip());
        assert_eq!(mods.threshold_modifier, 0.0);
        assert_eq!(mods.position_size_modifier, 1.0);
    }

    #[test]
    fn exhausted_fatigue_forces_skip() {
        let mut state = base_state();
        state.mental_fatigue = 85.0;
        let mods = mental_modifiers(&state, &PersonalityTraits::default());
        assert!(mods.should_skip());
        assert_eq!(mods.position_size_modifier, 0.0);
    }

    #[test]
    fn drained_budget_forces_skip() {
        let mut state = base_state();
        state.daily_risk_budget = 5.0;
        let mods = mental_modifiers(&state, &PersonalityTraits::default());
        assert!(mods.should_skip());
    }

    #[test]
    fn losing_streak_raises_bar_and_shrinks_size() {
        let mut state = base_state();
        state.loss_streak = 3;
        state.confidence = 36.0;
        state.last_trade_pnl = -25.0;
        let mods = mental_modifiers(&state, &PersonalityTraits::default());
        assert!(!mods.should_skip());
        assert!(mods.threshold_modifier >= 20.0);
        assert!(mods.position_size_modifier < 1.0);
    }

    #[test]
    fn hot_streak_loosens_the_filter() {
        let mut state = base_state();
        state.win_streak = 3;
        state.confidence = 85.0;
        let mods = mental_modifiers(&state, &PersonalityTraits::default());
        assert!(mods.threshold_modifier < 0.0);
        assert!(mods.position_size_modifier > 1.0);
    }

    #[test]
    fn stability_damps_the_swing() {
        let mut state = base_state();
        state.loss_streak = 3;
        state.confidence = 36.0;

        let jittery = PersonalityTraits {
            emotional_stability: 0.1,
            ..PersonalityTraits::default()
        };
        let stoic = PersonalityTraits {
            emotional_stability: 0.9,
            ..PersonalityTraits::default()
        };
        let loose = mental_modifiers(&state, &jittery);
        let tight = mental_modifiers(&state, &stoic);
        assert!(loose.threshold_modifier > tight.threshold_modifier);
    }

    #[test]
    fn risk_tolerance_scales_size_deviation() {
        let mut state = base_state();
        state.loss_streak = 2;

        let timid = PersonalityTraits {
            risk_tolerance: 0.1,
            ..PersonalityTraits::default()
        };
        let bold = PersonalityTraits {
            risk_tolerance: 0.9,
            ..PersonalityTraits::default()
        };
        let small = mental_modifiers(&state, &bold);
        let less_small = mental_modifiers(&state, &timid);
        // Risk tolerance amplifies deviations in either direction, so the
        // bold agent's post-loss cut is deeper.
        assert!(small.position_size_modifier < less_small.position_size_modifier);
    }

    #[test]
    fn size_modifier_stays_clamped() {
        let mut state = base_state();
        state.win_streak = 5;
        state.confidence = 95.0;
        let bold = PersonalityTraits {
            risk_tolerance: 1.0,
            ..PersonalityTraits::default()
        };
        let mods = mental_modifiers(&state, &bold);
        assert!(mods.position_size_modifier <= 1.5);

        state.win_streak = 0;
        state.loss_streak = 5;
        state.confidence = 20.0;
        state.daily_risk_budget = 12.0;
        let mods = mental_modifiers(&state, &bold);
        assert!(mods.position_size_modifier >= 0.3);
    }
}
