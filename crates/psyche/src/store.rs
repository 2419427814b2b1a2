use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::debug;

use common::{TradeOutcome, TradeResult};

use crate::clock::{Clock, SystemClock};
use crate::state::AgentMentalState;

const CONFIDENCE_MIN: f64 = 20.0;
const CONFIDENCE_MAX: f64 = 95.0;
const BIAS_BOUND: f64 = 20.0;
const BIAS_DECAY_FLOOR: f64 = 0.5;
const FATIGUE_PER_TRADE: f64 = 5.0;
const FATIGUE_PER_SESSION_TRADE: f64 = 1.5;

/// Shared per-agent mental state, keyed by agent id. States are created
/// lazily on first access and reset lazily on the first access of each
/// UTC calendar day.
#[derive(Clone)]
pub struct MentalStateStore {
    states: Arc<RwLock<HashMap<String, AgentMentalState>>>,
    clock: Arc<dyn Clock>,
}

impl MentalStateStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            states: Arc::new(RwLock::new(HashMap::new())),
            clock,
        }
    }

    pub fn with_system_clock() -> Self {
        Self::new(Arc::new(SystemClock))
    }

    /// Snapshot of an agent's state with lazy init and daily reset applied.
    pub async fn state(&self, agent: &str) -> AgentMentalState {
        let today = self.clock.now().date_naive();
        let mut states = self.states.write().await;
        let state = states
            .entry(agent.to_string())
            .or_insert_with(|| AgentMentalState::fresh(today));
        state.apply_daily_reset(today);
        state.clone()
    }

    /// Fold a closed trade back into the agent's psyche: streaks,
    /// confidence, fatigue, risk budget and emotional bias all move here.
    pub async fn record_trade_result(&self, result: &TradeResult) {
        let now = self.clock.now();
        let today = now.date_naive();
        let mut states = self.states.write().await;
        let state = states
            .entry(result.agent.clone())
            .or_insert_with(|| AgentMentalState::fresh(today));
        state.apply_daily_reset(today);

        decay_bias(state, now);

        match result.outcome {
            TradeOutcome::Win => {
                state.win_streak += 1;
                state.loss_streak = 0;
                // Diminishing returns: the gain shrinks as confidence
                // approaches the cap.
                state.confidence += (CONFIDENCE_MAX - state.confidence) * 0.10;
                if result.pnl > 0.0 {
                    state.emotional_bias += 2.0 + (result.pnl / 10.0).min(3.0);
                }
            }
            TradeOutcome::Loss => {
                state.loss_streak += 1;
                state.win_streak = 0;
                // Each consecutive loss hits harder than the last.
                state.confidence -= 4.0 * state.loss_streak as f64;
                state.emotional_bias -= 2.0 + (result.pnl.abs() / 10.0).min(3.0);
            }
        }
        state.confidence = state.confidence.clamp(CONFIDENCE_MIN, CONFIDENCE_MAX);
        state.emotional_bias = state.emotional_bias.clamp(-BIAS_BOUND, BIAS_BOUND);

        state.used_risk_today += result.risk_taken.max(0.0);
        state.daily_risk_budget = (100.0 - state.used_risk_today).max(0.0);

        state.mental_fatigue = (state.mental_fatigue
            + FATIGUE_PER_TRADE
            + state.trades_this_session as f64 * FATIGUE_PER_SESSION_TRADE)
            .min(100.0);
        state.trades_this_session += 1;

        state.last_trade_outcome = Some(result.outcome);
        state.last_trade_pnl = result.pnl;
        state.last_trade_at = Some(now);

        debug!(
            agent = %result.agent,
            outcome = ?result.outcome,
            confidence = state.confidence,
            fatigue = state.mental_fatigue,
            budget = state.daily_risk_budget,
            bias = state.emotional_bias,
            "mental state updated"
        );
    }

    /// Drop all tracked agents (tests and manual resets).
    pub async fn clear(&self) {
        self.states.write().await.clear();
    }
}

/// Bias fades with time away from the market, but never below half its
/// previous strength in a single step.
fn decay_bias(state: &mut AgentMentalState, now: DateTime<Utc>) {
    if let Some(last) = state.last_trade_at {
        let hours = (now - last).num_minutes() as f64 / 60.0;
        let factor = (1.0 - hours / 24.0).max(BIAS_DECAY_FLOOR);
        state.emotional_bias *= factor;
    }
}
