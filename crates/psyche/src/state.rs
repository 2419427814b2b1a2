use chrono::{DateTime, NaiveDate, Utc};
use common::TradeOutcome;
use serde::{Deserialize, Serialize};

/// Mutable psychological state for one agent. Clamped invariants:
/// confidence stays in [20, 95], fatigue and risk budget in [0, 100],
/// emotional bias in [-20, 20].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentMentalState {
    /// Remaining daily risk budget, 0-100. Refilled on the first access
    /// of each UTC calendar day.
    pub daily_risk_budget: f64,
    /// Risk consumed since the last daily reset.
    pub used_risk_today: f64,
    /// Self-assessed confidence, 20-95. Starts at 60.
    pub confidence: f64,
    pub win_streak: u32,
    pub loss_streak: u32,
    /// Accumulated fatigue, 0-100. Recovers 30 points per daily reset.
    pub mental_fatigue: f64,
    pub trades_this_session: u32,
    /// Positive = optimism, negative = caution. Bounded to +/-20 and
    /// decayed by hours elapsed between trades.
    pub emotional_bias: f64,
    pub last_trade_outcome: Option<TradeOutcome>,
    pub last_trade_pnl: f64,
    pub last_trade_at: Option<DateTime<Utc>>,
    pub last_reset_day: NaiveDate,
}

impl AgentMentalState {
    pub fn fresh(today: NaiveDate) -> Self {
        Self {
            daily_risk_budget: 100.0,
            used_risk_today: 0.0,
            confidence: 60.0,
            win_streak: 0,
            loss_streak: 0,
            mental_fatigue: 0.0,
            trades_this_session: 0,
            emotional_bias: 0.0,
            last_trade_outcome: None,
            last_trade_pnl: 0.0,
            last_trade_at: None,
            last_reset_day: today,
        }
    }

    /// New calendar day: refill the budget and recover some fatigue.
    /// Streaks, confidence and bias carry across days.
    pub(crate) fn apply_daily_reset(&mut self, today: NaiveDate) {
        if self.last_reset_day == today {
            return;
        }
        self.daily_risk_budget = 100.0;
        self.used_risk_today = 0.0;
        self.mental_fatigue = (self.mental_fatigue - 30.0).max(0.0);
        self.trades_this_session = 0;
        self.last_reset_day = today;
    }
}
