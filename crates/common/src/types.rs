use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One OHLCV bar, oldest-first in every window this core consumes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Candle {
    pub time: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Candle {
    pub fn body(&self) -> f64 {
        (self.close - self.open).abs()
    }

    pub fn range(&self) -> f64 {
        self.high - self.low
    }

    pub fn upper_wick(&self) -> f64 {
        self.high - self.open.max(self.close)
    }

    pub fn lower_wick(&self) -> f64 {
        self.open.min(self.close) - self.low
    }

    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    pub fn is_bearish(&self) -> bool {
        self.close < self.open
    }

    /// (high + low + close) / 3, the VWAP input.
    pub fn typical_price(&self) -> f64 {
        (self.high + self.low + self.close) / 3.0
    }
}

/// Side of a swap against the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeSide {
    Buy,
    Sell,
}

impl std::fmt::Display for TradeSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TradeSide::Buy => write!(f, "BUY"),
            TradeSide::Sell => write!(f, "SELL"),
        }
    }
}

/// A single swap observed on the pool, used for order-flow classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwapTrade {
    pub timestamp: DateTime<Utc>,
    pub side: TradeSide,
    pub base_amount: f64,
    pub price: f64,
    pub trader: String,
}

/// Directional read of a signal or decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Bullish,
    Bearish,
    #[default]
    Neutral,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Bullish => write!(f, "bullish"),
            Direction::Bearish => write!(f, "bearish"),
            Direction::Neutral => write!(f, "neutral"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternCategory {
    Reversal,
    Continuation,
    Bilateral,
    Candlestick,
}

/// A detected chart or candlestick pattern. Ephemeral — recomputed every cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternMatch {
    pub name: String,
    pub category: PatternCategory,
    pub direction: Direction,
    /// 0–100.
    pub confidence: f64,
    pub price_target: Option<f64>,
    pub stop_loss: Option<f64>,
}

/// A fitted line over (bar index, price) points.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TrendLine {
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
}

impl TrendLine {
    pub fn value_at(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelKind {
    Ascending,
    Descending,
    Horizontal,
}

/// Parallel regression channel over the window's highs and lows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelModel {
    pub kind: ChannelKind,
    pub upper: TrendLine,
    pub lower: TrendLine,
    /// Fraction of bars respecting their channel line, 0–1.
    pub strength: f64,
    pub breakout: Option<Direction>,
}

/// Snapshot of token-level market data supplied by external collaborators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenSnapshot {
    pub symbol: String,
    pub price_usd: f64,
    pub liquidity_usd: f64,
    pub market_cap_usd: f64,
    pub holder_count: u64,
    /// Liquidity / market cap, 0–1.
    pub lp_ratio: f64,
    /// 0–100, higher = safer (100 = no scam signals).
    pub scam_risk_score: f64,
    /// 0–100 social activity quality.
    pub social_score: f64,
}

/// Lifecycle stage of the token's narrative, supplied pre-computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NarrativeKind {
    Fresh,
    Growing,
    Peaked,
    Fading,
    Dead,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NarrativeInsight {
    /// 0–100.
    pub score: f64,
    pub kind: NarrativeKind,
    pub likely_scam: bool,
    /// True when social channels show coordinated shill/raid activity.
    pub raid_detected: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExitDifficulty {
    Easy,
    Moderate,
    Hard,
    Impossible,
}

impl std::fmt::Display for ExitDifficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExitDifficulty::Easy => write!(f, "easy"),
            ExitDifficulty::Moderate => write!(f, "moderate"),
            ExitDifficulty::Hard => write!(f, "hard"),
            ExitDifficulty::Impossible => write!(f, "impossible"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    Low,
    Moderate,
    Elevated,
    High,
    Extreme,
}

impl std::fmt::Display for RiskTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskTier::Low => write!(f, "low"),
            RiskTier::Moderate => write!(f, "moderate"),
            RiskTier::Elevated => write!(f, "elevated"),
            RiskTier::High => write!(f, "high"),
            RiskTier::Extreme => write!(f, "extreme"),
        }
    }
}

/// Result of the constant-product exit analysis for one (liquidity, size) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExitLiquidityProfile {
    pub can_exit: bool,
    pub exit_difficulty: ExitDifficulty,
    /// Base price impact of selling the full position, percent.
    pub price_impact_pct: f64,
    /// Impact under panic-sell conditions, percent (capped at 100).
    pub worst_case_impact_pct: f64,
    /// Largest size exiting under the safe slippage target.
    pub max_safe_size: f64,
    /// Largest size exiting under the acceptable slippage target.
    pub recommended_size: f64,
    /// Sweeps needed to unwind at the per-tick liquidity cap.
    pub estimated_exit_time_units: u32,
    /// 0–100 blend of LP ratio, absolute liquidity and position ratio.
    pub liquidity_score: f64,
    pub risk_tier: RiskTier,
}

/// Outcome of a completed trade, fed back into the mental state tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeOutcome {
    Win,
    Loss,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeResult {
    pub agent: String,
    pub outcome: TradeOutcome,
    /// Realized pnl as a percent of entry value, NOT dollars. The mental
    /// state tracker's bias and large-loss rules key off percent magnitudes.
    pub pnl: f64,
    /// Risk budget consumed by the trade, 0–100 scale.
    pub risk_taken: f64,
}

/// The engine's verdict for one (agent, token) evaluation cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentDecision {
    pub agent: String,
    pub token: String,
    pub opinion: Direction,
    /// 0–95.
    pub confidence: f64,
    /// Always within [0.3, 1.5].
    pub position_size_multiplier: f64,
    pub should_trade: bool,
    pub skip_reason: Option<String>,
    /// At most four entries, most significant first.
    pub reasoning: Vec<String>,
}

impl AgentDecision {
    /// Structured skip outcome — neutral opinion, zero confidence.
    pub fn skip(agent: impl Into<String>, token: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            agent: agent.into(),
            token: token.into(),
            opinion: Direction::Neutral,
            confidence: 0.0,
            position_size_multiplier: 0.3,
            should_trade: false,
            skip_reason: Some(reason.into()),
            reasoning: Vec::new(),
        }
    }
}

/// Lifecycle of a monitored position. Closed states are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionState {
    Open,
    ClosedTp,
    ClosedSl,
    ClosedTime,
}

impl PositionState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, PositionState::Open)
    }
}

impl std::fmt::Display for PositionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PositionState::Open => write!(f, "open"),
            PositionState::ClosedTp => write!(f, "closed_tp"),
            PositionState::ClosedSl => write!(f, "closed_sl"),
            PositionState::ClosedTime => write!(f, "closed_time"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CloseReason {
    TakeProfit,
    StopLoss,
    MaxHoldTime,
}

impl std::fmt::Display for CloseReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CloseReason::TakeProfit => write!(f, "take_profit"),
            CloseReason::StopLoss => write!(f, "stop_loss"),
            CloseReason::MaxHoldTime => write!(f, "max_hold_time"),
        }
    }
}

/// A position owned and mutated only by the position monitor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenPosition {
    pub id: String,
    pub token: String,
    pub agent: String,
    /// Base-token amount held.
    pub amount: f64,
    /// USD value at entry.
    pub entry_value: f64,
    pub opened_at: DateTime<Utc>,
    pub state: PositionState,
    pub exit_value: Option<f64>,
    pub exit_pnl_pct: Option<f64>,
    pub closed_at: Option<DateTime<Utc>>,
}

impl OpenPosition {
    pub fn open(
        token: impl Into<String>,
        agent: impl Into<String>,
        amount: f64,
        entry_value: f64,
        opened_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            token: token.into(),
            agent: agent.into(),
            amount,
            entry_value,
            opened_at,
            state: PositionState::Open,
            exit_value: None,
            exit_pnl_pct: None,
            closed_at: None,
        }
    }
}

/// Close request handed to the external sell executor on a state transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloseRequest {
    pub position_id: String,
    pub token: String,
    pub agent: String,
    pub exit_value: f64,
    pub pnl_pct: f64,
    pub reason: CloseReason,
}

/// Running aggregate stats per agent, updated by the position monitor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgentStats {
    pub trades: u64,
    pub wins: u64,
    pub losses: u64,
    /// 0–1.
    pub win_rate: f64,
    /// Cumulative realized pnl in USD (exit value minus entry value).
    pub total_pnl: f64,
    /// Positive = consecutive wins, negative = consecutive losses.
    pub current_streak: i64,
    pub best_streak: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn candle_anatomy() {
        let c = Candle {
            time: Utc::now(),
            open: 10.0,
            high: 14.0,
            low: 9.0,
            close: 12.0,
            volume: 100.0,
        };
        assert!(c.is_bullish());
        assert_eq!(c.body(), 2.0);
        assert_eq!(c.upper_wick(), 2.0);
        assert_eq!(c.lower_wick(), 1.0);
        assert_eq!(c.range(), 5.0);
    }

    #[test]
    fn skip_decision_is_neutral_and_non_trading() {
        let d = AgentDecision::skip("scout", "PEPE", "mental fatigue");
        assert_eq!(d.opinion, Direction::Neutral);
        assert_eq!(d.confidence, 0.0);
        assert!(!d.should_trade);
        assert!(d.skip_reason.is_some());
    }

    #[test]
    fn closed_states_are_terminal() {
        assert!(!PositionState::Open.is_terminal());
        assert!(PositionState::ClosedTp.is_terminal());
        assert!(PositionState::ClosedSl.is_terminal());
        assert!(PositionState::ClosedTime.is_terminal());
    }
}
