use serde::{Deserialize, Serialize};

/// Runtime configuration loaded from environment variables at startup.
/// Missing required variables cause an immediate panic with a clear message.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the agent-profile TOML file.
    pub agents_config_path: String,
    /// Seed for the decision engine's intuition source. `None` = OS entropy.
    pub intuition_seed: Option<u64>,
}

impl Config {
    /// Load configuration from environment variables, reading `.env` if present.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv(); // ignore error if .env not present

        Config {
            agents_config_path: optional_env("AGENTS_CONFIG_PATH")
                .unwrap_or_else(|| "config/agents.toml".to_string()),
            intuition_seed: optional_env("INTUITION_SEED").and_then(|v| v.parse().ok()),
        }
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Position-lifecycle and entry-cap policy knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TradingPolicy {
    /// PnL% at which a position is closed as take-profit.
    pub take_profit_pct: f64,
    /// PnL% (negative) at which a position is closed as stop-loss.
    pub stop_loss_pct: f64,
    /// Hours after which a position is closed regardless of PnL.
    pub max_hold_hours: f64,
    pub max_open_positions: usize,
    pub max_daily_trades: usize,
    pub max_total_invested: f64,
    pub sweep_interval_secs: u64,
}

impl Default for TradingPolicy {
    fn default() -> Self {
        Self {
            take_profit_pct: 50.0,
            stop_loss_pct: -30.0,
            max_hold_hours: 24.0,
            max_open_positions: 5,
            max_daily_trades: 10,
            max_total_invested: 1_000.0,
            sweep_interval_secs: 60,
        }
    }
}

/// Heuristic constants of the exit-liquidity model. Tunable, not invariants.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LiquidityTuning {
    /// Impact multiplier under panic-sell conditions.
    pub panic_sell_multiplier: f64,
    /// Fraction of pool liquidity sellable per sweep without moving the market.
    pub exit_per_tick_ratio: f64,
    /// Slippage target defining the maximum safe position size.
    pub safe_slippage: f64,
    /// Slippage target defining the recommended position size.
    pub acceptable_slippage: f64,
}

impl Default for LiquidityTuning {
    fn default() -> Self {
        Self {
            panic_sell_multiplier: 2.5,
            exit_per_tick_ratio: 0.02,
            safe_slippage: 0.02,
            acceptable_slippage: 0.05,
        }
    }
}

/// Heuristic constants of the order-flow classifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderFlowTuning {
    /// Trade-size percentile above which an order counts as large.
    pub whale_percentile: f64,
    /// One side's large-order volume must exceed the other's by this factor.
    pub whale_dominance_ratio: f64,
}

impl Default for OrderFlowTuning {
    fn default() -> Self {
        Self {
            whale_percentile: 0.90,
            whale_dominance_ratio: 1.5,
        }
    }
}

/// Fixed per-agent personality traits, all in [0, 1].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonalityTraits {
    /// Higher = fatigue accumulates slower and penalizes less.
    pub fatigue_resistance: f64,
    /// Higher = larger positions under the same modifiers.
    pub risk_tolerance: f64,
    /// Higher = emotional bias and intuition sway the score less.
    pub emotional_stability: f64,
    /// Higher = stronger chase of fresh narratives.
    pub fomo_proneness: f64,
}

impl Default for PersonalityTraits {
    fn default() -> Self {
        Self {
            fatigue_resistance: 0.5,
            risk_tolerance: 0.5,
            emotional_stability: 0.5,
            fomo_proneness: 0.5,
        }
    }
}

/// Weighting of the seven decision factors. Should sum to ~1.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct DecisionWeights {
    pub holders: f64,
    pub ta: f64,
    pub liquidity: f64,
    pub momentum: f64,
    pub narrative: f64,
    pub exit_safety: f64,
    pub scam_safety: f64,
}

impl Default for DecisionWeights {
    fn default() -> Self {
        Self {
            holders: 0.10,
            ta: 0.25,
            liquidity: 0.15,
            momentum: 0.15,
            narrative: 0.15,
            exit_safety: 0.10,
            scam_safety: 0.10,
        }
    }
}

impl DecisionWeights {
    pub fn sum(&self) -> f64 {
        self.holders
            + self.ta
            + self.liquidity
            + self.momentum
            + self.narrative
            + self.exit_safety
            + self.scam_safety
    }
}

/// Post-classification override rules, selected per agent in config.
/// Adding an agent archetype means adding rules here, not branching on ids.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum OverrideRule {
    /// Force a high-confidence bearish call when exit risk is extreme.
    ForceBearishOnExtremeExitRisk,
    /// Halve bullish confidence when exit risk is high.
    DampBullishOnHighExitRisk,
    /// Force neutral when the narrative is dead or scored below the floor.
    ForceNeutralOnDeadNarrative { floor: f64 },
    /// Boost confidence on a fresh narrative with strong social signal.
    AmplifyOnFreshNarrative { social_floor: f64 },
    /// Fade the crowd at sentiment extremes.
    ContrarianFadeExtremes,
}

/// One agent's full decision personality.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentProfile {
    pub id: String,
    #[serde(default)]
    pub weights: DecisionWeights,
    /// Raw score above which the agent leans bullish.
    #[serde(default = "default_bullish_threshold")]
    pub bullish_threshold: f64,
    /// Raw score below which the agent leans bearish.
    #[serde(default = "default_bearish_threshold")]
    pub bearish_threshold: f64,
    #[serde(default)]
    pub traits: PersonalityTraits,
    #[serde(default)]
    pub overrides: Vec<OverrideRule>,
}

fn default_bullish_threshold() -> f64 {
    65.0
}

fn default_bearish_threshold() -> f64 {
    35.0
}

/// Top-level agent config file (TOML).
///
/// Example `config/agents.toml`:
/// ```toml
/// [policy]
/// take_profit_pct = 50.0
/// stop_loss_pct = -30.0
///
/// [[agent]]
/// id = "sentinel"
/// bullish_threshold = 70.0
///
/// [agent.weights]
/// exit_safety = 0.25
/// ta = 0.20
///
/// [[agent.overrides]]
/// rule = "force_bearish_on_extreme_exit_risk"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentsFileConfig {
    #[serde(rename = "agent")]
    pub agents: Vec<AgentProfile>,
    #[serde(default)]
    pub policy: TradingPolicy,
    #[serde(default)]
    pub liquidity: LiquidityTuning,
    #[serde(default)]
    pub order_flow: OrderFlowTuning,
}

impl AgentsFileConfig {
    /// Load from a TOML file. Exits process on error.
    pub fn load(path: &str) -> Self {
        let content = std::fs::read_to_string(path)
            .unwrap_or_else(|e| panic!("Failed to read agent config at '{path}': {e}"));
        toml::from_str(&content)
            .unwrap_or_else(|e| panic!("Failed to parse agent config at '{path}': {e}"))
    }

    pub fn profile(&self, agent_id: &str) -> Option<&AgentProfile> {
        self.agents.iter().find(|a| a.id == agent_id)
    }
}
