pub mod config;
pub mod error;
pub mod executor;
pub mod types;

pub use config::{
    AgentProfile, AgentsFileConfig, Config, DecisionWeights, LiquidityTuning, OrderFlowTuning,
    OverrideRule, PersonalityTraits, TradingPolicy,
};
pub use error::{Error, Result};
pub use executor::{SellExecutor, SellReceipt};
pub use types::*;
