//! The decision engine: folds indicators, patterns, exit-liquidity and
//! narrative reads into one weighted score per agent, filters it through
//! the agent's mental state, and emits an [`common::AgentDecision`].
//!
//! Agent personality is pure data (weights, thresholds, override rules in
//! [`common::AgentProfile`]); no agent id is ever branched on here.

mod engine;
mod factors;

pub use engine::{evaluate, DecisionEngine};
pub use factors::{DecisionInputs, FactorScores};
