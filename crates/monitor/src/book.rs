use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use common::{OpenPosition, PositionState};

/// Shared store of positions keyed by id. The monitor is the only writer
/// of state transitions; closed states are terminal.
#[derive(Clone, Default)]
pub struct PositionBook {
    positions: Arc<RwLock<HashMap<String, OpenPosition>>>,
}

impl PositionBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, position: OpenPosition) {
        self.positions
            .write()
            .await
            .insert(position.id.clone(), position);
    }

    pub async fn get(&self, id: &str) -> Option<OpenPosition> {
        self.positions.read().await.get(id).cloned()
    }

    /// Snapshot of every position still OPEN, for a sweep pass.
    pub async fn open_positions(&self) -> Vec<OpenPosition> {
        self.positions
            .read()
            .await
            .values()
            .filter(|p| p.state == PositionState::Open)
            .cloned()
            .collect()
    }

    pub async fn open_count(&self, agent: &str) -> usize {
        self.positions
            .read()
            .await
            .values()
            .filter(|p| p.state == PositionState::Open && p.agent == agent)
            .count()
    }

    /// Sum of entry values across the agent's OPEN positions.
    pub async fn total_invested(&self, agent: &str) -> f64 {
        self.positions
            .read()
            .await
            .values()
            .filter(|p| p.state == PositionState::Open && p.agent == agent)
            .map(|p| p.entry_value)
            .sum()
    }

    /// Apply a terminal transition. Returns false if the position is
    /// missing or already closed, so a stale sweep can't double-close.
    pub async fn close(
        &self,
        id: &str,
        state: PositionState,
        exit_value: f64,
        pnl_pct: f64,
        closed_at: DateTime<Utc>,
    ) -> bool {
        debug_assert!(state.is_terminal());
        let mut positions = self.positions.write().await;
        match positions.get_mut(id) {
            Some(p) if p.state == PositionState::Open => {
                p.state = state;
                p.exit_value = Some(exit_value);
                p.exit_pnl_pct = Some(pnl_pct);
                p.closed_at = Some(closed_at);
                true
            }
            _ => false,
        }
    }
}
