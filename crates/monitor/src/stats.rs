use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use tokio::sync::RwLock;

use common::{AgentStats, TradeOutcome};

#[derive(Debug, Clone, Default)]
struct AgentEntry {
    stats: AgentStats,
    day: Option<NaiveDate>,
    trades_today: usize,
}

/// Per-agent aggregate stats plus the daily open counter the entry gate
/// checks against.
#[derive(Clone, Default)]
pub struct StatsStore {
    inner: Arc<RwLock<HashMap<String, AgentEntry>>>,
}

impl StatsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn stats(&self, agent: &str) -> AgentStats {
        self.inner
            .read()
            .await
            .get(agent)
            .map(|e| e.stats.clone())
            .unwrap_or_default()
    }

    /// Count an opened trade against the agent's daily allowance.
    pub async fn record_open(&self, agent: &str, today: NaiveDate) {
        let mut inner = self.inner.write().await;
        let entry = inner.entry(agent.to_string()).or_default();
        if entry.day != Some(today) {
            entry.day = Some(today);
            entry.trades_today = 0;
        }
        entry.trades_today += 1;
    }

    pub async fn trades_today(&self, agent: &str, today: NaiveDate) -> usize {
        self.inner
            .read()
            .await
            .get(agent)
            .filter(|e| e.day == Some(today))
            .map(|e| e.trades_today)
            .unwrap_or(0)
    }

    /// Fold a closed trade into the running aggregates. `pnl` is absolute
    /// dollars (exit minus entry), unlike `TradeResult.pnl` which is a
    /// percent of entry value.
    pub async fn record_close(&self, agent: &str, outcome: TradeOutcome, pnl: f64) -> AgentStats {
        let mut inner = self.inner.write().await;
        let entry = inner.entry(agent.to_string()).or_default();
        let stats = &mut entry.stats;

        stats.trades += 1;
        stats.total_pnl += pnl;
        match outcome {
            TradeOutcome::Win => {
                stats.wins += 1;
                stats.current_streak = stats.current_streak.max(0) + 1;
                stats.best_streak = stats.best_streak.max(stats.current_streak);
            }
            TradeOutcome::Loss => {
                stats.losses += 1;
                stats.current_streak = stats.current_streak.min(0) - 1;
            }
        }
        stats.win_rate = stats.wins as f64 / stats.trades as f64;
        stats.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    #[tokio::test]
    async fn streaks_and_win_rate_track_closes() {
        let store = StatsStore::new();
        store.record_close("degen-1", TradeOutcome::Win, 20.0).await;
        store.record_close("degen-1", TradeOutcome::Win, 10.0).await;
        store
            .record_close("degen-1", TradeOutcome::Loss, -15.0)
            .await;
        let stats = store
            .record_close("degen-1", TradeOutcome::Loss, -5.0)
            .await;

        assert_eq!(stats.trades, 4);
        assert_eq!(stats.wins, 2);
        assert_eq!(stats.losses, 2);
        assert_eq!(stats.win_rate, 0.5);
        assert_eq!(stats.total_pnl, 10.0);
        assert_eq!(stats.current_streak, -2);
        assert_eq!(stats.best_streak, 2);
    }

    #[tokio::test]
    async fn daily_counter_resets_across_days() {
        let store = StatsStore::new();
        store.record_open("ape-2", day(1)).await;
        store.record_open("ape-2", day(1)).await;
        assert_eq!(store.trades_today("ape-2", day(1)).await, 2);

        store.record_open("ape-2", day(2)).await;
        assert_eq!(store.trades_today("ape-2", day(2)).await, 1);
        // Asking about a stale day reads zero rather than old counts.
        assert_eq!(store.trades_today("ape-2", day(1)).await, 0);
    }
}
