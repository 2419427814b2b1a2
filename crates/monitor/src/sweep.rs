use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, RwLock};
use tracing::{debug, info, warn};

use common::{
    CloseReason, CloseRequest, OpenPosition, PositionState, SellExecutor, TradeOutcome,
    TradeResult, TradingPolicy,
};

use crate::book::PositionBook;
use crate::stats::StatsStore;

/// Pause between positions within one sweep. Rate-limit courtesy toward
/// the sell path, not a correctness requirement.
const INTER_POSITION_DELAY_MS: u64 = 100;

/// Periodic sweeper over OPEN positions. One logical loop; an atomic
/// in-progress flag drops ticks that arrive while a sweep is running.
pub struct PositionMonitor {
    book: PositionBook,
    stats: StatsStore,
    policy: TradingPolicy,
    executor: Arc<dyn SellExecutor>,
    results_tx: mpsc::Sender<TradeResult>,
    prices: Arc<RwLock<HashMap<String, f64>>>,
    sweeping: AtomicBool,
    stopped: AtomicBool,
}

impl PositionMonitor {
    pub fn new(
        book: PositionBook,
        stats: StatsStore,
        policy: TradingPolicy,
        executor: Arc<dyn SellExecutor>,
        results_tx: mpsc::Sender<TradeResult>,
    ) -> Self {
        Self {
            book,
            stats,
            policy,
            executor,
            results_tx,
            prices: Arc::new(RwLock::new(HashMap::new())),
            sweeping: AtomicBool::new(false),
            stopped: AtomicBool::new(false),
        }
    }

    /// Latest observed price per token, fed by the market loop.
    pub async fn update_price(&self, token: &str, price: f64) {
        self.prices.write().await.insert(token.to_string(), price);
    }

    /// Prevent future sweeps from being scheduled. A sweep already in
    /// flight completes normally.
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }

    /// Drive sweeps at the configured interval until stopped.
    pub async fn run(self: Arc<Self>) {
        info!(
            interval_secs = self.policy.sweep_interval_secs,
            "position monitor running"
        );
        let mut ticker = tokio::time::interval(std::time::Duration::from_secs(
            self.policy.sweep_interval_secs.max(1),
        ));
        loop {
            ticker.tick().await;
            if self.stopped.load(Ordering::SeqCst) {
                info!("position monitor stopped");
                return;
            }
            self.sweep(Utc::now()).await;
        }
    }

    /// One sweep pass. Returns false when another sweep was already in
    /// progress and this one was skipped.
    pub async fn sweep(&self, now: DateTime<Utc>) -> bool {
        if self
            .sweeping
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("sweep already in progress, skipping tick");
            return false;
        }

        let open = self.book.open_positions().await;
        let prices = self.prices.read().await.clone();
        for (i, position) in open.iter().enumerate() {
            if i > 0 {
                tokio::time::sleep(std::time::Duration::from_millis(INTER_POSITION_DELAY_MS))
                    .await;
            }
            let Some(&price) = prices.get(&position.token) else {
                debug!(token = %position.token, "no price this sweep");
                continue;
            };
            self.check_position(position, position.amount * price, now)
                .await;
        }

        self.sweeping.store(false, Ordering::SeqCst);
        true
    }

    /// Evaluate one position against the policy and close it if a rule
    /// fires. TP takes precedence over SL over max-hold-time.
    async fn check_position(&self, position: &OpenPosition, current_value: f64, now: DateTime<Utc>) {
        // Unknown entry value means unknown pnl. Skip, never divide.
        if position.entry_value <= 0.0 {
            warn!(id = %position.id, "position has no entry value, skipping");
            return;
        }
        let pnl_pct = (current_value - position.entry_value) / position.entry_value * 100.0;
        let held_hours = (now - position.opened_at).num_minutes() as f64 / 60.0;

        let reason = if pnl_pct >= self.policy.take_profit_pct {
            CloseReason::TakeProfit
        } else if pnl_pct <= self.policy.stop_loss_pct {
            CloseReason::StopLoss
        } else if held_hours >= self.policy.max_hold_hours {
            CloseReason::MaxHoldTime
        } else {
            return;
        };

        let request = CloseRequest {
            position_id: position.id.clone(),
            token: position.token.clone(),
            agent: position.agent.clone(),
            exit_value: current_value,
            pnl_pct,
            reason,
        };

        let receipt = match self.executor.sell(&request).await {
            Ok(receipt) => receipt,
            Err(e) => {
                // Stays OPEN; next sweep retries.
                warn!(id = %position.id, error = %e, "sell failed, position stays open");
                return;
            }
        };

        let state = match reason {
            CloseReason::TakeProfit => PositionState::ClosedTp,
            CloseReason::StopLoss => PositionState::ClosedSl,
            CloseReason::MaxHoldTime => PositionState::ClosedTime,
        };
        if !self
            .book
            .close(&position.id, state, receipt.exit_value, pnl_pct, now)
            .await
        {
            warn!(id = %position.id, "position vanished or already closed");
            return;
        }

        let pnl = receipt.exit_value - position.entry_value;
        let outcome = if pnl >= 0.0 {
            TradeOutcome::Win
        } else {
            TradeOutcome::Loss
        };
        let stats = self
            .stats
            .record_close(&position.agent, outcome, pnl)
            .await;
        info!(
            id = %position.id,
            agent = %position.agent,
            token = %position.token,
            %reason,
            pnl_pct,
            win_rate = stats.win_rate,
            "position closed"
        );

        let result = TradeResult {
            agent: position.agent.clone(),
            outcome,
            pnl: pnl_pct,
            // Risk-budget units: share of the total-invested cap this
            // position tied up, on a 0-100 scale.
            risk_taken: (position.entry_value / self.policy.max_total_invested * 100.0)
                .clamp(0.0, 100.0),
        };
        if self.results_tx.send(result).await.is_err() {
            warn!("trade result channel closed");
        }
    }
}
