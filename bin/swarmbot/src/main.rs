use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use common::{
    AgentsFileConfig, Candle, CloseRequest, Config, NarrativeInsight, OpenPosition, SellExecutor,
    SellReceipt, SwapTrade, TokenSnapshot, TradeResult,
};
use decision::{evaluate, DecisionInputs};
use indicators::IndicatorSummary;
use monitor::{entry_gate, PositionBook, PositionMonitor, StatsStore};
use psyche::MentalStateStore;

/// One token's worth of market data for an evaluation cycle, produced by
/// an external collector and fed through the in-process channel.
#[derive(Debug, Clone)]
struct MarketCycle {
    snapshot: TokenSnapshot,
    candles: Vec<Candle>,
    trades: Vec<SwapTrade>,
    narrative: NarrativeInsight,
}

/// Paper-mode sell path: always fills at the requested exit value.
struct PaperSellExecutor;

#[async_trait]
impl SellExecutor for PaperSellExecutor {
    async fn sell(&self, request: &CloseRequest) -> common::Result<SellReceipt> {
        Ok(SellReceipt {
            position_id: request.position_id.clone(),
            tx_ref: format!("paper-{}", uuid::Uuid::new_v4()),
            exit_value: request.exit_value,
            timestamp: Utc::now(),
        })
    }
}

#[tokio::main]
async fn main() {
    // ── Logging ──────────────────────────────────────────────────────────────
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse().unwrap()))
        .init();

    // ── Config ───────────────────────────────────────────────────────────────
    let cfg = Config::from_env();
    let agents_file = AgentsFileConfig::load(&cfg.agents_config_path);
    let policy = agents_file.policy.clone();
    info!(
        agents = agents_file.agents.len(),
        config = %cfg.agents_config_path,
        "SwarmBot starting"
    );

    // ── Shared stores ────────────────────────────────────────────────────────
    let psyche_store = MentalStateStore::with_system_clock();
    let book = PositionBook::new();
    let stats = StatsStore::new();

    // ── Position monitor ─────────────────────────────────────────────────────
    let (results_tx, mut results_rx) = mpsc::channel::<TradeResult>(128);
    let position_monitor = Arc::new(PositionMonitor::new(
        book.clone(),
        stats.clone(),
        policy.clone(),
        Arc::new(PaperSellExecutor),
        results_tx,
    ));
    let monitor_handle = tokio::spawn(position_monitor.clone().run());

    // ── Closed trades feed the psyche store ──────────────────────────────────
    let feedback_store = psyche_store.clone();
    tokio::spawn(async move {
        while let Some(result) = results_rx.recv().await {
            feedback_store.record_trade_result(&result).await;
        }
    });

    // ── Market cycle channel ─────────────────────────────────────────────────
    // The sender side belongs to whatever data collector is wired in; kept
    // alive here so the loop below does not exit immediately.
    let (cycle_tx, mut cycle_rx) = mpsc::channel::<MarketCycle>(128);
    let _collector_handle = cycle_tx;

    let mut rng: StdRng = match cfg.intuition_seed {
        Some(seed) => {
            info!(seed, "intuition seeded from environment");
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    };

    // Default stake per entry: an even split of the invested cap.
    let proposed_size = policy.max_total_invested / policy.max_open_positions.max(1) as f64;

    // ── Evaluation loop ──────────────────────────────────────────────────────
    loop {
        let cycle = tokio::select! {
            cycle = cycle_rx.recv() => match cycle {
                Some(cycle) => cycle,
                None => break,
            },
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown signal received");
                break;
            }
        };

        evaluate_cycle(
            cycle,
            &agents_file,
            proposed_size,
            &psyche_store,
            &book,
            &stats,
            &position_monitor,
            &mut rng,
        )
        .await;
    }

    position_monitor.stop();
    let _ = monitor_handle.await;
    info!("SwarmBot stopped");
}

/// One token's evaluation cycle: price update, analysis, per-agent
/// decisions, entries. A token that fails the fast-path liquidity gate is
/// watch-only — no agent may open a position in it this cycle.
#[allow(clippy::too_many_arguments)]
async fn evaluate_cycle(
    cycle: MarketCycle,
    agents_file: &AgentsFileConfig,
    proposed_size: f64,
    psyche_store: &MentalStateStore,
    book: &PositionBook,
    stats: &StatsStore,
    position_monitor: &PositionMonitor,
    rng: &mut StdRng,
) {
    let policy = &agents_file.policy;
    let token = cycle.snapshot.symbol.clone();
    position_monitor
        .update_price(&token, cycle.snapshot.price_usd)
        .await;

    if let Err(rejection) = liquidity::entry_gate(&cycle.snapshot, proposed_size) {
        info!(%token, %rejection, "token fails the liquidity gate, watching only");
        return;
    }

    let summary = IndicatorSummary::compute(&cycle.candles, &cycle.trades, &agents_file.order_flow);
    let matches = patterns::scan(&cycle.candles);
    let channel = patterns::detect_channel(&cycle.candles);
    let signal = patterns::dominant_signal(&matches, channel.as_ref());
    let exit = liquidity::analyze(
        cycle.snapshot.liquidity_usd,
        proposed_size,
        cycle.snapshot.lp_ratio,
        &agents_file.liquidity,
    );

    let inputs = DecisionInputs {
        snapshot: cycle.snapshot,
        indicators: summary,
        patterns: signal,
        exit,
        narrative: cycle.narrative,
        proposed_size,
    };

    for profile in &agents_file.agents {
        let mental = psyche_store.state(&profile.id).await;
        let decision = evaluate(profile, &inputs, &mental, &mut *rng);
        info!(
            agent = %profile.id,
            %token,
            opinion = %decision.opinion,
            confidence = decision.confidence,
            should_trade = decision.should_trade,
            "cycle decision"
        );

        if !decision.should_trade {
            continue;
        }

        let stake = proposed_size * decision.position_size_multiplier;
        match entry_gate(&profile.id, stake, policy, book, stats, Utc::now().date_naive()).await {
            Ok(()) => {
                let amount = stake / inputs.snapshot.price_usd.max(f64::EPSILON);
                let position = OpenPosition::open(&token, &profile.id, amount, stake, Utc::now());
                info!(agent = %profile.id, %token, stake, id = %position.id, "opening position");
                book.insert(position).await;
                stats.record_open(&profile.id, Utc::now().date_naive()).await;
            }
            Err(rejection) => {
                warn!(agent = %profile.id, %token, %rejection, "entry refused");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{
        AgentProfile, DecisionWeights, LiquidityTuning, NarrativeKind, OrderFlowTuning,
        TradingPolicy,
    };

    /// Agent that takes anything: a zero bullish threshold makes every
    /// non-skip cycle a confident buy.
    fn eager_agent() -> AgentProfile {
        AgentProfile {
            id: "eager".to_string(),
            weights: DecisionWeights::default(),
            bullish_threshold: 0.0,
            bearish_threshold: -1.0,
            traits: Default::default(),
            overrides: Vec::new(),
        }
    }

    fn roster() -> AgentsFileConfig {
        AgentsFileConfig {
            agents: vec![eager_agent()],
            policy: TradingPolicy::default(),
            liquidity: LiquidityTuning::default(),
            order_flow: OrderFlowTuning::default(),
        }
    }

    fn snapshot(liquidity_usd: f64, lp_ratio: f64) -> TokenSnapshot {
        TokenSnapshot {
            symbol: "WIF".to_string(),
            price_usd: 1.0,
            liquidity_usd,
            market_cap_usd: liquidity_usd / lp_ratio.max(f64::EPSILON),
            holder_count: 5_000,
            lp_ratio,
            scam_risk_score: 90.0,
            social_score: 70.0,
        }
    }

    fn cycle(snapshot: TokenSnapshot) -> MarketCycle {
        MarketCycle {
            snapshot,
            candles: Vec::new(),
            trades: Vec::new(),
            narrative: NarrativeInsight {
                score: 70.0,
                kind: NarrativeKind::Growing,
                likely_scam: false,
                raid_detected: false,
            },
        }
    }

    fn harness() -> (PositionBook, StatsStore, Arc<PositionMonitor>, MentalStateStore) {
        let book = PositionBook::new();
        let stats = StatsStore::new();
        let (results_tx, _results_rx) = mpsc::channel(8);
        let monitor = Arc::new(PositionMonitor::new(
            book.clone(),
            stats.clone(),
            TradingPolicy::default(),
            Arc::new(PaperSellExecutor),
            results_tx,
        ));
        (book, stats, monitor, MentalStateStore::with_system_clock())
    }

    #[tokio::test]
    async fn gated_token_is_watch_only() {
        let (book, stats, monitor, psyche_store) = harness();
        let mut rng = StdRng::seed_from_u64(9);

        // Deep pool first, proving the eager agent does open positions.
        evaluate_cycle(
            cycle(snapshot(500_000.0, 0.12)),
            &roster(),
            200.0,
            &psyche_store,
            &book,
            &stats,
            &monitor,
            &mut rng,
        )
        .await;
        assert_eq!(book.open_count("eager").await, 1);

        // Thin pool: the gate rejects and the whole cycle stays watch-only
        // even though the same agent would have traded it.
        evaluate_cycle(
            cycle(snapshot(150.0, 0.01)),
            &roster(),
            200.0,
            &psyche_store,
            &book,
            &stats,
            &monitor,
            &mut rng,
        )
        .await;
        assert_eq!(book.open_count("eager").await, 1);
        assert_eq!(
            stats
                .trades_today("eager", Utc::now().date_naive())
                .await,
            1
        );
    }
}
