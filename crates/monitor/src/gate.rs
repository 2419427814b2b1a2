use chrono::NaiveDate;
use thiserror::Error;

use common::TradingPolicy;

use crate::book::PositionBook;
use crate::stats::StatsStore;

/// Why an entry was refused. Specific on purpose: the executor relays the
/// reason back to the agent layer instead of a generic "no".
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EntryRejection {
    #[error("daily trade limit reached ({count}/{max})")]
    DailyTradeLimit { count: usize, max: usize },
    #[error("too many open positions ({count}/{max})")]
    OpenPositionLimit { count: usize, max: usize },
    #[error("total invested cap reached (${invested:.2} + ${proposed:.2} > ${max:.2})")]
    InvestedCap {
        invested: f64,
        proposed: f64,
        max: f64,
    },
}

/// All three caps must have headroom for the entry to pass.
pub async fn entry_gate(
    agent: &str,
    proposed_value: f64,
    policy: &TradingPolicy,
    book: &PositionBook,
    stats: &StatsStore,
    today: NaiveDate,
) -> Result<(), EntryRejection> {
    let count = stats.trades_today(agent, today).await;
    if count >= policy.max_daily_trades {
        return Err(EntryRejection::DailyTradeLimit {
            count,
            max: policy.max_daily_trades,
        });
    }

    let open = book.open_count(agent).await;
    if open >= policy.max_open_positions {
        return Err(EntryRejection::OpenPositionLimit {
            count: open,
            max: policy.max_open_positions,
        });
    }

    let invested = book.total_invested(agent).await;
    if invested + proposed_value > policy.max_total_invested {
        return Err(EntryRejection::InvestedCap {
            invested,
            proposed: proposed_value,
            max: policy.max_total_invested,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use common::OpenPosition;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()
    }

    fn policy() -> TradingPolicy {
        TradingPolicy {
            max_daily_trades: 2,
            max_open_positions: 2,
            max_total_invested: 500.0,
            ..TradingPolicy::default()
        }
    }

    #[tokio::test]
    async fn fresh_agent_passes() {
        let book = PositionBook::new();
        let stats = StatsStore::new();
        let verdict = entry_gate("degen-1", 100.0, &policy(), &book, &stats, today()).await;
        assert_eq!(verdict, Ok(()));
    }

    #[tokio::test]
    async fn daily_cap_names_itself() {
        let book = PositionBook::new();
        let stats = StatsStore::new();
        stats.record_open("degen-1", today()).await;
        stats.record_open("degen-1", today()).await;

        let verdict = entry_gate("degen-1", 100.0, &policy(), &book, &stats, today()).await;
        assert_eq!(
            verdict,
            Err(EntryRejection::DailyTradeLimit { count: 2, max: 2 })
        );
    }

    #[tokio::test]
    async fn open_position_cap_names_itself() {
        let book = PositionBook::new();
        let stats = StatsStore::new();
        for _ in 0..2 {
            book.insert(OpenPosition::open("WIF", "degen-1", 10.0, 100.0, Utc::now()))
                .await;
        }

        let verdict = entry_gate("degen-1", 100.0, &policy(), &book, &stats, today()).await;
        assert_eq!(
            verdict,
            Err(EntryRejection::OpenPositionLimit { count: 2, max: 2 })
        );
    }

    #[tokio::test]
    async fn invested_cap_counts_the_proposed_entry() {
        let book = PositionBook::new();
        let stats = StatsStore::new();
        book.insert(OpenPosition::open("WIF", "degen-1", 10.0, 450.0, Utc::now()))
            .await;

        let verdict = entry_gate("degen-1", 100.0, &policy(), &book, &stats, today()).await;
        assert!(matches!(verdict, Err(EntryRejection::InvestedCap { .. })));

        // A smaller entry under the same book still fits.
        let verdict = entry_gate("degen-1", 40.0, &policy(), &book, &stats, today()).await;
        assert_eq!(verdict, Ok(()));

        // Another agent's book is irrelevant.
        let verdict = entry_gate("ape-2", 100.0, &policy(), &book, &stats, today()).await;
        assert_eq!(verdict, Ok(()));
    }
}
