//! Position lifecycle: OPEN positions are swept periodically and closed
//! as take-profit, stop-loss or max-hold-time; every close feeds the
//! agent's aggregate stats and the mental-state tracker.
//!
//! Selling is an external concern behind the [`common::SellExecutor`]
//! seam; a failed sell leaves the position OPEN and the next sweep
//! retries it.

mod book;
mod gate;
mod stats;
mod sweep;

pub use book::PositionBook;
pub use gate::{entry_gate, EntryRejection};
pub use stats::StatsStore;
pub use sweep::PositionMonitor;
