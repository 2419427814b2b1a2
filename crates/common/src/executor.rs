use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::{CloseRequest, Result};

/// Receipt returned by the external sell executor.
#[derive(Debug, Clone)]
pub struct SellReceipt {
    pub position_id: String,
    /// Opaque transaction reference from the executor.
    pub tx_ref: String,
    pub exit_value: f64,
    pub timestamp: DateTime<Utc>,
}

/// Abstraction over the external sell path.
///
/// Only the position monitor holds a `dyn SellExecutor`. A failed sell leaves
/// the position open; the next sweep retries it.
#[async_trait]
pub trait SellExecutor: Send + Sync {
    async fn sell(&self, request: &CloseRequest) -> Result<SellReceipt>;
}
