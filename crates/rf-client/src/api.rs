//! Abstract transport collaborator.

use async_trait::async_trait;
use rf_core::{OrderId, SummaryId};
use rf_model::{MetricDef, Order, RoundPage, SimTypeDef, SimTypeResultSummary};

use crate::error::ClientResult;

/// Read-only view of the dashboard backend.
///
/// Implementations own the HTTP client, base URL, and auth; the
/// pipeline only sees these five reads and an opaque [`crate::ClientError`]
/// per failure.
#[async_trait]
pub trait SimApi: Send + Sync {
    /// Simulation-type catalog; no dependencies.
    async fn sim_type_catalog(&self) -> ClientResult<Vec<SimTypeDef>>;

    /// Metric (output) catalog; no dependencies.
    async fn metric_catalog(&self) -> ClientResult<Vec<MetricDef>>;

    /// Order detail for a known-valid order id.
    async fn order(&self, order_id: OrderId) -> ClientResult<Order>;

    /// All per-type result summaries of an order.
    async fn result_summaries(
        &self,
        order_id: OrderId,
    ) -> ClientResult<Vec<SimTypeResultSummary>>;

    /// One page of round records for a result summary.
    async fn rounds(
        &self,
        summary_id: SummaryId,
        page: u32,
        page_size: u32,
    ) -> ClientResult<RoundPage>;
}
