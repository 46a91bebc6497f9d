//! Dependency resolution across the fetch graph.
//!
//! Stages are gated by enablement predicates rather than explicit
//! sequencing: the catalogs have no dependencies and always fetch, the
//! order detail and result summaries are keyed directly on a valid
//! order id (summaries do not wait for the order payload), and round
//! pages fan out per selected summary once at least one is selected.
//! Re-evaluating the predicates after any upstream change triggers or
//! suppresses the dependent fetches, so resolving is re-entrant.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

use futures_util::future::join_all;
use rf_client::{ClientResult, ReadPolicy, ResourceCache, SimApi};
use rf_core::{OrderId, SimTypeId, SummaryId};
use rf_model::{MetricDef, Order, RoundsGroup, SimTypeDef, SimTypeResultSummary};
use tracing::warn;

use crate::config::{FIRST_PAGE, PipelineConfig};
use crate::error::{PipelineError, StageKind};
use crate::stage::StageState;

/// Composite key for the round-page fan-out: order id plus the sorted
/// selected-type set, so toggling the selection invalidates exactly the
/// affected entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoundsKey {
    pub order: OrderId,
    pub selection: Vec<SimTypeId>,
}

/// One failed round-page fetch inside an otherwise usable bundle.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundFetchFailure {
    pub sim_type_id: SimTypeId,
    pub message: String,
}

/// Fan-in result of the per-type round-page requests.
///
/// A failure for one simulation type does not discard the groups that
/// resolved; the join runs over `groups` while `failures` feeds the
/// aggregate error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoundsBundle {
    pub groups: Vec<RoundsGroup>,
    pub failures: Vec<RoundFetchFailure>,
}

/// Tri-state view of every stage of the graph.
#[derive(Debug, Clone, Default)]
pub struct ResolvedGraph {
    pub sim_types: StageState<Vec<SimTypeDef>>,
    pub metrics: StageState<Vec<MetricDef>>,
    pub order: StageState<Order>,
    pub summaries: StageState<Vec<SimTypeResultSummary>>,
    pub rounds: StageState<RoundsBundle>,
}

impl ResolvedGraph {
    /// First stage error in precedence order (catalogs, order,
    /// summaries, rounds), so retries surface a reproducible error.
    pub fn first_error(&self) -> Option<PipelineError> {
        if let Some(err) = self.sim_types.error() {
            return Some(err.clone());
        }
        if let Some(err) = self.metrics.error() {
            return Some(err.clone());
        }
        if let Some(err) = self.order.error() {
            return Some(err.clone());
        }
        if let Some(err) = self.summaries.error() {
            return Some(err.clone());
        }
        match &self.rounds {
            StageState::Failed(err) => Some(err.clone()),
            StageState::Ready(bundle) => {
                bundle.failures.first().map(|failure| PipelineError::Resource {
                    stage: StageKind::RoundPages,
                    message: format!("sim type {}: {}", failure.sim_type_id, failure.message),
                })
            }
            _ => None,
        }
    }

    /// True while any enabled stage is still in flight.
    pub fn is_loading(&self) -> bool {
        self.sim_types.is_loading()
            || self.metrics.is_loading()
            || self.order.is_loading()
            || self.summaries.is_loading()
            || self.rounds.is_loading()
    }
}

pub struct DependencyResolver {
    api: Arc<dyn SimApi>,
    config: PipelineConfig,
    board: Arc<Mutex<ResolvedGraph>>,
    sim_types: Arc<ResourceCache<(), Vec<SimTypeDef>>>,
    metrics: Arc<ResourceCache<(), Vec<MetricDef>>>,
    orders: Arc<ResourceCache<OrderId, Order>>,
    summaries: Arc<ResourceCache<OrderId, Vec<SimTypeResultSummary>>>,
    rounds: Arc<ResourceCache<RoundsKey, RoundsBundle>>,
}

impl DependencyResolver {
    pub fn new(api: Arc<dyn SimApi>, config: PipelineConfig) -> Self {
        Self {
            api,
            sim_types: ResourceCache::new("sim-types", config.catalog_ttl),
            metrics: ResourceCache::new("metrics", config.catalog_ttl),
            orders: ResourceCache::new("orders", config.results_ttl),
            summaries: ResourceCache::new("summaries", config.results_ttl),
            rounds: ResourceCache::new("rounds", config.results_ttl),
            board: Arc::new(Mutex::new(ResolvedGraph::default())),
            config,
        }
    }

    /// Live view of the stage board; stages read `Loading` while a
    /// resolve is in flight and keep their last state afterwards.
    pub fn graph(&self) -> ResolvedGraph {
        self.board.lock().expect("stage board lock poisoned").clone()
    }

    /// Drive every enabled stage and fan the round pages back in.
    ///
    /// Independent stages run concurrently; the join over round pages
    /// waits for all of them, so a partial subset is never joined
    /// speculatively. Stage failures are captured locally and never
    /// abort siblings.
    pub async fn resolve(
        &self,
        order: Option<OrderId>,
        selected: &BTreeSet<SimTypeId>,
        policy: ReadPolicy,
    ) -> ResolvedGraph {
        let (sim_types, metrics, order_stage, summaries) = tokio::join!(
            self.fetch_sim_types(policy),
            self.fetch_metrics(policy),
            self.fetch_order(order, policy),
            self.fetch_summaries(order, policy),
        );

        let rounds = match (order, summaries.value()) {
            (Some(order_id), Some(list)) => {
                let chosen: Vec<&SimTypeResultSummary> = list
                    .iter()
                    .filter(|summary| selected.contains(&summary.sim_type_id))
                    .collect();
                if chosen.is_empty() {
                    self.update_board(|graph| graph.rounds = StageState::Idle);
                    StageState::Idle
                } else {
                    self.fetch_rounds(order_id, &chosen, policy).await
                }
            }
            _ => {
                self.update_board(|graph| graph.rounds = StageState::Idle);
                StageState::Idle
            }
        };

        ResolvedGraph {
            sim_types,
            metrics,
            order: order_stage,
            summaries,
            rounds,
        }
    }

    async fn fetch_sim_types(&self, policy: ReadPolicy) -> StageState<Vec<SimTypeDef>> {
        self.update_board(|graph| graph.sim_types = StageState::Loading);
        let api = Arc::clone(&self.api);
        let result = self
            .sim_types
            .read((), policy, move || {
                let api = Arc::clone(&api);
                async move { api.sim_type_catalog().await }
            })
            .await;
        let state = stage_from(result, StageKind::SimTypeCatalog);
        self.update_board(|graph| graph.sim_types = state.clone());
        state
    }

    async fn fetch_metrics(&self, policy: ReadPolicy) -> StageState<Vec<MetricDef>> {
        self.update_board(|graph| graph.metrics = StageState::Loading);
        let api = Arc::clone(&self.api);
        let result = self
            .metrics
            .read((), policy, move || {
                let api = Arc::clone(&api);
                async move { api.metric_catalog().await }
            })
            .await;
        let state = stage_from(result, StageKind::MetricCatalog);
        self.update_board(|graph| graph.metrics = state.clone());
        state
    }

    async fn fetch_order(&self, order: Option<OrderId>, policy: ReadPolicy) -> StageState<Order> {
        let Some(order_id) = order else {
            self.update_board(|graph| graph.order = StageState::Idle);
            return StageState::Idle;
        };
        self.update_board(|graph| graph.order = StageState::Loading);
        let api = Arc::clone(&self.api);
        let result = self
            .orders
            .read(order_id, policy, move || {
                let api = Arc::clone(&api);
                async move { api.order(order_id).await }
            })
            .await;
        let state = stage_from(result, StageKind::OrderDetail);
        self.update_board(|graph| graph.order = state.clone());
        state
    }

    async fn fetch_summaries(
        &self,
        order: Option<OrderId>,
        policy: ReadPolicy,
    ) -> StageState<Vec<SimTypeResultSummary>> {
        let Some(order_id) = order else {
            self.update_board(|graph| graph.summaries = StageState::Idle);
            return StageState::Idle;
        };
        self.update_board(|graph| graph.summaries = StageState::Loading);
        let api = Arc::clone(&self.api);
        let result = self
            .summaries
            .read(order_id, policy, move || {
                let api = Arc::clone(&api);
                async move { api.result_summaries(order_id).await }
            })
            .await;
        let state = stage_from(result, StageKind::ResultSummaries);
        self.update_board(|graph| graph.summaries = state.clone());
        state
    }

    async fn fetch_rounds(
        &self,
        order_id: OrderId,
        chosen: &[&SimTypeResultSummary],
        policy: ReadPolicy,
    ) -> StageState<RoundsBundle> {
        self.update_board(|graph| graph.rounds = StageState::Loading);

        let mut selection: Vec<SimTypeId> = chosen.iter().map(|s| s.sim_type_id).collect();
        selection.sort_unstable();
        let key = RoundsKey {
            order: order_id,
            selection,
        };

        let requests: Vec<(SimTypeId, SummaryId)> =
            chosen.iter().map(|s| (s.sim_type_id, s.id)).collect();
        let api = Arc::clone(&self.api);
        let page_size = self.config.page_size;

        let result = self
            .rounds
            .read(key.clone(), policy, move || {
                let api = Arc::clone(&api);
                let requests = requests.clone();
                async move { Ok(fetch_round_pages(api, requests, page_size).await) }
            })
            .await;

        let state = match result {
            Ok(bundle) => {
                if !bundle.failures.is_empty() {
                    // Never serve a partial bundle from cache: the next
                    // read must retry the failed types.
                    self.rounds.invalidate(&key).await;
                }
                StageState::Ready(bundle)
            }
            Err(err) => StageState::Failed(PipelineError::resource(StageKind::RoundPages, &err)),
        };
        self.update_board(|graph| graph.rounds = state.clone());
        state
    }

    fn update_board(&self, apply: impl FnOnce(&mut ResolvedGraph)) {
        let mut board = self.board.lock().expect("stage board lock poisoned");
        apply(&mut board);
    }
}

/// Fan out one page request per selected summary and collect the
/// settled outcomes; sibling failures do not cancel anything.
async fn fetch_round_pages(
    api: Arc<dyn SimApi>,
    requests: Vec<(SimTypeId, SummaryId)>,
    page_size: u32,
) -> RoundsBundle {
    let pages = join_all(requests.into_iter().map(|(sim_type_id, summary_id)| {
        let api = Arc::clone(&api);
        async move {
            let outcome = api.rounds(summary_id, FIRST_PAGE, page_size).await;
            (sim_type_id, outcome)
        }
    }))
    .await;

    let mut bundle = RoundsBundle::default();
    for (sim_type_id, outcome) in pages {
        match outcome {
            Ok(page) => bundle.groups.push(RoundsGroup {
                sim_type_id,
                rounds: page.items,
            }),
            Err(err) => {
                warn!("round page fetch failed for sim type {sim_type_id}: {err}");
                bundle.failures.push(RoundFetchFailure {
                    sim_type_id,
                    message: err.to_string(),
                });
            }
        }
    }
    bundle
}

fn stage_from<T>(result: ClientResult<T>, stage: StageKind) -> StageState<T> {
    match result {
        Ok(value) => StageState::Ready(value),
        Err(err) => {
            warn!("{stage} fetch failed: {err}");
            StageState::Failed(PipelineError::resource(stage, &err))
        }
    }
}
