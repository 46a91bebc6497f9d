//! UI-facing facade over the resolver and the pure engines.
//!
//! The session owns the user-tunable inputs (order id, metric, sim-type
//! selection, filter bounds) as raw strings where the UI supplies raw
//! strings, and recomputes every derived projection from the latest
//! resolved inputs on each `refresh`. Nothing derived is ever mutated
//! in place.

use std::collections::BTreeSet;
use std::sync::Arc;

use rf_client::{ReadPolicy, SimApi};
use rf_core::{MetricId, OrderId, RemoteId, SimTypeId};
use rf_model::{ChartPoint, GroupAverage, ResultRecord, SimTypeDef};

use crate::aggregate::group_averages;
use crate::config::PipelineConfig;
use crate::downsample::downsample;
use crate::error::PipelineError;
use crate::filter::{FilterBounds, FilterCriteria, apply_filter};
use crate::join::join_rounds;
use crate::resolver::{DependencyResolver, ResolvedGraph};
use crate::stage::PipelineState;

/// Metric selector entry (id in string form plus display label).
#[derive(Debug, Clone, PartialEq)]
pub struct MetricOption {
    pub value: String,
    pub label: String,
}

/// Immutable view of one pipeline run.
#[derive(Debug, Clone)]
pub struct ResultsSnapshot {
    pub state: PipelineState,
    /// Order number when the detail resolved, `#<id>` for a valid id
    /// whose detail is unavailable, `-` otherwise.
    pub display_order: String,
    pub metric: String,
    pub metric_options: Vec<MetricOption>,
    pub available_sim_types: Vec<SimTypeDef>,
    pub selected_sim_types: Vec<SimTypeId>,
    pub filtered: Vec<ResultRecord>,
    pub trend: Vec<ChartPoint>,
    pub averages: Vec<GroupAverage>,
    pub error: Option<PipelineError>,
}

impl ResultsSnapshot {
    pub fn sim_type_label(&self, id: SimTypeId) -> Option<&str> {
        self.available_sim_types
            .iter()
            .find(|def| def.id == id)
            .map(|def| def.name.as_str())
    }

    pub fn metric_label(&self, id: MetricId) -> Option<&str> {
        let value = id.to_string();
        self.metric_options
            .iter()
            .find(|option| option.value == value)
            .map(|option| option.label.as_str())
    }

    /// A valid zero-record outcome, as opposed to a fetch failure.
    pub fn is_empty(&self) -> bool {
        self.error.is_none() && self.filtered.is_empty()
    }
}

pub struct ResultsSession {
    resolver: DependencyResolver,
    config: PipelineConfig,
    order_input: Option<String>,
    order_id: Option<OrderId>,
    invalid: Option<PipelineError>,
    metric: String,
    selected: BTreeSet<SimTypeId>,
    bounds: FilterBounds,
    state: PipelineState,
    last_available: Vec<SimTypeId>,
    last_metric_options: Vec<MetricOption>,
}

impl ResultsSession {
    pub fn new(api: Arc<dyn SimApi>, config: PipelineConfig) -> Self {
        Self {
            resolver: DependencyResolver::new(api, config.clone()),
            config,
            order_input: None,
            order_id: None,
            invalid: None,
            metric: String::new(),
            selected: BTreeSet::new(),
            bounds: FilterBounds::default(),
            state: PipelineState::Idle,
            last_available: Vec::new(),
            last_metric_options: Vec::new(),
        }
    }

    /// Point the session at a new order, resetting metric, selection,
    /// and bounds. Non-numeric or zero input puts the session into the
    /// terminal `Invalid` state until corrected.
    pub fn set_order(&mut self, raw: &str) {
        self.order_input = Some(raw.to_string());
        match RemoteId::parse(raw) {
            Ok(id) => {
                self.order_id = Some(id);
                self.invalid = None;
            }
            Err(_) => {
                self.order_id = None;
                self.invalid = Some(PipelineError::InvalidOrderId {
                    raw: raw.to_string(),
                });
            }
        }
        self.metric.clear();
        self.selected.clear();
        self.bounds.clear();
        self.state = PipelineState::Idle;
    }

    /// Forget the current order; catalogs keep resolving on refresh.
    pub fn clear_order(&mut self) {
        self.order_input = None;
        self.order_id = None;
        self.invalid = None;
        self.metric.clear();
        self.selected.clear();
        self.bounds.clear();
        self.state = PipelineState::Idle;
    }

    pub fn order_input(&self) -> Option<&str> {
        self.order_input.as_deref()
    }

    pub fn metric(&self) -> &str {
        &self.metric
    }

    pub fn set_metric(&mut self, raw: impl Into<String>) {
        self.metric = raw.into();
    }

    pub fn selected_sim_types(&self) -> &BTreeSet<SimTypeId> {
        &self.selected
    }

    pub fn toggle_sim_type(&mut self, id: SimTypeId) {
        if !self.selected.remove(&id) {
            self.selected.insert(id);
        }
    }

    pub fn bounds(&self) -> &FilterBounds {
        &self.bounds
    }

    pub fn set_value_min(&mut self, raw: impl Into<String>) {
        self.bounds.value_min = raw.into();
    }

    pub fn set_value_max(&mut self, raw: impl Into<String>) {
        self.bounds.value_max = raw.into();
    }

    pub fn set_iteration_min(&mut self, raw: impl Into<String>) {
        self.bounds.iteration_min = raw.into();
    }

    pub fn set_iteration_max(&mut self, raw: impl Into<String>) {
        self.bounds.iteration_max = raw.into();
    }

    /// Restore the default metric and selection, clear every bound.
    pub fn reset(&mut self) {
        self.metric = self
            .last_metric_options
            .first()
            .map(|option| option.value.clone())
            .unwrap_or_default();
        self.selected = self.last_available.iter().copied().collect();
        self.bounds.clear();
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == PipelineState::Loading || self.resolver.graph().is_loading()
    }

    /// Live tri-state view of the fetch graph.
    pub fn graph(&self) -> ResolvedGraph {
        self.resolver.graph()
    }

    /// Resolve the graph (serving fresh cache entries) and recompute
    /// every derived projection.
    pub async fn refresh(&mut self) -> ResultsSnapshot {
        self.run(ReadPolicy::Cached).await
    }

    /// Re-trigger every currently-enabled stage unconditionally (also
    /// the ones that succeeded) so stale-but-successful data refreshes
    /// too. Never fails; errors surface through the snapshot.
    pub async fn retry(&mut self) -> ResultsSnapshot {
        self.run(ReadPolicy::Refresh).await
    }

    async fn run(&mut self, policy: ReadPolicy) -> ResultsSnapshot {
        if let Some(err) = self.invalid.clone() {
            // Invalid input short-circuits the whole graph: no network.
            self.state = PipelineState::Invalid;
            return ResultsSnapshot {
                state: PipelineState::Invalid,
                display_order: "-".into(),
                metric: self.metric.clone(),
                metric_options: self.last_metric_options.clone(),
                available_sim_types: Vec::new(),
                selected_sim_types: Vec::new(),
                filtered: Vec::new(),
                trend: Vec::new(),
                averages: Vec::new(),
                error: Some(err),
            };
        }

        self.state = PipelineState::Loading;
        let mut graph = self
            .resolver
            .resolve(self.order_id, &self.selected, policy)
            .await;

        // Default metric: first catalog entry once the catalog is known.
        if self.metric.is_empty() {
            if let Some(first) = graph.metrics.value().and_then(|defs| defs.first()) {
                self.metric = first.id.to_string();
            }
        }

        // Default selection, applied only while nothing is selected:
        // the order's types, else the types present in the summaries.
        // Re-resolving lets the round fetch see the new selection.
        if self.selected.is_empty() {
            let defaults = default_selection(&graph);
            if !defaults.is_empty() {
                self.selected.extend(defaults);
                graph = self
                    .resolver
                    .resolve(self.order_id, &self.selected, ReadPolicy::Cached)
                    .await;
            }
        }

        let error = graph.first_error();
        self.state = if error.is_some() {
            PipelineState::PartialError
        } else {
            PipelineState::Ready
        };

        let snapshot = self.build_snapshot(&graph, error);
        self.last_available = available_sim_type_ids(&graph);
        self.last_metric_options = snapshot.metric_options.clone();
        snapshot
    }

    fn build_snapshot(
        &self,
        graph: &ResolvedGraph,
        error: Option<PipelineError>,
    ) -> ResultsSnapshot {
        let available_ids = available_sim_type_ids(graph);
        let available_sim_types: Vec<SimTypeDef> = graph
            .sim_types
            .value()
            .map(|defs| {
                defs.iter()
                    .filter(|def| available_ids.contains(&def.id))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        let metric_options: Vec<MetricOption> = graph
            .metrics
            .value()
            .map(|defs| {
                defs.iter()
                    .map(|def| MetricOption {
                        value: def.id.to_string(),
                        label: def.name.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        let metric_id = self.metric_id();
        let joined = match (metric_id, graph.rounds.value()) {
            (Some(metric), Some(bundle)) => join_rounds(metric, &bundle.groups),
            _ => Vec::new(),
        };
        let criteria = FilterCriteria::new(metric_id, self.selected.clone(), &self.bounds);
        let filtered = apply_filter(&joined, &criteria);

        let label_of = |id: SimTypeId| {
            available_sim_types
                .iter()
                .find(|def| def.id == id)
                .map(|def| def.name.clone())
        };
        let trend: Vec<ChartPoint> = downsample(&filtered, self.config.max_chart_points)
            .into_iter()
            .map(|record| ChartPoint {
                iteration: record.iteration,
                sim_type: label_of(record.sim_type_id)
                    .unwrap_or_else(|| record.sim_type_id.to_string()),
                value: record.value,
            })
            .collect();
        let averages = group_averages(&filtered, &label_of);

        let display_order = match (graph.order.value(), self.order_id) {
            (Some(order), _) => order.order_no.clone(),
            (None, Some(id)) => format!("#{id}"),
            (None, None) => "-".into(),
        };

        ResultsSnapshot {
            state: self.state,
            display_order,
            metric: self.metric.clone(),
            metric_options,
            available_sim_types,
            selected_sim_types: self.selected.iter().copied().collect(),
            filtered,
            trend,
            averages,
            error,
        }
    }

    fn metric_id(&self) -> Option<MetricId> {
        RemoteId::parse(&self.metric).ok()
    }
}

/// Sim types eligible for selection: the order's types when known, else
/// the types that actually have result summaries, else the catalog.
fn available_sim_type_ids(graph: &ResolvedGraph) -> Vec<SimTypeId> {
    if let Some(order) = graph.order.value() {
        if !order.sim_type_ids.is_empty() {
            return order.sim_type_ids.clone();
        }
    }
    if let Some(summaries) = graph.summaries.value() {
        if !summaries.is_empty() {
            return summaries.iter().map(|s| s.sim_type_id).collect();
        }
    }
    graph
        .sim_types
        .value()
        .map(|defs| defs.iter().map(|def| def.id).collect())
        .unwrap_or_default()
}

/// Default selection sources, in order; an empty result leaves the
/// selection empty, with no synthetic default.
fn default_selection(graph: &ResolvedGraph) -> Vec<SimTypeId> {
    if let Some(order) = graph.order.value() {
        if !order.sim_type_ids.is_empty() {
            return order.sim_type_ids.clone();
        }
    }
    graph
        .summaries
        .value()
        .map(|summaries| summaries.iter().map(|s| s.sim_type_id).collect())
        .unwrap_or_default()
}
