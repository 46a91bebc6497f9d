//! Programmable in-memory backend for pipeline tests.
#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use rf_client::{ClientError, ClientResult, SimApi};
use rf_core::{OrderId, SummaryId};
use rf_model::{
    MetricDef, Order, RoundPage, RoundRecord, Scalar, SimTypeDef, SimTypeResultSummary,
};

/// Per-endpoint invocation counters.
#[derive(Default)]
pub struct Calls {
    pub sim_types: AtomicUsize,
    pub metrics: AtomicUsize,
    pub order: AtomicUsize,
    pub summaries: AtomicUsize,
    pub rounds: AtomicUsize,
}

impl Calls {
    pub fn total(&self) -> usize {
        self.sim_types.load(Ordering::SeqCst)
            + self.metrics.load(Ordering::SeqCst)
            + self.order.load(Ordering::SeqCst)
            + self.summaries.load(Ordering::SeqCst)
            + self.rounds.load(Ordering::SeqCst)
    }
}

type Programmed<T> = Mutex<Result<T, String>>;

pub struct MockApi {
    pub calls: Calls,
    sim_types: Programmed<Vec<SimTypeDef>>,
    metrics: Programmed<Vec<MetricDef>>,
    order: Programmed<Option<Order>>,
    summaries: Programmed<Vec<SimTypeResultSummary>>,
    rounds: Mutex<HashMap<SummaryId, Result<Vec<RoundRecord>, String>>>,
}

impl MockApi {
    pub fn new() -> Self {
        Self {
            calls: Calls::default(),
            sim_types: Mutex::new(Ok(Vec::new())),
            metrics: Mutex::new(Ok(Vec::new())),
            order: Mutex::new(Ok(None)),
            summaries: Mutex::new(Ok(Vec::new())),
            rounds: Mutex::new(HashMap::new()),
        }
    }

    pub fn set_sim_types(&self, defs: Vec<SimTypeDef>) {
        *self.sim_types.lock().unwrap() = Ok(defs);
    }

    pub fn fail_sim_types(&self, message: &str) {
        *self.sim_types.lock().unwrap() = Err(message.to_string());
    }

    pub fn set_metrics(&self, defs: Vec<MetricDef>) {
        *self.metrics.lock().unwrap() = Ok(defs);
    }

    pub fn fail_metrics(&self, message: &str) {
        *self.metrics.lock().unwrap() = Err(message.to_string());
    }

    pub fn set_order(&self, order: Order) {
        *self.order.lock().unwrap() = Ok(Some(order));
    }

    pub fn fail_order(&self, message: &str) {
        *self.order.lock().unwrap() = Err(message.to_string());
    }

    pub fn set_summaries(&self, summaries: Vec<SimTypeResultSummary>) {
        *self.summaries.lock().unwrap() = Ok(summaries);
    }

    pub fn fail_summaries(&self, message: &str) {
        *self.summaries.lock().unwrap() = Err(message.to_string());
    }

    pub fn set_rounds(&self, summary_id: i64, rounds: Vec<RoundRecord>) {
        self.rounds
            .lock()
            .unwrap()
            .insert(summary_id.into(), Ok(rounds));
    }

    pub fn fail_rounds(&self, summary_id: i64, message: &str) {
        self.rounds
            .lock()
            .unwrap()
            .insert(summary_id.into(), Err(message.to_string()));
    }
}

#[async_trait]
impl SimApi for MockApi {
    async fn sim_type_catalog(&self) -> ClientResult<Vec<SimTypeDef>> {
        self.calls.sim_types.fetch_add(1, Ordering::SeqCst);
        self.sim_types
            .lock()
            .unwrap()
            .clone()
            .map_err(ClientError::Transport)
    }

    async fn metric_catalog(&self) -> ClientResult<Vec<MetricDef>> {
        self.calls.metrics.fetch_add(1, Ordering::SeqCst);
        self.metrics
            .lock()
            .unwrap()
            .clone()
            .map_err(ClientError::Transport)
    }

    async fn order(&self, order_id: OrderId) -> ClientResult<Order> {
        self.calls.order.fetch_add(1, Ordering::SeqCst);
        match self.order.lock().unwrap().clone() {
            Ok(Some(order)) => Ok(order),
            Ok(None) => Err(ClientError::NotFound {
                what: format!("order {order_id}"),
            }),
            Err(message) => Err(ClientError::Transport(message)),
        }
    }

    async fn result_summaries(
        &self,
        _order_id: OrderId,
    ) -> ClientResult<Vec<SimTypeResultSummary>> {
        self.calls.summaries.fetch_add(1, Ordering::SeqCst);
        self.summaries
            .lock()
            .unwrap()
            .clone()
            .map_err(ClientError::Transport)
    }

    async fn rounds(
        &self,
        summary_id: SummaryId,
        page: u32,
        page_size: u32,
    ) -> ClientResult<RoundPage> {
        self.calls.rounds.fetch_add(1, Ordering::SeqCst);
        match self.rounds.lock().unwrap().get(&summary_id).cloned() {
            Some(Ok(rounds)) => {
                let total = rounds.len() as u32;
                Ok(RoundPage {
                    items: rounds,
                    total,
                    page,
                    page_size,
                    total_pages: total.div_ceil(page_size.max(1)),
                })
            }
            Some(Err(message)) => Err(ClientError::Transport(message)),
            None => Err(ClientError::NotFound {
                what: format!("rounds for summary {summary_id}"),
            }),
        }
    }
}

pub fn sim_type(id: i64, name: &str) -> SimTypeDef {
    SimTypeDef {
        id: id.into(),
        name: name.to_string(),
    }
}

pub fn metric(id: i64, name: &str) -> MetricDef {
    MetricDef {
        id: id.into(),
        name: name.to_string(),
    }
}

pub fn order(id: i64, order_no: &str, sim_type_ids: &[i64]) -> Order {
    Order {
        id: id.into(),
        order_no: order_no.to_string(),
        sim_type_ids: sim_type_ids.iter().map(|&id| id.into()).collect(),
    }
}

pub fn summary(id: i64, order_id: i64, sim_type_id: i64) -> SimTypeResultSummary {
    SimTypeResultSummary {
        id: id.into(),
        order_id: order_id.into(),
        sim_type_id: sim_type_id.into(),
        status: 1,
        progress: 100.0,
        total_rounds: 1,
        completed_rounds: 1,
        failed_rounds: 0,
    }
}

pub fn round(index: u32, metric_id: i64, value: f64) -> RoundRecord {
    let outputs: BTreeMap<String, Scalar> =
        [(metric_id.to_string(), Scalar::Number(value))].into();
    RoundRecord {
        id: index as i64,
        round_index: index,
        params: None,
        outputs: Some(outputs),
        status: Some(1),
    }
}
