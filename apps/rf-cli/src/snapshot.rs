//! File-backed transport reading recorded backend payloads.
//!
//! Layout of the data directory:
//!   sim-types.json             SimTypeDef[]
//!   metrics.json               MetricDef[]
//!   order-<id>.json            Order
//!   summaries-<order id>.json  SimTypeResultSummary[]
//!   rounds-<summary id>.json   RoundRecord[] (paged in memory)

use std::fs;
use std::path::PathBuf;

use async_trait::async_trait;
use rf_client::{ClientError, ClientResult, SimApi};
use rf_core::{OrderId, SummaryId};
use rf_model::{MetricDef, Order, RoundPage, RoundRecord, SimTypeDef, SimTypeResultSummary};
use serde::de::DeserializeOwned;

pub struct SnapshotApi {
    root: PathBuf,
}

impl SnapshotApi {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn load<T: DeserializeOwned>(&self, name: &str) -> ClientResult<T> {
        let path = self.root.join(name);
        if !path.exists() {
            return Err(ClientError::NotFound {
                what: name.to_string(),
            });
        }
        let content =
            fs::read_to_string(&path).map_err(|err| ClientError::Transport(err.to_string()))?;
        serde_json::from_str(&content).map_err(|err| ClientError::Decode(err.to_string()))
    }
}

#[async_trait]
impl SimApi for SnapshotApi {
    async fn sim_type_catalog(&self) -> ClientResult<Vec<SimTypeDef>> {
        self.load("sim-types.json")
    }

    async fn metric_catalog(&self) -> ClientResult<Vec<MetricDef>> {
        self.load("metrics.json")
    }

    async fn order(&self, order_id: OrderId) -> ClientResult<Order> {
        self.load(&format!("order-{order_id}.json"))
    }

    async fn result_summaries(
        &self,
        order_id: OrderId,
    ) -> ClientResult<Vec<SimTypeResultSummary>> {
        self.load(&format!("summaries-{order_id}.json"))
    }

    async fn rounds(
        &self,
        summary_id: SummaryId,
        page: u32,
        page_size: u32,
    ) -> ClientResult<RoundPage> {
        let rounds: Vec<RoundRecord> = self.load(&format!("rounds-{summary_id}.json"))?;
        let total = rounds.len() as u32;
        let per_page = page_size.max(1);
        let start = ((page.max(1) - 1) * per_page) as usize;
        let items: Vec<RoundRecord> = rounds
            .into_iter()
            .skip(start)
            .take(per_page as usize)
            .collect();
        Ok(RoundPage {
            items,
            total,
            page,
            page_size,
            total_pages: total.div_ceil(per_page),
        })
    }
}
