//! Result summaries and paginated round payloads.

use std::collections::BTreeMap;

use rf_core::{OrderId, SimTypeId, SummaryId, finite_or_none};
use serde::{Deserialize, Serialize};

/// Per-(order, simulation type) result header; the join key from
/// order-level to round-level data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SimTypeResultSummary {
    pub id: SummaryId,
    pub order_id: OrderId,
    pub sim_type_id: SimTypeId,
    pub status: i32,
    pub progress: f64,
    pub total_rounds: u32,
    pub completed_rounds: u32,
    pub failed_rounds: u32,
}

/// Scalar cell of a round's params/outputs map.
///
/// The backend emits numbers and numeric strings interchangeably; both
/// coerce through [`Scalar::as_finite`], and anything unparsable is a
/// missing value, never zero.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Scalar {
    Number(f64),
    Text(String),
}

impl Scalar {
    pub fn as_finite(&self) -> Option<f64> {
        match self {
            Scalar::Number(v) => finite_or_none(*v),
            Scalar::Text(s) => s.trim().parse().ok().and_then(finite_or_none),
        }
    }
}

/// One iteration of a simulation sweep, as paged by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RoundRecord {
    pub id: i64,
    pub round_index: u32,
    /// Sparse map keyed by parameter id in string form.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<BTreeMap<String, Scalar>>,
    /// Sparse map keyed by metric id in string form.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outputs: Option<BTreeMap<String, Scalar>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<i32>,
}

/// Pagination envelope for round listings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RoundPage {
    #[serde(default)]
    pub items: Vec<RoundRecord>,
    pub total: u32,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u32,
}

/// Rounds of one simulation type, flattened out of the page envelope.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RoundsGroup {
    pub sim_type_id: SimTypeId,
    pub rounds: Vec<RoundRecord>,
}
