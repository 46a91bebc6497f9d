//! Order payloads.

use rf_core::{OrderId, SimTypeId};
use serde::{Deserialize, Serialize};

/// A submitted simulation run request covering one or more simulation
/// types. Created externally; read-only to this pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub order_no: String,
    #[serde(default)]
    pub sim_type_ids: Vec<SimTypeId>,
}
