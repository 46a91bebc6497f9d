//! Catalog entries supplied by the configuration backend.

use rf_core::{MetricId, SimTypeId};
use serde::{Deserialize, Serialize};

/// One entry of the simulation-type catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimTypeDef {
    pub id: SimTypeId,
    pub name: String,
}

/// One entry of the metric (output) catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetricDef {
    pub id: MetricId,
    pub name: String,
}
