//! Derived read-only projections.
//!
//! These are recomputed whenever their inputs change and never mutated
//! in place; nothing here is persisted.

use rf_core::{MetricId, Real, SimTypeId};
use serde::{Deserialize, Serialize};

/// Canonical joined record: one per (round, metric) pair whose value is
/// finite for the selected metric.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResultRecord {
    pub iteration: u32,
    pub sim_type_id: SimTypeId,
    pub metric_id: MetricId,
    pub value: Real,
    pub group: String,
}

/// Chart-ready point with the sim-type label resolved.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChartPoint {
    pub iteration: u32,
    pub sim_type: String,
    pub value: Real,
}

/// Per-sim-type arithmetic mean of the filtered values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GroupAverage {
    pub sim_type: String,
    pub value: Real,
}
