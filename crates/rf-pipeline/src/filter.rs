//! Composite predicate over the joined record stream.

use std::collections::BTreeSet;

use rf_core::{MetricId, Real, SimTypeId, parse_bound};
use rf_model::ResultRecord;

/// Raw bound inputs as typed by the user; preserved for re-editing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterBounds {
    pub value_min: String,
    pub value_max: String,
    pub iteration_min: String,
    pub iteration_max: String,
}

impl FilterBounds {
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Fully resolved filter criteria; unbounded ends are ±infinity.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCriteria {
    /// `None` passes every metric ("no metric chosen yet").
    pub metric: Option<MetricId>,
    /// Empty set passes every sim type.
    pub sim_types: BTreeSet<SimTypeId>,
    pub value_min: Real,
    pub value_max: Real,
    pub iteration_min: Real,
    pub iteration_max: Real,
}

impl FilterCriteria {
    pub fn new(
        metric: Option<MetricId>,
        sim_types: BTreeSet<SimTypeId>,
        bounds: &FilterBounds,
    ) -> Self {
        Self {
            metric,
            sim_types,
            value_min: parse_bound(&bounds.value_min, Real::NEG_INFINITY),
            value_max: parse_bound(&bounds.value_max, Real::INFINITY),
            iteration_min: parse_bound(&bounds.iteration_min, Real::NEG_INFINITY),
            iteration_max: parse_bound(&bounds.iteration_max, Real::INFINITY),
        }
    }

    /// Bounds are inclusive on both ends.
    pub fn matches(&self, record: &ResultRecord) -> bool {
        if let Some(metric) = self.metric {
            if record.metric_id != metric {
                return false;
            }
        }
        if !self.sim_types.is_empty() && !self.sim_types.contains(&record.sim_type_id) {
            return false;
        }
        if record.value < self.value_min || record.value > self.value_max {
            return false;
        }
        let iteration = record.iteration as Real;
        if iteration < self.iteration_min || iteration > self.iteration_max {
            return false;
        }
        true
    }
}

/// Order-preserving filter; input records are left untouched.
pub fn apply_filter(records: &[ResultRecord], criteria: &FilterCriteria) -> Vec<ResultRecord> {
    records
        .iter()
        .filter(|record| criteria.matches(record))
        .cloned()
        .collect()
}
