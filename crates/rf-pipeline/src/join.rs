//! Flattens per-type round pages into uniform result records.

use rf_core::MetricId;
use rf_model::{ResultRecord, RoundRecord, RoundsGroup};

/// One record per (round, metric) pair with a finite value for `metric`.
///
/// Output values live in a sparse map keyed by the metric id's string
/// form; when the exact key is missing the lookup falls back to a
/// numeric comparison of the keys, which tolerates backend key-type
/// drift ("1" vs "1.0" vs " 1"). Rounds without a usable value emit no
/// record; that is a missing value, not an error. Duplicate
/// (sim type, round index) pairs are not deduplicated; the last one in
/// fetch order wins downstream.
pub fn join_rounds(metric: MetricId, groups: &[RoundsGroup]) -> Vec<ResultRecord> {
    let mut records = Vec::new();
    for group in groups {
        for round in &group.rounds {
            let Some(value) = metric_value(round, metric) else {
                continue;
            };
            records.push(ResultRecord {
                iteration: round.round_index,
                sim_type_id: group.sim_type_id,
                metric_id: metric,
                value,
                group: format!("S-{}", group.sim_type_id),
            });
        }
    }
    records
}

fn metric_value(round: &RoundRecord, metric: MetricId) -> Option<f64> {
    let outputs = round.outputs.as_ref()?;
    let key = metric.get().to_string();
    let scalar = outputs.get(&key).or_else(|| {
        // Key-type drift fallback: match keys numerically.
        outputs
            .iter()
            .find(|(k, _)| k.trim().parse::<f64>().ok() == Some(metric.get() as f64))
            .map(|(_, v)| v)
    })?;
    scalar.as_finite()
}
