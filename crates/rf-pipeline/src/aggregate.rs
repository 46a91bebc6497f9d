//! Per-group mean of the filtered values.

use rf_core::{Real, SimTypeId, round2};
use rf_model::{GroupAverage, ResultRecord};

/// Arithmetic mean of `value` per simulation type, rounded to two
/// decimals half away from zero, labeled through `label_of` with the
/// numeric id as the fallback.
///
/// Groups appear in first-seen order; sim types with no records are
/// omitted entirely rather than reported as zero.
pub fn group_averages<F>(records: &[ResultRecord], label_of: F) -> Vec<GroupAverage>
where
    F: Fn(SimTypeId) -> Option<String>,
{
    let mut groups: Vec<(SimTypeId, Real, usize)> = Vec::new();
    for record in records {
        match groups
            .iter_mut()
            .find(|(id, _, _)| *id == record.sim_type_id)
        {
            Some((_, total, count)) => {
                *total += record.value;
                *count += 1;
            }
            None => groups.push((record.sim_type_id, record.value, 1)),
        }
    }

    groups
        .into_iter()
        .map(|(id, total, count)| GroupAverage {
            sim_type: label_of(id).unwrap_or_else(|| id.to_string()),
            value: round2(total / count as Real),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(sim_type: i64, value: Real) -> ResultRecord {
        ResultRecord {
            iteration: 1,
            sim_type_id: sim_type.into(),
            metric_id: 1.into(),
            value,
            group: format!("S-{sim_type}"),
        }
    }

    #[test]
    fn single_record_mean_is_its_value() {
        let averages = group_averages(&[record(1, 12.34)], |_| Some("Static".into()));
        assert_eq!(averages.len(), 1);
        assert_eq!(averages[0].sim_type, "Static");
        assert_eq!(averages[0].value, 12.34);
    }

    #[test]
    fn two_record_group_averages_to_midpoint() {
        let records = vec![record(1, 10.0), record(1, 20.0)];
        let averages = group_averages(&records, |_| None);
        assert_eq!(averages.len(), 1);
        assert_eq!(averages[0].value, 15.00);
    }

    #[test]
    fn groups_keep_first_seen_order_and_fall_back_to_id_labels() {
        let records = vec![record(5, 1.0), record(2, 2.0), record(5, 3.0)];
        let averages = group_averages(&records, |_| None);
        assert_eq!(averages.len(), 2);
        assert_eq!(averages[0].sim_type, "5");
        assert_eq!(averages[0].value, 2.0);
        assert_eq!(averages[1].sim_type, "2");
    }

    #[test]
    fn empty_input_emits_no_groups() {
        assert!(group_averages(&[], |_| None).is_empty());
    }
}
