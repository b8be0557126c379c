//! Flattening of per-facility level tables into one cost table.

use crate::models::{CostRecord, LevelRecord};

/// Flatten per-facility tables into a single cost table.
///
/// Facilities keep their given order and each facility's rows keep theirs.
/// `progress_delta` is the difference from the previous row's cumulative
/// progress; the first row's delta is its own progress.
pub fn flatten_facility_tables(tables: &[(String, Vec<LevelRecord>)]) -> Vec<CostRecord> {
    let total: usize = tables.iter().map(|(_, rows)| rows.len()).sum();
    let mut flattened = Vec::with_capacity(total);

    for (facility, rows) in tables {
        let mut previous: Option<f64> = None;
        for row in rows {
            let progress_delta = match previous {
                Some(prev) => row.progress - prev,
                None => row.progress,
            };
            previous = Some(row.progress);
            flattened.push(CostRecord {
                facility: facility.clone(),
                level: row.level,
                resource_cost: row.resource_cost,
                time_cost: row.time_cost,
                progress_delta,
            });
        }
    }

    flattened
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn make_level(level: u32, cost: f64, progress: f64) -> LevelRecord {
        LevelRecord {
            level,
            resource_cost: cost,
            time_cost: Duration::minutes(level as i64 * 10),
            progress,
        }
    }

    #[test]
    fn test_progress_deltas_from_cumulative_values() {
        let tables = vec![(
            "Main Building".to_string(),
            vec![
                make_level(1, 100.0, 2.0),
                make_level(2, 150.0, 3.0),
                make_level(3, 210.0, 5.0),
            ],
        )];

        let flat = flatten_facility_tables(&tables);
        let deltas: Vec<f64> = flat.iter().map(|r| r.progress_delta).collect();
        assert_eq!(deltas, vec![2.0, 1.0, 2.0]);
        assert_eq!(flat[2].time_cost, Duration::minutes(30));
    }

    #[test]
    fn test_facilities_keep_declaration_order() {
        let tables = vec![
            (
                "Woodcutter".to_string(),
                vec![make_level(1, 50.0, 1.0), make_level(2, 80.0, 1.0)],
            ),
            ("Clay Pit".to_string(), vec![make_level(1, 60.0, 1.0)]),
        ];

        let flat = flatten_facility_tables(&tables);
        let keys: Vec<(&str, u32)> = flat
            .iter()
            .map(|r| (r.facility.as_str(), r.level))
            .collect();
        assert_eq!(
            keys,
            vec![("Woodcutter", 1), ("Woodcutter", 2), ("Clay Pit", 1)]
        );
        // Each facility starts its own delta chain
        assert_eq!(flat[2].progress_delta, 1.0);
        assert_eq!(flat[1].progress_delta, 0.0);
    }

    #[test]
    fn test_empty_tables() {
        assert!(flatten_facility_tables(&[]).is_empty());
    }
}
