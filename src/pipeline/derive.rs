//! Derivation of the per-building over-capacity fields.

use crate::models::{BuildingRecord, DerivedBuildingRecord};

/// Attach the over-capacity flag and utilization bucket to each record.
/// Cardinality is preserved; this stage only adds fields.
pub fn derive_utilization(records: Vec<BuildingRecord>) -> Vec<DerivedBuildingRecord> {
    records
        .into_iter()
        .map(DerivedBuildingRecord::from_record)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UtilizationBucket;
    use chrono::NaiveDate;

    fn record(utilization_pct: f64) -> BuildingRecord {
        BuildingRecord {
            building_id: "K555".to_string(),
            building_name: "K555 Building".to_string(),
            district_id: 5,
            enrollment: 400.0,
            capacity: 500.0,
            utilization_pct,
            schools_in_building: "P.S. 555".to_string(),
            as_of_date: NaiveDate::from_ymd_opt(2023, 10, 6).unwrap(),
        }
    }

    #[test]
    fn test_over_capacity_flags() {
        let derived = derive_utilization(vec![record(90.0), record(105.0), record(140.0)]);

        let flags: Vec<bool> = derived.iter().map(|r| r.over_capacity).collect();
        assert_eq!(flags, vec![false, true, true]);
    }

    #[test]
    fn test_exactly_one_bucket_per_record() {
        let inputs: Vec<f64> = vec![1.0, 55.0, 100.0, 101.0, 110.0, 111.0, 120.0, 125.0, 130.0, 131.0, 250.0];
        let derived = derive_utilization(inputs.into_iter().map(record).collect());

        for r in &derived {
            let buckets = UtilizationBucket::over_capacity_buckets();
            let matches = buckets.iter().filter(|b| **b == r.bucket).count();
            if r.over_capacity {
                assert_eq!(matches, 1);
            } else {
                assert_eq!(matches, 0);
                assert_eq!(r.bucket, UtilizationBucket::None);
            }
            assert_eq!(r.over_capacity, r.building.utilization_pct > 100.0);
        }
    }
}
