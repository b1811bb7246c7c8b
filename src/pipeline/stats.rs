//! Citywide and per-district summary statistics.

use std::collections::BTreeMap;

use tracing::debug;

use crate::models::{
    BucketBreakdown, CityStats, DerivedBuildingRecord, DirectoryRow, DistrictRow, DistrictStats,
    UtilizationBucket,
};

/// Round to 2 decimal places, the precision of every percentage output.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Median with the usual interpolation: for an even count, the mean of the
/// two middle values. Empty input yields 0 under the never-raise policy.
fn median(mut values: Vec<f64>) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 1 {
        values[mid]
    } else {
        (values[mid - 1] + values[mid]) / 2.0
    }
}

/// Share of `numerator` in `denominator` as a percentage; 0 when the
/// denominator is 0, never an error.
fn pct_of(numerator: u32, denominator: u32) -> f64 {
    if denominator == 0 {
        return 0.0;
    }
    round2(f64::from(numerator) / f64::from(denominator) * 100.0)
}

/// Count the over-capacity records per utilization bucket and express each
/// bucket as a share of the over-capacity population.
fn bucket_breakdown(records: &[&DerivedBuildingRecord]) -> BucketBreakdown {
    let count = |bucket: UtilizationBucket| -> u32 {
        records.iter().filter(|r| r.bucket == bucket).count() as u32
    };

    let num_util_101_110 = count(UtilizationBucket::Pct101To110);
    let num_util_111_120 = count(UtilizationBucket::Pct111To120);
    let num_util_121_130 = count(UtilizationBucket::Pct121To130);
    let num_util_131_plus = count(UtilizationBucket::Pct131Plus);
    let over_capacity = num_util_101_110 + num_util_111_120 + num_util_121_130 + num_util_131_plus;

    BucketBreakdown {
        num_util_101_110,
        num_util_111_120,
        num_util_121_130,
        num_util_131_plus,
        pct_util_101_110: pct_of(num_util_101_110, over_capacity),
        pct_util_111_120: pct_of(num_util_111_120, over_capacity),
        pct_util_121_130: pct_of(num_util_121_130, over_capacity),
        pct_util_131_plus: pct_of(num_util_131_plus, over_capacity),
    }
}

/// Citywide summary statistics over all derived records and the full
/// district table.
pub fn city_stats(records: &[DerivedBuildingRecord], districts: &[DistrictRow]) -> CityStats {
    let all: Vec<&DerivedBuildingRecord> = records.iter().collect();

    let total_bldgs = all.len() as u32;
    let total_overcapacity = all.iter().filter(|r| r.over_capacity).count() as u32;

    let utilizations: Vec<f64> = all.iter().map(|r| r.building.utilization_pct).collect();
    let buildings_per_district: Vec<f64> = districts
        .iter()
        .map(|d| f64::from(d.total_buildings))
        .collect();
    let district_pcts: Vec<f64> = districts.iter().map(|d| d.pct_over_capacity).collect();

    CityStats {
        total_bldgs,
        total_overcapacity,
        pct_overcapacity: pct_of(total_overcapacity, total_bldgs),
        buckets: bucket_breakdown(&all),
        mean_bldg_util: round2(mean(&utilizations)),
        median_bldg_util: round2(median(utilizations)),
        mean_bldgs: round2(mean(&buildings_per_district)),
        median_bldgs: round2(median(buildings_per_district)),
        median_district_pctovercap: round2(median(district_pcts)),
    }
}

/// Summary statistics for one district row, same shape as the citywide
/// figures plus the district's utilization maximum, its rank, and the
/// per-building directory.
pub fn district_stats(records: &[DerivedBuildingRecord], row: &DistrictRow) -> DistrictStats {
    let in_district: Vec<&DerivedBuildingRecord> = records
        .iter()
        .filter(|r| r.building.district_id == row.district_id)
        .collect();

    debug!(
        "District {}: {} buildings in scope",
        row.district_id,
        in_district.len()
    );

    let total_bldgs = in_district.len() as u32;
    let total_overcapacity = in_district.iter().filter(|r| r.over_capacity).count() as u32;

    let utilizations: Vec<f64> = in_district
        .iter()
        .map(|r| r.building.utilization_pct)
        .collect();
    let max_bldg_util = utilizations.iter().copied().fold(0.0, f64::max);

    DistrictStats {
        total_bldgs,
        total_overcapacity,
        pct_overcapacity: pct_of(total_overcapacity, total_bldgs),
        rank: row.rank_by_over_capacity,
        buckets: bucket_breakdown(&in_district),
        max_bldg_util,
        mean_bldg_util: round2(mean(&utilizations)),
        median_bldg_util: round2(median(utilizations)),
        directory: building_directory(&in_district),
    }
}

/// Per-district statistics for every district present in the plotting table,
/// keyed by district id.
pub fn district_stats_by_district(
    records: &[DerivedBuildingRecord],
    districts: &[DistrictRow],
) -> BTreeMap<u8, DistrictStats> {
    districts
        .iter()
        .map(|row| (row.district_id, district_stats(records, row)))
        .collect()
}

/// Project a district's records to the user-facing building directory,
/// dropping internal-only fields.
fn building_directory(records: &[&DerivedBuildingRecord]) -> Vec<DirectoryRow> {
    records
        .iter()
        .map(|r| DirectoryRow {
            building_name: r.building.building_name.clone(),
            enrollment: r.building.enrollment,
            capacity: r.building.capacity,
            utilization: r.building.utilization_pct * 0.01,
            schools_in_building: r.building.schools_in_building.clone(),
            over_capacity: r.over_capacity,
        })
        .collect()
}
