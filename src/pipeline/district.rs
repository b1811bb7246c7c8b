//! The plotting table: per-district over-capacity aggregates joined with
//! boundary centroids and static reference data.

use std::collections::{BTreeMap, HashSet};

use geo::Centroid;
use tracing::info;

use super::stats::round2;
use super::PipelineError;
use crate::models::{Borough, DerivedBuildingRecord, DistrictGeometry, DistrictRow};
use crate::reference;

/// Per-district tallies before the reference joins.
struct DistrictAggregate {
    district_id: u8,
    over_capacity_count: u32,
    total_buildings: u32,
    pct_over_capacity: f64,
}

/// Build one row per district present in the records.
///
/// Districts with no qualifying buildings are absent from the output, not
/// zero-filled. Ranking uses the "min" method: tied districts share the
/// lowest ordinal of the tied group.
pub fn build_district_table(
    records: &[DerivedBuildingRecord],
    geometries: &[DistrictGeometry],
) -> Result<Vec<DistrictRow>, PipelineError> {
    let mut tallies: BTreeMap<u8, (u32, HashSet<&str>)> = BTreeMap::new();
    for record in records {
        let entry = tallies.entry(record.building.district_id).or_default();
        if record.over_capacity {
            entry.0 += 1;
        }
        entry.1.insert(record.building.building_id.as_str());
    }

    let aggregates: Vec<DistrictAggregate> = tallies
        .into_iter()
        .map(|(district_id, (over_capacity_count, buildings))| {
            let total_buildings = buildings.len() as u32;
            DistrictAggregate {
                district_id,
                over_capacity_count,
                total_buildings,
                pct_over_capacity: round2(
                    f64::from(over_capacity_count) / f64::from(total_buildings) * 100.0,
                ),
            }
        })
        .collect();

    let mut rows = Vec::with_capacity(aggregates.len());
    for aggregate in &aggregates {
        let rank_by_over_capacity = 1 + aggregates
            .iter()
            .filter(|other| other.pct_over_capacity > aggregate.pct_over_capacity)
            .count() as u32;

        let district_id = aggregate.district_id;
        let borough = Borough::from_district(district_id)
            .ok_or(PipelineError::DistrictOutOfRange(u32::from(district_id)))?;
        let neighborhoods = reference::neighborhoods(district_id)
            .ok_or(PipelineError::DistrictOutOfRange(u32::from(district_id)))?
            .to_string();
        let (label_lon, label_lat) = label_point(district_id, geometries)?;

        rows.push(DistrictRow {
            district_id,
            over_capacity_count: aggregate.over_capacity_count,
            total_buildings: aggregate.total_buildings,
            pct_over_capacity: aggregate.pct_over_capacity,
            rank_by_over_capacity,
            borough,
            neighborhoods,
            label_lon,
            label_lat,
        });
    }

    info!("Built district table with {} rows", rows.len());

    Ok(rows)
}

/// Label placement for a district: the geometry centroid, unless a curated
/// override exists for legibility.
///
/// The centroid is computed on geographic coordinates. That is an accepted
/// approximation here; labels are placement aids, not measurements.
fn label_point(
    district_id: u8,
    geometries: &[DistrictGeometry],
) -> Result<(f64, f64), PipelineError> {
    if let Some(coords) = reference::label_override(district_id) {
        return Ok(coords);
    }

    let district = geometries
        .iter()
        .find(|g| g.district_id == district_id)
        .ok_or(PipelineError::MissingBoundary(district_id))?;
    let centroid = district
        .geometry
        .centroid()
        .ok_or(PipelineError::EmptyBoundary(district_id))?;

    Ok((centroid.x(), centroid.y()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BuildingRecord;
    use chrono::NaiveDate;
    use geo::{LineString, MultiPolygon, Polygon};

    fn record(district_id: u8, building_id: &str, utilization_pct: f64) -> DerivedBuildingRecord {
        DerivedBuildingRecord::from_record(BuildingRecord {
            building_id: building_id.to_string(),
            building_name: format!("{} Building", building_id),
            district_id,
            enrollment: 500.0,
            capacity: 600.0,
            utilization_pct,
            schools_in_building: "P.S. 001".to_string(),
            as_of_date: NaiveDate::from_ymd_opt(2023, 10, 6).unwrap(),
        })
    }

    /// A 0.2-degree square centered on (lon, lat), already in EPSG:4326.
    fn geometry(district_id: u8, lon: f64, lat: f64) -> DistrictGeometry {
        DistrictGeometry {
            district_id,
            geometry: MultiPolygon::new(vec![Polygon::new(
                LineString::from(vec![
                    (lon - 0.1, lat - 0.1),
                    (lon + 0.1, lat - 0.1),
                    (lon + 0.1, lat + 0.1),
                    (lon - 0.1, lat + 0.1),
                    (lon - 0.1, lat - 0.1),
                ]),
                vec![],
            )]),
        }
    }

    fn city_geometries() -> Vec<DistrictGeometry> {
        (1..=32).map(|d| geometry(d, -74.0, 40.7)).collect()
    }

    #[test]
    fn test_district_aggregation() {
        let records = vec![
            record(5, "M101", 90.0),
            record(5, "M102", 105.0),
            record(5, "M103", 140.0),
        ];

        let rows = build_district_table(&records, &city_geometries()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].district_id, 5);
        assert_eq!(rows[0].over_capacity_count, 2);
        assert_eq!(rows[0].total_buildings, 3);
        assert_eq!(rows[0].pct_over_capacity, 66.67);
    }

    #[test]
    fn test_total_buildings_counts_distinct_ids() {
        let records = vec![
            record(8, "X200", 95.0),
            record(8, "X200", 95.0),
            record(8, "X201", 108.0),
        ];

        let rows = build_district_table(&records, &city_geometries()).unwrap();
        assert_eq!(rows[0].total_buildings, 2);
        assert!(rows[0].over_capacity_count <= rows[0].total_buildings);
    }

    #[test]
    fn test_tied_districts_share_minimum_rank() {
        let records = vec![
            // Districts 1 and 2: 50% over capacity each.
            record(1, "M001", 120.0),
            record(1, "M002", 80.0),
            record(2, "M003", 120.0),
            record(2, "M004", 80.0),
            // District 3: 25%.
            record(3, "M005", 120.0),
            record(3, "M006", 80.0),
            record(3, "M007", 80.0),
            record(3, "M008", 80.0),
        ];

        let rows = build_district_table(&records, &city_geometries()).unwrap();
        let rank_of = |district: u8| {
            rows.iter()
                .find(|r| r.district_id == district)
                .unwrap()
                .rank_by_over_capacity
        };
        assert_eq!(rank_of(1), 1);
        assert_eq!(rank_of(2), 1);
        assert_eq!(rank_of(3), 3);
    }

    #[test]
    fn test_reference_joins() {
        let records = vec![record(31, "R001", 99.0), record(1, "M001", 99.0)];

        let rows = build_district_table(&records, &city_geometries()).unwrap();
        let staten_island = rows.iter().find(|r| r.district_id == 31).unwrap();
        assert_eq!(staten_island.borough, Borough::StatenIsland);
        assert_eq!(staten_island.neighborhoods, "Staten Island");

        let manhattan = rows.iter().find(|r| r.district_id == 1).unwrap();
        assert_eq!(manhattan.borough, Borough::Manhattan);
        assert_eq!(manhattan.neighborhoods, "East Village, Lower East Side");
    }

    #[test]
    fn test_label_defaults_to_centroid_with_curated_overrides() {
        let geometries = vec![geometry(4, -73.5, 40.5), geometry(5, -73.92, 40.81)];
        let records = vec![record(4, "M401", 95.0), record(5, "M501", 95.0)];

        let rows = build_district_table(&records, &geometries).unwrap();

        // District 4 carries a curated label position.
        let overridden = rows.iter().find(|r| r.district_id == 4).unwrap();
        assert_eq!((overridden.label_lon, overridden.label_lat), (-73.938, 40.7925));

        // District 5 falls back to its centroid.
        let centroid = rows.iter().find(|r| r.district_id == 5).unwrap();
        assert!((centroid.label_lon - -73.92).abs() < 1e-6);
        assert!((centroid.label_lat - 40.81).abs() < 1e-6);
    }

    #[test]
    fn test_zero_building_districts_are_absent() {
        let records = vec![record(5, "M101", 90.0)];

        let rows = build_district_table(&records, &city_geometries()).unwrap();
        assert_eq!(rows.len(), 1);
        assert!(rows.iter().all(|r| r.total_buildings > 0));
    }

    #[test]
    fn test_missing_geometry_is_fatal() {
        let records = vec![record(6, "M601", 95.0)];

        let err = build_district_table(&records, &[]).unwrap_err();
        assert!(matches!(err, PipelineError::MissingBoundary(6)));
    }
}
