//! Boundary cleaning: dissolve per-district shape rows into one geometry per
//! district and reproject from the source state plane to lon/lat degrees.

use std::collections::BTreeMap;

use geo::{BooleanOps, Coord, MapCoords, MultiPolygon};
use proj::Proj;
use tracing::info;

use super::{validate_district, PipelineError};
use crate::models::{DistrictGeometry, RawDistrictShape};

/// CRS of the source boundary shapes (NY Long Island state plane, feet).
const SOURCE_CRS: &str = "EPSG:2263";

/// Geographic CRS expected by downstream mapping (lon/lat degrees).
const TARGET_CRS: &str = "EPSG:4326";

/// Union a district's shape rows into one geometry.
fn dissolve(parts: Vec<MultiPolygon<f64>>) -> MultiPolygon<f64> {
    let mut iter = parts.into_iter();
    let Some(first) = iter.next() else {
        return MultiPolygon::new(Vec::new());
    };
    iter.fold(first, |merged, part| merged.union(&part))
}

/// Normalize raw boundary shapes into exactly one geometry per district,
/// reprojected to EPSG:4326.
///
/// The source may carry several rows for one district (district 10 does in
/// the published shapefile); they are dissolved into a single shape. A
/// district without a usable boundary is fatal: every downstream consumer
/// assumes one valid geometry per district.
pub fn clean_boundaries(
    shapes: Vec<RawDistrictShape>,
) -> Result<Vec<DistrictGeometry>, PipelineError> {
    let total = shapes.len();

    let mut by_district: BTreeMap<u8, Vec<MultiPolygon<f64>>> = BTreeMap::new();
    for shape in shapes {
        let district_id = validate_district(shape.district_id)?;
        by_district
            .entry(district_id)
            .or_default()
            .push(shape.geometry);
    }

    for district_id in 1..=32 {
        if !by_district.contains_key(&district_id) {
            return Err(PipelineError::MissingBoundary(district_id));
        }
    }

    let transform = Proj::new_known_crs(SOURCE_CRS, TARGET_CRS, None)?;

    let mut cleaned = Vec::with_capacity(by_district.len());
    for (district_id, parts) in by_district {
        let dissolved = dissolve(parts);
        if dissolved.0.is_empty() {
            return Err(PipelineError::EmptyBoundary(district_id));
        }

        let geometry = dissolved.try_map_coords(|coord| {
            let (x, y) = transform.convert((coord.x, coord.y))?;
            Ok::<_, proj::ProjError>(Coord { x, y })
        })?;

        cleaned.push(DistrictGeometry {
            district_id,
            geometry,
        });
    }

    info!(
        "Dissolved {} boundary rows into {} district geometries",
        total,
        cleaned.len()
    );

    Ok(cleaned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{LineString, Polygon};

    /// An axis-aligned square in EPSG:2263 feet.
    fn square(x0: f64, y0: f64, size: f64) -> MultiPolygon<f64> {
        MultiPolygon::new(vec![Polygon::new(
            LineString::from(vec![
                (x0, y0),
                (x0 + size, y0),
                (x0 + size, y0 + size),
                (x0, y0 + size),
                (x0, y0),
            ]),
            vec![],
        )])
    }

    /// One shape row per district, laid out across the NYC state-plane area.
    fn full_city() -> Vec<RawDistrictShape> {
        (1..=32)
            .map(|district_id| RawDistrictShape {
                district_id,
                geometry: square(
                    960_000.0 + f64::from(district_id) * 3_000.0,
                    180_000.0,
                    2_500.0,
                ),
            })
            .collect()
    }

    #[test]
    fn test_dissolve_merges_duplicate_district_rows() {
        let mut shapes = full_city();
        // A second, overlapping row for district 10, as in the source data.
        shapes.push(RawDistrictShape {
            district_id: 10,
            geometry: square(990_000.0 + 1_250.0, 181_000.0, 2_500.0),
        });

        let cleaned = clean_boundaries(shapes).unwrap();
        assert_eq!(cleaned.len(), 32);
        let district_10: Vec<_> = cleaned.iter().filter(|g| g.district_id == 10).collect();
        assert_eq!(district_10.len(), 1);
        assert!(!district_10[0].geometry.0.is_empty());
    }

    #[test]
    fn test_reprojected_coordinates_are_in_nyc_degrees() {
        let cleaned = clean_boundaries(full_city()).unwrap();

        for district in &cleaned {
            for polygon in &district.geometry {
                for coord in polygon.exterior().coords() {
                    assert!(
                        (-75.0..=-72.0).contains(&coord.x),
                        "longitude out of range: {}",
                        coord.x
                    );
                    assert!(
                        (40.0..=41.5).contains(&coord.y),
                        "latitude out of range: {}",
                        coord.y
                    );
                }
            }
        }
    }

    #[test]
    fn test_missing_district_is_fatal() {
        let shapes: Vec<RawDistrictShape> = full_city()
            .into_iter()
            .filter(|s| s.district_id != 17)
            .collect();

        let err = clean_boundaries(shapes).unwrap_err();
        assert!(matches!(err, PipelineError::MissingBoundary(17)));
    }

    #[test]
    fn test_empty_dissolve_is_fatal() {
        let mut shapes = full_city();
        for shape in &mut shapes {
            if shape.district_id == 3 {
                shape.geometry = MultiPolygon::new(Vec::new());
            }
        }

        let err = clean_boundaries(shapes).unwrap_err();
        assert!(matches!(err, PipelineError::EmptyBoundary(3)));
    }

    #[test]
    fn test_district_out_of_range_is_fatal() {
        let mut shapes = full_city();
        shapes.push(RawDistrictShape {
            district_id: 40,
            geometry: square(1_000_000.0, 190_000.0, 1_000.0),
        });

        let err = clean_boundaries(shapes).unwrap_err();
        assert!(matches!(err, PipelineError::DistrictOutOfRange(40)));
    }
}
