//! File loading for the report binary: the enrollment/capacity CSV and the
//! district boundary GeoJSON.
//!
//! Everything here stays raw; validation belongs to the pipeline stages.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{bail, Context, Result};
use csv::ReaderBuilder;
use flate2::read::GzDecoder;
use geo::{MultiPolygon, Polygon};
use geojson::GeoJson;
use tracing::info;

use crate::models::{RawDistrictShape, RawUtilizationRow};

/// Read the enrollment/capacity report CSV (optionally gzip-compressed).
pub fn read_utilization_csv(path: &Path) -> Result<Vec<RawUtilizationRow>> {
    info!("Loading utilization records from {}", path.display());

    let file =
        File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let reader: Box<dyn Read> = if path.extension().map_or(false, |e| e == "gz") {
        Box::new(GzDecoder::new(file))
    } else {
        Box::new(file)
    };

    let mut csv_reader = ReaderBuilder::new().has_headers(true).from_reader(reader);
    let headers = csv_reader.headers()?.clone();

    // Find column indices
    let column = |name: &str| -> Result<usize> {
        headers
            .iter()
            .position(|h| h == name)
            .with_context(|| format!("Column '{}' not found", name))
    };
    let district_idx = column("Geo Dist")?;
    let building_id_idx = column("Bldg ID")?;
    let building_name_idx = column("Bldg Name")?;
    let organization_idx = column("Organization Name")?;
    let enrollment_idx = column("Bldg Enroll")?;
    let capacity_idx = column("Target Bldg Cap")?;
    let utilization_idx = column("Target Bldg Util")?;
    let as_of_idx = column("Data As Of")?;

    let mut rows = Vec::new();
    for result in csv_reader.records() {
        let record = result?;

        let district_id: u32 = record[district_idx]
            .trim()
            .parse()
            .with_context(|| format!("Bad 'Geo Dist' value {:?}", &record[district_idx]))?;

        rows.push(RawUtilizationRow {
            district_id,
            building_id: record[building_id_idx].to_string(),
            building_name: record[building_name_idx].to_string(),
            organization_name: record[organization_idx].to_string(),
            enrollment: parse_numeric_cell(&record[enrollment_idx], "Bldg Enroll")?,
            capacity: parse_numeric_cell(&record[capacity_idx], "Target Bldg Cap")?,
            utilization_pct: parse_numeric_cell(&record[utilization_idx], "Target Bldg Util")?,
            as_of_date: record[as_of_idx].to_string(),
        });
    }

    info!("Loaded {} raw report rows", rows.len());
    Ok(rows)
}

/// Parse a numeric cell, treating a blank cell as absent.
fn parse_numeric_cell(cell: &str, column: &str) -> Result<Option<f64>> {
    let cell = cell.trim();
    if cell.is_empty() {
        return Ok(None);
    }
    let value = cell
        .parse::<f64>()
        .with_context(|| format!("Bad '{}' value {:?}", column, cell))?;
    Ok(Some(value))
}

/// Read district boundary shapes from a GeoJSON export of the source
/// shapefile. Coordinates are expected in EPSG:2263; reprojection happens in
/// the pipeline, not here.
pub fn read_boundaries(path: &Path) -> Result<Vec<RawDistrictShape>> {
    info!("Loading district boundaries from {}", path.display());

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let geojson: GeoJson = content
        .parse()
        .context("Failed to parse boundary GeoJSON")?;

    let collection = match geojson {
        GeoJson::FeatureCollection(fc) => fc,
        _ => bail!("Boundary file must be a GeoJSON FeatureCollection"),
    };

    let mut shapes = Vec::new();
    for feature in collection.features {
        let district_id = feature
            .properties
            .as_ref()
            .and_then(|p| p.get("SchoolDist"))
            .and_then(|v| v.as_u64())
            .context("Boundary feature is missing a numeric 'SchoolDist' property")?
            as u32;

        let geometry = feature
            .geometry
            .with_context(|| format!("District {} boundary has no geometry", district_id))?;

        let geometry: MultiPolygon<f64> = match geometry.value {
            value @ geojson::Value::Polygon(_) => {
                let polygon = Polygon::<f64>::try_from(value)
                    .with_context(|| format!("District {} has invalid polygon coordinates", district_id))?;
                MultiPolygon::new(vec![polygon])
            }
            value @ geojson::Value::MultiPolygon(_) => MultiPolygon::try_from(value)
                .with_context(|| format!("District {} has invalid multipolygon coordinates", district_id))?,
            _ => bail!("District {} boundary is not a polygon", district_id),
        };

        shapes.push(RawDistrictShape {
            district_id,
            geometry,
        });
    }

    info!("Loaded {} boundary shape rows", shapes.len());
    Ok(shapes)
}
