//! The utilization data-transformation pipeline.
//!
//! Each stage is a pure function of its inputs; [`run`] composes them in
//! dependency order and returns the full derived snapshot.

mod clean;
mod derive;
mod district;
mod features;
mod geometry;
mod stats;

pub use clean::clean_records;
pub use derive::derive_utilization;
pub use district::build_district_table;
pub use features::feature_collection;
pub use geometry::clean_boundaries;
pub use stats::{city_stats, district_stats, district_stats_by_district};

use std::collections::BTreeMap;

use thiserror::Error;
use tracing::info;

use crate::models::{
    CityStats, DerivedBuildingRecord, DistrictRow, DistrictStats, RawDistrictShape,
    RawUtilizationRow,
};

/// Input-integrity failures. Any of these aborts the whole run; downstream
/// stages assume a validated schema and there is no partial output mode.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("unparseable reporting date {value:?}")]
    InvalidDate {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("district {0} is outside the valid 1-32 range")]
    DistrictOutOfRange(u32),

    #[error("building {building_id} has no {field} value")]
    MissingField {
        building_id: String,
        field: &'static str,
    },

    #[error("no boundary shape for district {0}")]
    MissingBoundary(u8),

    #[error("district {0} dissolved to an empty boundary")]
    EmptyBoundary(u8),

    #[error("failed to initialize the EPSG:2263 -> EPSG:4326 transform")]
    ProjectionInit(#[from] proj::ProjCreateError),

    #[error("failed to reproject a district boundary")]
    Reprojection(#[from] proj::ProjError),
}

/// Validate a raw district id against the fixed 1-32 range.
pub(crate) fn validate_district(district_id: u32) -> Result<u8, PipelineError> {
    if (1..=32).contains(&district_id) {
        Ok(district_id as u8)
    } else {
        Err(PipelineError::DistrictOutOfRange(district_id))
    }
}

/// Everything the pipeline derives for one run, held as a read-only snapshot.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// The plotting table, one row per district with at least one building
    pub districts: Vec<DistrictRow>,

    /// Cleaned building records with derived over-capacity fields
    pub buildings: Vec<DerivedBuildingRecord>,

    /// Citywide summary statistics
    pub city: CityStats,

    /// Per-district summary statistics, keyed by district id
    pub by_district: BTreeMap<u8, DistrictStats>,

    /// District boundaries as a GeoJSON feature collection
    pub boundaries: geojson::FeatureCollection,
}

/// Run the full pipeline over raw records and raw boundary shapes.
pub fn run(
    rows: Vec<RawUtilizationRow>,
    shapes: Vec<RawDistrictShape>,
) -> Result<PipelineOutput, PipelineError> {
    let geometries = clean_boundaries(shapes)?;
    let records = clean_records(rows)?;
    let buildings = derive_utilization(records);
    let districts = build_district_table(&buildings, &geometries)?;
    let city = city_stats(&buildings, &districts);
    let by_district = district_stats_by_district(&buildings, &districts);
    let boundaries = feature_collection(&geometries);

    info!(
        "Pipeline complete: {} buildings across {} districts",
        buildings.len(),
        districts.len()
    );

    Ok(PipelineOutput {
        districts,
        buildings,
        city,
        by_district,
        boundaries,
    })
}
