//! District-level types: boroughs, boundary geometries, and the plotting table.

use geo::MultiPolygon;
use serde::{Deserialize, Serialize};

/// NYC borough, assigned to a district by its number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Borough {
    Manhattan,
    Bronx,
    Brooklyn,
    Queens,
    #[serde(rename = "Staten Island")]
    StatenIsland,
}

impl Borough {
    /// Map a district number to its borough.
    ///
    /// The ranges are fixed: 1-6 Manhattan, 7-12 Bronx, 13-23 and 32
    /// Brooklyn, 24-30 Queens, 31 Staten Island. Anything else is not a
    /// valid NYC school district.
    pub fn from_district(district_id: u8) -> Option<Self> {
        match district_id {
            1..=6 => Some(Borough::Manhattan),
            7..=12 => Some(Borough::Bronx),
            13..=23 | 32 => Some(Borough::Brooklyn),
            24..=30 => Some(Borough::Queens),
            31 => Some(Borough::StatenIsland),
            _ => None,
        }
    }
}

impl std::fmt::Display for Borough {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Borough::Manhattan => write!(f, "Manhattan"),
            Borough::Bronx => write!(f, "Bronx"),
            Borough::Brooklyn => write!(f, "Brooklyn"),
            Borough::Queens => write!(f, "Queens"),
            Borough::StatenIsland => write!(f, "Staten Island"),
        }
    }
}

/// One raw boundary shape row as loaded from the source file.
///
/// Coordinates are still in the source projected CRS (EPSG:2263) and a
/// district may span several rows.
#[derive(Debug, Clone)]
pub struct RawDistrictShape {
    pub district_id: u32,
    pub geometry: MultiPolygon<f64>,
}

/// A single dissolved boundary per district, reprojected to EPSG:4326
/// (lon/lat degrees).
#[derive(Debug, Clone)]
pub struct DistrictGeometry {
    pub district_id: u8,
    pub geometry: MultiPolygon<f64>,
}

/// One row of the plotting table: per-district over-capacity aggregates
/// joined with borough/neighborhood reference data and a label point.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistrictRow {
    /// School district (1-32)
    pub district_id: u8,

    /// Number of over-capacity buildings in the district
    pub over_capacity_count: u32,

    /// Number of distinct school buildings in the district
    pub total_buildings: u32,

    /// over_capacity_count / total_buildings * 100, rounded to 2 decimals
    pub pct_over_capacity: f64,

    /// Rank by pct_over_capacity, 1 = highest; ties share the minimum rank
    pub rank_by_over_capacity: u32,

    /// Borough the district belongs to
    pub borough: Borough,

    /// Neighborhoods served by the district
    pub neighborhoods: String,

    /// Longitude of the district's map label
    pub label_lon: f64,

    /// Latitude of the district's map label
    pub label_lat: f64,
}
