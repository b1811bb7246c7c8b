//! Summary-statistic documents produced for the presentation layer.

use serde::{Deserialize, Serialize};

/// Counts and percentages of over-capacity buildings by utilization range.
///
/// Percentages are shares of the over-capacity population, not of all
/// buildings; all four are 0 when nothing is over capacity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BucketBreakdown {
    pub num_util_101_110: u32,
    pub num_util_111_120: u32,
    pub num_util_121_130: u32,
    pub num_util_131_plus: u32,
    pub pct_util_101_110: f64,
    pub pct_util_111_120: f64,
    pub pct_util_121_130: f64,
    pub pct_util_131_plus: f64,
}

/// Citywide summary statistics over every building in the analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CityStats {
    /// Buildings included in the analysis
    pub total_bldgs: u32,

    /// Buildings with utilization above 100%
    pub total_overcapacity: u32,

    /// Share of all buildings that are over capacity
    pub pct_overcapacity: f64,

    #[serde(flatten)]
    pub buckets: BucketBreakdown,

    pub mean_bldg_util: f64,
    pub median_bldg_util: f64,

    /// Mean number of buildings per district
    pub mean_bldgs: f64,

    /// Median number of buildings per district
    pub median_bldgs: f64,

    /// Median of the per-district over-capacity percentages
    pub median_district_pctovercap: f64,
}

/// One building directory entry shown in a district summary: the derived
/// record projected to its user-facing columns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryRow {
    pub building_name: String,
    pub enrollment: f64,
    pub capacity: f64,

    /// Utilization as a proportion (82% -> 0.82)
    pub utilization: f64,

    pub schools_in_building: String,
    pub over_capacity: bool,
}

/// Summary statistics for one district, same shape as [`CityStats`] plus the
/// district's rank, its utilization maximum, and its building directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistrictStats {
    pub total_bldgs: u32,
    pub total_overcapacity: u32,
    pub pct_overcapacity: f64,

    /// Rank by over-capacity percentage among all districts (1 = highest)
    pub rank: u32,

    #[serde(flatten)]
    pub buckets: BucketBreakdown,

    /// Highest building utilization in the district
    pub max_bldg_util: f64,

    pub mean_bldg_util: f64,
    pub median_bldg_util: f64,

    /// Per-building directory for the district
    pub directory: Vec<DirectoryRow>,
}
