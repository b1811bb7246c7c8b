//! Building-level record types for the utilization pipeline.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One raw row of the enrollment/capacity report: one organization housed in
/// one building for one reporting date. Several organizations can share a
/// building, so these rows are consolidated by the cleaning stage.
///
/// Nothing here is validated yet; the district id may be out of range and the
/// date is still the source's text form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawUtilizationRow {
    /// `Geo Dist` column
    pub district_id: u32,

    /// `Bldg ID` column
    pub building_id: String,

    /// `Bldg Name` column
    pub building_name: String,

    /// `Organization Name` column
    pub organization_name: String,

    /// `Bldg Enroll` column
    pub enrollment: Option<f64>,

    /// `Target Bldg Cap` column
    pub capacity: Option<f64>,

    /// `Target Bldg Util` column; `None` when the source cell is blank
    pub utilization_pct: Option<f64>,

    /// `Data As Of` column, unparsed (`MM/DD/YYYY`)
    pub as_of_date: String,
}

/// One physical school building for one reporting year, after co-located
/// organizations have been merged into a single row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingRecord {
    /// Unique DOE building identifier
    pub building_id: String,

    /// Building name
    pub building_name: String,

    /// School district (1-32)
    pub district_id: u8,

    /// Students enrolled across all organizations in the building
    pub enrollment: f64,

    /// Target student capacity for the building
    pub capacity: f64,

    /// enrollment / capacity * 100, pre-rounded at source to whole percent
    pub utilization_pct: f64,

    /// Names of the organizations housed in the building, sorted and joined
    /// with ", "
    pub schools_in_building: String,

    /// Reporting date
    pub as_of_date: NaiveDate,
}

/// Severity range for an over-capacity building.
///
/// Exactly one bucket applies to any utilization value; `None` covers
/// everything at or under 100%.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UtilizationBucket {
    /// At or under capacity (utilization <= 100)
    #[serde(rename = "none")]
    None,
    /// 100 < utilization <= 110
    #[serde(rename = "101-110")]
    Pct101To110,
    /// 110 < utilization <= 120
    #[serde(rename = "111-120")]
    Pct111To120,
    /// 120 < utilization <= 130
    #[serde(rename = "121-130")]
    Pct121To130,
    /// utilization > 130
    #[serde(rename = "131+")]
    Pct131Plus,
}

impl UtilizationBucket {
    /// Classify a utilization percentage into its bucket
    pub fn from_utilization(pct: f64) -> Self {
        if pct <= 100.0 {
            UtilizationBucket::None
        } else if pct <= 110.0 {
            UtilizationBucket::Pct101To110
        } else if pct <= 120.0 {
            UtilizationBucket::Pct111To120
        } else if pct <= 130.0 {
            UtilizationBucket::Pct121To130
        } else {
            UtilizationBucket::Pct131Plus
        }
    }

    /// The four over-capacity buckets in ascending severity order
    pub fn over_capacity_buckets() -> &'static [UtilizationBucket] {
        &[
            UtilizationBucket::Pct101To110,
            UtilizationBucket::Pct111To120,
            UtilizationBucket::Pct121To130,
            UtilizationBucket::Pct131Plus,
        ]
    }
}

/// A cleaned building record with the derived over-capacity fields attached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DerivedBuildingRecord {
    #[serde(flatten)]
    pub building: BuildingRecord,

    /// True iff utilization is strictly above 100%
    pub over_capacity: bool,

    /// Utilization severity range
    pub bucket: UtilizationBucket,
}

impl DerivedBuildingRecord {
    pub fn from_record(building: BuildingRecord) -> Self {
        let bucket = UtilizationBucket::from_utilization(building.utilization_pct);
        Self {
            over_capacity: building.utilization_pct > 100.0,
            bucket,
            building,
        }
    }
}
