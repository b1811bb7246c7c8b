//! Core data models for the utilization pipeline.

pub mod building;
pub mod district;
pub mod stats;

pub use building::{BuildingRecord, DerivedBuildingRecord, RawUtilizationRow, UtilizationBucket};
pub use district::{Borough, DistrictGeometry, DistrictRow, RawDistrictShape};
pub use stats::{BucketBreakdown, CityStats, DirectoryRow, DistrictStats};
