//! Schoolcap - NYC school-building utilization pipeline
//!
//! Cleans the enrollment/capacity report, joins it against district boundary
//! shapes, and derives the tables and summary statistics that presentation
//! collaborators consume.

pub mod load;
pub mod models;
pub mod pipeline;
pub mod reference;

pub use models::{BuildingRecord, Borough, DerivedBuildingRecord, DistrictRow, UtilizationBucket};
pub use pipeline::{run, PipelineError, PipelineOutput};
