//! Record cleaning: filter raw report rows down to the target year and
//! consolidate co-located organizations into one row per building.

use std::cmp::Ordering;

use chrono::{Datelike, NaiveDate};
use tracing::info;

use super::{validate_district, PipelineError};
use crate::models::{BuildingRecord, RawUtilizationRow};

/// Reporting year retained by the analysis.
const TARGET_YEAR: i32 = 2023;

/// Date format of the source's `Data As Of` column.
const DATE_FORMAT: &str = "%m/%d/%Y";

/// A validated row that survived filtering, ready for consolidation.
struct Candidate {
    building_id: String,
    building_name: String,
    district_id: u8,
    enrollment: f64,
    capacity: f64,
    utilization_pct: f64,
    as_of_date: NaiveDate,
    organization: String,
}

/// Compare two candidates on the full consolidation key.
fn key_cmp(a: &Candidate, b: &Candidate) -> Ordering {
    a.building_id
        .cmp(&b.building_id)
        .then_with(|| a.building_name.cmp(&b.building_name))
        .then_with(|| a.district_id.cmp(&b.district_id))
        .then_with(|| a.enrollment.total_cmp(&b.enrollment))
        .then_with(|| a.capacity.total_cmp(&b.capacity))
        .then_with(|| a.utilization_pct.total_cmp(&b.utilization_pct))
        .then_with(|| a.as_of_date.cmp(&b.as_of_date))
}

/// Clean raw report rows into one record per physical building.
///
/// Rows outside the target year, with a blank utilization, or with a
/// utilization of exactly 0 (closed or not-yet-opened buildings) are
/// dropped. Remaining rows that share the full consolidation key are merged,
/// with organization names collected into a sorted ", "-joined list.
pub fn clean_records(rows: Vec<RawUtilizationRow>) -> Result<Vec<BuildingRecord>, PipelineError> {
    let total = rows.len();

    // The whole date column is parsed before any filtering, so a malformed
    // date is fatal even on a row that would have been dropped.
    let mut dated: Vec<(NaiveDate, RawUtilizationRow)> = Vec::with_capacity(rows.len());
    for row in rows {
        let as_of_date =
            NaiveDate::parse_from_str(&row.as_of_date, DATE_FORMAT).map_err(|source| {
                PipelineError::InvalidDate {
                    value: row.as_of_date.clone(),
                    source,
                }
            })?;
        dated.push((as_of_date, row));
    }

    let mut candidates: Vec<Candidate> = Vec::new();
    for (as_of_date, row) in dated {
        if as_of_date.year() != TARGET_YEAR {
            continue;
        }

        let utilization_pct = match row.utilization_pct {
            Some(u) => u,
            None => continue,
        };
        if utilization_pct == 0.0 {
            continue;
        }

        let district_id = validate_district(row.district_id)?;
        let enrollment = row.enrollment.ok_or_else(|| PipelineError::MissingField {
            building_id: row.building_id.clone(),
            field: "enrollment",
        })?;
        let capacity = row.capacity.ok_or_else(|| PipelineError::MissingField {
            building_id: row.building_id.clone(),
            field: "capacity",
        })?;

        candidates.push(Candidate {
            building_id: row.building_id,
            building_name: row.building_name,
            district_id,
            enrollment,
            capacity,
            utilization_pct,
            as_of_date,
            organization: row.organization_name,
        });
    }

    // Sort by the full key, then merge adjacent runs. Sorting up front keeps
    // the output order deterministic.
    candidates.sort_by(key_cmp);
    let retained = candidates.len();

    let mut records = Vec::new();
    let mut iter = candidates.into_iter().peekable();
    while let Some(first) = iter.next() {
        let mut organizations = vec![first.organization.clone()];
        while iter
            .peek()
            .map_or(false, |next| key_cmp(&first, next) == Ordering::Equal)
        {
            // Unwrap is fine: peek just confirmed the next element exists.
            organizations.push(iter.next().unwrap().organization);
        }
        organizations.sort();

        records.push(BuildingRecord {
            building_id: first.building_id,
            building_name: first.building_name,
            district_id: first.district_id,
            enrollment: first.enrollment,
            capacity: first.capacity,
            utilization_pct: first.utilization_pct,
            schools_in_building: organizations.join(", "),
            as_of_date: first.as_of_date,
        });
    }

    info!(
        "Cleaned report rows: {} of {} retained, consolidated into {} buildings",
        retained,
        total,
        records.len()
    );

    Ok(records)
}
