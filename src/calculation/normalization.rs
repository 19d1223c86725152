//! Record normalization.
//!
//! Turns parsed [`RawRecord`]s into [`NormalizedAssignment`]s by running both
//! date columns through the [`DateNormalizer`].

use tracing::info;

use crate::cancellation::CancellationToken;
use crate::error::EngineResult;
use crate::models::{NormalizedAssignment, RawRecord};
use crate::parsing::{DateNormalizer, NullPolicy};

/// Field name reported when a start date fails to parse.
pub const DATE_FROM_FIELD: &str = "DateFrom";

/// Field name reported when an end date fails to parse.
pub const DATE_TO_FIELD: &str = "DateTo";

/// Normalizes a single record.
///
/// The start date is required ([`NullPolicy::FailOnNull`]); a missing end
/// date means the assignment runs up to the normalizer's reference date
/// ([`NullPolicy::DefaultToToday`]).
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use overlap_engine::calculation::normalize_record;
/// use overlap_engine::models::RawRecord;
/// use overlap_engine::parsing::DateNormalizer;
///
/// let today = NaiveDate::from_ymd_opt(2020, 6, 1).unwrap();
/// let record = RawRecord {
///     employee_id: 1,
///     project_id: 10,
///     date_from_text: "01/03/2020".to_string(),
///     date_to_text: None,
/// };
///
/// let assignment = normalize_record(&record, &DateNormalizer::new(today)).unwrap();
/// assert_eq!(assignment.date_from, NaiveDate::from_ymd_opt(2020, 3, 1).unwrap());
/// assert_eq!(assignment.date_to, today);
/// ```
pub fn normalize_record(
    record: &RawRecord,
    normalizer: &DateNormalizer,
) -> EngineResult<NormalizedAssignment> {
    let date_from = normalizer.parse(
        DATE_FROM_FIELD,
        Some(record.date_from_text.as_str()),
        NullPolicy::FailOnNull,
    )?;
    let date_to = normalizer.parse(
        DATE_TO_FIELD,
        record.date_to_text.as_deref(),
        NullPolicy::DefaultToToday,
    )?;

    Ok(NormalizedAssignment {
        employee_id: record.employee_id,
        project_id: record.project_id,
        date_from,
        date_to,
    })
}

/// Normalizes every record, stopping at the first failure.
///
/// The token is checked before each record.
pub fn normalize_records(
    records: &[RawRecord],
    normalizer: &DateNormalizer,
    cancel: &CancellationToken,
) -> EngineResult<Vec<NormalizedAssignment>> {
    let assignments = records
        .iter()
        .map(|record| {
            cancel.checkpoint()?;
            normalize_record(record, normalizer)
        })
        .collect::<EngineResult<Vec<_>>>()?;

    info!(
        assignments = assignments.len(),
        reference_date = %normalizer.reference_date(),
        "Normalized employee records"
    );
    Ok(assignments)
}
