//! Pipeline entry point.
//!
//! Runs the full calculation for one input: parse, normalize, compute
//! overlaps, rank. Either the whole input succeeds or the first error is
//! returned; nothing partial escapes.

use std::io::{Read, Seek};

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::cancellation::CancellationToken;
use crate::error::{EngineError, EngineResult};
use crate::models::{CalculationResult, NormalizedAssignment};
use crate::parsing::{DateNormalizer, parse_records};

use super::normalization::normalize_records;
use super::overlap::compute_pair_overlaps;
use super::ranking::rank_pairs;

/// Computes the ranked employee pairs for a CSV stream.
///
/// # Arguments
///
/// * `input` - Seekable CSV stream, with or without a header row
/// * `cancel` - Checked between rows and between project groups
/// * `reference_date` - Stands in for "today" when an end date is missing
///
/// # Errors
///
/// - [`EngineError::Format`] for structurally malformed input
/// - [`EngineError::DateParse`] for a date no strategy can read
/// - [`EngineError::OverlapOutOfRange`] for an implausible overlap
/// - [`EngineError::Cancelled`] when `cancel` fires
/// - [`EngineError::Io`] when the stream cannot be read or repositioned
///
/// # Example
///
/// ```
/// use std::io::Cursor;
/// use chrono::NaiveDate;
/// use overlap_engine::calculation::compute_pairs;
/// use overlap_engine::cancellation::CancellationToken;
///
/// let csv = "\
/// EmpID,ProjectID,DateFrom,DateTo
/// 143,12,2020-01-01,2020-01-31
/// 218,12,2020-01-15,NULL
/// ";
/// let today = NaiveDate::from_ymd_opt(2020, 6, 1).unwrap();
///
/// let result = compute_pairs(Cursor::new(csv), &CancellationToken::new(), today).unwrap();
/// let top = result.top_pair.unwrap();
/// assert_eq!((top.employee_id_low, top.employee_id_high), (143, 218));
/// assert_eq!(top.total_days, 17);
/// ```
pub fn compute_pairs<R: Read + Seek>(
    input: R,
    cancel: &CancellationToken,
    reference_date: NaiveDate,
) -> EngineResult<CalculationResult> {
    let result = run(input, cancel, reference_date);

    match &result {
        Ok(result) => info!(pairs = result.pair_count(), "Calculation complete"),
        Err(EngineError::Cancelled) => warn!("Calculation cancelled"),
        Err(_) => {}
    }

    result
}

fn run<R: Read + Seek>(
    input: R,
    cancel: &CancellationToken,
    reference_date: NaiveDate,
) -> EngineResult<CalculationResult> {
    let records = parse_records(input, cancel)?;
    let normalizer = DateNormalizer::new(reference_date);
    let assignments = normalize_records(&records, &normalizer, cancel)?;
    compute_assignments(&assignments, cancel)
}

/// Runs the overlap and ranking steps on already normalized assignments.
pub fn compute_assignments(
    assignments: &[NormalizedAssignment],
    cancel: &CancellationToken,
) -> EngineResult<CalculationResult> {
    let aggregates = compute_pair_overlaps(assignments, cancel)?;
    if aggregates.is_empty() {
        info!("No employee pairs found");
    }

    Ok(rank_pairs(&aggregates))
}
