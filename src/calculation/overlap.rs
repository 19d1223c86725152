//! Pairwise overlap computation.
//!
//! Assignments are grouped by project. Inside each group every unordered
//! pair of rows is compared once, and each non-empty intersection of their
//! date ranges is credited to the canonical employee pair. Comparison is
//! quadratic per group, which is fine at the sizes uploads have.

use std::collections::{BTreeMap, HashMap};

use tracing::{debug, info};

use crate::cancellation::CancellationToken;
use crate::error::{EngineError, EngineResult};
use crate::models::{EmployeePair, NormalizedAssignment, OverlapRecord, PairAggregate, ProjectId};

/// Upper bound on a single overlap, in days (100 years).
pub const MAX_OVERLAP_DAYS: i64 = 36_500;

/// Computes the inclusive overlap of two assignments.
///
/// # Returns
///
/// - `Ok(None)` when the ranges are disjoint, either range ends before it
///   starts, or the assignments belong to different projects
/// - `Ok(Some(record))` with `days_worked` counting both boundary days
/// - `Err(EngineError::OverlapOutOfRange)` when the day count falls outside
///   `1..=MAX_OVERLAP_DAYS`
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use overlap_engine::calculation::compute_overlap;
/// use overlap_engine::models::NormalizedAssignment;
///
/// let year = |employee_id| NormalizedAssignment {
///     employee_id,
///     project_id: 1,
///     date_from: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
///     date_to: NaiveDate::from_ymd_opt(2020, 12, 31).unwrap(),
/// };
///
/// let overlap = compute_overlap(&year(1), &year(2)).unwrap().unwrap();
/// assert_eq!(overlap.days_worked, 366);
/// ```
pub fn compute_overlap(
    a: &NormalizedAssignment,
    b: &NormalizedAssignment,
) -> EngineResult<Option<OverlapRecord>> {
    if a.project_id != b.project_id {
        return Ok(None);
    }
    if let Some(inverted) = [a, b].into_iter().find(|x| x.is_inverted()) {
        debug!(
            employee_id = inverted.employee_id,
            project_id = inverted.project_id,
            date_from = %inverted.date_from,
            date_to = %inverted.date_to,
            "Inverted assignment contributes no overlap"
        );
        return Ok(None);
    }

    let overlap_start = a.date_from.max(b.date_from);
    let overlap_end = a.date_to.min(b.date_to);
    if overlap_start > overlap_end {
        return Ok(None);
    }

    let days = (overlap_end - overlap_start).num_days() + 1;
    if !(1..=MAX_OVERLAP_DAYS).contains(&days) {
        let pair = EmployeePair::new(a.employee_id, b.employee_id);
        return Err(EngineError::OverlapOutOfRange {
            employee_low: pair.low(),
            employee_high: pair.high(),
            project_id: a.project_id,
            overlap_start,
            overlap_end,
            days,
        });
    }

    Ok(Some(OverlapRecord {
        project_id: a.project_id,
        days_worked: days,
        overlap_start,
        overlap_end,
    }))
}

/// Groups assignments by project, keeping projects in first-encounter order
/// and rows in input order within each group.
pub fn group_by_project(
    assignments: &[NormalizedAssignment],
) -> Vec<(ProjectId, Vec<&NormalizedAssignment>)> {
    let mut index: HashMap<ProjectId, usize> = HashMap::new();
    let mut groups: Vec<(ProjectId, Vec<&NormalizedAssignment>)> = Vec::new();

    for assignment in assignments {
        let slot = *index.entry(assignment.project_id).or_insert_with(|| {
            groups.push((assignment.project_id, Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(assignment);
    }

    groups
}

/// Compares every pair of rows in one project group and appends the
/// overlaps found to `pairs`.
///
/// Two rows of the same employee are never paired with each other.
pub fn accumulate_pairs(
    project_id: ProjectId,
    group: &[&NormalizedAssignment],
    pairs: &mut BTreeMap<EmployeePair, Vec<OverlapRecord>>,
) -> EngineResult<()> {
    debug!(project_id, assignments = group.len(), "Processing project group");

    for (i, a) in group.iter().enumerate() {
        for b in &group[i + 1..] {
            if a.employee_id == b.employee_id {
                continue;
            }

            let pair = EmployeePair::new(a.employee_id, b.employee_id);
            match compute_overlap(a, b)? {
                Some(overlap) => {
                    debug!(
                        %pair,
                        project_id,
                        days = overlap.days_worked,
                        start = %overlap.overlap_start,
                        end = %overlap.overlap_end,
                        "Found overlap"
                    );
                    pairs.entry(pair).or_default().push(overlap);
                }
                None => debug!(%pair, project_id, "No overlap"),
            }
        }
    }

    Ok(())
}

/// Computes the per-pair aggregates for a set of assignments.
///
/// Aggregates are returned in canonical pair order; ranking is a separate
/// step. The token is checked before each project group.
pub fn compute_pair_overlaps(
    assignments: &[NormalizedAssignment],
    cancel: &CancellationToken,
) -> EngineResult<Vec<PairAggregate>> {
    let mut pairs: BTreeMap<EmployeePair, Vec<OverlapRecord>> = BTreeMap::new();

    for (project_id, group) in group_by_project(assignments) {
        cancel.checkpoint()?;
        accumulate_pairs(project_id, &group, &mut pairs)?;
    }

    let aggregates: Vec<PairAggregate> = pairs
        .into_iter()
        .map(|(pair, projects)| PairAggregate::from_overlaps(pair, projects))
        .collect();

    for aggregate in &aggregates {
        info!(
            employee_a = aggregate.employee_id_low,
            employee_b = aggregate.employee_id_high,
            total_days = aggregate.total_days,
            projects = aggregate.projects.len(),
            "Pair total"
        );
    }

    Ok(aggregates)
}
