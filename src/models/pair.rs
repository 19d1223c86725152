//! Employee pair models.
//!
//! This module contains the canonical pair key, the per-project overlap
//! record and the per-pair aggregate built by the overlap engine.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{EmployeeId, ProjectId};

/// An unordered pair of employees in canonical `(low, high)` order.
///
/// Building the key from `(5, 3)` or `(3, 5)` yields the same value, so
/// overlaps accumulate into one aggregate regardless of row order.
///
/// # Example
///
/// ```
/// use overlap_engine::models::EmployeePair;
///
/// assert_eq!(EmployeePair::new(5, 3), EmployeePair::new(3, 5));
/// assert_eq!(EmployeePair::new(5, 3).low(), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EmployeePair {
    low: EmployeeId,
    high: EmployeeId,
}

impl EmployeePair {
    /// Creates the canonical key for two employees.
    pub fn new(a: EmployeeId, b: EmployeeId) -> Self {
        if a <= b {
            Self { low: a, high: b }
        } else {
            Self { low: b, high: a }
        }
    }

    /// The smaller employee id.
    pub fn low(&self) -> EmployeeId {
        self.low
    }

    /// The larger employee id.
    pub fn high(&self) -> EmployeeId {
        self.high
    }
}

impl std::fmt::Display for EmployeePair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})", self.low, self.high)
    }
}

/// One overlap between two assignments on the same project.
///
/// `days_worked` counts both boundary days and always lies in `1..=36500`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlapRecord {
    /// The shared project.
    pub project_id: ProjectId,
    /// Inclusive number of overlapping days.
    pub days_worked: i64,
    /// First overlapping day.
    pub overlap_start: NaiveDate,
    /// Last overlapping day.
    pub overlap_end: NaiveDate,
}

/// Summed overlap across every project a pair shared.
///
/// `projects` is ordered by `days_worked` descending; ties keep the order in
/// which the overlaps were found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairAggregate {
    /// The smaller employee id of the pair.
    pub employee_id_low: EmployeeId,
    /// The larger employee id of the pair.
    pub employee_id_high: EmployeeId,
    /// Sum of `days_worked` over `projects`.
    pub total_days: i64,
    /// The individual overlaps making up the total.
    pub projects: Vec<OverlapRecord>,
}

impl PairAggregate {
    /// Builds an aggregate from its overlaps, computing the total and
    /// ordering projects by days worked.
    pub fn from_overlaps(pair: EmployeePair, mut projects: Vec<OverlapRecord>) -> Self {
        // sort_by is stable: equal day counts keep encounter order
        projects.sort_by(|a, b| b.days_worked.cmp(&a.days_worked));
        let total_days = projects.iter().map(|p| p.days_worked).sum();

        Self {
            employee_id_low: pair.low(),
            employee_id_high: pair.high(),
            total_days,
            projects,
        }
    }

    /// Returns the canonical key of this aggregate.
    pub fn pair(&self) -> EmployeePair {
        EmployeePair::new(self.employee_id_low, self.employee_id_high)
    }
}
