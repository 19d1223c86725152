//! Assignment models.
//!
//! An assignment is one employee's working period on one project. It enters
//! the engine as a [`RawRecord`] straight from the tabular input and leaves
//! the normalization step as a [`NormalizedAssignment`] with calendar dates.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identifier of an employee as it appears in the input.
pub type EmployeeId = i64;

/// Identifier of a project as it appears in the input.
pub type ProjectId = i64;

/// One input row before date parsing.
///
/// Produced by the record parser. Date columns are kept as text; the parser
/// only normalizes an absent, blank or `NULL` end date to `None`.
///
/// # Example
///
/// ```
/// use overlap_engine::models::RawRecord;
///
/// let record = RawRecord {
///     employee_id: 143,
///     project_id: 12,
///     date_from_text: "2013-11-01".to_string(),
///     date_to_text: None,
/// };
/// assert!(record.date_to_text.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    /// The employee who worked the assignment.
    pub employee_id: EmployeeId,
    /// The project the assignment belongs to.
    pub project_id: ProjectId,
    /// Start of the period, as written in the input.
    pub date_from_text: String,
    /// End of the period, as written in the input; `None` means "still ongoing".
    pub date_to_text: Option<String>,
}

/// One input row after date parsing.
///
/// `date_to >= date_from` is not guaranteed here; an inverted range simply
/// never overlaps anything downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedAssignment {
    /// The employee who worked the assignment.
    pub employee_id: EmployeeId,
    /// The project the assignment belongs to.
    pub project_id: ProjectId,
    /// First day of the period (inclusive).
    pub date_from: NaiveDate,
    /// Last day of the period (inclusive).
    pub date_to: NaiveDate,
}

impl NormalizedAssignment {
    /// Returns true when the period ends before it starts.
    pub fn is_inverted(&self) -> bool {
        self.date_to < self.date_from
    }
}
