//! Response types for the overlap engine API.
//!
//! This module defines the upload result view model, the error response
//! structures, and the mapping from [`EngineError`] to HTTP outcomes.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, ErrorKind};
use crate::models::{CalculationResult, EmployeeId, OverlapRecord, PairAggregate, ProjectId};

/// Message returned when nobody collaborated.
pub const NO_PAIRS_MESSAGE: &str =
    "No employee pairs found. Employees must work on the same project with overlapping dates.";

/// Nginx-style status for a request the client abandoned.
pub const CLIENT_CLOSED_REQUEST: u16 = 499;

/// One project in a pair's breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectView {
    /// The shared project.
    pub project_id: ProjectId,
    /// Inclusive overlap in days.
    pub days_worked: i64,
    /// First overlapping day.
    pub start_date: NaiveDate,
    /// Last overlapping day.
    pub end_date: NaiveDate,
}

impl From<&OverlapRecord> for ProjectView {
    fn from(record: &OverlapRecord) -> Self {
        Self {
            project_id: record.project_id,
            days_worked: record.days_worked,
            start_date: record.overlap_start,
            end_date: record.overlap_end,
        }
    }
}

/// One employee pair with its per-project breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PairView {
    /// The smaller employee id.
    pub employee_id_a: EmployeeId,
    /// The larger employee id.
    pub employee_id_b: EmployeeId,
    /// Total overlapping days across projects.
    pub total_days: i64,
    /// Per-project overlaps, longest first.
    pub projects: Vec<ProjectView>,
}

impl From<&PairAggregate> for PairView {
    fn from(aggregate: &PairAggregate) -> Self {
        Self {
            employee_id_a: aggregate.employee_id_low,
            employee_id_b: aggregate.employee_id_high,
            total_days: aggregate.total_days,
            projects: aggregate.projects.iter().map(ProjectView::from).collect(),
        }
    }
}

/// Body of a successful upload.
///
/// # Example
///
/// ```
/// use overlap_engine::api::UploadResponse;
/// use overlap_engine::models::CalculationResult;
///
/// let response = UploadResponse::from(&CalculationResult::empty());
/// assert_eq!(response.total_pairs_found, 0);
/// assert!(response.top_pair.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    /// Human-readable summary.
    pub message: String,
    /// The strongest pair, if any.
    pub top_pair: Option<PairView>,
    /// Every pair, strongest first.
    pub all_pairs: Vec<PairView>,
    /// Number of pairs in `all_pairs`.
    pub total_pairs_found: usize,
}

impl From<&CalculationResult> for UploadResponse {
    fn from(result: &CalculationResult) -> Self {
        let message = match &result.top_pair {
            Some(top) => format!(
                "Top pair: Employees {} and {} worked together for {} days",
                top.employee_id_low, top.employee_id_high, top.total_days
            ),
            None => NO_PAIRS_MESSAGE.to_string(),
        };

        Self {
            message,
            top_pair: result.top_pair.as_ref().map(PairView::from),
            all_pairs: result.all_pairs.iter().map(PairView::from).collect(),
            total_pairs_found: result.pair_count(),
        }
    }
}

/// API error response structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// No file part, or an empty one.
    pub fn no_file() -> Self {
        Self::new("NO_FILE", "No file uploaded")
    }

    /// The uploaded file has a disallowed extension.
    pub fn invalid_file_type(allowed_extensions: &[String]) -> Self {
        let allowed = allowed_extensions
            .iter()
            .map(|ext| ext.to_uppercase())
            .collect::<Vec<_>>()
            .join("/");
        Self::new(
            "INVALID_FILE_TYPE",
            format!("Only {} files are allowed", allowed),
        )
    }
}

/// API error with HTTP status code.
#[derive(Debug)]
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// A 400 response.
    pub fn bad_request(error: ApiError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error,
        }
    }

    /// A 500 response for failures unrelated to the input data.
    pub fn processing_failed(details: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            error: ApiError::with_details("PROCESSING_FAILED", "Processing failed", details),
        }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let details = error.to_string();
        match error.kind() {
            ErrorKind::Format | ErrorKind::Parse => Self::bad_request(ApiError::with_details(
                "INVALID_CSV_FORMAT",
                "Invalid CSV format",
                details,
            )),
            ErrorKind::Range => Self::bad_request(ApiError::with_details(
                "INVALID_DATA",
                "Invalid data",
                details,
            )),
            ErrorKind::Cancelled => Self {
                status: StatusCode::from_u16(CLIENT_CLOSED_REQUEST)
                    .unwrap_or(StatusCode::BAD_REQUEST),
                error: ApiError::new("UPLOAD_CANCELLED", "Upload cancelled"),
            },
            ErrorKind::Io | ErrorKind::Config => Self::processing_failed(details),
        }
    }
}
