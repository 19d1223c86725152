//! Error types for the overlap engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while turning an uploaded
//! timesheet into a ranked list of collaborating pairs.

use chrono::NaiveDate;
use thiserror::Error;

use crate::models::{EmployeeId, ProjectId};

/// The main error type for the overlap engine.
///
/// Every stage of the pipeline returns this error type. None of the data
/// errors are recovered from: a single bad row or date rejects the whole
/// input.
///
/// # Example
///
/// ```
/// use overlap_engine::error::EngineError;
///
/// let error = EngineError::DateParse {
///     field: "DateFrom",
///     value: "not-a-date".to_string(),
/// };
/// assert_eq!(error.to_string(), "Invalid date format in DateFrom: 'not-a-date'");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// The tabular input was structurally malformed.
    #[error("{}", format_message(.line, .message))]
    Format {
        /// The 1-based line of the offending row, when known.
        line: Option<u64>,
        /// A description of what was wrong.
        message: String,
    },

    /// A date value could not be interpreted by any accepted strategy.
    #[error("Invalid date format in {field}: '{value}'")]
    DateParse {
        /// The logical field the value came from.
        field: &'static str,
        /// The raw text as it appeared in the input.
        value: String,
    },

    /// A computed overlap fell outside the plausible day range.
    #[error(
        "Invalid date range for employees {employee_low} and {employee_high} on project {project_id}: \
         {overlap_start} to {overlap_end} ({days} days)"
    )]
    OverlapOutOfRange {
        /// The lower employee id of the pair.
        employee_low: EmployeeId,
        /// The higher employee id of the pair.
        employee_high: EmployeeId,
        /// The project both assignments belong to.
        project_id: ProjectId,
        /// First day of the computed overlap.
        overlap_start: NaiveDate,
        /// Last day of the computed overlap.
        overlap_end: NaiveDate,
        /// The offending inclusive day count.
        days: i64,
    },

    /// The caller withdrew the request before the calculation finished.
    #[error("Calculation cancelled")]
    Cancelled,

    /// The input stream could not be read or repositioned.
    #[error("Failed to read input: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A configuration value was present but unusable.
    #[error("Invalid configuration value '{field}': {message}")]
    InvalidConfig {
        /// The offending field.
        field: String,
        /// Why the value was rejected.
        message: String,
    },
}

fn format_message(line: &Option<u64>, message: &str) -> String {
    match line {
        Some(line) => format!("CSV parsing error at line {}: {}", line, message),
        None => format!("CSV format error: {}", message),
    }
}

/// Coarse classification of an [`EngineError`].
///
/// Boundaries use this to pick an outcome without matching on message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed input structure.
    Format,
    /// Uninterpretable date value.
    Parse,
    /// Implausible overlap span.
    Range,
    /// Request withdrawn by the caller.
    Cancelled,
    /// Stream failure.
    Io,
    /// Configuration problem.
    Config,
}

impl EngineError {
    /// Creates a format error tied to an input line.
    pub fn format_at(line: u64, message: impl Into<String>) -> Self {
        EngineError::Format {
            line: Some(line),
            message: message.into(),
        }
    }

    /// Returns the coarse kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::Format { .. } => ErrorKind::Format,
            EngineError::DateParse { .. } => ErrorKind::Parse,
            EngineError::OverlapOutOfRange { .. } => ErrorKind::Range,
            EngineError::Cancelled => ErrorKind::Cancelled,
            EngineError::Io(_) => ErrorKind::Io,
            EngineError::ConfigNotFound { .. }
            | EngineError::ConfigParseError { .. }
            | EngineError::InvalidConfig { .. } => ErrorKind::Config,
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_error_with_line_displays_line() {
        let error = EngineError::format_at(3, "expected 4 fields, found 2");
        assert_eq!(
            error.to_string(),
            "CSV parsing error at line 3: expected 4 fields, found 2"
        );
    }

    #[test]
    fn test_format_error_without_line() {
        let error = EngineError::Format {
            line: None,
            message: "header is missing column 'DateFrom'".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "CSV format error: header is missing column 'DateFrom'"
        );
    }

    #[test]
    fn test_date_parse_keeps_raw_value() {
        let error = EngineError::DateParse {
            field: "DateTo",
            value: "2020-13-01".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid date format in DateTo: '2020-13-01'"
        );
        assert_eq!(error.kind(), ErrorKind::Parse);
    }

    #[test]
    fn test_overlap_out_of_range_displays_pair_and_span() {
        let error = EngineError::OverlapOutOfRange {
            employee_low: 1,
            employee_high: 2,
            project_id: 10,
            overlap_start: NaiveDate::from_ymd_opt(1900, 1, 1).unwrap(),
            overlap_end: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            days: 43831,
        };
        assert_eq!(
            error.to_string(),
            "Invalid date range for employees 1 and 2 on project 10: 1900-01-01 to 2020-01-01 (43831 days)"
        );
        assert_eq!(error.kind(), ErrorKind::Range);
    }

    #[test]
    fn test_cancelled_is_its_own_kind() {
        assert_eq!(EngineError::Cancelled.kind(), ErrorKind::Cancelled);
        assert_eq!(EngineError::Cancelled.to_string(), "Calculation cancelled");
    }

    #[test]
    fn test_io_error_converts_with_question_mark() {
        fn read() -> std::io::Result<()> {
            Err(std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "eof"))
        }

        fn fails() -> EngineResult<()> {
            read()?;
            Ok(())
        }

        let error = fails().unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Io);
    }

    #[test]
    fn test_config_errors_share_kind() {
        let not_found = EngineError::ConfigNotFound {
            path: "/missing/engine.yaml".to_string(),
        };
        let parse = EngineError::ConfigParseError {
            path: "/config/bad.yaml".to_string(),
            message: "invalid YAML syntax".to_string(),
        };
        assert_eq!(
            not_found.to_string(),
            "Configuration file not found: /missing/engine.yaml"
        );
        assert_eq!(not_found.kind(), ErrorKind::Config);
        assert_eq!(parse.kind(), ErrorKind::Config);
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error + Send + Sync + 'static>() {}
        assert_error::<EngineError>();
    }
}
