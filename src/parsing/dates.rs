//! Date normalization.
//!
//! Input files come from spreadsheets and HR exports, so period dates show
//! up in several shapes. This module turns that text into calendar dates:
//!
//! 1. Null handling: an absent, blank or `NULL` value is either rejected or
//!    replaced by the caller-supplied reference date, depending on the
//!    [`NullPolicy`].
//! 2. Exact patterns: the trimmed text is matched against
//!    [`EXACT_PATTERNS`] in order. A pattern only applies when the text has
//!    exactly its shape (digit widths and separators), so ambiguous values
//!    such as `01/03/2020` are resolved by list order, never by locale.
//! 3. Fallback: a culture-invariant general parse (ISO 8601 / RFC 3339,
//!    RFC 2822, US month/day order, English month names).
//!
//! Time-of-day components are accepted and discarded.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// The literal used by exports to mark a missing date.
pub const NULL_MARKER: &str = "NULL";

/// What to do with a missing date value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NullPolicy {
    /// A missing value is a parse failure.
    FailOnNull,
    /// A missing value means "up to the reference date".
    DefaultToToday,
}

/// A strict date pattern: a chrono format plus the exact shape the text
/// must have, where `d` stands for one ASCII digit and every other
/// character must match literally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatePattern {
    /// chrono format string.
    pub format: &'static str,
    /// Required character shape.
    pub shape: &'static str,
    /// Whether the pattern carries a time of day.
    pub has_time: bool,
}

impl DatePattern {
    const fn date(format: &'static str, shape: &'static str) -> Self {
        Self {
            format,
            shape,
            has_time: false,
        }
    }

    const fn date_time(format: &'static str, shape: &'static str) -> Self {
        Self {
            format,
            shape,
            has_time: true,
        }
    }

    fn matches_shape(&self, text: &str) -> bool {
        text.len() == self.shape.len()
            && text
                .bytes()
                .zip(self.shape.bytes())
                .all(|(c, s)| if s == b'd' { c.is_ascii_digit() } else { c == s })
    }

    fn parse(&self, text: &str) -> Option<NaiveDate> {
        if !self.matches_shape(text) {
            return None;
        }

        if self.has_time {
            NaiveDateTime::parse_from_str(text, self.format)
                .ok()
                .map(|dt| dt.date())
        } else {
            NaiveDate::parse_from_str(text, self.format).ok()
        }
    }
}

/// Accepted strict patterns, in priority order.
pub const EXACT_PATTERNS: &[DatePattern] = &[
    DatePattern::date("%Y-%m-%d", "dddd-dd-dd"),
    DatePattern::date("%Y/%m/%d", "dddd/dd/dd"),
    DatePattern::date("%d-%m-%Y", "dd-dd-dddd"),
    DatePattern::date("%d/%m/%Y", "dd/dd/dddd"),
    DatePattern::date("%m/%d/%Y", "dd/dd/dddd"),
    DatePattern::date("%m-%d-%Y", "dd-dd-dddd"),
    DatePattern::date_time("%Y-%m-%d %H:%M:%S", "dddd-dd-dd dd:dd:dd"),
    DatePattern::date_time("%Y/%m/%d %H:%M:%S", "dddd/dd/dd dd:dd:dd"),
    DatePattern::date_time("%Y-%m-%dT%H:%M:%S", "dddd-dd-ddTdd:dd:dd"),
];

const FALLBACK_DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const FALLBACK_DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%Y.%m.%d",
    "%m/%d/%Y",
    "%B %d, %Y",
    "%B %d %Y",
    "%d %B %Y",
    "%d-%B-%Y",
];

/// Returns true when `text` denotes a missing value: empty, whitespace-only
/// or the `NULL` marker in any letter case.
///
/// # Example
///
/// ```
/// use overlap_engine::parsing::is_null_marker;
///
/// assert!(is_null_marker("  "));
/// assert!(is_null_marker("null"));
/// assert!(!is_null_marker("2020-01-01"));
/// ```
pub fn is_null_marker(text: &str) -> bool {
    let trimmed = text.trim();
    trimmed.is_empty() || trimmed.eq_ignore_ascii_case(NULL_MARKER)
}

/// Parses free-form date text against a fixed reference date.
///
/// The reference date stands in for "today" whenever a missing value is
/// accepted, which keeps every calculation reproducible.
///
/// # Example
///
/// ```
/// use overlap_engine::parsing::{DateNormalizer, NullPolicy};
/// use chrono::NaiveDate;
///
/// let today = NaiveDate::from_ymd_opt(2020, 6, 1).unwrap();
/// let normalizer = DateNormalizer::new(today);
///
/// assert_eq!(
///     normalizer.try_parse(Some("31/12/2019"), NullPolicy::FailOnNull),
///     NaiveDate::from_ymd_opt(2019, 12, 31)
/// );
/// assert_eq!(
///     normalizer.try_parse(Some("NULL"), NullPolicy::DefaultToToday),
///     Some(today)
/// );
/// assert_eq!(normalizer.try_parse(None, NullPolicy::FailOnNull), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateNormalizer {
    reference_date: NaiveDate,
}

impl DateNormalizer {
    /// Creates a normalizer resolving missing values to `reference_date`.
    pub fn new(reference_date: NaiveDate) -> Self {
        Self { reference_date }
    }

    /// The date used for missing values under [`NullPolicy::DefaultToToday`].
    pub fn reference_date(&self) -> NaiveDate {
        self.reference_date
    }

    /// Parses `text`, failing with [`EngineError::DateParse`] naming `field`
    /// and the raw value when no strategy applies.
    pub fn parse(
        &self,
        field: &'static str,
        text: Option<&str>,
        policy: NullPolicy,
    ) -> EngineResult<NaiveDate> {
        self.try_parse(text, policy)
            .ok_or_else(|| EngineError::DateParse {
                field,
                value: text.unwrap_or(NULL_MARKER).to_string(),
            })
    }

    /// Parses `text`, returning `None` when no strategy applies.
    pub fn try_parse(&self, text: Option<&str>, policy: NullPolicy) -> Option<NaiveDate> {
        let text = match text {
            Some(text) if !is_null_marker(text) => text.trim(),
            _ => {
                return match policy {
                    NullPolicy::DefaultToToday => Some(self.reference_date),
                    NullPolicy::FailOnNull => None,
                };
            }
        };

        parse_exact(text).or_else(|| parse_general(text))
    }
}

/// Tries [`EXACT_PATTERNS`] in order; the first pattern that matches wins.
pub fn parse_exact(text: &str) -> Option<NaiveDate> {
    EXACT_PATTERNS.iter().find_map(|pattern| pattern.parse(text))
}

/// Culture-invariant general parse used when no exact pattern matched.
///
/// Only four-digit years are accepted, so short forms like `1/5/20` do not
/// silently land in the first century.
pub fn parse_general(text: &str) -> Option<NaiveDate> {
    let parsed = DateTime::parse_from_rfc3339(text)
        .or_else(|_| DateTime::parse_from_rfc2822(text))
        .map(|dt| dt.date_naive())
        .ok()
        .or_else(|| {
            FALLBACK_DATE_TIME_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| {
            FALLBACK_DATE_FORMATS
                .iter()
                .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
        })?;

    (1000..=9999).contains(&parsed.year()).then_some(parsed)
}
