//! Record parsing.
//!
//! Reads the uploaded table into [`RawRecord`]s. Dates stay as text here;
//! only the end-date null marker is normalized, everything else is the
//! date normalizer's job.

use std::io::{BufRead, BufReader, Read, Seek, SeekFrom};

use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::{debug, info};

use crate::cancellation::CancellationToken;
use crate::error::{EngineError, EngineResult};
use crate::models::RawRecord;

use super::is_null_marker;

/// Substrings that mark the first line as a header, compared upper-cased.
pub const HEADER_TOKENS: &[&str] = &["EMPID", "PROJECTID", "DATEFROM", "DATETO"];

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Where each logical field lives in a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ColumnLayout {
    employee_id: usize,
    project_id: usize,
    date_from: usize,
    date_to: Option<usize>,
    width: usize,
}

impl ColumnLayout {
    /// `EmpID, ProjectID, DateFrom, DateTo` by position.
    const POSITIONAL: Self = Self {
        employee_id: 0,
        project_id: 1,
        date_from: 2,
        date_to: Some(3),
        width: 4,
    };

    fn from_header(header: &StringRecord, line: u64) -> EngineResult<Self> {
        let names: Vec<String> = header.iter().map(normalize_column_name).collect();
        let find = |name: &str| names.iter().position(|n| n == name);
        let require = |name: &str, label: &str| {
            find(name).ok_or_else(|| {
                EngineError::format_at(line, format!("header is missing column '{}'", label))
            })
        };

        Ok(Self {
            employee_id: require("EMPID", "EmpID")?,
            project_id: require("PROJECTID", "ProjectID")?,
            date_from: require("DATEFROM", "DateFrom")?,
            date_to: find("DATETO"),
            width: header.len(),
        })
    }

    /// A row may drop the trailing field only when that field is `DateTo`.
    fn accepts_width(&self, len: usize) -> bool {
        len == self.width || (len + 1 == self.width && self.date_to == Some(len))
    }
}

fn normalize_column_name(name: &str) -> String {
    name.trim_start_matches('\u{feff}')
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase()
}

/// Inspects the first line of `reader` and reports whether it looks like a
/// header row. The stream position is restored before returning.
///
/// This is a substring heuristic: a data row that happens to contain one of
/// [`HEADER_TOKENS`] on the first line is taken for a header.
pub fn sniff_header<R: Read + Seek>(reader: &mut R) -> EngineResult<bool> {
    let start = reader.stream_position()?;

    let mut first_line = Vec::new();
    BufReader::new(&mut *reader).read_until(b'\n', &mut first_line)?;
    reader.seek(SeekFrom::Start(start))?;

    let line = first_line.strip_prefix(UTF8_BOM).unwrap_or(&first_line);
    let upper = String::from_utf8_lossy(line).to_uppercase();

    Ok(HEADER_TOKENS.iter().any(|token| upper.contains(token)))
}

/// Parses every row of a CSV stream into [`RawRecord`]s.
///
/// Blank and whitespace-only lines are skipped; a row of empty fields such
/// as `,,,` is not blank and fails id parsing. A malformed row (wrong column count or a
/// non-integer id) rejects the whole input with [`EngineError::Format`]
/// naming its line. The token is checked before each row.
///
/// # Example
///
/// ```
/// use std::io::Cursor;
/// use overlap_engine::cancellation::CancellationToken;
/// use overlap_engine::parsing::parse_records;
///
/// let csv = "EmpID,ProjectID,DateFrom,DateTo\n143,12,2013-11-01,NULL\n";
/// let records = parse_records(Cursor::new(csv), &CancellationToken::new()).unwrap();
///
/// assert_eq!(records.len(), 1);
/// assert_eq!(records[0].employee_id, 143);
/// assert!(records[0].date_to_text.is_none());
/// ```
pub fn parse_records<R: Read + Seek>(
    mut reader: R,
    cancel: &CancellationToken,
) -> EngineResult<Vec<RawRecord>> {
    let has_header = sniff_header(&mut reader)?;
    debug!(has_header, "Detected CSV header");

    let mut csv_reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut layout = if has_header {
        None
    } else {
        Some(ColumnLayout::POSITIONAL)
    };
    let mut records = Vec::new();
    let mut row = StringRecord::new();

    while read_row(&mut csv_reader, &mut row)? {
        cancel.checkpoint()?;

        let line = row.position().map(|p| p.line()).unwrap_or(0);
        if row.len() == 1 && row[0].is_empty() {
            continue;
        }

        match layout {
            None => layout = Some(ColumnLayout::from_header(&row, line)?),
            Some(layout) => records.push(parse_row(&row, &layout, line)?),
        }
    }

    info!(records = records.len(), "Parsed CSV records");
    Ok(records)
}

fn read_row<R: Read>(reader: &mut csv::Reader<R>, row: &mut StringRecord) -> EngineResult<bool> {
    reader.read_record(row).map_err(csv_error)
}

fn csv_error(error: csv::Error) -> EngineError {
    let line = error.position().map(|p| p.line());
    let message = error.to_string();
    match error.into_kind() {
        csv::ErrorKind::Io(io) => EngineError::Io(io),
        csv::ErrorKind::Utf8 { err, .. } => EngineError::Format {
            line,
            message: format!("invalid UTF-8: {}", err),
        },
        _ => EngineError::Format { line, message },
    }
}

fn parse_row(row: &StringRecord, layout: &ColumnLayout, line: u64) -> EngineResult<RawRecord> {
    if !layout.accepts_width(row.len()) {
        return Err(EngineError::format_at(
            line,
            format!("expected {} fields, found {}", layout.width, row.len()),
        ));
    }

    let field = |index: usize| row.get(index).unwrap_or("").trim_start_matches('\u{feff}');

    let date_to_text = layout
        .date_to
        .and_then(|index| row.get(index))
        .filter(|text| !is_null_marker(text))
        .map(str::to_string);

    Ok(RawRecord {
        employee_id: parse_id(field(layout.employee_id), "EmpID", line)?,
        project_id: parse_id(field(layout.project_id), "ProjectID", line)?,
        date_from_text: field(layout.date_from).to_string(),
        date_to_text,
    })
}

fn parse_id(text: &str, column: &str, line: u64) -> EngineResult<i64> {
    text.parse().map_err(|_| {
        EngineError::format_at(line, format!("{} must be an integer, found '{}'", column, text))
    })
}
