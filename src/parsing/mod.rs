//! Input parsing.
//!
//! - [`parse_records`]: CSV stream to [`RawRecord`](crate::models::RawRecord)s
//! - [`DateNormalizer`]: date text to calendar dates

mod dates;
mod records;

pub use dates::{
    DateNormalizer, DatePattern, EXACT_PATTERNS, NULL_MARKER, NullPolicy, is_null_marker,
    parse_exact, parse_general,
};
pub use records::{HEADER_TOKENS, parse_records, sniff_header};
