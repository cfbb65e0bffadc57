//! Helpers for storing timestamps as RFC 3339 text in SQLite.
//!
//! All stored timestamps are UTC and truncated to whole seconds, so the text
//! form is fixed-width and lexicographic comparison in SQL matches
//! chronological order. This is what makes `ORDER BY date` and `BETWEEN`
//! range queries on the transaction table correct.

use time::{OffsetDateTime, UtcOffset, format_description::well_known::Rfc3339};

use crate::Error;

/// The current UTC time, truncated to whole seconds.
pub fn now() -> OffsetDateTime {
    truncate(OffsetDateTime::now_utc())
}

/// Normalize a caller-supplied timestamp to UTC with whole seconds.
pub fn truncate(datetime: OffsetDateTime) -> OffsetDateTime {
    let datetime = datetime.to_offset(UtcOffset::UTC);
    datetime.replace_nanosecond(0).unwrap_or(datetime)
}

/// Format a timestamp for storage.
///
/// # Errors
/// Returns [Error::InvalidTimestamp] if the timestamp cannot be represented
/// as RFC 3339 text (e.g. a year outside the supported range).
pub fn format(datetime: OffsetDateTime) -> Result<String, Error> {
    datetime
        .format(&Rfc3339)
        .map_err(|error| Error::InvalidTimestamp(error.to_string()))
}

/// Parse a stored timestamp from a database column.
///
/// Returns a `rusqlite` error so this can be used inside row-mapping
/// closures; `column` is reported in the conversion failure.
pub(crate) fn parse_column(
    value: String,
    column: usize,
) -> Result<OffsetDateTime, rusqlite::Error> {
    OffsetDateTime::parse(&value, &Rfc3339).map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(
            column,
            rusqlite::types::Type::Text,
            Box::new(error),
        )
    })
}
