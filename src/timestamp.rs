//! Archive timestamp parsing.
//!
//! Archives print timestamps as `Jan 05, 2019 08:30PM`. There is exactly one
//! accepted pattern; anything else is an error for the caller to handle.

use chrono::NaiveDateTime;

use crate::error::{ChatsieveError, Result};

/// chrono pattern equivalent to `MMM DD, YYYY hh:mmA`.
pub const TIMESTAMP_FORMAT: &str = "%b %d, %Y %I:%M%p";

/// Parses a raw archive timestamp after trimming surrounding whitespace.
///
/// # Errors
///
/// Returns [`ChatsieveError::TimestampParse`] if the text does not match
/// [`TIMESTAMP_FORMAT`].
///
/// # Example
///
/// ```rust
/// use chatsieve::timestamp::parse_timestamp;
/// use chrono::{Datelike, Timelike};
///
/// let ts = parse_timestamp("  Jan 05, 2019 08:30PM\n")?;
/// assert_eq!((ts.year(), ts.month(), ts.day()), (2019, 1, 5));
/// assert_eq!((ts.hour(), ts.minute()), (20, 30));
/// # Ok::<(), chatsieve::ChatsieveError>(())
/// ```
pub fn parse_timestamp(text: &str) -> Result<NaiveDateTime> {
    let trimmed = text.trim();
    NaiveDateTime::parse_from_str(trimmed, TIMESTAMP_FORMAT)
        .map_err(|_| ChatsieveError::timestamp(trimmed))
}

/// Formats an instant the same way the archive prints it.
pub fn format_timestamp(instant: &NaiveDateTime) -> String {
    instant.format(TIMESTAMP_FORMAT).to_string()
}
