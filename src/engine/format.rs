//! Result formatter: raw store rows to engine output.
//!
//! Pure functions. Dates become ISO calendar dates; numbers and counts pass
//! through unchanged.

use chrono::NaiveDate;

use crate::store::StoreRow;
use crate::types::{DrawMatch, MatchResult};

/// ISO calendar date, `YYYY-MM-DD`
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Convert one store row
pub fn format_row(row: StoreRow) -> MatchResult {
    let draw_b = match (row.numbers_b, row.match_count_b) {
        (Some(numbers), Some(match_count)) => Some(DrawMatch { numbers, match_count }),
        _ => None,
    };

    MatchResult {
        date: format_date(row.date),
        draw: DrawMatch {
            numbers: row.numbers,
            match_count: row.match_count,
        },
        draw_b,
    }
}
