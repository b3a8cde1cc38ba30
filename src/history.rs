//! Draw history loader.
//!
//! Reads the plain-text export of the draw table:
//!
//! ```text
//! # draw_date;lottery_id;numbers
//! 2024.01.05.;hu5;3,25,10,11,12
//! 2024-01-07;hu7a;1,2,3,4,5,6,7
//! 2024-01-07;hu7b;8,9,10,11,12,13,14
//! ```
//!
//! Dates may use `.` or `-` separators, unpadded months and days, and a
//! trailing dot. `hu7a`/`hu7b` lines are paired by date into one
//! [`LotteryKind::Dual7`] record. Blank lines and `#` comments are skipped.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use tracing::info;

use crate::error::HistoryError;
use crate::store::sql::parse_delimited;
use crate::store::InMemoryDrawStore;
use crate::types::{DrawRecord, LotteryKind};

/// Normalize a lenient date (`2024.1.5.`, `2024-01-05`) to a calendar date
pub fn normalize_date(raw: &str) -> Option<NaiveDate> {
    let cleaned = raw.trim_matches(|c: char| c == '.' || c.is_whitespace()).replace('.', "-");
    let mut parts = cleaned.split('-').map(str::trim);
    let year = parts.next()?.parse().ok()?;
    let month = parts.next()?.parse().ok()?;
    let day = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Parse history text into validated records.
///
/// Records come back grouped by kind, oldest first within a kind.
pub fn parse_history(text: &str) -> Result<Vec<DrawRecord>, HistoryError> {
    let mut records = Vec::new();
    let mut dual: BTreeMap<NaiveDate, (Option<Vec<u8>>, Option<Vec<u8>>)> = BTreeMap::new();

    for (index, line) in text.lines().enumerate() {
        let line_no = index + 1;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let fail = |reason: String| HistoryError::Line { line: line_no, reason };

        let mut fields = line.split(';').map(str::trim);
        let (Some(raw_date), Some(selector), Some(raw_numbers), None) =
            (fields.next(), fields.next(), fields.next(), fields.next())
        else {
            return Err(fail("expected `date;lottery_id;numbers`".to_string()));
        };

        let date = normalize_date(raw_date).ok_or_else(|| fail(format!("bad date `{raw_date}`")))?;
        let numbers = parse_delimited(raw_numbers).map_err(|e| fail(e.to_string()))?;

        match selector {
            "hu5" => records.push(DrawRecord::single(LotteryKind::Standard5, date, numbers)),
            "hu6" => records.push(DrawRecord::single(LotteryKind::Standard6, date, numbers)),
            "hu7a" | "hu7b" => {
                let slot = dual.entry(date).or_default();
                let side = if selector == "hu7a" { &mut slot.0 } else { &mut slot.1 };
                if side.replace(numbers).is_some() {
                    return Err(fail(format!("second {selector} draw on {date}")));
                }
            }
            other => return Err(fail(format!("unknown lottery id `{other}`"))),
        }
    }

    for (date, pair) in dual {
        match pair {
            (Some(a), Some(b)) => records.push(DrawRecord::dual(date, a, b)),
            (Some(_), None) => return Err(HistoryError::UnpairedSubDraw { selector: "hu7a", date }),
            (None, Some(_)) => return Err(HistoryError::UnpairedSubDraw { selector: "hu7b", date }),
            (None, None) => {}
        }
    }

    for record in &records {
        record.validate()?;
    }
    records.sort_by_key(|r| (r.kind, r.date));
    Ok(records)
}

/// Read a history file into an in-memory store
pub fn load_store(path: impl AsRef<Path>) -> Result<InMemoryDrawStore, HistoryError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    let records = parse_history(&text)?;
    let store = InMemoryDrawStore::from_records(records)?;

    info!(
        path = %path.display(),
        draws = store.len(),
        hu5 = store.len_for(LotteryKind::Standard5),
        hu6 = store.len_for(LotteryKind::Standard6),
        hu7 = store.len_for(LotteryKind::Dual7),
        "loaded draw history"
    );
    Ok(store)
}
