//! Match engine module for lotto-check.
//!
//! ## Design Principles
//!
//! 1. **Determinism**: same inputs against an unchanged store, same result
//! 2. **Fail soft**: [`MatchEngine::check`] never errors; the caller renders
//!    "nothing to show"
//! 3. **Synchronous Execution**: at most two sequential store reads per check
//! 4. **Newest first**: rows are ordered by draw date, descending
//!
//! ## Counting Rules
//!
//! - `total_draw_count` counts every draw of the kind
//! - `winning_draw_count` counts qualifying draws across all history, even
//!   those cut from `rows` by the result cap
//! - For dual kinds a date qualifies if either sub-draw does
//!
//! ## Example
//!
//! ```
//! use chrono::NaiveDate;
//! use lotto_check::engine::MatchEngine;
//! use lotto_check::store::InMemoryDrawStore;
//! use lotto_check::types::{DrawRecord, LotteryKind};
//! use lotto_check::validate::raw_list;
//!
//! let date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
//! let store = InMemoryDrawStore::from_records([
//!     DrawRecord::single(LotteryKind::Standard5, date, vec![3, 25, 10, 11, 12]),
//! ])
//! .unwrap();
//! let engine = MatchEngine::new(store);
//!
//! let result = engine.check(&"hu5".into(), &raw_list([3, 25, 32, 55, 74]), Some(&2.into()));
//!
//! assert_eq!(result.rows.len(), 1);
//! assert_eq!(result.rows[0].date, "2024-01-05");
//! assert_eq!(result.rows[0].draw.match_count, 2);
//! assert_eq!(result.winning_draw_count, 1);
//! ```

pub mod format;
pub mod matcher;

pub use format::{format_date, format_row};
pub use matcher::{CheckRequest, MatchEngine};
