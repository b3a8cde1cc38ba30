//! Draw store: the engine's read-only view of draw history.
//!
//! ## Contract
//!
//! A store answers two questions for a kind:
//!
//! 1. [`DrawStore::count_matches`]: qualifying draws, newest first, capped at
//!    the query's limit, plus the true qualifying count across all history
//! 2. [`DrawStore::count_total`]: every recorded draw, regardless of match
//!
//! For dual kinds a date qualifies when either sub-draw qualifies, and dates
//! are counted once.
//!
//! ## Adapters
//!
//! - [`InMemoryDrawStore`]: slab-backed history with a per-kind date index
//! - [`SqlDrawStore`]: query text for a configured [`SqlDialect`], executed
//!   through a caller-supplied [`SqlExecutor`]

pub mod memory;
pub mod sql;

pub use memory::InMemoryDrawStore;
pub use sql::{SqlDialect, SqlDrawStore, SqlExecutor, SqlQuery, SqlRow, SqlValue};

use chrono::NaiveDate;

use crate::error::StoreError;
use crate::types::{LotteryKind, MatchFilter, NumberSet};

/// Parameters of a match query
#[derive(Debug, Clone, Copy)]
pub struct MatchQuery<'a> {
    pub numbers: &'a NumberSet,
    pub filter: MatchFilter,
    /// Row cap; does not affect the qualifying count
    pub limit: usize,
}

impl<'a> MatchQuery<'a> {
    pub fn new(numbers: &'a NumberSet, filter: MatchFilter, limit: usize) -> Self {
        Self { numbers, filter, limit }
    }

    /// Kind being queried (the ticket's kind)
    #[inline]
    pub fn kind(&self) -> LotteryKind {
        self.numbers.kind()
    }
}

/// One raw row from a store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreRow {
    pub date: NaiveDate,
    pub numbers: Vec<u8>,
    pub match_count: u8,
    pub numbers_b: Option<Vec<u8>>,
    pub match_count_b: Option<u8>,
}

impl StoreRow {
    /// Score drawn arrays against a ticket
    pub fn score(date: NaiveDate, numbers: Vec<u8>, numbers_b: Option<Vec<u8>>, ticket: &NumberSet) -> Self {
        let match_count = ticket.intersection_size(&numbers);
        let match_count_b = numbers_b.as_deref().map(|b| ticket.intersection_size(b));
        Self { date, numbers, match_count, numbers_b, match_count_b }
    }

    #[inline]
    pub fn qualifies(&self, filter: MatchFilter) -> bool {
        filter.qualifies_either(self.match_count, self.match_count_b)
    }
}

/// Match query answer
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StoreMatches {
    /// Newest first, at most `limit` rows
    pub rows: Vec<StoreRow>,

    /// Qualifying draws across all history
    pub qualifying_count: u64,
}

impl StoreMatches {
    /// Keep qualifying rows from a newest-first stream, counting all of them
    /// but retaining only the first `limit`.
    pub fn collect(rows: impl IntoIterator<Item = StoreRow>, filter: MatchFilter, limit: usize) -> Self {
        let mut matches = Self::default();
        for row in rows.into_iter().filter(|row| row.qualifies(filter)) {
            matches.qualifying_count += 1;
            if matches.rows.len() < limit {
                matches.rows.push(row);
            }
        }
        matches
    }
}

/// Read capabilities the engine needs from draw history
pub trait DrawStore {
    /// Qualifying draws for the query's kind, newest first, capped at
    /// `query.limit`, with the uncapped qualifying count
    fn count_matches(&self, query: &MatchQuery<'_>) -> Result<StoreMatches, StoreError>;

    /// Every recorded draw of `kind`
    fn count_total(&self, kind: LotteryKind) -> Result<u64, StoreError>;
}

impl<S: DrawStore + ?Sized> DrawStore for &S {
    fn count_matches(&self, query: &MatchQuery<'_>) -> Result<StoreMatches, StoreError> {
        (**self).count_matches(query)
    }

    fn count_total(&self, kind: LotteryKind) -> Result<u64, StoreError> {
        (**self).count_total(kind)
    }
}

impl<S: DrawStore + ?Sized> DrawStore for Box<S> {
    fn count_matches(&self, query: &MatchQuery<'_>) -> Result<StoreMatches, StoreError> {
        (**self).count_matches(query)
    }

    fn count_total(&self, kind: LotteryKind) -> Result<u64, StoreError> {
        (**self).count_total(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MatchThreshold;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    #[test]
    fn test_score_dual() {
        let ticket = NumberSet::new(LotteryKind::Dual7, &[1, 2, 3, 4, 5, 6, 7]).unwrap();
        let row = StoreRow::score(
            date(5),
            vec![20, 21, 22, 23, 24, 25, 26],
            Some(vec![1, 2, 3, 30, 31, 32, 33]),
            &ticket,
        );
        assert_eq!(row.match_count, 0);
        assert_eq!(row.match_count_b, Some(3));
        assert!(row.qualifies(MatchFilter::AnyMatch));
    }

    #[test]
    fn test_collect_counts_past_limit() {
        let ticket = NumberSet::new(LotteryKind::Standard5, &[1, 2, 3, 4, 5]).unwrap();
        let rows = (1..=10).rev().map(|day| {
            let drawn = if day % 2 == 0 { vec![1, 2, 50, 51, 52] } else { vec![60, 61, 62, 63, 64] };
            StoreRow::score(date(day), drawn, None, &ticket)
        });

        let two = MatchFilter::Exactly(MatchThreshold::new(LotteryKind::Standard5, 2).unwrap());
        let matches = StoreMatches::collect(rows, two, 3);

        assert_eq!(matches.qualifying_count, 5);
        assert_eq!(matches.rows.len(), 3);
        let days: Vec<_> = matches.rows.iter().map(|r| r.date).collect();
        assert_eq!(days, vec![date(10), date(8), date(6)]);
    }
}
