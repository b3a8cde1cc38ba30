//! In-memory draw store.
//!
//! ## Architecture
//!
//! - **Slab**: pre-allocated storage for draw records, O(1) insert and lookup
//! - **BTreeMap** per kind: `Reverse(date)` to slab key, so iteration is
//!   already newest first
//!
//! Intersections are computed client-side from the ticket's bitmask; the
//! store never mutates a record once inserted.
//!
//! ## Example
//!
//! ```
//! use chrono::NaiveDate;
//! use lotto_check::store::{DrawStore, InMemoryDrawStore};
//! use lotto_check::types::{DrawRecord, LotteryKind};
//!
//! let mut store = InMemoryDrawStore::with_capacity(16);
//! let date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
//! store.insert(DrawRecord::single(LotteryKind::Standard5, date, vec![3, 25, 10, 11, 12])).unwrap();
//!
//! assert_eq!(store.count_total(LotteryKind::Standard5).unwrap(), 1);
//! assert_eq!(store.count_total(LotteryKind::Dual7).unwrap(), 0);
//! ```

use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use slab::Slab;
use tracing::debug;

use crate::error::StoreError;
use crate::store::{DrawStore, MatchQuery, StoreMatches, StoreRow};
use crate::types::{DrawRecord, LotteryKind};

/// Draw history held in memory
#[derive(Debug, Default)]
pub struct InMemoryDrawStore {
    /// Record storage
    /// Key: slab index, Value: DrawRecord
    draws: Slab<DrawRecord>,

    /// Per-kind date index (sorted newest first)
    /// Key: Reverse(date), Value: slab key
    by_date: HashMap<LotteryKind, BTreeMap<Reverse<NaiveDate>, usize>>,
}

impl InMemoryDrawStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with room for `capacity` records
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            draws: Slab::with_capacity(capacity),
            by_date: HashMap::new(),
        }
    }

    /// Build a store from records, rejecting the first invalid one
    pub fn from_records(records: impl IntoIterator<Item = DrawRecord>) -> Result<Self, StoreError> {
        let records = records.into_iter();
        let mut store = Self::with_capacity(records.size_hint().0);
        for record in records {
            store.insert(record)?;
        }
        Ok(store)
    }

    // ========================================================================
    // Capacity and Size
    // ========================================================================

    /// Get the current capacity (pre-allocated slots)
    #[inline]
    pub fn capacity(&self) -> usize {
        self.draws.capacity()
    }

    /// Total records across all kinds
    #[inline]
    pub fn len(&self) -> usize {
        self.draws.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.draws.is_empty()
    }

    /// Records of one kind
    pub fn len_for(&self, kind: LotteryKind) -> usize {
        self.by_date.get(&kind).map_or(0, BTreeMap::len)
    }

    // ========================================================================
    // Record Management
    // ========================================================================

    /// Add a record.
    ///
    /// The record must pass [`DrawRecord::validate`] and its date must be new
    /// for its kind.
    ///
    /// # Returns
    ///
    /// The slab key for the record
    pub fn insert(&mut self, record: DrawRecord) -> Result<usize, StoreError> {
        record.validate()?;

        let index = self.by_date.entry(record.kind).or_default();
        if index.contains_key(&Reverse(record.date)) {
            return Err(StoreError::DuplicateDate { kind: record.kind, date: record.date });
        }

        let date = record.date;
        let key = self.draws.insert(record);
        index.insert(Reverse(date), key);
        Ok(key)
    }

    /// Get a record by slab key
    #[inline]
    pub fn get(&self, key: usize) -> Option<&DrawRecord> {
        self.draws.get(key)
    }

    /// Get the record of `kind` drawn on `date`
    pub fn get_by_date(&self, kind: LotteryKind, date: NaiveDate) -> Option<&DrawRecord> {
        let key = *self.by_date.get(&kind)?.get(&Reverse(date))?;
        self.draws.get(key)
    }

    /// Records of `kind`, newest first
    pub fn draws_for(&self, kind: LotteryKind) -> impl Iterator<Item = &DrawRecord> + '_ {
        self.by_date
            .get(&kind)
            .into_iter()
            .flat_map(|index| index.values())
            .filter_map(|&key| self.draws.get(key))
    }

    /// Most recent draw date for `kind`
    pub fn latest_date(&self, kind: LotteryKind) -> Option<NaiveDate> {
        self.by_date.get(&kind)?.keys().next().map(|r| r.0)
    }
}

impl DrawStore for InMemoryDrawStore {
    fn count_matches(&self, query: &MatchQuery<'_>) -> Result<StoreMatches, StoreError> {
        let kind = query.kind();
        let rows = self.draws_for(kind).map(|record| {
            StoreRow::score(record.date, record.numbers.clone(), record.numbers_b.clone(), query.numbers)
        });
        let matches = StoreMatches::collect(rows, query.filter, query.limit);

        debug!(
            kind = %kind,
            scanned = self.len_for(kind),
            qualifying = matches.qualifying_count,
            "in-memory match scan"
        );
        Ok(matches)
    }

    fn count_total(&self, kind: LotteryKind) -> Result<u64, StoreError> {
        Ok(self.len_for(kind) as u64)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
