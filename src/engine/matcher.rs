//! The match engine.
//!
//! One check runs in three stages:
//!
//! 1. **Validate** kind, numbers and threshold ([`MatchEngine::validate`])
//! 2. **Query** the draw store: match query, then total query
//!    ([`MatchEngine::run`])
//! 3. **Format** each row into a [`MatchResult`](crate::types::MatchResult)
//!
//! [`MatchEngine::check`] wraps all three and never fails: any error is
//! logged and the caller gets [`EngineResult::empty`].

use tracing::{debug, warn};

use crate::config::{EngineConfig, ThresholdPolicy};
use crate::engine::format::format_row;
use crate::error::{ConfigError, EngineError, StoreError, ValidationError};
use crate::store::{DrawStore, MatchQuery};
use crate::types::{CheckReceipt, EngineResult, LotteryKind, MatchFilter, NumberSet};
use crate::validate::{validate_kind, validate_numbers, validate_threshold, RawValue};

/// A fully validated check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckRequest {
    pub numbers: NumberSet,
    pub filter: MatchFilter,
}

impl CheckRequest {
    #[inline]
    pub fn kind(&self) -> LotteryKind {
        self.numbers.kind()
    }

    /// Receipt for a result produced from this request
    pub fn receipt(&self, result: &EngineResult) -> CheckReceipt {
        result.receipt(self.kind(), self.filter)
    }
}

/// Retrospective match engine over a [`DrawStore`].
///
/// The engine only reads from the store and holds no per-call state, so a
/// shared reference can serve concurrent callers.
#[derive(Debug)]
pub struct MatchEngine<S> {
    store: S,
    config: EngineConfig,
}

impl<S: DrawStore> MatchEngine<S> {
    /// Create an engine with default settings
    pub fn new(store: S) -> Self {
        Self { store, config: EngineConfig::default() }
    }

    /// Create an engine with explicit settings
    pub fn with_config(store: S, config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { store, config })
    }

    #[inline]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[inline]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Check a ticket against draw history.
    ///
    /// Never fails. Invalid input and store failures both yield
    /// [`EngineResult::empty`]; the caller shows a generic notice.
    pub fn check(&self, kind: &RawValue, numbers: &[RawValue], threshold: Option<&RawValue>) -> EngineResult {
        match self.try_check(kind, numbers, threshold) {
            Ok(result) => result,
            Err(EngineError::Validation(e)) => {
                warn!(error = %e, "rejected check input");
                EngineResult::empty()
            }
            Err(EngineError::Store(e)) => {
                warn!(error = %e, "draw store failed during check");
                EngineResult::empty()
            }
        }
    }

    /// Like [`check`](Self::check), but keeps the failure cause
    pub fn try_check(
        &self,
        kind: &RawValue,
        numbers: &[RawValue],
        threshold: Option<&RawValue>,
    ) -> Result<EngineResult, EngineError> {
        let request = self.validate(kind, numbers, threshold)?;
        Ok(self.run(&request)?)
    }

    /// Validate all inputs.
    ///
    /// An absent threshold follows [`EngineConfig::threshold_policy`].
    pub fn validate(
        &self,
        kind: &RawValue,
        numbers: &[RawValue],
        threshold: Option<&RawValue>,
    ) -> Result<CheckRequest, ValidationError> {
        let kind = validate_kind(kind)?;
        let numbers = validate_numbers(numbers, kind)?;
        let filter = match (threshold, self.config.threshold_policy) {
            (Some(raw), _) => MatchFilter::Exactly(validate_threshold(raw, kind)?),
            (None, ThresholdPolicy::AnyMatch) => MatchFilter::AnyMatch,
            (None, ThresholdPolicy::Required) => {
                return Err(ValidationError::InvalidThreshold {
                    kind,
                    reason: "no threshold supplied".to_string(),
                })
            }
        };
        Ok(CheckRequest { numbers, filter })
    }

    /// Query the store for a validated request and format the rows
    pub fn run(&self, request: &CheckRequest) -> Result<EngineResult, StoreError> {
        let kind = request.kind();
        let cap = self.config.result_cap;

        let query = MatchQuery::new(&request.numbers, request.filter, cap);
        let mut matches = self.store.count_matches(&query)?;
        let total_draw_count = self.store.count_total(kind)?;

        let winning_draw_count = if matches.rows.is_empty() { 0 } else { matches.qualifying_count };
        if winning_draw_count > total_draw_count {
            return Err(StoreError::Inconsistent { winning: winning_draw_count, total: total_draw_count });
        }

        matches.rows.sort_by(|a, b| b.date.cmp(&a.date));
        matches.rows.truncate(cap);
        let rows: Vec<_> = matches.rows.into_iter().map(format_row).collect();

        debug!(
            kind = %kind,
            threshold = request.filter.to_u8(),
            rows = rows.len(),
            total_draw_count,
            winning_draw_count,
            "check complete"
        );

        Ok(EngineResult { rows, total_draw_count, winning_draw_count })
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NumbersIssue;
    use crate::store::{InMemoryDrawStore, StoreMatches};
    use crate::types::DrawRecord;
    use crate::validate::raw_list;
    use chrono::NaiveDate;
    use std::cell::Cell;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_store() -> InMemoryDrawStore {
        InMemoryDrawStore::from_records([
            DrawRecord::single(LotteryKind::Standard5, date(2024, 1, 5), vec![3, 25, 10, 11, 12]),
            DrawRecord::single(LotteryKind::Standard5, date(2024, 1, 12), vec![3, 25, 32, 11, 12]),
            DrawRecord::single(LotteryKind::Standard5, date(2024, 1, 19), vec![1, 2, 4, 5, 6]),
        ])
        .unwrap()
    }

    /// Store that counts calls and can be told to fail
    struct ProbeStore {
        calls: Cell<usize>,
        fail: bool,
        matches: StoreMatches,
        total: u64,
    }

    impl ProbeStore {
        fn new(matches: StoreMatches, total: u64) -> Self {
            Self { calls: Cell::new(0), fail: false, matches, total }
        }
    }

    impl DrawStore for ProbeStore {
        fn count_matches(&self, _query: &MatchQuery<'_>) -> Result<StoreMatches, StoreError> {
            self.calls.set(self.calls.get() + 1);
            if self.fail {
                return Err(StoreError::Unavailable("timeout".to_string()));
            }
            Ok(self.matches.clone())
        }

        fn count_total(&self, _kind: LotteryKind) -> Result<u64, StoreError> {
            self.calls.set(self.calls.get() + 1);
            Ok(self.total)
        }
    }

    #[test]
    fn test_check_any_match() {
        let engine = MatchEngine::new(sample_store());
        let result = engine.check(&"hu5".into(), &raw_list([3, 25, 32, 55, 74]), None);

        assert_eq!(result.total_draw_count, 3);
        assert_eq!(result.winning_draw_count, 2);
        assert_eq!(result.rows.len(), 2);
        assert_eq!(result.rows[0].date, "2024-01-12");
        assert_eq!(result.rows[0].draw.match_count, 3);
        assert_eq!(result.rows[1].date, "2024-01-05");
        assert_eq!(result.rows[1].draw.match_count, 2);
    }

    #[test]
    fn test_check_exact_threshold() {
        let engine = MatchEngine::new(sample_store());
        let result = engine.check(&"hu5".into(), &raw_list([3, 25, 32, 55, 74]), Some(&2.into()));

        assert_eq!(result.total_draw_count, 3);
        assert_eq!(result.winning_draw_count, 1);
        assert_eq!(result.rows.len(), 1);
        assert_eq!(result.rows[0].date, "2024-01-05");
        assert_eq!(result.rows[0].draw.numbers, vec![3, 25, 10, 11, 12]);
    }

    #[test]
    fn test_threshold_with_no_qualifying_draws() {
        let engine = MatchEngine::new(sample_store());
        let result = engine.check(&"hu5".into(), &raw_list([3, 25, 32, 55, 74]), Some(&5.into()));
        assert!(result.rows.is_empty());
        assert_eq!(result.total_draw_count, 3);
        assert_eq!(result.winning_draw_count, 0);
    }

    #[test]
    fn test_invalid_input_skips_store() {
        let store = ProbeStore::new(StoreMatches::default(), 10);
        let engine = MatchEngine::new(&store);

        assert_eq!(engine.check(&"hu5".into(), &[], None), EngineResult::empty());
        assert_eq!(engine.check(&"hu9".into(), &raw_list([1, 2, 3, 4, 5]), None), EngineResult::empty());
        assert_eq!(
            engine.check(&"hu5".into(), &raw_list([1, 2, 3, 4, 5]), Some(&0.into())),
            EngineResult::empty()
        );
        assert_eq!(store.calls.get(), 0);
    }

    #[test]
    fn test_try_check_reports_cause() {
        let engine = MatchEngine::new(sample_store());

        assert!(matches!(
            engine.try_check(&12345.into(), &raw_list([1, 2, 3, 4, 5]), None),
            Err(EngineError::Validation(ValidationError::InvalidKind(_)))
        ));
        assert!(matches!(
            engine.try_check(&"hu5".into(), &raw_list([1, 2, 3, 4]), None),
            Err(EngineError::Validation(ValidationError::InvalidNumbers {
                issue: NumbersIssue::WrongCount { expected: 5, actual: 4 },
                ..
            }))
        ));
        assert!(matches!(
            engine.try_check(&"hu5".into(), &raw_list([1, 2, 3, 4, 5]), Some(&"x".into())),
            Err(EngineError::Validation(ValidationError::InvalidThreshold { .. }))
        ));
    }

    #[test]
    fn test_required_threshold_policy() {
        let config = EngineConfig { threshold_policy: ThresholdPolicy::Required, ..EngineConfig::default() };
        let engine = MatchEngine::with_config(sample_store(), config).unwrap();

        assert!(matches!(
            engine.try_check(&"hu5".into(), &raw_list([3, 25, 32, 55, 74]), None),
            Err(EngineError::Validation(ValidationError::InvalidThreshold { .. }))
        ));
        let result = engine.check(&"hu5".into(), &raw_list([3, 25, 32, 55, 74]), Some(&3.into()));
        assert_eq!(result.winning_draw_count, 1);
    }

    #[test]
    fn test_store_failure_is_soft() {
        let mut store = ProbeStore::new(StoreMatches::default(), 10);
        store.fail = true;
        let engine = MatchEngine::new(&store);

        assert!(matches!(
            engine.try_check(&"hu6".into(), &raw_list([1, 2, 3, 4, 5, 6]), None),
            Err(EngineError::Store(StoreError::Unavailable(_)))
        ));
        assert_eq!(engine.check(&"hu6".into(), &raw_list([1, 2, 3, 4, 5, 6]), None), EngineResult::empty());
    }

    #[test]
    fn test_winning_count_from_store_not_rows() {
        let ticket = NumberSet::new(LotteryKind::Standard6, &[1, 2, 3, 4, 5, 6]).unwrap();
        let row = crate::store::StoreRow::score(date(2024, 2, 3), vec![1, 2, 10, 11, 12, 13], None, &ticket);
        let store = ProbeStore::new(StoreMatches { rows: vec![row], qualifying_count: 42 }, 100);
        let engine = MatchEngine::new(&store);

        let result = engine.check(&"hu6".into(), &raw_list([1, 2, 3, 4, 5, 6]), None);
        assert_eq!(result.rows.len(), 1);
        assert_eq!(result.winning_draw_count, 42);
        assert_eq!(result.total_draw_count, 100);
        assert_eq!(store.calls.get(), 2);
    }

    #[test]
    fn test_inconsistent_store_is_rejected() {
        let ticket = NumberSet::new(LotteryKind::Standard6, &[1, 2, 3, 4, 5, 6]).unwrap();
        let row = crate::store::StoreRow::score(date(2024, 2, 3), vec![1, 2, 10, 11, 12, 13], None, &ticket);
        let store = ProbeStore::new(StoreMatches { rows: vec![row], qualifying_count: 5 }, 3);
        let engine = MatchEngine::new(&store);

        assert_eq!(
            engine.try_check(&"hu6".into(), &raw_list([1, 2, 3, 4, 5, 6]), None),
            Err(EngineError::Store(StoreError::Inconsistent { winning: 5, total: 3 }))
        );
    }

    #[test]
    fn test_result_cap() {
        let records = (1..=30).map(|day| {
            DrawRecord::single(LotteryKind::Standard5, date(2024, 1, day), vec![1, 20, 21, 22, 23])
        });
        let store = InMemoryDrawStore::from_records(records).unwrap();
        let config = EngineConfig { result_cap: 5, ..EngineConfig::default() };
        let engine = MatchEngine::with_config(store, config).unwrap();

        let result = engine.check(&"hu5".into(), &raw_list([1, 2, 3, 4, 5]), Some(&1.into()));
        assert_eq!(result.rows.len(), 5);
        assert_eq!(result.winning_draw_count, 30);
        assert_eq!(result.total_draw_count, 30);
        assert_eq!(result.rows[0].date, "2024-01-30");
        assert!(result.is_truncated());
    }

    #[test]
    fn test_zero_cap_rejected() {
        let config = EngineConfig { result_cap: 0, ..EngineConfig::default() };
        assert_eq!(
            MatchEngine::with_config(sample_store(), config).err(),
            Some(ConfigError::ZeroResultCap)
        );
    }

    #[test]
    fn test_request_receipt() {
        let engine = MatchEngine::new(sample_store());
        let request = engine
            .validate(&"hu5".into(), &raw_list([3, 25, 32, 55, 74]), Some(&2.into()))
            .unwrap();
        let result = engine.run(&request).unwrap();
        let receipt = request.receipt(&result);

        assert_eq!(receipt.kind(), Some(LotteryKind::Standard5));
        assert_eq!(receipt.threshold_raw, 2);
        assert_eq!(receipt.winning_draws, 1);
        assert_eq!(receipt.rows_returned, 1);
    }
}
