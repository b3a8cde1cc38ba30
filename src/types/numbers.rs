//! Validated ticket numbers and match thresholds.
//!
//! ## Intersection
//!
//! Every drawable number fits below 128, so a [`NumberSet`] keeps a `u128`
//! bitmask alongside its sorted values. Intersection size against a drawn
//! array is then one bit test per drawn number.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::error::{NumbersIssue, ValidationError};
use crate::types::LotteryKind;

// ============================================================================
// NumberSet
// ============================================================================

/// A validated ticket: exactly `draw_size` distinct numbers inside the kind's
/// range.
///
/// ## Example
///
/// ```
/// use lotto_check::types::{LotteryKind, NumberSet};
///
/// let set = NumberSet::new(LotteryKind::Standard5, &[74, 3, 25, 32, 55]).unwrap();
/// assert_eq!(set.values(), &[3, 25, 32, 55, 74]);
/// assert_eq!(set.intersection_size(&[3, 25, 10, 11, 12]), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct NumberSet {
    kind: LotteryKind,

    /// Sorted ascending
    values: Vec<u8>,

    /// Bit `n` set iff `n` is in the set
    #[serde(skip)]
    mask: u128,
}

impl NumberSet {
    /// Build a set from already-integral values.
    ///
    /// Checks, in order: non-empty, distinct count equals `draw_size`, no
    /// value repeated, every value inside `number_range`.
    pub fn new(kind: LotteryKind, values: &[i64]) -> Result<Self, ValidationError> {
        let invalid = |issue| ValidationError::InvalidNumbers { kind, issue };

        if values.is_empty() {
            return Err(invalid(NumbersIssue::Empty));
        }

        let distinct: BTreeSet<i64> = values.iter().copied().collect();
        if distinct.len() != kind.draw_size() {
            return Err(invalid(NumbersIssue::WrongCount {
                expected: kind.draw_size(),
                actual: distinct.len(),
            }));
        }

        if distinct.len() != values.len() {
            let mut seen = BTreeSet::new();
            let repeated = values.iter().copied().find(|v| !seen.insert(*v)).unwrap_or_default();
            return Err(invalid(NumbersIssue::Duplicate(repeated)));
        }

        let range = kind.number_range();
        let mut sorted = Vec::with_capacity(distinct.len());
        for value in distinct {
            match u8::try_from(value) {
                Ok(n) if range.contains(&n) => sorted.push(n),
                _ => {
                    return Err(invalid(NumbersIssue::OutOfRange {
                        value,
                        min: *range.start(),
                        max: *range.end(),
                    }))
                }
            }
        }

        Ok(Self::from_sorted(kind, sorted))
    }

    fn from_sorted(kind: LotteryKind, values: Vec<u8>) -> Self {
        let mask = values.iter().fold(0u128, |mask, &n| mask | (1u128 << n));
        Self { kind, values, mask }
    }

    /// The kind this set was validated against
    #[inline]
    pub fn kind(&self) -> LotteryKind {
        self.kind
    }

    /// Values, sorted ascending
    #[inline]
    pub fn values(&self) -> &[u8] {
        &self.values
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[inline]
    pub fn contains(&self, n: u8) -> bool {
        n < 128 && self.mask & (1u128 << n) != 0
    }

    /// Count of drawn numbers that are also in this set.
    ///
    /// Repeats in `drawn` are counted once.
    pub fn intersection_size(&self, drawn: &[u8]) -> u8 {
        let drawn_mask = drawn
            .iter()
            .filter(|&&n| n < 128)
            .fold(0u128, |mask, &n| mask | (1u128 << n));
        (self.mask & drawn_mask).count_ones() as u8
    }
}

// ============================================================================
// MatchThreshold / MatchFilter
// ============================================================================

/// Exact intersection size a caller filters by, in `[1, draw_size]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct MatchThreshold(u8);

impl MatchThreshold {
    /// Validate `value` against `kind`.
    ///
    /// Zero is rejected: "no numbers in common" is not a win.
    pub fn new(kind: LotteryKind, value: i64) -> Result<Self, ValidationError> {
        let max = kind.draw_size() as i64;
        if (1..=max).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(ValidationError::InvalidThreshold {
                kind,
                reason: format!("{value} is outside 1..={max}"),
            })
        }
    }

    #[inline]
    pub fn get(self) -> u8 {
        self.0
    }
}

/// Which intersection sizes qualify a draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum MatchFilter {
    /// Any non-empty intersection
    #[default]
    AnyMatch,
    /// Intersection of exactly this size
    Exactly(MatchThreshold),
}

impl MatchFilter {
    /// Whether a single intersection size qualifies
    #[inline]
    pub fn qualifies(self, match_count: u8) -> bool {
        match self {
            MatchFilter::AnyMatch => match_count > 0,
            MatchFilter::Exactly(threshold) => match_count == threshold.get(),
        }
    }

    /// Whether a date qualifies: either sub-draw is enough
    #[inline]
    pub fn qualifies_either(self, match_count: u8, match_count_b: Option<u8>) -> bool {
        self.qualifies(match_count) || match_count_b.is_some_and(|b| self.qualifies(b))
    }

    /// Threshold as u8 for receipts (0 = any match)
    pub fn to_u8(self) -> u8 {
        match self {
            MatchFilter::AnyMatch => 0,
            MatchFilter::Exactly(threshold) => threshold.get(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue(result: Result<NumberSet, ValidationError>) -> NumbersIssue {
        match result {
            Err(ValidationError::InvalidNumbers { issue, .. }) => issue,
            other => panic!("expected InvalidNumbers, got {other:?}"),
        }
    }

    #[test]
    fn test_valid_set_is_sorted() {
        let set = NumberSet::new(LotteryKind::Standard6, &[45, 1, 20, 10, 30, 40]).unwrap();
        assert_eq!(set.values(), &[1, 10, 20, 30, 40, 45]);
        assert_eq!(set.kind(), LotteryKind::Standard6);
        assert_eq!(set.len(), 6);
        assert!(set.contains(45));
        assert!(!set.contains(44));
    }

    #[test]
    fn test_boundaries_accepted() {
        assert!(NumberSet::new(LotteryKind::Standard5, &[1, 2, 3, 4, 90]).is_ok());
        assert!(NumberSet::new(LotteryKind::Dual7, &[1, 5, 10, 15, 20, 25, 35]).is_ok());
    }

    #[test]
    fn test_empty() {
        assert_eq!(issue(NumberSet::new(LotteryKind::Standard5, &[])), NumbersIssue::Empty);
    }

    #[test]
    fn test_wrong_count() {
        assert_eq!(
            issue(NumberSet::new(LotteryKind::Standard5, &[1, 10, 20, 30])),
            NumbersIssue::WrongCount { expected: 5, actual: 4 }
        );
        assert_eq!(
            issue(NumberSet::new(LotteryKind::Standard5, &[1, 2, 3, 4, 5, 6])),
            NumbersIssue::WrongCount { expected: 5, actual: 6 }
        );
    }

    #[test]
    fn test_duplicates_collapsing_below_size() {
        assert_eq!(
            issue(NumberSet::new(LotteryKind::Standard5, &[1, 1, 2, 3, 4])),
            NumbersIssue::WrongCount { expected: 5, actual: 4 }
        );
    }

    #[test]
    fn test_duplicates_with_right_distinct_count() {
        assert_eq!(
            issue(NumberSet::new(LotteryKind::Standard5, &[1, 2, 3, 4, 5, 3])),
            NumbersIssue::Duplicate(3)
        );
    }

    #[test]
    fn test_out_of_range() {
        assert_eq!(
            issue(NumberSet::new(LotteryKind::Standard5, &[1, 10, 20, 30, 91])),
            NumbersIssue::OutOfRange { value: 91, min: 1, max: 90 }
        );
        assert_eq!(
            issue(NumberSet::new(LotteryKind::Standard6, &[0, 10, 20, 30, 40, 45])),
            NumbersIssue::OutOfRange { value: 0, min: 1, max: 45 }
        );
        assert_eq!(
            issue(NumberSet::new(LotteryKind::Dual7, &[-1, 5, 10, 15, 20, 25, 35])),
            NumbersIssue::OutOfRange { value: -1, min: 1, max: 35 }
        );
        assert!(NumberSet::new(LotteryKind::Dual7, &[1, 5, 10, 15, 20, 25, 300]).is_err());
    }

    #[test]
    fn test_intersection_size() {
        let set = NumberSet::new(LotteryKind::Standard5, &[3, 25, 32, 55, 74]).unwrap();
        assert_eq!(set.intersection_size(&[3, 25, 10, 11, 12]), 2);
        assert_eq!(set.intersection_size(&[1, 2, 4, 5, 6]), 0);
        assert_eq!(set.intersection_size(&[74, 55, 32, 25, 3]), 5);
        assert_eq!(set.intersection_size(&[3, 3, 3, 3, 3]), 1);
        assert_eq!(set.intersection_size(&[]), 0);
    }

    #[test]
    fn test_threshold_range() {
        assert_eq!(MatchThreshold::new(LotteryKind::Standard5, 5).unwrap().get(), 5);
        assert_eq!(MatchThreshold::new(LotteryKind::Dual7, 1).unwrap().get(), 1);
        assert!(MatchThreshold::new(LotteryKind::Standard5, 0).is_err());
        assert!(MatchThreshold::new(LotteryKind::Standard5, 6).is_err());
        assert!(MatchThreshold::new(LotteryKind::Standard6, -2).is_err());
        assert!(MatchThreshold::new(LotteryKind::Dual7, 7).is_ok());
        assert!(MatchThreshold::new(LotteryKind::Dual7, 8).is_err());
    }

    #[test]
    fn test_filter_qualifies() {
        let exactly_two = MatchFilter::Exactly(MatchThreshold::new(LotteryKind::Standard5, 2).unwrap());

        assert!(!MatchFilter::AnyMatch.qualifies(0));
        assert!(MatchFilter::AnyMatch.qualifies(1));
        assert!(exactly_two.qualifies(2));
        assert!(!exactly_two.qualifies(3));

        assert!(MatchFilter::AnyMatch.qualifies_either(0, Some(3)));
        assert!(!MatchFilter::AnyMatch.qualifies_either(0, Some(0)));
        assert!(!MatchFilter::AnyMatch.qualifies_either(0, None));
        assert!(exactly_two.qualifies_either(1, Some(2)));
        assert!(!exactly_two.qualifies_either(1, Some(3)));
    }

    #[test]
    fn test_filter_to_u8() {
        assert_eq!(MatchFilter::AnyMatch.to_u8(), 0);
        let three = MatchThreshold::new(LotteryKind::Standard6, 3).unwrap();
        assert_eq!(MatchFilter::Exactly(three).to_u8(), 3);
    }
}
