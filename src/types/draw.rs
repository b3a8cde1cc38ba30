//! Historical draw records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::types::LotteryKind;

/// One historical draw.
///
/// Single-draw kinds carry one winning array. [`LotteryKind::Dual7`] carries
/// sub-draw A in `numbers` and sub-draw B in `numbers_b`, both for the same
/// date.
///
/// Numbers are kept in published order; the engine never reorders them.
///
/// ## Example
///
/// ```
/// use chrono::NaiveDate;
/// use lotto_check::types::{DrawRecord, LotteryKind};
///
/// let date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
/// let draw = DrawRecord::single(LotteryKind::Standard5, date, vec![3, 25, 10, 11, 12]);
/// assert!(draw.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DrawRecord {
    pub kind: LotteryKind,

    pub date: NaiveDate,

    /// Winning numbers (sub-draw A for dual kinds)
    pub numbers: Vec<u8>,

    /// Sub-draw B, dual kinds only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub numbers_b: Option<Vec<u8>>,
}

impl DrawRecord {
    /// Create a single-draw record
    pub fn single(kind: LotteryKind, date: NaiveDate, numbers: Vec<u8>) -> Self {
        Self { kind, date, numbers, numbers_b: None }
    }

    /// Create a [`LotteryKind::Dual7`] record from its two sub-draws
    pub fn dual(date: NaiveDate, numbers_a: Vec<u8>, numbers_b: Vec<u8>) -> Self {
        Self {
            kind: LotteryKind::Dual7,
            date,
            numbers: numbers_a,
            numbers_b: Some(numbers_b),
        }
    }

    /// Check the record's shape against its kind.
    ///
    /// A dual kind needs sub-draw B and a single kind must not have one. Each
    /// array holds `draw_size` distinct numbers inside `number_range`.
    pub fn validate(&self) -> Result<(), StoreError> {
        match (self.kind.is_dual(), &self.numbers_b) {
            (true, None) => {
                return Err(StoreError::InvalidRecord(format!(
                    "{} draw on {} is missing sub-draw B",
                    self.kind, self.date
                )))
            }
            (false, Some(_)) => {
                return Err(StoreError::InvalidRecord(format!(
                    "{} draw on {} has an unexpected second sub-draw",
                    self.kind, self.date
                )))
            }
            _ => {}
        }

        self.check_array(&self.numbers)?;
        if let Some(numbers_b) = &self.numbers_b {
            self.check_array(numbers_b)?;
        }
        Ok(())
    }

    fn check_array(&self, numbers: &[u8]) -> Result<(), StoreError> {
        let range = self.kind.number_range();
        if numbers.len() != self.kind.draw_size() {
            return Err(StoreError::InvalidRecord(format!(
                "{} draw on {} has {} numbers, expected {}",
                self.kind,
                self.date,
                numbers.len(),
                self.kind.draw_size()
            )));
        }
        if let Some(n) = numbers.iter().find(|n| !range.contains(n)) {
            return Err(StoreError::InvalidRecord(format!(
                "{} draw on {} has number {} outside {:?}",
                self.kind, self.date, n, range
            )));
        }
        let mut seen = 0u128;
        for &n in numbers {
            let bit = 1u128 << n;
            if seen & bit != 0 {
                return Err(StoreError::InvalidRecord(format!(
                    "{} draw on {} repeats number {}",
                    self.kind, self.date, n
                )));
            }
            seen |= bit;
        }
        Ok(())
    }
}
