//! Input validation.
//!
//! The UI hands over loosely typed values: identifiers, numbers typed into
//! text boxes, JSON scalars. [`RawValue`] models that input, and the three
//! `validate_*` functions turn it into the typed values the engine works on.
//!
//! Each function is independent; the engine runs all three before touching
//! the draw store.

use std::fmt;

use serde::Deserialize;

use crate::error::{NumbersIssue, ValidationError};
use crate::types::{LotteryKind, MatchThreshold, NumberSet};

/// A loosely typed input value.
///
/// Deserializes from any JSON scalar.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl RawValue {
    /// Coerce to an integer.
    ///
    /// Integers pass through, text is parsed after trimming whitespace, and
    /// floats are accepted only when they have no fractional part. Null and
    /// booleans never coerce.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            RawValue::Int(i) => Some(*i),
            RawValue::Text(s) => s.trim().parse().ok(),
            RawValue::Float(f) if f.is_finite() && f.fract() == 0.0 => {
                let i = *f as i64;
                (i as f64 == *f).then_some(i)
            }
            _ => None,
        }
    }

    /// String form used for identifier matching (`None` for null)
    pub fn as_identifier(&self) -> Option<String> {
        match self {
            RawValue::Null => None,
            RawValue::Text(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Null => f.write_str("null"),
            RawValue::Bool(b) => write!(f, "{b}"),
            RawValue::Int(i) => write!(f, "{i}"),
            RawValue::Float(x) => write!(f, "{x}"),
            RawValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for RawValue {
    fn from(value: i64) -> Self {
        RawValue::Int(value)
    }
}

impl From<i32> for RawValue {
    fn from(value: i32) -> Self {
        RawValue::Int(value.into())
    }
}

impl From<u8> for RawValue {
    fn from(value: u8) -> Self {
        RawValue::Int(value.into())
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Float(value)
    }
}

impl From<bool> for RawValue {
    fn from(value: bool) -> Self {
        RawValue::Bool(value)
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::Text(value)
    }
}

impl From<LotteryKind> for RawValue {
    fn from(kind: LotteryKind) -> Self {
        RawValue::Text(kind.id().to_string())
    }
}

/// Convert anything convertible into a list of raw values
pub fn raw_list<T: Into<RawValue>>(values: impl IntoIterator<Item = T>) -> Vec<RawValue> {
    values.into_iter().map(Into::into).collect()
}

// ============================================================================
// Validators
// ============================================================================

/// Resolve the lottery kind.
///
/// The value is stringified and must equal a canonical identifier exactly.
///
/// ```
/// use lotto_check::validate::{validate_kind, RawValue};
/// use lotto_check::types::LotteryKind;
///
/// assert_eq!(validate_kind(&RawValue::from("hu7")).unwrap(), LotteryKind::Dual7);
/// assert!(validate_kind(&RawValue::from(12345)).is_err());
/// ```
pub fn validate_kind(raw: &RawValue) -> Result<LotteryKind, ValidationError> {
    let id = raw
        .as_identifier()
        .ok_or_else(|| ValidationError::InvalidKind(raw.to_string()))?;
    LotteryKind::from_id(&id).ok_or(ValidationError::InvalidKind(id))
}

/// Validate a submitted ticket against `kind`.
///
/// Fails on empty input, any element that is not an integer, a distinct count
/// other than `draw_size`, repeated values, or values outside `number_range`.
pub fn validate_numbers(raw: &[RawValue], kind: LotteryKind) -> Result<NumberSet, ValidationError> {
    if raw.is_empty() {
        return Err(ValidationError::InvalidNumbers { kind, issue: NumbersIssue::Empty });
    }

    let values = raw
        .iter()
        .map(|value| {
            value.as_integer().ok_or_else(|| ValidationError::InvalidNumbers {
                kind,
                issue: NumbersIssue::NotAnInteger(value.to_string()),
            })
        })
        .collect::<Result<Vec<i64>, _>>()?;

    NumberSet::new(kind, &values)
}

/// Validate an explicit match threshold against `kind`
pub fn validate_threshold(raw: &RawValue, kind: LotteryKind) -> Result<MatchThreshold, ValidationError> {
    let value = raw.as_integer().ok_or_else(|| ValidationError::InvalidThreshold {
        kind,
        reason: format!("`{raw}` is not an integer"),
    })?;
    MatchThreshold::new(kind, value)
}

// ============================================================================
// Unit Tests
// ============================================================================
