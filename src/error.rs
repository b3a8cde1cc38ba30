//! Error types.
//!
//! Validation errors are deterministic and derived from caller input. Store
//! errors are environmental. Both collapse to an empty result at the
//! [`MatchEngine::check`](crate::engine::MatchEngine::check) boundary;
//! [`MatchEngine::try_check`](crate::engine::MatchEngine::try_check) keeps them
//! typed for callers that need the cause.

use chrono::NaiveDate;
use thiserror::Error;

use crate::types::LotteryKind;

/// Why a submitted number list was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NumbersIssue {
    #[error("no numbers provided")]
    Empty,

    #[error("`{0}` is not an integer")]
    NotAnInteger(String),

    #[error("expected {expected} distinct numbers, got {actual}")]
    WrongCount { expected: usize, actual: usize },

    #[error("number {0} submitted more than once")]
    Duplicate(i64),

    #[error("number {value} is outside {min}..={max}")]
    OutOfRange { value: i64, min: u8, max: u8 },
}

/// Input validation failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid lottery kind: {0}")]
    InvalidKind(String),

    #[error("invalid numbers for {kind}: {issue}")]
    InvalidNumbers {
        kind: LotteryKind,
        #[source]
        issue: NumbersIssue,
    },

    #[error("invalid match threshold for {kind}: {reason}")]
    InvalidThreshold { kind: LotteryKind, reason: String },
}

/// Draw store failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("draw store unavailable: {0}")]
    Unavailable(String),

    #[error("malformed row from draw store: {0}")]
    MalformedRow(String),

    #[error("invalid draw record: {0}")]
    InvalidRecord(String),

    #[error("duplicate {kind} draw on {date}")]
    DuplicateDate { kind: LotteryKind, date: NaiveDate },

    #[error("store reported {winning} winning draws out of {total}")]
    Inconsistent { winning: u64, total: u64 },
}

/// Any failure of a single check
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Configuration failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{var}={value:?}: {reason}")]
    InvalidValue {
        var: &'static str,
        value: String,
        reason: String,
    },

    #[error("result_cap must be at least 1")]
    ZeroResultCap,
}

/// Draw history parse failure
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("failed to read draw history: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: {reason}")]
    Line { line: usize, reason: String },

    #[error("{selector} draw on {date} has no matching sub-draw")]
    UnpairedSubDraw { selector: &'static str, date: NaiveDate },

    #[error(transparent)]
    Store(#[from] StoreError),
}
