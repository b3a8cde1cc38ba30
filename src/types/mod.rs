//! Core data types for lotto-check
//!
//! ## Types
//!
//! - [`LotteryKind`]: Supported games and their rules
//! - [`NumberSet`]: A validated ticket
//! - [`MatchThreshold`] / [`MatchFilter`]: Which intersection sizes count as a win
//! - [`DrawRecord`]: One historical draw (two sub-draws for dual kinds)
//! - [`MatchResult`] / [`EngineResult`]: Engine output
//! - [`CheckReceipt`]: Fixed-size summary of a result

mod kind;
mod numbers;
mod draw;
mod result;
mod receipt;

pub use kind::LotteryKind;
pub use numbers::{MatchFilter, MatchThreshold, NumberSet};
pub use draw::DrawRecord;
pub use result::{DrawMatch, EngineResult, MatchResult};
pub use receipt::CheckReceipt;
