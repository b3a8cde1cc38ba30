//! Engine output types.
//!
//! These are what the UI collaborator renders. They serialize with serde so
//! the boundary can be JSON.

use serde::Serialize;

use crate::types::{CheckReceipt, LotteryKind, MatchFilter};

/// One drawn array and its intersection with the ticket
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct DrawMatch {
    /// Winning numbers, in published order
    pub numbers: Vec<u8>,

    /// Numbers in common with the ticket
    pub match_count: u8,
}

/// One row of engine output.
///
/// `draw_b` is present only for [`LotteryKind::Dual7`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct MatchResult {
    /// ISO calendar date (`YYYY-MM-DD`)
    pub date: String,

    /// Sub-draw A for dual kinds, the only draw otherwise
    pub draw: DrawMatch,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub draw_b: Option<DrawMatch>,
}

impl MatchResult {
    /// Intersection sizes as `(a, b)`
    pub fn match_counts(&self) -> (u8, Option<u8>) {
        (self.draw.match_count, self.draw_b.as_ref().map(|d| d.match_count))
    }

    /// Largest intersection on this date
    pub fn best_match(&self) -> u8 {
        let (a, b) = self.match_counts();
        a.max(b.unwrap_or(0))
    }
}

/// Result of one check.
///
/// ## Invariants
///
/// - `rows` is ordered by date, newest first
/// - `rows.len() <= min(total_draw_count, result_cap)`
/// - `winning_draw_count <= total_draw_count`, counted over all history
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct EngineResult {
    pub rows: Vec<MatchResult>,

    /// Every recorded draw of the kind, regardless of threshold
    pub total_draw_count: u64,

    /// Draws that qualified, not limited by the row cap
    pub winning_draw_count: u64,
}

impl EngineResult {
    /// The "nothing to show" result returned on any failure
    pub fn empty() -> Self {
        Self::default()
    }

    /// Check if there is nothing to render
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() && self.total_draw_count == 0 && self.winning_draw_count == 0
    }

    /// Whether any draw in history qualified
    pub fn has_wins(&self) -> bool {
        self.winning_draw_count > 0
    }

    /// Whether more draws qualified than fit in `rows`
    pub fn is_truncated(&self) -> bool {
        self.winning_draw_count > self.rows.len() as u64
    }

    /// Summarize this result as a fixed-size receipt
    pub fn receipt(&self, kind: LotteryKind, filter: MatchFilter) -> CheckReceipt {
        CheckReceipt::for_result(kind, filter, self)
    }
}
