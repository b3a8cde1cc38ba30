//! Check receipt: a fixed-size summary of one engine result.
//!
//! The receipt carries the counts plus a SHA-256 digest over the returned
//! rows, so two results can be compared (or logged) without shipping the rows.

use ssz_rs::prelude::*;
use sha2::{Digest, Sha256};

use crate::types::{EngineResult, LotteryKind, MatchFilter, MatchResult};

/// Receipt summarizing a single check.
///
/// ## SSZ Layout
///
/// Fixed-size container: 1 + 1 + 8 + 8 + 8 + 32 = 58 bytes.
///
/// ## Example
///
/// ```
/// use lotto_check::types::{CheckReceipt, EngineResult, LotteryKind, MatchFilter};
///
/// let receipt = CheckReceipt::for_result(
///     LotteryKind::Standard5,
///     MatchFilter::AnyMatch,
///     &EngineResult::empty(),
/// );
/// assert_eq!(receipt.kind(), Some(LotteryKind::Standard5));
/// assert!(!receipt.has_wins());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, SimpleSerialize)]
pub struct CheckReceipt {
    /// Lottery kind as u8 (see [`LotteryKind::to_u8`])
    pub kind_raw: u8,

    /// Threshold as u8 (0 = any non-empty intersection)
    pub threshold_raw: u8,

    /// Every draw of the kind
    pub total_draws: u64,

    /// Qualifying draws across all history
    pub winning_draws: u64,

    /// Rows actually returned (after the cap)
    pub rows_returned: u64,

    /// SHA-256 over the returned rows, in order
    pub rows_digest: [u8; 32],
}

impl CheckReceipt {
    /// Build the receipt for `result`
    pub fn for_result(kind: LotteryKind, filter: MatchFilter, result: &EngineResult) -> Self {
        Self {
            kind_raw: kind.to_u8(),
            threshold_raw: filter.to_u8(),
            total_draws: result.total_draw_count,
            winning_draws: result.winning_draw_count,
            rows_returned: result.rows.len() as u64,
            rows_digest: Self::digest_rows(&result.rows),
        }
    }

    /// Hash the rows in order.
    ///
    /// Each row contributes its date bytes, then each drawn array as a length
    /// byte, the numbers and the match count. A trailing tag byte separates
    /// single rows from dual rows.
    pub fn digest_rows(rows: &[MatchResult]) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update((rows.len() as u64).to_le_bytes());
        for row in rows {
            hasher.update((row.date.len() as u8).to_le_bytes());
            hasher.update(row.date.as_bytes());
            for draw in std::iter::once(&row.draw).chain(row.draw_b.as_ref()) {
                hasher.update([draw.numbers.len() as u8]);
                hasher.update(&draw.numbers);
                hasher.update([draw.match_count]);
            }
            hasher.update([u8::from(row.draw_b.is_some())]);
        }

        let mut digest = [0u8; 32];
        digest.copy_from_slice(&hasher.finalize());
        digest
    }

    /// Decode the lottery kind
    pub fn kind(&self) -> Option<LotteryKind> {
        LotteryKind::from_u8(self.kind_raw)
    }

    /// Get the rows digest as a hex string
    pub fn digest_hex(&self) -> String {
        hex::encode(self.rows_digest)
    }

    /// Whether any draw qualified
    pub fn has_wins(&self) -> bool {
        self.winning_draws > 0
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DrawMatch, MatchThreshold};

    fn sample_result() -> EngineResult {
        EngineResult {
            rows: vec![
                MatchResult {
                    date: "2024-01-05".to_string(),
                    draw: DrawMatch { numbers: vec![3, 25, 10, 11, 12], match_count: 2 },
                    draw_b: None,
                },
                MatchResult {
                    date: "2023-12-29".to_string(),
                    draw: DrawMatch { numbers: vec![3, 55, 1, 2, 4], match_count: 2 },
                    draw_b: None,
                },
            ],
            total_draw_count: 120,
            winning_draw_count: 31,
        }
    }

    #[test]
    fn test_receipt_fields() {
        let threshold = MatchThreshold::new(LotteryKind::Standard5, 2).unwrap();
        let receipt = sample_result().receipt(LotteryKind::Standard5, MatchFilter::Exactly(threshold));

        assert_eq!(receipt.kind(), Some(LotteryKind::Standard5));
        assert_eq!(receipt.threshold_raw, 2);
        assert_eq!(receipt.total_draws, 120);
        assert_eq!(receipt.winning_draws, 31);
        assert_eq!(receipt.rows_returned, 2);
        assert!(receipt.has_wins());
        assert_ne!(receipt.rows_digest, [0u8; 32]);
    }

    #[test]
    fn test_digest_determinism() {
        let result = sample_result();
        assert_eq!(
            CheckReceipt::digest_rows(&result.rows),
            CheckReceipt::digest_rows(&result.rows)
        );

        let mut changed = result.clone();
        changed.rows[1].draw.match_count = 3;
        assert_ne!(
            CheckReceipt::digest_rows(&result.rows),
            CheckReceipt::digest_rows(&changed.rows)
        );

        let mut reordered = result.clone();
        reordered.rows.reverse();
        assert_ne!(
            CheckReceipt::digest_rows(&result.rows),
            CheckReceipt::digest_rows(&reordered.rows)
        );
    }

    #[test]
    fn test_digest_distinguishes_dual_rows() {
        let single = vec![MatchResult {
            date: "2024-01-05".to_string(),
            draw: DrawMatch { numbers: vec![1, 2, 3, 4, 5, 6, 7], match_count: 0 },
            draw_b: None,
        }];
        let mut dual = single.clone();
        dual[0].draw_b = Some(DrawMatch { numbers: vec![8, 9, 10, 11, 12, 13, 14], match_count: 3 });

        assert_ne!(CheckReceipt::digest_rows(&single), CheckReceipt::digest_rows(&dual));
    }

    #[test]
    fn test_digest_hex() {
        let receipt = sample_result().receipt(LotteryKind::Standard5, MatchFilter::AnyMatch);
        let hex = receipt.digest_hex();
        assert_eq!(hex.len(), 64);
        assert!(hex.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_receipt_ssz_roundtrip() {
        let receipt = sample_result().receipt(LotteryKind::Standard5, MatchFilter::AnyMatch);
        let bytes = ssz_rs::serialize(&receipt).expect("Failed to serialize");
        let decoded: CheckReceipt = ssz_rs::deserialize(&bytes).expect("Failed to deserialize");
        assert_eq!(receipt, decoded);
    }

    #[test]
    fn test_receipt_ssz_size() {
        let bytes = ssz_rs::serialize(&CheckReceipt::default()).expect("Failed to serialize");
        assert_eq!(bytes.len(), 58, "CheckReceipt should serialize to 58 bytes");
    }
}
