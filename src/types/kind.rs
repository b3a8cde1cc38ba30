//! Lottery kinds and the rules each one carries.
//!
//! ## Kinds
//!
//! | Kind        | Id    | Draw size | Range | Sub-draws |
//! |-------------|-------|-----------|-------|-----------|
//! | `Standard5` | `hu5` | 5         | 1–90  | 1         |
//! | `Standard6` | `hu6` | 6         | 1–45  | 1         |
//! | `Dual7`     | `hu7` | 7         | 1–35  | 2 (A, B)  |
//!
//! Every rule the validator and the stores need hangs off the variant, so no
//! caller ever branches on the identifier string.

use std::fmt;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

/// Lottery kind: a closed set of supported games.
///
/// Represented as u8 in receipts:
/// - Standard5 = 5
/// - Standard6 = 6
/// - Dual7 = 7
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LotteryKind {
    /// Five numbers out of 90, one draw per date
    #[serde(rename = "hu5")]
    Standard5,
    /// Six numbers out of 45, one draw per date
    #[serde(rename = "hu6")]
    Standard6,
    /// Seven numbers out of 35, drawn twice per date (sub-draws A and B)
    #[serde(rename = "hu7")]
    Dual7,
}

impl LotteryKind {
    /// All supported kinds, in identifier order
    pub const ALL: [LotteryKind; 3] = [LotteryKind::Standard5, LotteryKind::Standard6, LotteryKind::Dual7];

    /// Canonical identifier used at the UI boundary
    pub fn id(self) -> &'static str {
        match self {
            LotteryKind::Standard5 => "hu5",
            LotteryKind::Standard6 => "hu6",
            LotteryKind::Dual7 => "hu7",
        }
    }

    /// Look up a kind by its canonical identifier.
    ///
    /// Matching is exact and case-sensitive.
    ///
    /// ```
    /// use lotto_check::types::LotteryKind;
    ///
    /// assert_eq!(LotteryKind::from_id("hu6"), Some(LotteryKind::Standard6));
    /// assert_eq!(LotteryKind::from_id("HU6"), None);
    /// ```
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.id() == id)
    }

    /// How many numbers a ticket (and each sub-draw) holds
    pub fn draw_size(self) -> usize {
        match self {
            LotteryKind::Standard5 => 5,
            LotteryKind::Standard6 => 6,
            LotteryKind::Dual7 => 7,
        }
    }

    /// Largest number that can be drawn
    pub fn max_number(self) -> u8 {
        match self {
            LotteryKind::Standard5 => 90,
            LotteryKind::Standard6 => 45,
            LotteryKind::Dual7 => 35,
        }
    }

    /// Inclusive range of drawable numbers
    pub fn number_range(self) -> RangeInclusive<u8> {
        1..=self.max_number()
    }

    /// Whether each date carries two independent sub-draws
    pub fn is_dual(self) -> bool {
        matches!(self, LotteryKind::Dual7)
    }

    /// Row selectors used by the relational draw table.
    ///
    /// Dual kinds store sub-draw A and sub-draw B under separate selectors.
    pub fn store_selectors(self) -> (&'static str, Option<&'static str>) {
        match self {
            LotteryKind::Standard5 => ("hu5", None),
            LotteryKind::Standard6 => ("hu6", None),
            LotteryKind::Dual7 => ("hu7a", Some("hu7b")),
        }
    }

    /// Convert to u8 for receipts
    pub fn to_u8(self) -> u8 {
        self.draw_size() as u8
    }

    /// Convert from u8
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            5 => Some(LotteryKind::Standard5),
            6 => Some(LotteryKind::Standard6),
            7 => Some(LotteryKind::Dual7),
            _ => None,
        }
    }
}

impl fmt::Display for LotteryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rules_per_kind() {
        assert_eq!(LotteryKind::Standard5.draw_size(), 5);
        assert_eq!(LotteryKind::Standard5.number_range(), 1..=90);
        assert_eq!(LotteryKind::Standard6.draw_size(), 6);
        assert_eq!(LotteryKind::Standard6.number_range(), 1..=45);
        assert_eq!(LotteryKind::Dual7.draw_size(), 7);
        assert_eq!(LotteryKind::Dual7.number_range(), 1..=35);

        assert!(LotteryKind::Dual7.is_dual());
        assert!(!LotteryKind::Standard5.is_dual());
        assert!(!LotteryKind::Standard6.is_dual());
    }

    #[test]
    fn test_id_lookup_is_exact() {
        for kind in LotteryKind::ALL {
            assert_eq!(LotteryKind::from_id(kind.id()), Some(kind));
        }
        assert_eq!(LotteryKind::from_id("Hu5"), None);
        assert_eq!(LotteryKind::from_id(" hu5"), None);
        assert_eq!(LotteryKind::from_id("hu7a"), None);
        assert_eq!(LotteryKind::from_id("5"), None);
    }

    #[test]
    fn test_u8_conversion() {
        for kind in LotteryKind::ALL {
            assert_eq!(LotteryKind::from_u8(kind.to_u8()), Some(kind));
        }
        assert_eq!(LotteryKind::from_u8(0), None);
        assert_eq!(LotteryKind::from_u8(8), None);
    }

    #[test]
    fn test_store_selectors() {
        assert_eq!(LotteryKind::Standard5.store_selectors(), ("hu5", None));
        assert_eq!(LotteryKind::Dual7.store_selectors(), ("hu7a", Some("hu7b")));
    }

    #[test]
    fn test_serde_uses_canonical_id() {
        let json = serde_json::to_string(&LotteryKind::Dual7).unwrap();
        assert_eq!(json, "\"hu7\"");
        let back: LotteryKind = serde_json::from_str("\"hu6\"").unwrap();
        assert_eq!(back, LotteryKind::Standard6);
    }
}
