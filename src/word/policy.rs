//! Overflow/wraparound strategies.
//!
//! The three historical LMC machines differ mainly in how they treat
//! arithmetic results that leave the word range:
//! - `Decimal`: three-digit ring, results wrap modulo 1000
//! - `Bounded32`: native 32-bit accumulator, results clamp at the bounds
//! - `Bounded64`: native 64-bit accumulator, results clamp at the bounds

use std::fmt;
use serde::{Serialize, Deserialize};
use crate::word::Word;

/// Size of the decimal ring (three decimal digits).
const DECIMAL_MODULUS: Word = 1000;

/// Upper half of the decimal ring encodes negative numbers.
const DECIMAL_NEGATIVE_FROM: Word = 500;

/// Arithmetic policy for one machine instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum WordPolicy {
    /// Three-digit decimal ring (0..=999 after ADD/SUB).
    #[default]
    Decimal,
    /// Signed 32-bit, saturating.
    Bounded32,
    /// Signed 64-bit, saturating.
    Bounded64,
}

impl WordPolicy {
    /// All policies, in variant order.
    pub const ALL: [WordPolicy; 3] = [
        WordPolicy::Decimal,
        WordPolicy::Bounded32,
        WordPolicy::Bounded64,
    ];

    /// Smallest value a cell may hold.
    ///
    /// Decimal cells are not bounded by the ring: only ADD/SUB wrap, so
    /// LDA/INP may carry any 32-bit value into the accumulator.
    pub const fn min(self) -> Word {
        match self {
            WordPolicy::Decimal | WordPolicy::Bounded32 => i32::MIN as Word,
            WordPolicy::Bounded64 => i64::MIN,
        }
    }

    /// Largest value a cell may hold.
    pub const fn max(self) -> Word {
        match self {
            WordPolicy::Decimal | WordPolicy::Bounded32 => i32::MAX as Word,
            WordPolicy::Bounded64 => i64::MAX,
        }
    }

    /// Bring an externally supplied value into the representable range.
    #[inline]
    pub fn clamp(self, value: Word) -> Word {
        value.clamp(self.min(), self.max())
    }

    /// ADD: `acc + operand` under this policy.
    pub fn add(self, acc: Word, operand: Word) -> Word {
        match self {
            WordPolicy::Decimal => acc.wrapping_add(operand).rem_euclid(DECIMAL_MODULUS),
            WordPolicy::Bounded32 | WordPolicy::Bounded64 => {
                self.clamp(acc.saturating_add(operand))
            }
        }
    }

    /// SUB: `acc - operand` under this policy.
    ///
    /// The decimal result is the non-negative residue, so a negative
    /// difference comes back as `1000 + difference`.
    pub fn sub(self, acc: Word, operand: Word) -> Word {
        match self {
            WordPolicy::Decimal => acc.wrapping_sub(operand).rem_euclid(DECIMAL_MODULUS),
            WordPolicy::Bounded32 | WordPolicy::Bounded64 => {
                self.clamp(acc.saturating_sub(operand))
            }
        }
    }

    /// Branch condition for BRP.
    pub fn is_positive(self, acc: Word) -> bool {
        match self {
            WordPolicy::Decimal => (0..DECIMAL_NEGATIVE_FROM).contains(&acc),
            WordPolicy::Bounded32 | WordPolicy::Bounded64 => acc >= 0,
        }
    }

    /// Short human-readable name.
    pub fn name(self) -> &'static str {
        match self {
            WordPolicy::Decimal => "decimal",
            WordPolicy::Bounded32 => "32-bit",
            WordPolicy::Bounded64 => "64-bit",
        }
    }
}

impl fmt::Display for WordPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_decimal_add_wraps() {
        let p = WordPolicy::Decimal;
        assert_eq!(p.add(5, 3), 8);
        assert_eq!(p.add(999, 1), 0);
        assert_eq!(p.add(600, 700), 300);
    }

    #[test]
    fn test_decimal_sub_never_negative() {
        let p = WordPolicy::Decimal;
        assert_eq!(p.sub(5, 3), 2);
        assert_eq!(p.sub(0, 1), 999);
        assert_eq!(p.sub(3, 5), 998);
    }

    #[test]
    fn test_decimal_positive_is_lower_half() {
        let p = WordPolicy::Decimal;
        assert!(p.is_positive(0));
        assert!(p.is_positive(499));
        assert!(!p.is_positive(500));
        assert!(!p.is_positive(999));
        assert!(!p.is_positive(-1));
    }

    #[test]
    fn test_bounded32_clamps() {
        let p = WordPolicy::Bounded32;
        let max = i32::MAX as Word;
        let min = i32::MIN as Word;
        assert_eq!(p.add(max, 1), max);
        assert_eq!(p.add(max - 1, 1), max);
        assert_eq!(p.sub(min, 1), min);
        assert_eq!(p.sub(0, max), -max);
        assert_eq!(p.add(-7, 3), -4);
    }

    #[test]
    fn test_bounded64_clamps() {
        let p = WordPolicy::Bounded64;
        assert_eq!(p.add(i64::MAX, 1), i64::MAX);
        assert_eq!(p.sub(i64::MIN, 1), i64::MIN);
        assert_eq!(
            p.add(5_000_000_000_000_000_000, 2_000_000_000_000_000_000),
            7_000_000_000_000_000_000
        );
    }

    #[test]
    fn test_bounded_positive_includes_zero() {
        for p in [WordPolicy::Bounded32, WordPolicy::Bounded64] {
            assert!(p.is_positive(0));
            assert!(p.is_positive(700));
            assert!(!p.is_positive(-1));
        }
    }

    #[test]
    fn test_clamp_into_range() {
        assert_eq!(WordPolicy::Bounded32.clamp(i64::MAX), i32::MAX as Word);
        assert_eq!(WordPolicy::Decimal.clamp(-5), -5);
        assert_eq!(WordPolicy::Bounded64.clamp(i64::MIN), i64::MIN);
    }

    proptest! {
        #[test]
        fn decimal_add_is_mod_1000(a in 0i64..1000, b in 0i64..1000) {
            prop_assert_eq!(WordPolicy::Decimal.add(a, b), (a + b) % 1000);
        }

        #[test]
        fn decimal_sub_is_residue(a in 0i64..1000, b in 0i64..1000) {
            let r = WordPolicy::Decimal.sub(a, b);
            prop_assert!((0..1000).contains(&r));
            prop_assert_eq!((r + b) % 1000, a);
        }

        #[test]
        fn bounded32_stays_in_range(a in any::<i32>(), b in any::<i32>()) {
            let p = WordPolicy::Bounded32;
            let (a, b) = (a as Word, b as Word);
            prop_assert_eq!(p.add(a, b), (a + b).clamp(p.min(), p.max()));
            prop_assert_eq!(p.sub(a, b), (a - b).clamp(p.min(), p.max()));
        }

        #[test]
        fn bounded64_saturates(a in any::<i64>(), b in any::<i64>()) {
            let p = WordPolicy::Bounded64;
            let wide = a as i128 + b as i128;
            let expected = wide.clamp(i64::MIN as i128, i64::MAX as i128) as i64;
            prop_assert_eq!(p.add(a, b), expected);
        }
    }
}
