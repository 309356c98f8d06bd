//! Bitmask encoding of schedules.
//!
//! Every (day, period) slot of the week owns one bit, so two schedules overlap
//! exactly when their masks share a bit. Checking a catalog entry against a
//! table is then a couple of word-sized `&` instead of a pairwise comparison
//! of every block.
//!
//! ```text
//! bit = day_index * BITS_PER_DAY + (period - 1)
//!
//!   lo (u128)                           hi (u128)
//!   [ 월 0..32 | 화 | 수 | 목 ]           [ 금 | 토 | 일 | unused ]
//! ```

use std::ops::{BitAnd, BitOr, BitOrAssign};

use super::models::{Day, TimeBlock};

/// Bit positions reserved for each day, the grid has 24 periods
pub const BITS_PER_DAY: u32 = 32;

const WORD_BITS: u32 = u128::BITS;

/// Fixed-width (2 × 128 bits) mask of the slots used by a schedule
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ScheduleMask {
    lo: u128,
    hi: u128,
}

impl ScheduleMask {
    pub const EMPTY: ScheduleMask = ScheduleMask { lo: 0, hi: 0 };

    /// Mask of a single slot, empty when the period doesn't fit in a day
    #[must_use]
    pub fn slot(day: Day, period: u32) -> Self {
        if period == 0 || period > BITS_PER_DAY {
            tracing::trace!(%day, period, "period outside of the mask, skipped");
            return Self::EMPTY;
        }

        // `day.index()` is at most 6, the cast can't truncate
        #[allow(clippy::cast_possible_truncation)]
        let bit = day.index() as u32 * BITS_PER_DAY + (period - 1);
        if bit < WORD_BITS {
            Self { lo: 1 << bit, hi: 0 }
        } else {
            Self {
                lo: 0,
                hi: 1 << (bit - WORD_BITS),
            }
        }
    }

    #[must_use]
    pub fn from_block(block: &TimeBlock) -> Self {
        block
            .periods
            .iter()
            .fold(Self::EMPTY, |mask, &period| mask | Self::slot(block.day, period))
    }

    #[must_use]
    pub fn from_blocks<'a>(blocks: impl IntoIterator<Item = &'a TimeBlock>) -> Self {
        blocks
            .into_iter()
            .fold(Self::EMPTY, |mask, block| mask | Self::from_block(block))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lo == 0 && self.hi == 0
    }

    /// True when both masks share at least one slot
    #[must_use]
    pub fn conflicts_with(&self, other: &Self) -> bool {
        !(*self & *other).is_empty()
    }

    /// Number of slots used
    #[must_use]
    pub fn count(&self) -> u32 {
        self.lo.count_ones() + self.hi.count_ones()
    }

    #[must_use]
    pub fn contains(&self, day: Day, period: u32) -> bool {
        let slot = Self::slot(day, period);
        !slot.is_empty() && (*self & slot) == slot
    }
}

impl BitOr for ScheduleMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self {
            lo: self.lo | rhs.lo,
            hi: self.hi | rhs.hi,
        }
    }
}

impl BitOrAssign for ScheduleMask {
    fn bitor_assign(&mut self, rhs: Self) {
        *self = *self | rhs;
    }
}

impl BitAnd for ScheduleMask {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self {
            lo: self.lo & rhs.lo,
            hi: self.hi & rhs.hi,
        }
    }
}

/// Encode a raw schedule, unreadable chunks set no bit
#[must_use]
pub fn encode(raw: &str) -> ScheduleMask {
    ScheduleMask::from_blocks(&super::parse(raw))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn monday_first_period_is_the_lowest_bit() {
        assert_eq!(encode("월1"), ScheduleMask { lo: 1, hi: 0 });
    }

    #[test]
    fn days_do_not_bleed_into_each_other() {
        // Last period of monday and first of tuesday
        assert!(!encode("월24").conflicts_with(&encode("화1")));
        assert!(!encode("월1~32").conflicts_with(&encode("화1~32")));
    }

    #[test]
    fn high_word_is_used_from_friday() {
        let mask = encode("금1<p>일24");
        assert_eq!(mask.lo, 0);
        assert_eq!(mask.count(), 2);
        assert!(mask.contains(Day::Sun, 24));
    }

    #[rstest]
    #[case("월1~3", "월3~4", true)]
    #[case("월1~3", "월4~5", false)]
    #[case("월1~2(303)<p>화3(202)", "화3", true)]
    #[case("월1~2(303)<p>화3(202)", "수1~3<p>화4", false)]
    #[case("일20~24", "일24(B)", true)]
    #[case("", "월1", false)]
    fn conflicts(#[case] a: &str, #[case] b: &str, #[case] expected: bool) {
        assert_eq!(encode(a).conflicts_with(&encode(b)), expected);
        assert_eq!(encode(b).conflicts_with(&encode(a)), expected);
    }

    #[test]
    fn mask_agrees_with_pairwise_comparison() {
        let schedules = [
            "월1~2<p>수3",
            "월2~4",
            "화1<p>목5~6",
            "목6~9(301)",
            "금1~24",
            "토3<p>일3",
            "일1~2",
        ];
        for a in schedules {
            for b in schedules {
                let pairwise = parse_pairs(a).iter().any(|slot| parse_pairs(b).contains(slot));
                assert_eq!(encode(a).conflicts_with(&encode(b)), pairwise, "{a} vs {b}");
            }
        }
    }

    fn parse_pairs(raw: &str) -> Vec<(Day, u32)> {
        crate::schedule::parse(raw)
            .into_iter()
            .flat_map(|block| block.periods.into_iter().map(move |p| (block.day, p)))
            .collect()
    }

    #[test]
    fn out_of_range_periods_set_no_bit() {
        assert!(ScheduleMask::slot(Day::Mon, 33).is_empty());
        assert!(ScheduleMask::slot(Day::Mon, 0).is_empty());
        assert!(encode("X1~3").is_empty());
    }

    #[test]
    fn masks_are_or_combined() {
        let mut mask = encode("월1");
        mask |= encode("화2");
        assert_eq!(mask, encode("월1<p>화2"));
    }
}
