//! Rank and suit frequency tables shared by the evaluator and the advisor.
//!
//! Rank masks are 13 bits wide: bit `rank - 2` is set when the rank occurs,
//! so Two is bit 0 and Ace is bit 12.

use crate::cards::Card;
use crate::errors::EngineFault;

pub const ACE_BIT: u16 = 1 << 12;
pub const WHEEL_MASK: u16 = ACE_BIT | 0b1111;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardAnalysis {
    rank_counts: [u8; 15],
    suit_counts: [u8; 4],
    rank_mask: u16,
    suit_rank_masks: [u16; 4],
    len: usize,
}

pub fn rank_bit(rank: u8) -> u16 {
    1u16 << (rank - 2)
}

impl CardAnalysis {
    /// Builds the tables for 3 to 7 distinct cards.
    pub fn build(cards: &[Card]) -> Result<Self, EngineFault> {
        if !(3..=7).contains(&cards.len()) {
            return Err(EngineFault::InvalidCardCount {
                expected: "3..=7",
                actual: cards.len(),
            });
        }
        let mut analysis = Self::default();
        let mut seen = 0u64;
        for c in cards {
            let r = c.rank.value();
            let s = c.suit.index();
            let bit = 1u64 << (s * 13 + (r as usize - 2));
            if seen & bit != 0 {
                return Err(EngineFault::DuplicateCard);
            }
            seen |= bit;
            analysis.rank_counts[r as usize] += 1;
            analysis.suit_counts[s] += 1;
            analysis.rank_mask |= rank_bit(r);
            analysis.suit_rank_masks[s] |= rank_bit(r);
        }
        analysis.len = cards.len();
        Ok(analysis)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn rank_count(&self, rank: u8) -> u8 {
        self.rank_counts.get(rank as usize).copied().unwrap_or(0)
    }

    pub fn suit_count(&self, suit: usize) -> u8 {
        self.suit_counts[suit]
    }

    pub fn rank_mask(&self) -> u16 {
        self.rank_mask
    }

    pub fn suit_rank_mask(&self, suit: usize) -> u16 {
        self.suit_rank_masks[suit]
    }

    pub fn max_suit_count(&self) -> u8 {
        self.suit_counts.iter().copied().max().unwrap_or(0)
    }

    pub fn distinct_suits(&self) -> usize {
        self.suit_counts.iter().filter(|&&c| c > 0).count()
    }

    /// Ranks from Ace down to Two that occur exactly `count` times.
    pub fn ranks_with_count(&self, count: u8) -> impl Iterator<Item = u8> + '_ {
        (2..=14u8).rev().filter(move |&r| self.rank_counts[r as usize] == count)
    }

    /// Distinct ranks present, highest first.
    pub fn ranks_desc(&self) -> impl Iterator<Item = u8> + '_ {
        (2..=14u8).rev().filter(move |&r| self.rank_counts[r as usize] > 0)
    }
}

/// Highest straight in a 13-bit rank mask, with the wheel ranked as 5-high.
pub fn straight_high(mask: u16) -> Option<u8> {
    for high in (6..=14u8).rev() {
        let window = 0b11111u16 << (high - 6);
        if mask & window == window {
            return Some(high);
        }
    }
    if mask & WHEEL_MASK == WHEEL_MASK {
        return Some(5);
    }
    None
}

/// The ten five-rank windows a straight can occupy, as (low, high) pairs.
/// The wheel window is reported as `(14, 5)`.
pub fn straight_windows() -> impl Iterator<Item = (u8, u8)> {
    std::iter::once((14, 5)).chain((2..=10u8).map(|lo| (lo, lo + 4)))
}

/// Number of ranks of `mask` falling inside a window from [`straight_windows`].
pub fn count_in_window(mask: u16, (lo, hi): (u8, u8)) -> u32 {
    let window = if lo <= hi {
        0b11111u16 << (lo - 2)
    } else {
        WHEEL_MASK
    };
    (mask & window).count_ones()
}

/// Length of the longest run of consecutive ranks, Ace also counting low.
pub fn longest_run(mask: u16) -> u32 {
    // bit 0 of the extended mask is the low ace
    let extended = (u32::from(mask) << 1) | u32::from(mask & ACE_BIT != 0);
    let mut best = 0;
    let mut run = 0;
    for bit in 0..14 {
        if extended & (1 << bit) != 0 {
            run += 1;
            best = best.max(run);
        } else {
            run = 0;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::parse_cards;

    #[test]
    fn counts_and_masks() {
        let cards = parse_cards("As Ad Kh 7h 2h").unwrap();
        let a = CardAnalysis::build(&cards).unwrap();
        assert_eq!(a.rank_count(14), 2);
        assert_eq!(a.suit_count(2), 3);
        assert_eq!(a.distinct_suits(), 3);
        assert_eq!(a.rank_mask(), ACE_BIT | rank_bit(13) | rank_bit(7) | rank_bit(2));
        assert_eq!(a.suit_rank_mask(2), rank_bit(13) | rank_bit(7) | rank_bit(2));
    }

    #[test]
    fn rejects_bad_sizes_and_duplicates() {
        let two = parse_cards("As Ad").unwrap();
        assert!(matches!(
            CardAnalysis::build(&two),
            Err(EngineFault::InvalidCardCount { .. })
        ));
        let dup = parse_cards("As As Kd").unwrap();
        assert_eq!(CardAnalysis::build(&dup), Err(EngineFault::DuplicateCard));
    }

    #[test]
    fn straight_detection_handles_wheel() {
        assert_eq!(straight_high(WHEEL_MASK), Some(5));
        assert_eq!(straight_high(WHEEL_MASK | rank_bit(6)), Some(6));
        assert_eq!(straight_high(0b1_1111_0000_0000), Some(14));
        assert_eq!(straight_high(0b0_1101_1000_0000), None);
    }

    #[test]
    fn runs_and_windows() {
        assert_eq!(longest_run(ACE_BIT | rank_bit(2) | rank_bit(3)), 3);
        assert_eq!(longest_run(rank_bit(9) | rank_bit(10) | rank_bit(12)), 2);
        assert_eq!(count_in_window(ACE_BIT | rank_bit(4), (14, 5)), 2);
        assert_eq!(straight_windows().count(), 10);
    }
}
