use serde::{Deserialize, Serialize};

use crate::analysis::{rank_bit, straight_high, CardAnalysis};
use crate::cards::Card;
use crate::errors::EngineFault;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Category {
    HighCard = 0,
    OnePair = 1,
    TwoPair = 2,
    ThreeOfAKind = 3,
    Straight = 4,
    Flush = 5,
    FullHouse = 6,
    FourOfAKind = 7,
    StraightFlush = 8,
}

impl Category {
    pub fn all() -> [Category; 9] {
        [
            Category::HighCard,
            Category::OnePair,
            Category::TwoPair,
            Category::ThreeOfAKind,
            Category::Straight,
            Category::Flush,
            Category::FullHouse,
            Category::FourOfAKind,
            Category::StraightFlush,
        ]
    }
}

/// Category plus up to five tie-break ranks, high to low, unused slots zero.
///
/// The derived ordering compares the category first and then the keys
/// lexicographically, which is exactly poker hand precedence. Equal values
/// are a split.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct HandValue {
    pub category: Category,
    // kickers: ordered high -> low for tiebreaks
    pub keys: [u8; 5],
}

impl HandValue {
    fn new(category: Category, leading: &[u8], kickers: &[u8]) -> Self {
        let mut keys = [0u8; 5];
        for (slot, &r) in keys.iter_mut().zip(leading.iter().chain(kickers)) {
            *slot = r;
        }
        Self { category, keys }
    }
}

/// Evaluates exactly two hole cards against three to five community cards.
pub fn evaluate(hole: &[Card], board: &[Card]) -> Result<HandValue, EngineFault> {
    if hole.len() != 2 {
        return Err(EngineFault::InvalidCardCount {
            expected: "2 hole cards",
            actual: hole.len(),
        });
    }
    if !(3..=5).contains(&board.len()) {
        return Err(EngineFault::InvalidCardCount {
            expected: "3..=5 community cards",
            actual: board.len(),
        });
    }
    let mut combined = [hole[0]; 7];
    combined[1] = hole[1];
    combined[2..2 + board.len()].copy_from_slice(board);
    evaluate_cards(&combined[..2 + board.len()])
}

/// Best five-card value among 5 to 7 distinct cards.
pub fn evaluate_cards(cards: &[Card]) -> Result<HandValue, EngineFault> {
    if !(5..=7).contains(&cards.len()) {
        return Err(EngineFault::InvalidCardCount {
            expected: "5..=7 cards",
            actual: cards.len(),
        });
    }
    Ok(evaluate_analysis(&CardAnalysis::build(cards)?))
}

fn evaluate_analysis(a: &CardAnalysis) -> HandValue {
    let flush_suit = (0..4).find(|&s| a.suit_count(s) >= 5);

    // Straight flush
    if let Some(high) = flush_suit.and_then(|s| straight_high(a.suit_rank_mask(s))) {
        return HandValue::new(Category::StraightFlush, &[high], &[]);
    }

    let quads: Vec<u8> = a.ranks_with_count(4).collect();
    let trips: Vec<u8> = a.ranks_with_count(3).collect();
    let pairs: Vec<u8> = a.ranks_with_count(2).collect();

    if let Some(&quad) = quads.first() {
        return HandValue::new(Category::FourOfAKind, &[quad], &kickers(a, &[quad], 1));
    }

    if let Some(&trip) = trips.first() {
        // a second set of trips plays as the pair
        let pair = trips.get(1).copied().into_iter().chain(pairs.first().copied()).max();
        if let Some(pair) = pair {
            return HandValue::new(Category::FullHouse, &[trip, pair], &[]);
        }
    }

    if let Some(s) = flush_suit {
        let mask = a.suit_rank_mask(s);
        let top: Vec<u8> = (2..=14u8)
            .rev()
            .filter(|&r| mask & rank_bit(r) != 0)
            .take(5)
            .collect();
        return HandValue::new(Category::Flush, &top, &[]);
    }

    if let Some(high) = straight_high(a.rank_mask()) {
        return HandValue::new(Category::Straight, &[high], &[]);
    }

    if let Some(&trip) = trips.first() {
        return HandValue::new(Category::ThreeOfAKind, &[trip], &kickers(a, &[trip], 2));
    }

    if let [first, second, ..] = pairs[..] {
        return HandValue::new(
            Category::TwoPair,
            &[first, second],
            &kickers(a, &[first, second], 1),
        );
    }

    if let Some(&pair) = pairs.first() {
        return HandValue::new(Category::OnePair, &[pair], &kickers(a, &[pair], 3));
    }

    HandValue::new(Category::HighCard, &[], &kickers(a, &[], 5))
}

/// Highest distinct ranks not already used by the category.
fn kickers(a: &CardAnalysis, used: &[u8], limit: usize) -> Vec<u8> {
    a.ranks_desc()
        .filter(|r| !used.contains(r))
        .take(limit)
        .collect()
}

/// The five cards that realise the hand's value, highest rank first.
pub fn best_five(hole: &[Card], board: &[Card]) -> Result<Vec<Card>, EngineFault> {
    let target = evaluate(hole, board)?;
    let mut cards = hole.to_vec();
    cards.extend_from_slice(board);
    let n = cards.len();
    for subset in 0u32..(1 << n) {
        if subset.count_ones() != 5 {
            continue;
        }
        let mut five: Vec<Card> = (0..n)
            .filter(|i| subset & (1 << i) != 0)
            .map(|i| cards[i])
            .collect();
        if evaluate_cards(&five)? == target {
            five.sort_by(|x, y| y.rank.cmp(&x.rank).then(y.suit.cmp(&x.suit)));
            return Ok(five);
        }
    }
    Err(EngineFault::InvalidCardCount {
        expected: "a five-card subset matching the hand",
        actual: n,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::parse_cards;

    fn value(hole: &str, board: &str) -> HandValue {
        evaluate(&parse_cards(hole).unwrap(), &parse_cards(board).unwrap()).unwrap()
    }

    #[test]
    fn two_trips_make_a_full_house() {
        let v = value("Ks Kd", "Kh 9c 9d 9s 2c");
        assert_eq!(v.category, Category::FullHouse);
        assert_eq!(v.keys, [13, 9, 0, 0, 0]);
    }

    #[test]
    fn kickers_are_deduplicated_by_rank() {
        // three pairs: the third pair's rank competes as a kicker
        let v = value("Ks Kd", "Qh Qc 5d 5s 2c");
        assert_eq!(v.category, Category::TwoPair);
        assert_eq!(v.keys, [13, 12, 5, 0, 0]);
    }

    #[test]
    fn quads_take_one_kicker() {
        let v = value("7s 7d", "7h 7c As Kd Qc");
        assert_eq!(v.keys, [7, 14, 0, 0, 0]);
    }

    #[test]
    fn rejects_wrong_counts() {
        let hole = parse_cards("As Kd").unwrap();
        let board = parse_cards("2c 3c").unwrap();
        assert!(evaluate(&hole, &board).is_err());
        assert!(evaluate(&hole[..1], &parse_cards("2c 3c 4c").unwrap()).is_err());
    }

    #[test]
    fn best_five_matches_value() {
        let hole = parse_cards("Ah 2h").unwrap();
        let board = parse_cards("9h Kh 4h Qs Jd").unwrap();
        let five = best_five(&hole, &board).unwrap();
        assert_eq!(five.len(), 5);
        assert!(five.iter().all(|c| c.suit == crate::cards::Suit::Hearts));
        assert_eq!(five[0], "Ah".parse().unwrap());
    }
}
