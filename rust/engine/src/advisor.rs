//! Street advisor: board texture and per-player analytics.
//!
//! Everything here is a pure function of the visible cards, so callers may
//! compute advisories for several seats in parallel. Advisories only exist
//! once a flop is out.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::analysis::{count_in_window, longest_run, straight_windows, CardAnalysis};
use crate::cards::{full_deck, Card};
use crate::errors::EngineFault;
use crate::hand::{best_five, evaluate, Category, HandValue};
use crate::rules::Street;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum BoardTexture {
    Dry,
    Paired,
    Connected,
    TwoTone,
    Monotone,
    Wet,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct BoardAdvisory {
    pub street: Street,
    pub texture: BoardTexture,
    pub paired: bool,
    pub monotone: bool,
    pub two_tone: bool,
    pub connected: bool,
    /// 0..=3
    pub straight_threat: u8,
    /// 0..=3
    pub flush_threat: u8,
    pub trips_possible: bool,
}

impl BoardAdvisory {
    pub fn is_wet(&self) -> bool {
        self.texture == BoardTexture::Wet
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum FlushDraw {
    None,
    FourFlush,
    Backdoor,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum StraightDraw {
    None,
    OpenEnded,
    Gutshot,
    Backdoor,
}

/// Chance, in percent, of finishing with `target` after the next card and,
/// on the flop, after both remaining cards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImprovementProbability {
    pub target: Category,
    pub this_street: f64,
    pub through_next_street: f64,
}

/// Price of continuing, from one seat's point of view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PotMath {
    pub pot: u32,
    pub to_call: u32,
    /// to_call / (pot + to_call)
    pub pot_odds: f64,
    pub break_even_equity: f64,
    pub stack_to_pot: f64,
    pub effective_stack: u32,
}

impl PotMath {
    pub fn build(pot: u32, to_call: u32, stack: u32, largest_opponent_stack: u32) -> Self {
        let effective_stack = stack.min(largest_opponent_stack);
        let pot_odds = if to_call > 0 {
            f64::from(to_call) / f64::from(pot + to_call)
        } else {
            0.0
        };
        let stack_to_pot = if pot > 0 {
            f64::from(effective_stack) / f64::from(pot)
        } else {
            0.0
        };
        Self {
            pot,
            to_call,
            pot_odds,
            break_even_equity: pot_odds,
            stack_to_pot,
            effective_stack,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerAdvisory {
    pub street: Street,
    pub hand: HandValue,
    pub best_five: Vec<Card>,
    /// 0..=100
    pub strength_percentile: f64,
    pub flush_draw: FlushDraw,
    pub straight_draw: StraightDraw,
    pub overcards: u8,
    pub improvements: Vec<ImprovementProbability>,
    pub pot_math: PotMath,
}

impl PlayerAdvisory {
    pub fn category(&self) -> Category {
        self.hand.category
    }
}

/// Everything needed to build one seat's advisory, detached from the table
/// so the work can run off the table lock.
#[derive(Debug, Clone)]
pub struct AdvisoryRequest {
    pub seat: usize,
    pub street: Street,
    pub hole: [Card; 2],
    pub community: Vec<Card>,
    pub pot_math: PotMath,
}

impl AdvisoryRequest {
    pub fn compute(&self) -> Result<Option<PlayerAdvisory>, EngineFault> {
        player_advisory(self.street, self.hole, &self.community, self.pot_math)
    }
}

/// Texture and threat scores for 3 to 5 community cards; `None` before the flop.
pub fn board_advisory(street: Street, community: &[Card]) -> Result<Option<BoardAdvisory>, EngineFault> {
    if community.len() < 3 {
        return Ok(None);
    }
    let a = CardAnalysis::build(community)?;
    let paired = (2..=14u8).any(|r| a.rank_count(r) >= 2);
    let suits = a.distinct_suits();
    let monotone = suits == 1;
    let two_tone = suits == 2;
    let connected = longest_run(a.rank_mask()) >= 3;
    let flush_threat = flush_threat(street, a.max_suit_count());
    let straight_threat = straight_threat(street, a.rank_mask());

    let mut texture = if monotone {
        BoardTexture::Monotone
    } else if two_tone {
        BoardTexture::TwoTone
    } else if connected {
        BoardTexture::Connected
    } else if paired {
        BoardTexture::Paired
    } else {
        BoardTexture::Dry
    };
    if (straight_threat >= 2 && flush_threat >= 1) || (connected && two_tone) {
        texture = BoardTexture::Wet;
    }

    Ok(Some(BoardAdvisory {
        street,
        texture,
        paired,
        monotone,
        two_tone,
        connected,
        straight_threat,
        flush_threat,
        trips_possible: paired,
    }))
}

fn flush_threat(street: Street, max_suit: u8) -> u8 {
    match (street, max_suit) {
        (Street::Flop, 3..) => 2,
        (Street::Flop, 2) => 1,
        (Street::Turn, 4..) => 3,
        (Street::Turn, 3) => 2,
        (Street::Turn, 2) => 1,
        (Street::River, 5..) => 3,
        (Street::River, 4) => 2,
        (Street::River, 3) => 1,
        _ => 0,
    }
}

fn straight_threat(street: Street, mask: u16) -> u8 {
    straight_windows()
        .map(|w| match (street, count_in_window(mask, w)) {
            (Street::Flop, 3..) => 1,
            (Street::Turn, 4..) => 2,
            (Street::Turn, 3) => 1,
            (Street::River, 5..) => 3,
            (Street::River, 4) => 2,
            (Street::River, 3) => 1,
            _ => 0,
        })
        .max()
        .unwrap_or(0)
}

/// Full analytics for one seat. `pot_math` is supplied by the table since it
/// depends on betting state rather than cards.
pub fn player_advisory(
    street: Street,
    hole: [Card; 2],
    community: &[Card],
    pot_math: PotMath,
) -> Result<Option<PlayerAdvisory>, EngineFault> {
    if community.len() < 3 {
        return Ok(None);
    }
    let hand = evaluate(&hole, community)?;
    let mut combined = hole.to_vec();
    combined.extend_from_slice(community);
    let analysis = CardAnalysis::build(&combined)?;
    let unseen = unseen_cards(&combined);

    Ok(Some(PlayerAdvisory {
        street,
        hand,
        best_five: best_five(&hole, community)?,
        strength_percentile: strength_percentile(hand, community, &unseen)?,
        flush_draw: flush_draw(street, &analysis),
        straight_draw: straight_draw(street, analysis.rank_mask()),
        overcards: overcards(hole, community),
        improvements: improvement_probabilities(street, hand, hole, community, &unseen)?,
        pot_math,
    }))
}

fn unseen_cards(seen: &[Card]) -> Vec<Card> {
    full_deck().into_iter().filter(|c| !seen.contains(c)).collect()
}

/// Share of opponent holdings, over every unseen two-card combination, that
/// `hand` beats, counting ties as half.
pub fn strength_percentile(hand: HandValue, community: &[Card], unseen: &[Card]) -> Result<f64, EngineFault> {
    let mut wins = 0u32;
    let mut ties = 0u32;
    let mut total = 0u32;
    for (i, &a) in unseen.iter().enumerate() {
        for &b in &unseen[i + 1..] {
            total += 1;
            let opponent = evaluate(&[a, b], community)?;
            match hand.cmp(&opponent) {
                std::cmp::Ordering::Greater => wins += 1,
                std::cmp::Ordering::Equal => ties += 1,
                std::cmp::Ordering::Less => {}
            }
        }
    }
    if total == 0 {
        return Ok(0.0);
    }
    Ok(100.0 * (f64::from(wins) + 0.5 * f64::from(ties)) / f64::from(total))
}

fn flush_draw(street: Street, a: &CardAnalysis) -> FlushDraw {
    match (street, a.max_suit_count()) {
        (Street::Flop | Street::Turn, 4) => FlushDraw::FourFlush,
        (Street::Flop, 3) => FlushDraw::Backdoor,
        _ => FlushDraw::None,
    }
}

fn straight_draw(street: Street, mask: u16) -> StraightDraw {
    // a made straight is not a draw
    if street == Street::River || longest_run(mask) >= 5 {
        return StraightDraw::None;
    }
    if longest_run(mask) >= 4 {
        return StraightDraw::OpenEnded;
    }
    if straight_windows().any(|w| count_in_window(mask, w) == 4) {
        return StraightDraw::Gutshot;
    }
    if street == Street::Flop && straight_windows().any(|w| count_in_window(mask, w) == 3) {
        return StraightDraw::Backdoor;
    }
    StraightDraw::None
}

fn overcards(hole: [Card; 2], community: &[Card]) -> u8 {
    let top = community.iter().map(|c| c.rank).max();
    hole.iter().filter(|c| Some(c.rank) > top).count() as u8
}

/// Categories strictly better than the current hand reachable with the next
/// card, and on the flop with both remaining cards.
fn improvement_probabilities(
    street: Street,
    current: HandValue,
    hole: [Card; 2],
    community: &[Card],
    unseen: &[Card],
) -> Result<Vec<ImprovementProbability>, EngineFault> {
    if !matches!(street, Street::Flop | Street::Turn) || unseen.is_empty() {
        return Ok(Vec::new());
    }
    let mut next: BTreeMap<Category, u32> = BTreeMap::new();
    let mut board = community.to_vec();
    for &c in unseen {
        board.push(c);
        let v = evaluate(&hole, &board)?;
        board.pop();
        if v > current {
            *next.entry(v.category).or_default() += 1;
        }
    }

    let mut both: BTreeMap<Category, u32> = BTreeMap::new();
    let mut pairs = 0u32;
    if street == Street::Flop {
        for (i, &a) in unseen.iter().enumerate() {
            for &b in &unseen[i + 1..] {
                pairs += 1;
                board.extend_from_slice(&[a, b]);
                let v = evaluate(&hole, &board)?;
                board.truncate(community.len());
                if v > current {
                    *both.entry(v.category).or_default() += 1;
                }
            }
        }
    }

    let cards = unseen.len() as f64;
    let mut out = Vec::new();
    for target in Category::all() {
        let this = next.get(&target).copied().unwrap_or(0);
        let cumulative = both.get(&target).copied().unwrap_or(0);
        if this == 0 && cumulative == 0 {
            continue;
        }
        out.push(ImprovementProbability {
            target,
            this_street: 100.0 * f64::from(this) / cards,
            through_next_street: if pairs > 0 {
                100.0 * f64::from(cumulative) / f64::from(pairs)
            } else {
                0.0
            },
        });
    }
    Ok(out)
}
