use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::errors::EngineFault;
use crate::hand::HandValue;
use crate::pot::{PotBreakdown, Refund};

/// A contender's final hand as shown down.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShownHand {
    pub seat: usize,
    pub value: HandValue,
    pub best_five: Vec<Card>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PotResult {
    pub amount: u32,
    pub eligible: Vec<usize>,
    pub winners: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowdownResult {
    /// Every seat that took a share of at least one pot.
    pub winners: Vec<usize>,
    pub pots: Vec<PotResult>,
    pub hands: Vec<ShownHand>,
    pub payouts: BTreeMap<usize, u32>,
    pub refund: Option<Refund>,
}

/// The hand ended because everyone else folded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoldResult {
    pub winner: usize,
    pub amount: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum HandOutcome {
    Showdown(ShowdownResult),
    Fold(FoldResult),
}

impl HandOutcome {
    pub fn winners(&self) -> Vec<usize> {
        match self {
            HandOutcome::Showdown(r) => r.winners.clone(),
            HandOutcome::Fold(f) => vec![f.winner],
        }
    }
}

/// Awards each pot to the best eligible hands.
pub fn resolve(
    hands: Vec<ShownHand>,
    breakdown: &PotBreakdown,
    dealer: usize,
    seats: usize,
) -> Result<ShowdownResult, EngineFault> {
    let mut payouts: BTreeMap<usize, u32> = BTreeMap::new();
    let mut pots = Vec::with_capacity(breakdown.pots.len());

    for pot in &breakdown.pots {
        let best = hands
            .iter()
            .filter(|h| pot.eligible.contains(&h.seat))
            .map(|h| h.value)
            .max()
            .ok_or(EngineFault::NoContenders)?;
        let winners: Vec<usize> = hands
            .iter()
            .filter(|h| pot.eligible.contains(&h.seat) && h.value == best)
            .map(|h| h.seat)
            .collect();
        for (seat, share) in split_pot(pot.amount, &winners, dealer, seats) {
            *payouts.entry(seat).or_default() += share;
        }
        pots.push(PotResult {
            amount: pot.amount,
            eligible: pot.eligible.clone(),
            winners,
        });
    }

    let mut winners: Vec<usize> = pots.iter().flat_map(|p| p.winners.iter().copied()).collect();
    winners.sort_unstable();
    winners.dedup();

    Ok(ShowdownResult {
        winners,
        pots,
        hands,
        payouts,
        refund: breakdown.refund,
    })
}

/// Divides `amount` evenly between `winners`. Remainder chips go one at a
/// time starting from the first winner clockwise of the dealer's left.
pub fn split_pot(amount: u32, winners: &[usize], dealer: usize, seats: usize) -> Vec<(usize, u32)> {
    if winners.is_empty() || seats == 0 {
        return Vec::new();
    }
    let first = (dealer + 1) % seats;
    let mut order = winners.to_vec();
    order.sort_by_key(|&s| (s + seats - first) % seats);

    let share = amount / order.len() as u32;
    let mut odd = amount % order.len() as u32;
    order
        .into_iter()
        .map(|seat| {
            let extra = u32::from(odd > 0);
            odd -= extra;
            (seat, share + extra)
        })
        .collect()
}
