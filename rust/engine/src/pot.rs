use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A pot fragment contested by `eligible` seats, lowest level first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SidePot {
    pub amount: u32,
    pub eligible: Vec<usize>,
}

/// Chips committed above every other seat's level, which nobody can contest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Refund {
    pub seat: usize,
    pub amount: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PotBreakdown {
    pub pots: Vec<SidePot>,
    pub refund: Option<Refund>,
}

impl PotBreakdown {
    pub fn total(&self) -> u32 {
        self.pots.iter().map(|p| p.amount).sum::<u32>() + self.refund.map_or(0, |r| r.amount)
    }
}

/// Per-hand commitment ledger keyed by seat.
#[derive(Debug, Clone, Default)]
pub struct PotManager {
    commitments: BTreeMap<usize, u32>,
}

impl PotManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, seat: usize, amount: u32) {
        if amount == 0 {
            return;
        }
        *self.commitments.entry(seat).or_insert(0) += amount;
    }

    /// Takes chips back, used when an uncalled bet is returned.
    pub fn remove(&mut self, seat: usize, amount: u32) {
        if let Some(c) = self.commitments.get_mut(&seat) {
            *c = c.saturating_sub(amount);
            if *c == 0 {
                self.commitments.remove(&seat);
            }
        }
    }

    pub fn reset_all(&mut self) {
        self.commitments.clear();
    }

    pub fn committed(&self, seat: usize) -> u32 {
        self.commitments.get(&seat).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u32 {
        self.commitments.values().sum()
    }

    /// Splits the recorded commitments into side pots. `live` says whether a
    /// seat may still win chips (not folded); folded seats contribute but are
    /// never eligible.
    pub fn build_side_pots(&self, live: impl Fn(usize) -> bool) -> PotBreakdown {
        let mut caps: Vec<u32> = self.commitments.values().copied().filter(|&c| c > 0).collect();
        caps.sort_unstable();
        caps.dedup();

        let mut breakdown = PotBreakdown::default();
        let mut previous_cap = 0;
        for cap in caps {
            let mut amount = 0;
            let mut contributors = Vec::new();
            for (&seat, &committed) in &self.commitments {
                let contribution = committed.min(cap).saturating_sub(previous_cap);
                if contribution > 0 {
                    amount += contribution;
                    contributors.push(seat);
                }
            }
            previous_cap = cap;
            if amount == 0 {
                continue;
            }
            let eligible: Vec<usize> = contributors.iter().copied().filter(|&s| live(s)).collect();
            match (contributors.as_slice(), eligible.is_empty()) {
                // only the top level can have a single contributor
                ([seat], _) => {
                    breakdown.refund = Some(Refund {
                        seat: *seat,
                        amount,
                    })
                }
                (_, true) => match breakdown.pots.last_mut() {
                    Some(prev) => prev.amount += amount,
                    None => breakdown.pots.push(SidePot {
                        amount,
                        eligible: contributors,
                    }),
                },
                (_, false) => breakdown.pots.push(SidePot { amount, eligible }),
            }
        }
        breakdown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager(commitments: &[(usize, u32)]) -> PotManager {
        let mut pm = PotManager::new();
        for &(seat, amount) in commitments {
            pm.add(seat, amount);
        }
        pm
    }

    #[test]
    fn equal_commitments_make_one_pot() {
        let pm = manager(&[(0, 1000), (1, 1000)]);
        let b = pm.build_side_pots(|_| true);
        assert_eq!(
            b.pots,
            vec![SidePot {
                amount: 2000,
                eligible: vec![0, 1]
            }]
        );
        assert!(b.refund.is_none());
    }

    #[test]
    fn folded_chips_stay_in_the_pot() {
        let pm = manager(&[(0, 300), (1, 300), (2, 100)]);
        let b = pm.build_side_pots(|s| s != 2);
        assert_eq!(b.total(), 700);
        assert_eq!(b.pots.len(), 2);
        assert_eq!(b.pots[0].amount, 300);
        assert_eq!(b.pots[0].eligible, vec![0, 1]);
        assert_eq!(b.pots[1].amount, 400);
    }

    #[test]
    fn remove_and_reset() {
        let mut pm = manager(&[(0, 300), (1, 100)]);
        pm.remove(0, 200);
        assert_eq!(pm.committed(0), 100);
        assert_eq!(pm.total(), 200);
        pm.reset_all();
        assert_eq!(pm.total(), 0);
    }
}
