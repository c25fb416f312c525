//! Drives a hand between player decisions.
//!
//! After every accepted action the orchestrator deals whatever streets the
//! table is ready for, recomputes advisories, and resolves the showdown once
//! the river betting closes or nobody is left who can act. The table itself
//! only moves when told to; this is the part that tells it.

use pokerroom_engine::advisor::PlayerAdvisory;
use pokerroom_engine::cards::Card;
use pokerroom_engine::errors::GameError;
use pokerroom_engine::player::PlayerAction;
use pokerroom_engine::rules::Street;
use pokerroom_engine::showdown::HandOutcome;
use pokerroom_engine::table::Table;
use rayon::prelude::*;

/// What happened to the hand besides the action itself.
#[derive(Debug, Clone, PartialEq)]
pub enum Progress {
    StreetDealt { street: Street, community: Vec<Card> },
    HandFinished(HandOutcome),
}

#[derive(Debug, Clone, Copy)]
pub struct HandOrchestrator {
    analytics: bool,
}

impl HandOrchestrator {
    pub fn new(analytics: bool) -> Self {
        Self { analytics }
    }

    pub fn start_hand(&self, table: &mut Table) -> Result<Vec<Progress>, GameError> {
        table.start_hand()?;
        self.settle(table)
    }

    pub fn apply(&self, table: &mut Table, seat: usize, action: PlayerAction) -> Result<Vec<Progress>, GameError> {
        table.apply_action(seat, action)?;
        self.settle(table)
    }

    /// Advances the hand until a seat has to act or the hand is over.
    pub fn settle(&self, table: &mut Table) -> Result<Vec<Progress>, GameError> {
        let mut progress = Vec::new();
        loop {
            if let Some(outcome) = table.outcome() {
                progress.push(Progress::HandFinished(outcome.clone()));
                return Ok(progress);
            }
            if table.street() == Street::Showdown {
                table.showdown()?;
                continue;
            }
            if table.current_seat().is_some() || !table.is_round_complete() {
                return Ok(progress);
            }
            let street = table.advance_street()?;
            if street.is_betting() {
                self.recompute_analytics(table)?;
                progress.push(Progress::StreetDealt {
                    street,
                    community: table.community().to_vec(),
                });
            }
        }
    }

    /// Computes every contender's advisory, one seat per rayon task, and
    /// installs the results before returning.
    pub fn recompute_analytics(&self, table: &mut Table) -> Result<(), GameError> {
        if !self.analytics {
            return Ok(());
        }
        let street = table.street();
        let computed = table
            .advisory_requests()
            .into_par_iter()
            .map(|request| request.compute().map(|advisory| (request.seat, advisory)))
            .collect::<Result<Vec<(usize, Option<PlayerAdvisory>)>, _>>()?;
        table.install_advisories(street, computed);
        Ok(())
    }
}

impl Default for HandOrchestrator {
    fn default() -> Self {
        Self::new(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pokerroom_engine::table::TableConfig;

    #[test]
    fn checked_down_hand_reaches_showdown() {
        let orchestrator = HandOrchestrator::default();
        let mut table = Table::new(TableConfig::new(2).with_seed(11)).unwrap();
        orchestrator.start_hand(&mut table).unwrap();

        let sb = table.small_blind_seat().unwrap();
        let bb = table.big_blind_seat().unwrap();
        orchestrator.apply(&mut table, sb, PlayerAction::Call).unwrap();
        let progress = orchestrator.apply(&mut table, bb, PlayerAction::Check).unwrap();
        assert!(matches!(progress.as_slice(), [Progress::StreetDealt { street: Street::Flop, .. }]));
        assert!(table.player(bb).unwrap().advisory().is_some());

        let mut finished = None;
        while finished.is_none() {
            let seat = table.current_seat().unwrap();
            for p in orchestrator.apply(&mut table, seat, PlayerAction::Check).unwrap() {
                if let Progress::HandFinished(outcome) = p {
                    finished = Some(outcome);
                }
            }
        }
        assert!(matches!(finished, Some(HandOutcome::Showdown(_))));
        assert_eq!(table.community().len(), 5);
        let chips: u32 = table.players().iter().map(|p| p.stack()).sum();
        assert_eq!(chips, 10_000);
    }

    #[test]
    fn all_in_preflop_runs_the_board_out() {
        let orchestrator = HandOrchestrator::new(false);
        let mut table = Table::new(TableConfig::new(2).with_seed(3)).unwrap();
        orchestrator.start_hand(&mut table).unwrap();
        let sb = table.small_blind_seat().unwrap();
        let bb = table.big_blind_seat().unwrap();

        orchestrator.apply(&mut table, sb, PlayerAction::Raise(5_000)).unwrap();
        let progress = orchestrator.apply(&mut table, bb, PlayerAction::Call).unwrap();

        let dealt = progress
            .iter()
            .filter(|p| matches!(p, Progress::StreetDealt { .. }))
            .count();
        assert_eq!(dealt, 3);
        assert!(matches!(progress.last(), Some(Progress::HandFinished(HandOutcome::Showdown(_)))));
        assert!(table.player(bb).unwrap().advisory().is_none());
    }

    #[test]
    fn fold_finishes_immediately() {
        let orchestrator = HandOrchestrator::default();
        let mut table = Table::new(TableConfig::new(2).with_seed(8)).unwrap();
        orchestrator.start_hand(&mut table).unwrap();
        let sb = table.small_blind_seat().unwrap();
        let progress = orchestrator.apply(&mut table, sb, PlayerAction::Fold).unwrap();
        assert!(matches!(progress.as_slice(), [Progress::HandFinished(HandOutcome::Fold(_))]));
    }
}
