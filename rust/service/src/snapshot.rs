//! Redacted views of a table for broadcasting.

use pokerroom_engine::advisor::{BoardAdvisory, PlayerAdvisory};
use pokerroom_engine::cards::Card;
use pokerroom_engine::player::{Player, PlayerAction};
use pokerroom_engine::rules::{BlindLevel, LegalActions, Street};
use pokerroom_engine::showdown::HandOutcome;
use pokerroom_engine::table::Table;
use serde::{Deserialize, Serialize};

use crate::errors::TableId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeatSnapshot {
    pub seat: usize,
    pub name: String,
    pub is_bot: bool,
    pub stack: u32,
    pub committed_this_street: u32,
    pub committed_this_hand: u32,
    pub folded: bool,
    pub out: bool,
    pub all_in: bool,
    pub last_action: Option<PlayerAction>,
    pub legal_actions: LegalActions,
    /// Empty unless this seat is the viewer.
    pub hole_cards: Vec<Card>,
    /// `None` unless this seat is the viewer.
    pub advisory: Option<PlayerAdvisory>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSnapshot {
    pub table_id: TableId,
    pub viewer: Option<usize>,
    pub hand: u64,
    pub street: Street,
    pub round: u32,
    pub blinds: BlindLevel,
    pub community: Vec<Card>,
    pub dealer: Option<usize>,
    pub small_blind: Option<usize>,
    pub big_blind: Option<usize>,
    pub current_seat: Option<usize>,
    pub closing_seat: Option<usize>,
    pub pot: u32,
    pub current_bet: u32,
    pub board_advisory: Option<BoardAdvisory>,
    pub seats: Vec<SeatSnapshot>,
    pub outcome: Option<HandOutcome>,
}

impl TableSnapshot {
    /// Captures the table as `viewer` may see it. A `None` viewer sees no
    /// private information at all.
    pub fn capture(table_id: &TableId, table: &Table, viewer: Option<usize>) -> Self {
        Self {
            table_id: table_id.clone(),
            viewer,
            hand: table.hand_number(),
            street: table.street(),
            round: table.round(),
            blinds: table.blind_level(),
            community: table.community().to_vec(),
            dealer: table.dealer(),
            small_blind: table.small_blind_seat(),
            big_blind: table.big_blind_seat(),
            current_seat: table.current_seat(),
            closing_seat: table.closing_seat(),
            pot: table.pot(),
            current_bet: table.current_bet(),
            board_advisory: table.board_advisory().cloned(),
            seats: table
                .players()
                .iter()
                .map(|p| seat_snapshot(p, viewer == Some(p.seat())))
                .collect(),
            outcome: table.outcome().cloned(),
        }
    }

    pub fn seat(&self, seat: usize) -> Option<&SeatSnapshot> {
        self.seats.get(seat)
    }
}

fn seat_snapshot(p: &Player, visible: bool) -> SeatSnapshot {
    SeatSnapshot {
        seat: p.seat(),
        name: p.name().to_string(),
        is_bot: p.is_bot(),
        stack: p.stack(),
        committed_this_street: p.committed_this_street(),
        committed_this_hand: p.committed_this_hand(),
        folded: p.is_folded(),
        out: p.is_out(),
        all_in: p.is_all_in(),
        last_action: p.last_action(),
        legal_actions: p.legal_actions().clone(),
        hole_cards: if visible {
            p.hole_cards().into_iter().flatten().collect()
        } else {
            Vec::new()
        },
        advisory: if visible { p.advisory().cloned() } else { None },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pokerroom_engine::table::TableConfig;

    #[test]
    fn only_the_viewer_sees_hole_cards() {
        let mut table = Table::new(TableConfig::new(3).with_seed(5)).unwrap();
        table.start_hand().unwrap();
        let id = "t".to_string();

        let snap = TableSnapshot::capture(&id, &table, Some(1));
        assert_eq!(snap.seats[1].hole_cards.len(), 2);
        assert!(snap.seats[0].hole_cards.is_empty());
        assert!(snap.seats[2].hole_cards.is_empty());

        let public = TableSnapshot::capture(&id, &table, None);
        assert!(public.seats.iter().all(|s| s.hole_cards.is_empty() && s.advisory.is_none()));
        assert_eq!(public.pot, 150);
        assert_eq!(public.street, Street::PreFlop);
    }

    #[test]
    fn snapshot_serializes() {
        let mut table = Table::new(TableConfig::new(2).with_seed(1)).unwrap();
        table.start_hand().unwrap();
        let snap = TableSnapshot::capture(&"t".to_string(), &table, Some(0));
        let json = serde_json::to_value(&snap).unwrap();
        assert_eq!(json["pot"], 150);
        assert_eq!(json["seats"].as_array().map(Vec::len), Some(2));
    }
}
