use crate::advisor::{PlayerAdvisory, PotMath};
use crate::cards::Card;
use crate::rules::LegalActions;
use serde::{Deserialize, Serialize};

/// Who controls a seat. Seats start as bots and may be taken over by a human
/// between hands.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum SeatKind {
    Human,
    Bot,
}

/// Represents a player action during a betting round.
/// Raise carries the total street commitment the player raises to.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum PlayerAction {
    /// Fold and forfeit the hand
    Fold,
    /// Check (no bet, only valid if no bet to call)
    Check,
    /// Call the current bet, or put in everything when the stack is short
    Call,
    /// Raise so the street commitment becomes the given amount
    Raise(u32),
}

/// Default starting stack size for each player in chips
pub const STARTING_STACK: u32 = 5_000;

/// Represents one seat at the table: chip stack, hole cards and the betting
/// state of the current hand. Only the table writes these fields.
#[derive(Debug, Clone)]
pub struct Player {
    seat: usize,
    name: String,
    kind: SeatKind,
    stack: u32,
    hole: [Option<Card>; 2],
    committed_this_street: u32,
    committed_this_hand: u32,
    folded: bool,
    /// Sitting out the hand (no chips when it started)
    out: bool,
    acted_this_street: bool,
    /// Acted since the last full raise on this street
    acted_at_bet_level: bool,
    may_raise: bool,
    last_action: Option<PlayerAction>,
    legal_actions: LegalActions,
    advisory: Option<PlayerAdvisory>,
}

impl Player {
    pub fn new(seat: usize, name: impl Into<String>, kind: SeatKind, stack: u32) -> Self {
        Self {
            seat,
            name: name.into(),
            kind,
            stack,
            hole: [None, None],
            committed_this_street: 0,
            committed_this_hand: 0,
            folded: false,
            out: false,
            acted_this_street: false,
            acted_at_bet_level: false,
            may_raise: true,
            last_action: None,
            legal_actions: LegalActions::none(),
            advisory: None,
        }
    }

    pub fn bot(seat: usize, stack: u32) -> Self {
        Self::new(seat, format!("Bot {}", seat + 1), SeatKind::Bot, stack)
    }

    pub fn seat(&self) -> usize {
        self.seat
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn kind(&self) -> SeatKind {
        self.kind
    }
    pub fn is_bot(&self) -> bool {
        self.kind == SeatKind::Bot
    }
    pub fn stack(&self) -> u32 {
        self.stack
    }
    pub fn hole_cards(&self) -> [Option<Card>; 2] {
        self.hole
    }
    /// Both hole cards, once dealt.
    pub fn hole(&self) -> Option<[Card; 2]> {
        match self.hole {
            [Some(a), Some(b)] => Some([a, b]),
            _ => None,
        }
    }
    pub fn committed_this_street(&self) -> u32 {
        self.committed_this_street
    }
    pub fn committed_this_hand(&self) -> u32 {
        self.committed_this_hand
    }
    pub fn is_folded(&self) -> bool {
        self.folded
    }
    pub fn is_out(&self) -> bool {
        self.out
    }
    pub fn has_acted(&self) -> bool {
        self.acted_this_street
    }
    pub fn has_acted_at_bet_level(&self) -> bool {
        self.acted_at_bet_level
    }
    pub fn may_raise(&self) -> bool {
        self.may_raise
    }
    pub fn last_action(&self) -> Option<PlayerAction> {
        self.last_action
    }
    pub fn legal_actions(&self) -> &LegalActions {
        &self.legal_actions
    }
    pub fn advisory(&self) -> Option<&PlayerAdvisory> {
        self.advisory.as_ref()
    }

    /// Still holding cards in the current hand.
    pub fn is_contender(&self) -> bool {
        !self.out && !self.folded
    }

    /// Contender with chips behind, so it can still be asked to act.
    pub fn can_act(&self) -> bool {
        self.is_contender() && self.stack > 0
    }

    pub fn is_all_in(&self) -> bool {
        self.is_contender() && self.stack == 0
    }

    pub(crate) fn seat_human(&mut self, name: String) {
        self.name = name;
        self.kind = SeatKind::Human;
    }

    pub(crate) fn seat_bot(&mut self) {
        self.name = format!("Bot {}", self.seat + 1);
        self.kind = SeatKind::Bot;
    }

    /// Clears everything from the previous hand; a seat without chips sits
    /// the new hand out.
    pub(crate) fn start_hand(&mut self) {
        self.hole = [None, None];
        self.committed_this_street = 0;
        self.committed_this_hand = 0;
        self.folded = false;
        self.out = self.stack == 0;
        self.acted_this_street = false;
        self.acted_at_bet_level = false;
        self.may_raise = true;
        self.last_action = None;
        self.legal_actions = LegalActions::none();
        self.advisory = None;
    }

    pub(crate) fn start_street(&mut self) {
        self.committed_this_street = 0;
        self.acted_this_street = false;
        self.acted_at_bet_level = false;
        self.may_raise = true;
        self.advisory = None;
    }

    pub(crate) fn give_card(&mut self, c: Card) -> bool {
        match self.hole.iter_mut().find(|slot| slot.is_none()) {
            Some(slot) => {
                *slot = Some(c);
                true
            }
            None => false,
        }
    }

    /// Moves up to `amount` chips from the stack into the pot and returns
    /// what was actually committed.
    pub(crate) fn commit(&mut self, amount: u32) -> u32 {
        let paid = amount.min(self.stack);
        self.stack -= paid;
        self.committed_this_street += paid;
        self.committed_this_hand += paid;
        paid
    }

    /// Returns an uncalled part of this street's commitment.
    pub(crate) fn take_back(&mut self, amount: u32) {
        let amount = amount.min(self.committed_this_street);
        self.committed_this_street -= amount;
        self.committed_this_hand -= amount;
        self.stack += amount;
    }

    pub(crate) fn set_stack(&mut self, stack: u32) {
        self.stack = stack;
    }

    pub(crate) fn award(&mut self, amount: u32) {
        self.stack = self.stack.saturating_add(amount);
    }

    pub(crate) fn fold(&mut self) {
        self.folded = true;
    }

    pub(crate) fn record_action(&mut self, action: PlayerAction) {
        self.acted_this_street = true;
        self.acted_at_bet_level = true;
        self.last_action = Some(action);
    }

    /// A full raise puts this seat back in front of a new bet.
    pub(crate) fn reopen_betting(&mut self) {
        self.acted_at_bet_level = false;
        self.may_raise = true;
    }

    pub(crate) fn set_may_raise(&mut self, may_raise: bool) {
        self.may_raise = may_raise;
    }

    pub(crate) fn refresh_pot_math(&mut self, pot_math: PotMath) {
        if let Some(a) = self.advisory.as_mut() {
            a.pot_math = pot_math;
        }
    }

    pub(crate) fn set_legal_actions(&mut self, legal: LegalActions) {
        self.legal_actions = legal;
    }

    pub(crate) fn set_advisory(&mut self, advisory: Option<PlayerAdvisory>) {
        self.advisory = advisory;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commit_caps_at_stack() {
        let mut p = Player::bot(0, 300);
        assert_eq!(p.commit(500), 300);
        assert!(p.is_all_in());
        assert_eq!(p.committed_this_hand(), 300);
        p.take_back(100);
        assert_eq!(p.stack(), 100);
        assert_eq!(p.committed_this_street(), 200);
    }

    #[test]
    fn busted_seat_sits_out() {
        let mut p = Player::bot(1, 0);
        p.start_hand();
        assert!(p.is_out());
        assert!(!p.can_act());
        assert_eq!(p.name(), "Bot 2");
    }

    #[test]
    fn hole_cards_fill_in_order() {
        let mut p = Player::new(0, "Ann", SeatKind::Human, 100);
        assert!(p.give_card("As".parse().unwrap()));
        assert!(p.hole().is_none());
        assert!(p.give_card("Kd".parse().unwrap()));
        assert!(!p.give_card("2c".parse().unwrap()));
        assert!(p.hole().is_some());
    }
}
