//! The betting state machine.
//!
//! A [`Table`] owns its seats, deck and pot ledger and moves one hand at a
//! time through `PreFlop -> Flop -> Turn -> River -> Showdown`. Callers
//! drive it through a small set of transitions ([`Table::start_hand`],
//! [`Table::apply_action`], [`Table::advance_street`], [`Table::showdown`]);
//! each either succeeds or returns an error and leaves the table exactly as
//! it was.

use serde::{Deserialize, Serialize};

use crate::advisor::{board_advisory, AdvisoryRequest, BoardAdvisory, PlayerAdvisory, PotMath};
use crate::cards::Card;
use crate::deck::Deck;
use crate::errors::{EngineFault, GameError};
use crate::hand::{best_five, evaluate};
use crate::player::{Player, PlayerAction, STARTING_STACK};
use crate::pot::PotManager;
use crate::rules::{
    default_blind_schedule, legal_actions, validate_action, BlindLevel, LegalActions, SeatBetting, Street,
    ValidatedAction,
};
use crate::showdown::{resolve, FoldResult, HandOutcome, ShowdownResult, ShownHand};

pub const MIN_SEATS: usize = 2;
pub const MAX_SEATS: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableConfig {
    pub seats: usize,
    pub starting_stack: u32,
    pub blinds: Vec<BlindLevel>,
    /// Fixed shuffle seed for reproducible hands; `None` seeds from OS entropy.
    pub seed: Option<u64>,
}

impl TableConfig {
    pub fn new(seats: usize) -> Self {
        Self {
            seats,
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            seats: MIN_SEATS,
            starting_stack: STARTING_STACK,
            blinds: default_blind_schedule(),
            seed: None,
        }
    }
}

/// Identifies the decision point an action was computed for. A deferred
/// action is only applied while its stamp still matches the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActionStamp {
    pub hand: u64,
    pub street: Street,
    pub seat: usize,
    pub action_count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoggedAction {
    SmallBlind,
    BigBlind,
    Player(PlayerAction),
}

/// One line of the in-memory hand log. `amount` is the chips moved into the pot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub seat: usize,
    pub street: Street,
    pub action: LoggedAction,
    pub amount: u32,
}

#[derive(Debug, Clone)]
pub struct Table {
    players: Vec<Player>,
    blinds: Vec<BlindLevel>,
    level: usize,
    street: Street,
    community: Vec<Card>,
    burned: Vec<Card>,
    deck: Deck,
    dealer: Option<usize>,
    small_blind: Option<usize>,
    big_blind: Option<usize>,
    round: u32,
    hand: u64,
    current_bet: u32,
    last_raise_size: u32,
    current_seat: Option<usize>,
    previous_seat: Option<usize>,
    closing_seat: Option<usize>,
    round_complete: bool,
    action_count: u32,
    pot: PotManager,
    board_advisory: Option<BoardAdvisory>,
    log: Vec<ActionRecord>,
    outcome: Option<HandOutcome>,
}

impl Table {
    /// Creates a table of bot seats with equal stacks.
    pub fn new(config: TableConfig) -> Result<Self, GameError> {
        if !(MIN_SEATS..=MAX_SEATS).contains(&config.seats) {
            return Err(GameError::InvalidSeatCount(config.seats));
        }
        let blinds = if config.blinds.is_empty() {
            default_blind_schedule()
        } else {
            config.blinds
        };
        let deck = match config.seed {
            Some(seed) => Deck::new_with_seed(seed),
            None => Deck::new(),
        };
        Ok(Self {
            players: (0..config.seats)
                .map(|seat| Player::bot(seat, config.starting_stack))
                .collect(),
            blinds,
            level: 0,
            street: Street::Waiting,
            community: Vec::with_capacity(5),
            burned: Vec::with_capacity(3),
            deck,
            dealer: None,
            small_blind: None,
            big_blind: None,
            round: 0,
            hand: 0,
            current_bet: 0,
            last_raise_size: 0,
            current_seat: None,
            previous_seat: None,
            closing_seat: None,
            round_complete: false,
            action_count: 0,
            pot: PotManager::new(),
            board_advisory: None,
            log: Vec::new(),
            outcome: None,
        })
    }

    pub fn seats(&self) -> usize {
        self.players.len()
    }
    pub fn players(&self) -> &[Player] {
        &self.players
    }
    pub fn player(&self, seat: usize) -> Result<&Player, GameError> {
        self.players.get(seat).ok_or(GameError::SeatOutOfRange {
            seat,
            seats: self.players.len(),
        })
    }
    pub fn street(&self) -> Street {
        self.street
    }
    pub fn community(&self) -> &[Card] {
        &self.community
    }
    pub fn dealer(&self) -> Option<usize> {
        self.dealer
    }
    pub fn small_blind_seat(&self) -> Option<usize> {
        self.small_blind
    }
    pub fn big_blind_seat(&self) -> Option<usize> {
        self.big_blind
    }
    pub fn current_seat(&self) -> Option<usize> {
        self.current_seat
    }
    pub fn previous_seat(&self) -> Option<usize> {
        self.previous_seat
    }
    pub fn closing_seat(&self) -> Option<usize> {
        self.closing_seat
    }
    /// Hands started at this table.
    pub fn round(&self) -> u32 {
        self.round
    }
    pub fn hand_number(&self) -> u64 {
        self.hand
    }
    pub fn blind_level(&self) -> BlindLevel {
        self.blinds[self.level.min(self.blinds.len() - 1)]
    }
    pub fn current_bet(&self) -> u32 {
        self.current_bet
    }
    pub fn last_raise_size(&self) -> u32 {
        self.last_raise_size
    }
    pub fn pot(&self) -> u32 {
        self.pot.total()
    }
    pub fn pot_manager(&self) -> &PotManager {
        &self.pot
    }
    pub fn board_advisory(&self) -> Option<&BoardAdvisory> {
        self.board_advisory.as_ref()
    }
    pub fn action_log(&self) -> &[ActionRecord] {
        &self.log
    }
    pub fn outcome(&self) -> Option<&HandOutcome> {
        self.outcome.as_ref()
    }
    pub fn deck_remaining(&self) -> usize {
        self.deck.remaining()
    }
    pub fn burned(&self) -> &[Card] {
        &self.burned
    }

    /// True from `start_hand` until the hand is settled.
    pub fn is_hand_in_progress(&self) -> bool {
        self.street.is_betting() || (self.street == Street::Showdown && self.outcome.is_none())
    }

    /// Betting on the current street is over and the next card may be dealt.
    pub fn is_round_complete(&self) -> bool {
        self.street.is_betting() && self.round_complete
    }

    pub fn contenders(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| p.is_contender())
    }

    /// Stamp of the decision currently pending, if any seat is to act.
    pub fn action_stamp(&self) -> Option<ActionStamp> {
        self.current_seat.map(|seat| ActionStamp {
            hand: self.hand,
            street: self.street,
            seat,
            action_count: self.action_count,
        })
    }

    pub fn is_stamp_current(&self, stamp: &ActionStamp) -> bool {
        self.action_stamp().as_ref() == Some(stamp)
    }

    pub fn to_call(&self, seat: usize) -> u32 {
        self.players
            .get(seat)
            .map_or(0, |p| self.current_bet.saturating_sub(p.committed_this_street()))
    }

    pub fn legal_actions(&self, seat: usize) -> LegalActions {
        self.players
            .get(seat)
            .map_or_else(LegalActions::none, |p| p.legal_actions().clone())
    }

    /// Pot odds and effective stack for `seat` against the live opponents.
    pub fn pot_math(&self, seat: usize) -> PotMath {
        let Some(player) = self.players.get(seat) else {
            return PotMath::default();
        };
        let opponent = self
            .contenders()
            .filter(|p| p.seat() != seat)
            .map(Player::stack)
            .max()
            .unwrap_or(0);
        PotMath::build(self.pot(), self.to_call(seat), player.stack(), opponent)
    }

    // ---- seat management ----

    /// Hands a bot seat to a named human.
    pub fn join_seat(&mut self, seat: usize, name: &str) -> Result<(), GameError> {
        self.player(seat)?;
        let name = name.trim();
        if name.is_empty() {
            return Err(GameError::InvalidName);
        }
        if self.is_hand_in_progress() {
            return Err(GameError::HandInProgress);
        }
        if !self.players[seat].is_bot() {
            return Err(GameError::SeatNotReplaceable(seat));
        }
        self.players[seat].seat_human(name.to_string());
        Ok(())
    }

    /// Turns a seat back into a bot.
    pub fn leave_seat(&mut self, seat: usize) -> Result<(), GameError> {
        self.player(seat)?;
        if self.is_hand_in_progress() {
            return Err(GameError::HandInProgress);
        }
        self.players[seat].seat_bot();
        Ok(())
    }

    /// Rebuy or top-up between hands. A zero stack sits the seat out.
    pub fn set_stack(&mut self, seat: usize, stack: u32) -> Result<(), GameError> {
        self.player(seat)?;
        if self.is_hand_in_progress() {
            return Err(GameError::HandInProgress);
        }
        self.players[seat].set_stack(stack);
        Ok(())
    }

    // ---- hand lifecycle ----

    /// Shuffles, moves the button, posts blinds and deals hole cards.
    pub fn start_hand(&mut self) -> Result<(), GameError> {
        if self.is_hand_in_progress() {
            return Err(GameError::HandInProgress);
        }
        let funded = self.players.iter().filter(|p| p.stack() > 0).count();
        if funded < MIN_SEATS {
            return Err(GameError::NotEnoughPlayers(funded));
        }
        self.transact(Self::start_hand_inner)
    }

    fn start_hand_inner(&mut self) -> Result<(), GameError> {
        for p in &mut self.players {
            p.start_hand();
        }
        self.community.clear();
        self.burned.clear();
        self.pot.reset_all();
        self.log.clear();
        self.outcome = None;
        self.board_advisory = None;
        self.action_count = 0;
        self.previous_seat = None;
        self.hand += 1;

        let active = self.players.iter().filter(|p| p.is_contender()).count() as u32;
        if self.round > 0 && self.round % active == 0 && self.level + 1 < self.blinds.len() {
            self.level += 1;
        }
        self.round += 1;

        let dealer = match self.dealer {
            Some(d) => self.next_seat(d, Player::is_contender),
            None => self.seat_from(0, Player::is_contender),
        }
        .ok_or(GameError::NotEnoughPlayers(active as usize))?;
        self.dealer = Some(dealer);
        let (sb, bb) = if active == 2 {
            let bb = self.next_seat(dealer, Player::is_contender).unwrap_or(dealer);
            (dealer, bb)
        } else {
            let sb = self.next_seat(dealer, Player::is_contender).unwrap_or(dealer);
            let bb = self.next_seat(sb, Player::is_contender).unwrap_or(sb);
            (sb, bb)
        };
        self.small_blind = Some(sb);
        self.big_blind = Some(bb);

        self.deck.shuffle();
        for _ in 0..2 {
            let mut seat = dealer;
            for _ in 0..active {
                seat = self
                    .next_seat(seat, Player::is_contender)
                    .ok_or(EngineFault::NoContenders)?;
                let card = self.deck.draw()?;
                if !self.players[seat].give_card(card) {
                    return Err(EngineFault::InvalidCardCount {
                        expected: "2 hole cards",
                        actual: 3,
                    }
                    .into());
                }
            }
        }

        let level = self.blind_level();
        self.post_blind(sb, level.small, LoggedAction::SmallBlind);
        self.post_blind(bb, level.big, LoggedAction::BigBlind);
        self.current_bet = level.big;
        self.last_raise_size = level.big;
        self.street = Street::PreFlop;

        let first = self.next_seat(bb, Player::can_act);
        let closing = if self.players[bb].can_act() {
            Some(bb)
        } else {
            first.and_then(|f| self.prev_seat(f, Player::can_act))
        };
        self.open_round(first, closing);
        Ok(())
    }

    fn post_blind(&mut self, seat: usize, amount: u32, action: LoggedAction) {
        let paid = self.players[seat].commit(amount);
        self.pot.add(seat, paid);
        self.log.push(ActionRecord {
            seat,
            street: Street::PreFlop,
            action,
            amount: paid,
        });
    }

    /// Applies `action` for `seat`, which must be the seat to act.
    pub fn apply_action(&mut self, seat: usize, action: PlayerAction) -> Result<(), GameError> {
        self.player(seat)?;
        match self.street {
            Street::Waiting => return Err(GameError::NoHandInProgress),
            Street::Showdown => return Err(GameError::HandAlreadySettled),
            _ => {}
        }
        if self.current_seat != Some(seat) {
            return Err(GameError::NotYourTurn {
                expected: self.current_seat,
                actual: seat,
            });
        }
        let validated = validate_action(&self.betting(seat), action)?;
        self.transact(|t| t.apply_validated(seat, action, validated))
    }

    pub fn check(&mut self, seat: usize) -> Result<(), GameError> {
        self.apply_action(seat, PlayerAction::Check)
    }

    pub fn call(&mut self, seat: usize) -> Result<(), GameError> {
        self.apply_action(seat, PlayerAction::Call)
    }

    pub fn fold(&mut self, seat: usize) -> Result<(), GameError> {
        self.apply_action(seat, PlayerAction::Fold)
    }

    /// Raises so that `seat`'s commitment on this street becomes `amount_to`.
    pub fn raise(&mut self, seat: usize, amount_to: u32) -> Result<(), GameError> {
        self.apply_action(seat, PlayerAction::Raise(amount_to))
    }

    fn apply_validated(
        &mut self,
        seat: usize,
        action: PlayerAction,
        validated: ValidatedAction,
    ) -> Result<(), GameError> {
        let mut raised = false;
        let paid = match validated {
            ValidatedAction::Fold => {
                self.players[seat].fold();
                0
            }
            ValidatedAction::Check => 0,
            ValidatedAction::Call(amount) => self.players[seat].commit(amount),
            ValidatedAction::Raise { to, full } => {
                let owed = to - self.players[seat].committed_this_street();
                let paid = self.players[seat].commit(owed);
                if full {
                    self.last_raise_size = to - self.current_bet;
                    for p in &mut self.players {
                        p.reopen_betting();
                    }
                } else {
                    // a short all-in leaves betting closed for seats that already acted at this bet
                    for p in self.players.iter_mut().filter(|p| p.has_acted_at_bet_level()) {
                        p.set_may_raise(false);
                    }
                }
                self.current_bet = to;
                self.closing_seat = self.prev_seat_excluding(seat);
                raised = true;
                paid
            }
        };
        self.pot.add(seat, paid);
        self.players[seat].record_action(action);
        self.log.push(ActionRecord {
            seat,
            street: self.street,
            action: LoggedAction::Player(action),
            amount: paid,
        });
        self.action_count += 1;
        self.previous_seat = Some(seat);

        if self.contenders().count() == 1 {
            return self.settle_by_fold();
        }

        let others: Vec<usize> = self
            .players
            .iter()
            .filter(|p| p.seat() != seat && p.can_act())
            .map(Player::seat)
            .collect();
        let settled = others
            .iter()
            .all(|&s| self.players[s].has_acted() && self.to_call(s) == 0);
        let round_over =
            (!raised && self.closing_seat == Some(seat)) || others.is_empty() || settled;
        if round_over {
            self.close_round();
        } else {
            self.current_seat = self.next_seat(seat, Player::can_act);
            self.refresh_legal_actions();
        }
        Ok(())
    }

    /// Deals the next street once betting on the current one is complete.
    /// From the river this moves to showdown.
    pub fn advance_street(&mut self) -> Result<Street, GameError> {
        match self.street {
            Street::PreFlop => self.deal_flop()?,
            Street::Flop => self.deal_turn()?,
            Street::Turn => self.deal_river()?,
            Street::River => {
                self.ensure_round_complete()?;
                self.street = Street::Showdown;
                self.current_seat = None;
                self.closing_seat = None;
                self.refresh_legal_actions();
            }
            Street::Waiting => return Err(GameError::NoHandInProgress),
            Street::Showdown => {
                return Err(GameError::InvalidStreetTransition {
                    expected: Street::River,
                    current: Street::Showdown,
                })
            }
        }
        Ok(self.street)
    }

    pub fn deal_flop(&mut self) -> Result<(), GameError> {
        self.deal_street(Street::PreFlop, 3)
    }

    pub fn deal_turn(&mut self) -> Result<(), GameError> {
        self.deal_street(Street::Flop, 1)
    }

    pub fn deal_river(&mut self) -> Result<(), GameError> {
        self.deal_street(Street::Turn, 1)
    }

    fn ensure_round_complete(&self) -> Result<(), GameError> {
        if self.round_complete {
            Ok(())
        } else {
            Err(GameError::BettingRoundOpen(self.street))
        }
    }

    fn deal_street(&mut self, expected: Street, cards: usize) -> Result<(), GameError> {
        if self.street != expected {
            return Err(GameError::InvalidStreetTransition {
                expected,
                current: self.street,
            });
        }
        self.ensure_round_complete()?;
        self.transact(|t| {
            let burn = t.deck.burn()?;
            t.burned.push(burn);
            let dealt = t.deck.draw_many(cards)?;
            t.community.extend(dealt);
            t.street = expected.next().unwrap_or(Street::Showdown);
            for p in &mut t.players {
                p.start_street();
            }
            t.current_bet = 0;
            t.last_raise_size = t.blind_level().big;
            t.board_advisory = board_advisory(t.street, &t.community)?;

            let dealer = t.dealer.unwrap_or(0);
            let first = t.next_seat(dealer, Player::can_act);
            let closing = first.and_then(|f| t.prev_seat(f, Player::can_act));
            t.open_round(first, closing);
            Ok(())
        })
    }

    /// Resolves the hand at showdown and pays every pot.
    pub fn showdown(&mut self) -> Result<ShowdownResult, GameError> {
        match self.street {
            Street::Showdown if self.outcome.is_some() => return Err(GameError::HandAlreadySettled),
            Street::Showdown => {}
            Street::Waiting => return Err(GameError::NoHandInProgress),
            current => {
                return Err(GameError::InvalidStreetTransition {
                    expected: Street::Showdown,
                    current,
                })
            }
        }
        self.transact(Self::showdown_inner)
    }

    fn showdown_inner(&mut self) -> Result<ShowdownResult, GameError> {
        let mut hands = Vec::new();
        for p in self.players.iter().filter(|p| p.is_contender()) {
            let hole = p.hole().ok_or(EngineFault::InvalidCardCount {
                expected: "2 hole cards",
                actual: p.hole_cards().iter().flatten().count(),
            })?;
            hands.push(ShownHand {
                seat: p.seat(),
                value: evaluate(&hole, &self.community)?,
                best_five: best_five(&hole, &self.community)?,
            });
        }

        let players = &self.players;
        let breakdown = self.pot.build_side_pots(|s| players[s].is_contender());
        if breakdown.total() != self.pot.total() {
            return Err(EngineFault::PotMismatch {
                pot: breakdown.total(),
                committed: self.pot.total(),
            }
            .into());
        }
        let result = resolve(hands, &breakdown, self.dealer.unwrap_or(0), self.seats())?;
        for (&seat, &amount) in &result.payouts {
            self.players[seat].award(amount);
        }
        if let Some(refund) = result.refund {
            self.players[refund.seat].award(refund.amount);
        }
        self.outcome = Some(HandOutcome::Showdown(result.clone()));
        Ok(result)
    }

    fn settle_by_fold(&mut self) -> Result<(), GameError> {
        self.refund_uncalled();
        let winner = self
            .contenders()
            .map(Player::seat)
            .next()
            .ok_or(EngineFault::NoContenders)?;
        let amount = self.pot.total();
        self.players[winner].award(amount);
        self.outcome = Some(HandOutcome::Fold(FoldResult { winner, amount }));
        self.street = Street::Showdown;
        self.round_complete = true;
        self.current_seat = None;
        self.closing_seat = None;
        self.refresh_legal_actions();
        Ok(())
    }

    // ---- analytics ----

    /// Inputs for every contender's advisory on the current street.
    pub fn advisory_requests(&self) -> Vec<AdvisoryRequest> {
        if self.community.len() < 3 || !self.street.is_betting() {
            return Vec::new();
        }
        self.contenders()
            .filter_map(|p| {
                p.hole().map(|hole| AdvisoryRequest {
                    seat: p.seat(),
                    street: self.street,
                    hole,
                    community: self.community.clone(),
                    pot_math: self.pot_math(p.seat()),
                })
            })
            .collect()
    }

    /// Installs advisories computed from [`Table::advisory_requests`].
    /// Results for a different street are ignored.
    pub fn install_advisories(&mut self, street: Street, advisories: Vec<(usize, Option<PlayerAdvisory>)>) {
        if street != self.street {
            return;
        }
        for (seat, advisory) in advisories {
            if let Some(p) = self.players.get_mut(seat) {
                p.set_advisory(advisory);
            }
        }
    }

    /// Computes and installs every advisory on the calling thread.
    pub fn refresh_advisories(&mut self) -> Result<(), GameError> {
        let mut computed = Vec::new();
        for request in self.advisory_requests() {
            computed.push((request.seat, request.compute()?));
        }
        self.install_advisories(self.street, computed);
        Ok(())
    }

    // ---- internals ----

    fn betting(&self, seat: usize) -> SeatBetting {
        let p = &self.players[seat];
        SeatBetting {
            stack: p.stack(),
            committed_this_street: p.committed_this_street(),
            current_bet: self.current_bet,
            last_raise_size: self.last_raise_size,
            big_blind: self.blind_level().big,
            folded: !p.is_contender(),
            may_raise: p.may_raise(),
        }
    }

    /// Starts a betting round, or completes it at once when nobody has a
    /// decision to make (all-in runouts).
    fn open_round(&mut self, first: Option<usize>, closing: Option<usize>) {
        self.round_complete = false;
        let can_act: Vec<usize> = self
            .players
            .iter()
            .filter(|p| p.can_act())
            .map(Player::seat)
            .collect();
        let needs_decision = match can_act.as_slice() {
            [] => false,
            [only] => self.to_call(*only) > 0,
            _ => true,
        };
        if needs_decision {
            self.current_seat = first;
            self.closing_seat = closing;
            self.refresh_legal_actions();
        } else {
            self.close_round();
        }
    }

    fn close_round(&mut self) {
        self.refund_uncalled();
        self.round_complete = true;
        self.current_seat = None;
        self.refresh_legal_actions();
    }

    /// Gives back the part of the largest street commitment nobody matched.
    fn refund_uncalled(&mut self) {
        let mut commitments: Vec<(u32, usize)> = self
            .players
            .iter()
            .map(|p| (p.committed_this_street(), p.seat()))
            .collect();
        commitments.sort_unstable_by(|a, b| b.0.cmp(&a.0));
        if let [(top, seat), (second, _), ..] = commitments[..] {
            if top > second {
                self.players[seat].take_back(top - second);
                self.pot.remove(seat, top - second);
            }
        }
    }

    fn refresh_legal_actions(&mut self) {
        let current = self.current_seat;
        let legal = current.map(|s| legal_actions(&self.betting(s)));
        let pot_math: Vec<PotMath> = (0..self.players.len()).map(|s| self.pot_math(s)).collect();
        for (p, pm) in self.players.iter_mut().zip(pot_math) {
            if Some(p.seat()) == current {
                p.set_legal_actions(legal.clone().unwrap_or_default());
            } else {
                p.set_legal_actions(LegalActions::none());
            }
            p.refresh_pot_math(pm);
        }
    }

    /// First seat matching `pred` starting at `start` itself.
    fn seat_from(&self, start: usize, pred: impl Fn(&Player) -> bool) -> Option<usize> {
        let n = self.players.len();
        (0..n).map(|k| (start + k) % n).find(|&s| pred(&self.players[s]))
    }

    /// Next seat clockwise after `seat` matching `pred`; wraps back to `seat`.
    fn next_seat(&self, seat: usize, pred: impl Fn(&Player) -> bool) -> Option<usize> {
        let n = self.players.len();
        (1..=n).map(|k| (seat + k) % n).find(|&s| pred(&self.players[s]))
    }

    /// Previous seat counter-clockwise before `seat` matching `pred`; wraps
    /// back to `seat`.
    fn prev_seat(&self, seat: usize, pred: impl Fn(&Player) -> bool) -> Option<usize> {
        let n = self.players.len();
        (1..=n).map(|k| (seat + n - k) % n).find(|&s| pred(&self.players[s]))
    }

    fn prev_seat_excluding(&self, seat: usize) -> Option<usize> {
        self.prev_seat(seat, |p| p.can_act() && p.seat() != seat)
    }

    /// Runs `f` and restores the previous state if it or the invariant
    /// check fails.
    fn transact<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T, GameError>) -> Result<T, GameError> {
        let backup = self.clone();
        let result = f(self).and_then(|value| {
            self.check_invariants()?;
            Ok(value)
        });
        if result.is_err() {
            *self = backup;
        }
        result
    }

    fn check_invariants(&self) -> Result<(), EngineFault> {
        let committed: u32 = self.players.iter().map(Player::committed_this_hand).sum();
        if committed != self.pot.total() {
            return Err(EngineFault::PotMismatch {
                pot: self.pot.total(),
                committed,
            });
        }
        if self.street != Street::Waiting {
            let held: usize = self
                .players
                .iter()
                .map(|p| p.hole_cards().iter().flatten().count())
                .sum();
            let accounted = self.deck.remaining() + held + self.burned.len() + self.community.len();
            if accounted != 52 {
                return Err(EngineFault::CardAccounting { accounted });
            }
        }
        Ok(())
    }
}
