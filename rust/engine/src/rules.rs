use serde::{Deserialize, Serialize};

use crate::errors::IllegalAction;
use crate::player::PlayerAction as A;

/// Represents a betting phase of a hand. Streets only move forward; a new
/// hand always restarts at [`Street::PreFlop`].
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Street {
    /// No hand has been started yet
    Waiting,
    /// Before flop (hole cards dealt)
    PreFlop,
    /// After flop (3 community cards)
    Flop,
    /// After turn (4th community card)
    Turn,
    /// After river (5th community card)
    River,
    /// Betting is over
    Showdown,
}

impl Street {
    pub fn next(self) -> Option<Street> {
        match self {
            Street::Waiting => Some(Street::PreFlop),
            Street::PreFlop => Some(Street::Flop),
            Street::Flop => Some(Street::Turn),
            Street::Turn => Some(Street::River),
            Street::River => Some(Street::Showdown),
            Street::Showdown => None,
        }
    }

    pub fn is_betting(self) -> bool {
        matches!(
            self,
            Street::PreFlop | Street::Flop | Street::Turn | Street::River
        )
    }

    /// Community cards visible once this street has been dealt.
    pub fn board_len(self) -> usize {
        match self {
            Street::Waiting | Street::PreFlop => 0,
            Street::Flop => 3,
            Street::Turn => 4,
            Street::River | Street::Showdown => 5,
        }
    }
}

/// Small and big blind amounts for one level of the schedule.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct BlindLevel {
    pub small: u32,
    pub big: u32,
}

impl BlindLevel {
    pub const fn new(small: u32, big: u32) -> Self {
        Self { small, big }
    }
}

/// Ascending blind schedule; the table moves one level up per full orbit and
/// stays on the last level once reached.
pub fn default_blind_schedule() -> Vec<BlindLevel> {
    vec![
        BlindLevel::new(50, 100),
        BlindLevel::new(75, 150),
        BlindLevel::new(100, 200),
        BlindLevel::new(150, 300),
        BlindLevel::new(200, 400),
        BlindLevel::new(300, 600),
        BlindLevel::new(400, 800),
        BlindLevel::new(500, 1_000),
        BlindLevel::new(750, 1_500),
        BlindLevel::new(1_000, 2_000),
    ]
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    Fold,
    Check,
    Call,
    Raise,
}

/// Inclusive range of legal raise-to amounts.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct RaiseBounds {
    pub min_to: u32,
    pub max_to: u32,
}

/// What a seat may do right now. Empty for every seat except the one to act.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct LegalActions {
    pub actions: Vec<ActionKind>,
    pub to_call: u32,
    pub raise: Option<RaiseBounds>,
}

impl LegalActions {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn contains(&self, kind: ActionKind) -> bool {
        self.actions.contains(&kind)
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

/// Betting facts about one seat, captured by the table before validation.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct SeatBetting {
    pub stack: u32,
    pub committed_this_street: u32,
    pub current_bet: u32,
    pub last_raise_size: u32,
    pub big_blind: u32,
    pub folded: bool,
    /// False once the seat has acted and only an undersized all-in followed.
    pub may_raise: bool,
}

impl SeatBetting {
    pub fn to_call(&self) -> u32 {
        self.current_bet.saturating_sub(self.committed_this_street)
    }

    pub fn min_raise_to(&self) -> u32 {
        if self.current_bet == 0 {
            self.big_blind
        } else {
            self.current_bet + self.last_raise_size
        }
    }

    pub fn all_in_to(&self) -> u32 {
        self.committed_this_street + self.stack
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidatedAction {
    Fold,
    Check,
    /// Chips actually paid, which is less than the amount owed for an all-in call.
    Call(u32),
    /// `full` is false for an all-in below the minimum raise size.
    Raise { to: u32, full: bool },
}

pub fn legal_actions(seat: &SeatBetting) -> LegalActions {
    if seat.folded || seat.stack == 0 {
        return LegalActions::none();
    }
    let to_call = seat.to_call();
    let mut actions = vec![ActionKind::Fold];
    if to_call == 0 {
        actions.push(ActionKind::Check);
    } else {
        actions.push(ActionKind::Call);
    }
    let mut raise = None;
    if seat.may_raise && seat.stack > to_call && seat.all_in_to() >= seat.min_raise_to() {
        actions.push(ActionKind::Raise);
        raise = Some(RaiseBounds {
            min_to: seat.min_raise_to(),
            max_to: seat.all_in_to(),
        });
    }
    LegalActions {
        actions,
        to_call,
        raise,
    }
}

/// Validates a player action according to betting rules and stack size.
///
/// Raise amounts are "raise to" totals for the street. A raise below
/// `current_bet + last_raise_size` is only accepted when it puts the seat
/// all-in, and such a raise is reported with `full: false`.
///
/// # Examples
///
/// ```
/// use pokerroom_engine::rules::{validate_action, SeatBetting, ValidatedAction};
/// use pokerroom_engine::player::PlayerAction;
///
/// let seat = SeatBetting {
///     stack: 130,
///     committed_this_street: 0,
///     current_bet: 100,
///     last_raise_size: 100,
///     big_blind: 100,
///     folded: false,
///     may_raise: true,
/// };
/// // short of the 200 minimum, but it is the whole stack
/// let result = validate_action(&seat, PlayerAction::Raise(130));
/// assert_eq!(result, Ok(ValidatedAction::Raise { to: 130, full: false }));
/// ```
pub fn validate_action(seat: &SeatBetting, action: A) -> Result<ValidatedAction, IllegalAction> {
    if seat.folded {
        return Err(IllegalAction::Folded);
    }
    if seat.stack == 0 {
        return Err(IllegalAction::NoChips);
    }
    let to_call = seat.to_call();
    match action {
        A::Fold => Ok(ValidatedAction::Fold),
        A::Check => {
            if to_call == 0 {
                Ok(ValidatedAction::Check)
            } else {
                Err(IllegalAction::CheckWhileOwing { to_call })
            }
        }
        A::Call => {
            if to_call == 0 {
                Err(IllegalAction::NothingToCall)
            } else {
                Ok(ValidatedAction::Call(to_call.min(seat.stack)))
            }
        }
        A::Raise(to) => {
            let max_to = seat.all_in_to();
            if seat.stack <= to_call || to > max_to {
                return Err(IllegalAction::InsufficientStack {
                    amount: to,
                    maximum: max_to,
                });
            }
            if !seat.may_raise {
                return Err(IllegalAction::RaiseNotReopened);
            }
            let minimum = seat.min_raise_to().min(max_to);
            if to <= seat.current_bet || (to < seat.min_raise_to() && to != max_to) {
                return Err(IllegalAction::RaiseTooSmall {
                    amount: to,
                    minimum,
                });
            }
            Ok(ValidatedAction::Raise {
                to,
                full: to >= seat.min_raise_to(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seat(stack: u32, committed: u32, current_bet: u32) -> SeatBetting {
        SeatBetting {
            stack,
            committed_this_street: committed,
            current_bet,
            last_raise_size: 100,
            big_blind: 100,
            folded: false,
            may_raise: true,
        }
    }

    #[test]
    fn streets_advance_linearly() {
        let mut s = Street::Waiting;
        let mut seen = vec![s];
        while let Some(n) = s.next() {
            seen.push(n);
            s = n;
        }
        assert_eq!(seen.len(), 6);
        assert_eq!(s, Street::Showdown);
    }

    #[test]
    fn opening_bet_minimum_is_big_blind() {
        let s = seat(1_000, 0, 0);
        assert_eq!(s.min_raise_to(), 100);
        let legal = legal_actions(&s);
        assert!(legal.contains(ActionKind::Check));
        assert!(!legal.contains(ActionKind::Call));
        assert_eq!(
            legal.raise,
            Some(RaiseBounds {
                min_to: 100,
                max_to: 1_000
            })
        );
    }

    #[test]
    fn short_stack_may_only_call() {
        let s = seat(80, 0, 100);
        let legal = legal_actions(&s);
        assert_eq!(legal.actions, vec![ActionKind::Fold, ActionKind::Call]);
        assert_eq!(validate_action(&s, A::Call), Ok(ValidatedAction::Call(80)));
    }

    #[test]
    fn stackless_or_folded_seats_have_no_actions() {
        assert!(legal_actions(&seat(0, 100, 100)).is_empty());
        let mut folded = seat(500, 0, 100);
        folded.folded = true;
        assert!(legal_actions(&folded).is_empty());
        assert_eq!(validate_action(&folded, A::Fold), Err(IllegalAction::Folded));
    }

    #[test]
    fn raise_not_reopened_after_short_all_in() {
        let mut s = seat(1_000, 100, 150);
        s.may_raise = false;
        let legal = legal_actions(&s);
        assert!(!legal.contains(ActionKind::Raise));
        assert_eq!(
            validate_action(&s, A::Raise(400)),
            Err(IllegalAction::RaiseNotReopened)
        );
        assert_eq!(validate_action(&s, A::Call), Ok(ValidatedAction::Call(50)));
    }
}
