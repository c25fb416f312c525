use thiserror::Error;

use crate::rules::Street;

/// Errors returned to callers of the table. Every variant except
/// [`GameError::Fault`] is a rejected request that left the table untouched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid street transition. Expected {expected:?}, current {current:?}")]
    InvalidStreetTransition { expected: Street, current: Street },
    #[error("Betting on {0:?} is still open")]
    BettingRoundOpen(Street),
    #[error("It's not seat {actual}'s turn (expected seat {expected:?})")]
    NotYourTurn {
        expected: Option<usize>,
        actual: usize,
    },
    #[error("Illegal action: {0}")]
    IllegalAction(IllegalAction),
    #[error("Seat {seat} out of range (table has {seats} seats)")]
    SeatOutOfRange { seat: usize, seats: usize },
    #[error("Seat {0} is held by a human and cannot be replaced")]
    SeatNotReplaceable(usize),
    #[error("Seat count {0} is not supported (2..=6)")]
    InvalidSeatCount(usize),
    #[error("Player name must not be empty")]
    InvalidName,
    #[error("A hand is already in progress")]
    HandInProgress,
    #[error("No hand in progress")]
    NoHandInProgress,
    #[error("Hand already settled")]
    HandAlreadySettled,
    #[error("Need at least two seats with chips, found {0}")]
    NotEnoughPlayers(usize),
    #[error("Engine fault: {0}")]
    Fault(#[from] EngineFault),
}

impl GameError {
    /// True for internal invariant violations, false for rejected requests.
    pub fn is_fault(&self) -> bool {
        matches!(self, GameError::Fault(_))
    }
}

/// Why an action was rejected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IllegalAction {
    #[error("cannot check while owing {to_call}")]
    CheckWhileOwing { to_call: u32 },
    #[error("nothing to call")]
    NothingToCall,
    #[error("raise to {amount} is below the minimum of {minimum}")]
    RaiseTooSmall { amount: u32, minimum: u32 },
    #[error("raise to {amount} exceeds the maximum of {maximum}")]
    InsufficientStack { amount: u32, maximum: u32 },
    #[error("betting is not reopened for this seat")]
    RaiseNotReopened,
    #[error("seat has folded")]
    Folded,
    #[error("seat has no chips behind")]
    NoChips,
}

impl From<IllegalAction> for GameError {
    fn from(reason: IllegalAction) -> Self {
        GameError::IllegalAction(reason)
    }
}

/// Internal invariant violations. These abort the current operation; the
/// table restores its pre-operation state before returning one.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineFault {
    #[error("deck underflow")]
    DeckUnderflow,
    #[error("pot {pot} does not match committed total {committed}")]
    PotMismatch { pot: u32, committed: u32 },
    #[error("card accounting broken: {accounted} of 52 cards tracked")]
    CardAccounting { accounted: usize },
    #[error("expected {expected} cards, got {actual}")]
    InvalidCardCount { expected: &'static str, actual: usize },
    #[error("duplicate card in input")]
    DuplicateCard,
    #[error("no contender is eligible for a pot")]
    NoContenders,
}
