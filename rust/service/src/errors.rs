//! Error types for the table service.
//!
//! Every failure a caller can see is a [`ServiceError`]. Rejected requests
//! (wrong turn, undersized raise, unknown table) are expected during normal
//! play and are logged quietly; engine faults mean an invariant broke and
//! are logged as errors.

use pokerroom_engine::errors::GameError;
use thiserror::Error;

use crate::config::ConfigError;

pub type TableId = String;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Table not found: {0}")]
    TableNotFound(TableId),
    #[error("Table storage poisoned")]
    StoragePoisoned,
    #[error("Unknown bot strategy: {0}")]
    UnknownBot(String),
    #[error("Seat count {seats} outside configured range {min}..={max}")]
    SeatCountNotAllowed { seats: usize, min: usize, max: usize },
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Game(#[from] GameError),
}

/// Error classification for logging levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Rejected request; the caller can retry with a different input
    Client,
    /// Misconfiguration or unavailable storage
    Server,
    /// Engine invariant violated
    Critical,
}

impl ServiceError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            ServiceError::Game(e) if e.is_fault() => ErrorSeverity::Critical,
            ServiceError::StoragePoisoned => ErrorSeverity::Critical,
            ServiceError::Config(_) | ServiceError::UnknownBot(_) => ErrorSeverity::Server,
            _ => ErrorSeverity::Client,
        }
    }

    /// Machine-readable code for transports.
    pub fn error_code(&self) -> &'static str {
        match self {
            ServiceError::TableNotFound(_) => "table_not_found",
            ServiceError::StoragePoisoned => "table_storage_error",
            ServiceError::UnknownBot(_) => "unknown_bot",
            ServiceError::SeatCountNotAllowed { .. } => "invalid_seat_count",
            ServiceError::Config(_) => "config_error",
            ServiceError::Game(e) => match e {
                GameError::InvalidStreetTransition { .. } | GameError::BettingRoundOpen(_) => {
                    "invalid_street_transition"
                }
                GameError::NotYourTurn { .. } => "not_your_turn",
                GameError::IllegalAction(_) => "illegal_action",
                GameError::SeatOutOfRange { .. } => "seat_out_of_range",
                GameError::SeatNotReplaceable(_) => "seat_not_replaceable",
                GameError::InvalidSeatCount(_) => "invalid_seat_count",
                GameError::InvalidName => "invalid_name",
                GameError::HandInProgress => "hand_in_progress",
                GameError::NoHandInProgress => "no_hand_in_progress",
                GameError::HandAlreadySettled => "hand_already_settled",
                GameError::NotEnoughPlayers(_) => "not_enough_players",
                GameError::Fault(_) => "engine_fault",
            },
        }
    }

    /// Logs the error at the level its severity calls for.
    pub fn log(&self, table_id: &str) {
        match self.severity() {
            ErrorSeverity::Client => {
                tracing::info!(table_id = %table_id, code = self.error_code(), error = %self, "request rejected")
            }
            ErrorSeverity::Server => {
                tracing::warn!(table_id = %table_id, code = self.error_code(), error = %self, "service error")
            }
            ErrorSeverity::Critical => {
                tracing::error!(table_id = %table_id, code = self.error_code(), error = %self, "engine fault")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pokerroom_engine::errors::{EngineFault, IllegalAction};

    #[test]
    fn faults_are_critical() {
        let err = ServiceError::from(GameError::Fault(EngineFault::DeckUnderflow));
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert_eq!(err.error_code(), "engine_fault");
    }

    #[test]
    fn rejected_requests_are_client_errors() {
        let err = ServiceError::from(GameError::IllegalAction(IllegalAction::NothingToCall));
        assert_eq!(err.severity(), ErrorSeverity::Client);
        assert_eq!(err.error_code(), "illegal_action");

        let err = ServiceError::TableNotFound("t-1".into());
        assert_eq!(err.severity(), ErrorSeverity::Client);
        assert_eq!(err.to_string(), "Table not found: t-1");
    }

    #[test]
    fn unknown_strategy_is_a_server_error() {
        assert_eq!(ServiceError::UnknownBot("x".into()).severity(), ErrorSeverity::Server);
    }
}
