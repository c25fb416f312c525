//! # pokerroom-ai: Automated Seats
//!
//! Decision policies for bot-controlled seats. A policy looks at the table
//! from one seat's point of view and returns a single legal action; it never
//! mutates the table.
//!
//! ## Core Components
//!
//! - [`BotPolicy`] - Trait defining the interface for bot decision-making
//! - [`heuristic`] - Score/equity driven policy used for every bot seat
//! - [`create_bot`] - Factory function for creating policies by name
//!
//! ## Quick Start
//!
//! ```rust
//! use pokerroom_ai::{create_bot, BotPolicy};
//! use pokerroom_engine::table::{Table, TableConfig};
//!
//! let bot = create_bot("heuristic").expect("known strategy");
//!
//! let mut table = Table::new(TableConfig::new(2).with_seed(42)).unwrap();
//! table.start_hand().unwrap();
//!
//! let seat = table.current_seat().expect("someone must act");
//! let action = bot.decide(&table, seat);
//! table.apply_action(seat, action).unwrap();
//! ```
//!
//! ## Strategies
//!
//! Currently supported strategies:
//! - `"heuristic"` - preflop hand score, postflop equity versus pot odds

use pokerroom_engine::player::PlayerAction;
use pokerroom_engine::table::Table;

pub mod heuristic;

/// Names accepted by [`create_bot`].
pub const STRATEGIES: &[&str] = &["heuristic"];

/// Trait defining the interface for automated seats.
///
/// # Example Implementation
///
/// ```rust
/// use pokerroom_ai::BotPolicy;
/// use pokerroom_engine::player::PlayerAction;
/// use pokerroom_engine::rules::ActionKind;
/// use pokerroom_engine::table::Table;
///
/// struct CallingStation;
///
/// impl BotPolicy for CallingStation {
///     fn decide(&self, table: &Table, seat: usize) -> PlayerAction {
///         if table.legal_actions(seat).contains(ActionKind::Check) {
///             PlayerAction::Check
///         } else {
///             PlayerAction::Call
///         }
///     }
///
///     fn name(&self) -> &str {
///         "CallingStation"
///     }
/// }
/// ```
pub trait BotPolicy: Send + Sync {
    /// Chooses an action for `seat`, which is expected to be the seat to act.
    /// The result must be one of the seat's legal actions.
    fn decide(&self, table: &Table, seat: usize) -> PlayerAction;

    fn name(&self) -> &str;
}

/// Factory function to create bot policies by strategy name.
///
/// ```rust
/// use pokerroom_ai::create_bot;
///
/// let bot = create_bot("heuristic").unwrap();
/// assert_eq!(bot.name(), "HeuristicBot");
/// assert!(create_bot("telepathic").is_none());
/// ```
pub fn create_bot(strategy: &str) -> Option<Box<dyn BotPolicy>> {
    match strategy {
        "heuristic" => Some(Box::new(heuristic::HeuristicBot::new())),
        _ => None,
    }
}
