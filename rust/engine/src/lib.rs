//! # pokerroom-engine: No-Limit Hold'em Table Core
//!
//! A synchronous, I/O-free engine for two to six seat No-Limit Texas
//! Hold'em. It owns a hand from blind posting through showdown: turn order,
//! legal actions, chip accounting with side pots, hand evaluation and the
//! equity/draw analytics that drive automated seats.
//!
//! ## Core Modules
//!
//! - [`cards`] - Card representation (Suit, Rank, Card), parsing and display
//! - [`deck`] - 52-card deck with a ChaCha20-backed Fisher-Yates shuffle
//! - [`analysis`] - Rank/suit counts and bitmasks shared by evaluator and advisor
//! - [`hand`] - Hand evaluation into totally ordered [`hand::HandValue`]s
//! - [`pot`] - Commitment ledger and side pot construction
//! - [`player`] - Seat state and player actions
//! - [`rules`] - Streets, blind schedule, legal actions and action validation
//! - [`table`] - The betting state machine
//! - [`advisor`] - Board texture, strength percentile, draws and pot math
//! - [`showdown`] - Pot distribution among the best hands
//! - [`errors`] - Error types for game operations
//!
//! ## Quick Start
//!
//! ```rust
//! use pokerroom_engine::table::{Table, TableConfig};
//! use pokerroom_engine::rules::Street;
//!
//! let mut table = Table::new(TableConfig::new(2).with_seed(42)).unwrap();
//! table.start_hand().unwrap();
//!
//! // heads-up: the dealer posts the small blind and acts first
//! let sb = table.small_blind_seat().unwrap();
//! assert_eq!(table.current_seat(), Some(sb));
//! table.call(sb).unwrap();
//!
//! let bb = table.big_blind_seat().unwrap();
//! table.check(bb).unwrap();
//! assert!(table.is_round_complete());
//!
//! table.advance_street().unwrap();
//! assert_eq!(table.street(), Street::Flop);
//! assert_eq!(table.community().len(), 3);
//! ```
//!
//! ## Hand Evaluation
//!
//! ```rust
//! use pokerroom_engine::cards::parse_cards;
//! use pokerroom_engine::hand::{evaluate, Category};
//!
//! let hole = parse_cards("Ah 2d").unwrap();
//! let board = parse_cards("3c 4s 5h 9d Kc").unwrap();
//! let value = evaluate(&hole, &board).unwrap();
//! assert_eq!(value.category, Category::Straight);
//! assert_eq!(value.keys[0], 5);
//! ```
//!
//! ## Deterministic Gameplay
//!
//! Tables built with a seed deal the same cards every time:
//!
//! ```rust
//! use pokerroom_engine::deck::Deck;
//!
//! let mut deck1 = Deck::new_with_seed(42);
//! let mut deck2 = Deck::new_with_seed(42);
//! deck1.shuffle();
//! deck2.shuffle();
//! assert_eq!(deck1.draw_many(5).unwrap(), deck2.draw_many(5).unwrap());
//! ```

pub mod advisor;
pub mod analysis;
pub mod cards;
pub mod deck;
pub mod errors;
pub mod hand;
pub mod player;
pub mod pot;
pub mod rules;
pub mod showdown;
pub mod table;
