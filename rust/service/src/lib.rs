//! # pokerroom-service: Table Hosting
//!
//! Hosts many independent [`pokerroom_engine::table::Table`]s for a
//! transport layer. The service owns every table, serializes mutations per
//! table, drives streets and showdowns between decisions, plays bot seats,
//! and publishes redacted snapshots and events. It has no network code of
//! its own.
//!
//! ## Modules
//!
//! - [`registry`] - Owned table registry, command surface and bot scheduling
//! - [`orchestrator`] - Street advancement, analytics and showdown between actions
//! - [`snapshot`] - Per-viewer redacted table views
//! - [`events`] - Bounded per-table event fan-out
//! - [`config`] - TOML/environment configuration with value sources
//! - [`logging`] - `tracing` setup and a capturing test subscriber
//! - [`errors`] - Service error taxonomy
//!
//! ## Example
//!
//! ```rust
//! use pokerroom_service::{ServiceConfig, TableRegistry};
//!
//! let registry = TableRegistry::new(ServiceConfig::default()).unwrap();
//! let id = registry.create_table_with_seed(3, Some(7)).unwrap();
//! registry.join_seat(&id, 0, "Ann").unwrap();
//! registry.start_hand(&id).unwrap();
//! registry.run_bots(&id).unwrap();
//!
//! let view = registry.snapshot(&id, Some(0)).unwrap();
//! assert_eq!(view.seats[0].hole_cards.len(), 2);
//! assert!(view.seats[1].hole_cards.is_empty());
//! ```

pub mod config;
pub mod errors;
pub mod events;
pub mod logging;
pub mod orchestrator;
pub mod registry;
pub mod snapshot;

pub use config::{ConfigError, ConfigResolved, ConfigSources, ServiceConfig, ValueSource};
pub use errors::{ErrorSeverity, ServiceError, TableId};
pub use events::{EventBus, EventSubscription, TableEvent};
pub use logging::{LogEntry, TestLogSubscriber, init_logging, init_test_logging};
pub use orchestrator::{HandOrchestrator, Progress};
pub use registry::{BotMove, TableRegistry};
pub use snapshot::{SeatSnapshot, TableSnapshot};
