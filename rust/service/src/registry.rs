//! Owned registry of live tables.
//!
//! Each table sits behind its own mutex, so every mutation of one table is
//! serialized while different tables proceed independently. Events are
//! published after the table lock is released.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use std::time::Duration;

use pokerroom_ai::{BotPolicy, create_bot};
use pokerroom_engine::errors::GameError;
use pokerroom_engine::player::PlayerAction;
use pokerroom_engine::showdown::HandOutcome;
use pokerroom_engine::table::{ActionStamp, Table};
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::config::ServiceConfig;
use crate::errors::{ServiceError, TableId};
use crate::events::{EventBus, EventSubscription, TableEvent};
use crate::orchestrator::{HandOrchestrator, Progress};
use crate::snapshot::TableSnapshot;

/// A bot decision together with the decision point it was computed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BotMove {
    pub stamp: ActionStamp,
    pub action: PlayerAction,
}

struct TableHandle {
    table: Mutex<Table>,
    bot: Box<dyn BotPolicy>,
}

impl TableHandle {
    fn lock(&self) -> Result<MutexGuard<'_, Table>, ServiceError> {
        self.table.lock().map_err(|_| ServiceError::StoragePoisoned)
    }
}

pub struct TableRegistry {
    tables: RwLock<HashMap<TableId, Arc<TableHandle>>>,
    events: EventBus,
    config: ServiceConfig,
    orchestrator: HandOrchestrator,
}

impl std::fmt::Debug for TableRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableRegistry")
            .field("tables", &self.table_ids())
            .field("config", &self.config)
            .finish()
    }
}

impl TableRegistry {
    pub fn new(config: ServiceConfig) -> Result<Self, ServiceError> {
        Self::with_event_bus(config, EventBus::new())
    }

    pub fn with_event_bus(config: ServiceConfig, events: EventBus) -> Result<Self, ServiceError> {
        config.validate()?;
        Ok(Self {
            tables: RwLock::new(HashMap::new()),
            events,
            orchestrator: HandOrchestrator::new(config.analytics),
            config,
        })
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn subscribe(&self, id: &TableId) -> Result<EventSubscription, ServiceError> {
        self.handle(id)?;
        Ok(self.events.subscribe(id.clone()))
    }

    // ---- table lifecycle ----

    pub fn create_table(&self, seats: usize) -> Result<TableId, ServiceError> {
        self.create_table_with_seed(seats, None)
    }

    /// Creates a table of bot seats. A seed makes every shuffle reproducible.
    pub fn create_table_with_seed(&self, seats: usize, seed: Option<u64>) -> Result<TableId, ServiceError> {
        if seats < self.config.min_seats || seats > self.config.max_seats {
            return Err(ServiceError::SeatCountNotAllowed {
                seats,
                min: self.config.min_seats,
                max: self.config.max_seats,
            });
        }
        let bot = create_bot(&self.config.bot_strategy)
            .ok_or_else(|| ServiceError::UnknownBot(self.config.bot_strategy.clone()))?;
        let table = Table::new(self.config.table_config(seats, seed))?;

        let id = Uuid::new_v4().to_string();
        self.tables
            .write()
            .map_err(|_| ServiceError::StoragePoisoned)?
            .insert(
                id.clone(),
                Arc::new(TableHandle {
                    table: Mutex::new(table),
                    bot,
                }),
            );

        tracing::info!(table_id = %id, seats, strategy = %self.config.bot_strategy, "table created");
        self.events.broadcast(
            &id,
            TableEvent::TableCreated {
                table_id: id.clone(),
                seats,
            },
        );
        Ok(id)
    }

    pub fn remove_table(&self, id: &TableId) -> Result<(), ServiceError> {
        let removed = self
            .tables
            .write()
            .map_err(|_| ServiceError::StoragePoisoned)?
            .remove(id);
        if removed.is_none() {
            return Err(ServiceError::TableNotFound(id.clone()));
        }
        tracing::info!(table_id = %id, "table removed");
        self.events.broadcast(id, TableEvent::TableClosed { table_id: id.clone() });
        self.events.drop_table(id);
        Ok(())
    }

    pub fn table_ids(&self) -> Vec<TableId> {
        self.tables
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }

    // ---- seats ----

    pub fn join_seat(&self, id: &TableId, seat: usize, name: &str) -> Result<(), ServiceError> {
        self.mutate(id, |table, _| {
            table.join_seat(seat, name)?;
            Ok(((), vec![seat_event(id, table, seat)]))
        })
    }

    pub fn leave_seat(&self, id: &TableId, seat: usize) -> Result<(), ServiceError> {
        self.mutate(id, |table, _| {
            table.leave_seat(seat)?;
            Ok(((), vec![seat_event(id, table, seat)]))
        })
    }

    pub fn set_stack(&self, id: &TableId, seat: usize, stack: u32) -> Result<(), ServiceError> {
        self.mutate(id, |table, _| Ok((table.set_stack(seat, stack)?, Vec::new())))
    }

    // ---- hand flow ----

    pub fn start_hand(&self, id: &TableId) -> Result<(), ServiceError> {
        self.mutate(id, |table, orchestrator| {
            let progress = orchestrator.start_hand(table)?;
            tracing::info!(
                table_id = %id,
                hand = table.hand_number(),
                dealer = ?table.dealer(),
                blinds = ?table.blind_level(),
                "hand started"
            );
            let mut events = vec![TableEvent::HandStarted {
                table_id: id.clone(),
                hand: table.hand_number(),
                dealer: table.dealer(),
                small_blind: table.small_blind_seat(),
                big_blind: table.big_blind_seat(),
            }];
            events.extend(progress_events(id, table, progress));
            Ok(((), events))
        })
    }

    pub fn act(&self, id: &TableId, seat: usize, action: PlayerAction) -> Result<(), ServiceError> {
        self.mutate(id, |table, orchestrator| {
            Ok(((), apply_logged(id, table, orchestrator, seat, action)?))
        })
    }

    pub fn check(&self, id: &TableId, seat: usize) -> Result<(), ServiceError> {
        self.act(id, seat, PlayerAction::Check)
    }

    pub fn call(&self, id: &TableId, seat: usize) -> Result<(), ServiceError> {
        self.act(id, seat, PlayerAction::Call)
    }

    pub fn fold(&self, id: &TableId, seat: usize) -> Result<(), ServiceError> {
        self.act(id, seat, PlayerAction::Fold)
    }

    pub fn raise(&self, id: &TableId, seat: usize, amount_to: u32) -> Result<(), ServiceError> {
        self.act(id, seat, PlayerAction::Raise(amount_to))
    }

    /// Outcome of the current or most recent hand, resolving the showdown if
    /// the table is waiting for it.
    pub fn showdown(&self, id: &TableId) -> Result<HandOutcome, ServiceError> {
        self.mutate(id, |table, _| {
            if let Some(outcome) = table.outcome() {
                return Ok((outcome.clone(), Vec::new()));
            }
            table.showdown()?;
            let outcome = table
                .outcome()
                .cloned()
                .ok_or(GameError::NoHandInProgress)?;
            let events = progress_events(id, table, vec![Progress::HandFinished(outcome.clone())]);
            Ok((outcome, events))
        })
    }

    pub fn snapshot(&self, id: &TableId, viewer: Option<usize>) -> Result<TableSnapshot, ServiceError> {
        let handle = self.handle(id)?;
        let table = handle.lock()?;
        Ok(TableSnapshot::capture(id, &table, viewer))
    }

    /// Read-only access to the engine table.
    pub fn inspect<R>(&self, id: &TableId, f: impl FnOnce(&Table) -> R) -> Result<R, ServiceError> {
        let handle = self.handle(id)?;
        let table = handle.lock()?;
        Ok(f(&table))
    }

    // ---- bots ----

    /// The bot move for the seat to act, if that seat is a bot.
    pub fn pending_bot_turn(&self, id: &TableId) -> Result<Option<BotMove>, ServiceError> {
        let handle = self.handle(id)?;
        let table = handle.lock()?;
        Ok(bot_move(&table, handle.bot.as_ref()))
    }

    /// Applies a deferred move if its stamp still matches the table.
    /// Returns `false` when the stamp is stale and the move was dropped.
    pub fn apply_stamped(&self, id: &TableId, stamp: ActionStamp, action: PlayerAction) -> Result<bool, ServiceError> {
        self.mutate(id, |table, orchestrator| {
            if !table.is_stamp_current(&stamp) {
                tracing::warn!(
                    table_id = %id,
                    hand = stamp.hand,
                    street = ?stamp.street,
                    seat = stamp.seat,
                    action_count = stamp.action_count,
                    "discarding stale deferred action"
                );
                return Ok((false, Vec::new()));
            }
            Ok((true, apply_logged(id, table, orchestrator, stamp.seat, action)?))
        })
    }

    /// Plays bot seats until a human must act or the hand is over. Returns
    /// the number of bot actions applied.
    pub fn run_bots(&self, id: &TableId) -> Result<usize, ServiceError> {
        let handle = self.handle(id)?;
        self.mutate(id, |table, orchestrator| {
            let mut applied = 0;
            let mut events = Vec::new();
            while let Some(next) = bot_move(table, handle.bot.as_ref()) {
                events.extend(apply_logged(id, table, orchestrator, next.stamp.seat, next.action)?);
                applied += 1;
            }
            Ok((applied, events))
        })
    }

    /// Decides the pending bot move now and applies it after the configured
    /// delay. The task yields `true` if the move was applied, `false` if the
    /// table moved on in the meantime (or the move failed).
    pub fn schedule_bot_turn(self: &Arc<Self>, id: &TableId) -> Result<Option<JoinHandle<bool>>, ServiceError> {
        let Some(next) = self.pending_bot_turn(id)? else {
            return Ok(None);
        };
        let registry = Arc::clone(self);
        let id = id.clone();
        let delay = Duration::from_millis(self.config.bot_delay_ms);
        Ok(Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            registry
                .apply_stamped(&id, next.stamp, next.action)
                .unwrap_or(false)
        })))
    }

    // ---- internals ----

    fn handle(&self, id: &TableId) -> Result<Arc<TableHandle>, ServiceError> {
        self.tables
            .read()
            .map_err(|_| ServiceError::StoragePoisoned)?
            .get(id)
            .cloned()
            .ok_or_else(|| ServiceError::TableNotFound(id.clone()))
    }

    /// Runs one serialized mutation, logs a failure, and publishes the
    /// resulting events once the lock is gone. A failed mutation leaves the
    /// table as it was before `f` ran, even if `f` got partway.
    fn mutate<R>(
        &self,
        id: &TableId,
        f: impl FnOnce(&mut Table, &HandOrchestrator) -> Result<(R, Vec<TableEvent>), GameError>,
    ) -> Result<R, ServiceError> {
        let result = self.handle(id).and_then(|handle| {
            let mut table = handle.lock()?;
            let backup = table.clone();
            f(&mut table, &self.orchestrator).map_err(|e| {
                *table = backup;
                ServiceError::from(e)
            })
        });
        match result {
            Ok((value, events)) => {
                self.events.broadcast_all(id, events);
                Ok(value)
            }
            Err(e) => {
                e.log(id);
                Err(e)
            }
        }
    }
}

fn bot_move(table: &Table, bot: &dyn BotPolicy) -> Option<BotMove> {
    let stamp = table.action_stamp()?;
    if !table.player(stamp.seat).ok()?.is_bot() {
        return None;
    }
    Some(BotMove {
        stamp,
        action: bot.decide(table, stamp.seat),
    })
}

fn apply_logged(
    id: &TableId,
    table: &mut Table,
    orchestrator: &HandOrchestrator,
    seat: usize,
    action: PlayerAction,
) -> Result<Vec<TableEvent>, GameError> {
    let street = table.street();
    let progress = orchestrator.apply(table, seat, action)?;
    tracing::debug!(
        table_id = %id,
        hand = table.hand_number(),
        street = ?street,
        seat,
        action = ?action,
        "action applied"
    );
    let mut events = vec![TableEvent::ActionApplied {
        table_id: id.clone(),
        hand: table.hand_number(),
        seat,
        street,
        action,
    }];
    events.extend(progress_events(id, table, progress));
    Ok(events)
}

fn progress_events(id: &TableId, table: &Table, progress: Vec<Progress>) -> Vec<TableEvent> {
    let hand = table.hand_number();
    progress
        .into_iter()
        .map(|p| match p {
            Progress::StreetDealt { street, community } => TableEvent::StreetDealt {
                table_id: id.clone(),
                hand,
                street,
                community,
            },
            Progress::HandFinished(outcome) => {
                tracing::info!(
                    table_id = %id,
                    hand,
                    winners = ?outcome.winners(),
                    showdown = matches!(outcome, HandOutcome::Showdown(_)),
                    "hand finished"
                );
                TableEvent::HandFinished {
                    table_id: id.clone(),
                    hand,
                    outcome,
                }
            }
        })
        .collect()
}

fn seat_event(id: &TableId, table: &Table, seat: usize) -> TableEvent {
    let (name, is_bot) = table
        .player(seat)
        .map(|p| (p.name().to_string(), p.is_bot()))
        .unwrap_or_default();
    TableEvent::SeatChanged {
        table_id: id.clone(),
        seat,
        name,
        is_bot,
    }
}
