use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use pokerroom_engine::cards::Card;
use pokerroom_engine::player::PlayerAction;
use pokerroom_engine::rules::Street;
use pokerroom_engine::showdown::HandOutcome;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::errors::TableId;

// Slow subscribers lose events instead of growing the queue without bound
const EVENT_CHANNEL_BUFFER: usize = 1000;

pub type EventSender = mpsc::Sender<TableEvent>;
pub type EventReceiver = mpsc::Receiver<TableEvent>;

/// Table-level notifications for the transport layer. Events carry no hole
/// cards except the ones revealed in a showdown outcome; transports fetch a
/// redacted snapshot per viewer when they need full state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TableEvent {
    TableCreated {
        table_id: TableId,
        seats: usize,
    },
    SeatChanged {
        table_id: TableId,
        seat: usize,
        name: String,
        is_bot: bool,
    },
    HandStarted {
        table_id: TableId,
        hand: u64,
        dealer: Option<usize>,
        small_blind: Option<usize>,
        big_blind: Option<usize>,
    },
    ActionApplied {
        table_id: TableId,
        hand: u64,
        seat: usize,
        street: Street,
        action: PlayerAction,
    },
    StreetDealt {
        table_id: TableId,
        hand: u64,
        street: Street,
        community: Vec<Card>,
    },
    HandFinished {
        table_id: TableId,
        hand: u64,
        outcome: HandOutcome,
    },
    TableClosed {
        table_id: TableId,
    },
}

pub struct EventSubscription {
    bus: EventBus,
    table_id: TableId,
    subscriber_id: usize,
    pub receiver: EventReceiver,
}

impl EventSubscription {
    pub fn receiver(&mut self) -> &mut EventReceiver {
        &mut self.receiver
    }

    /// Everything delivered so far, without waiting.
    pub fn drain(&mut self) -> Vec<TableEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.receiver.try_recv() {
            events.push(event);
        }
        events
    }
}

impl Drop for EventSubscription {
    fn drop(&mut self) {
        self.bus.unsubscribe(&self.table_id, self.subscriber_id);
    }
}

#[derive(Debug, Clone, Default)]
pub struct EventBus {
    inner: Arc<EventBusInner>,
}

#[derive(Debug, Default)]
struct EventBusInner {
    subscribers: RwLock<HashMap<TableId, Vec<(usize, EventSender)>>>,
    next_id: AtomicUsize,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, table_id: TableId) -> EventSubscription {
        let (subscriber_id, receiver) = self.subscribe_raw(table_id.clone());
        EventSubscription {
            bus: self.clone(),
            table_id,
            subscriber_id,
            receiver,
        }
    }

    fn subscribe_raw(&self, table_id: TableId) -> (usize, EventReceiver) {
        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_BUFFER);
        let id = self.inner.next_id.fetch_add(1, Ordering::AcqRel);
        self.inner
            .subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(table_id.clone())
            .or_default()
            .push((id, tx));

        tracing::info!(table_id = %table_id, subscriber_id = id, "subscribed to table events");
        (id, rx)
    }

    pub fn broadcast(&self, table_id: &TableId, event: TableEvent) {
        tracing::trace!(table_id = %table_id, event = ?event, "broadcasting table event");

        let subscribers = self
            .inner
            .subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(table_id)
            .cloned();
        let Some(list) = subscribers else {
            return;
        };

        let mut failed = Vec::new();
        for (id, sender) in list {
            if let Err(e) = sender.try_send(event.clone()) {
                tracing::warn!(
                    table_id = %table_id,
                    subscriber_id = id,
                    error = ?e,
                    "dropping subscriber that cannot take events"
                );
                failed.push(id);
            }
        }
        if !failed.is_empty() {
            self.remove_subscribers(table_id, &failed);
        }
    }

    pub fn broadcast_all(&self, table_id: &TableId, events: Vec<TableEvent>) {
        for event in events {
            self.broadcast(table_id, event);
        }
    }

    pub fn unsubscribe(&self, table_id: &TableId, subscriber_id: usize) {
        self.remove_subscribers(table_id, &[subscriber_id]);
    }

    pub fn drop_table(&self, table_id: &TableId) {
        self.inner
            .subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(table_id);
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner
            .subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .map(Vec::len)
            .sum()
    }

    fn remove_subscribers(&self, table_id: &TableId, ids: &[usize]) {
        let mut guard = self.inner.subscribers.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(list) = guard.get_mut(table_id) {
            list.retain(|(id, _)| !ids.contains(id));
            if list.is_empty() {
                guard.remove(table_id);
            }
        }
    }
}
