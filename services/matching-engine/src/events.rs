//! Event notifications emitted by the engine
//!
//! Observational only: a sink sees what happened but can never affect
//! matching outcomes. Sinks are called after the book lock is released,
//! so a slow subscriber cannot stall matching.

use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use types::ids::{OrderId, OwnerId};
use types::numeric::{Price, Quantity};
use types::order::Side;
use types::trade::Trade;

/// Everything the engine reports to the outside world
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookEvent {
    OrderAccepted {
        order_id: OrderId,
        owner_id: OwnerId,
        side: Side,
        price: Price,
        quantity: Quantity,
    },
    OrderPartiallyFilled {
        order_id: OrderId,
        filled_quantity: Quantity,
        remaining_quantity: Quantity,
    },
    OrderFilled {
        order_id: OrderId,
    },
    OrderCanceled {
        order_id: OrderId,
        unfilled_quantity: Quantity,
    },
    TradeExecuted {
        trade: Trade,
    },
    LevelCreated {
        side: Side,
        price: Price,
    },
    LevelRemoved {
        side: Side,
        price: Price,
    },
}

/// Receiver for book events
pub trait EventSink: Send + Sync {
    fn publish(&self, event: &BookEvent);
}

/// Sink that discards everything (the default)
#[derive(Debug, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn publish(&self, _event: &BookEvent) {}
}

/// Sink that keeps every event, mostly for tests and diagnostics
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<BookEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything published so far
    pub fn events(&self) -> Vec<BookEvent> {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl EventSink for RecordingSink {
    fn publish(&self, event: &BookEvent) {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(event.clone());
    }
}
