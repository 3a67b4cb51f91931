//! Order types and lifecycle
//!
//! An order is created at submission, rests in exactly one price level
//! while unfilled, and is destroyed on full fill or cancellation. The
//! level that holds a resting order is tracked by the book's id index,
//! not by a pointer on the order itself; the level alone owns the order.

use crate::ids::{OrderId, OwnerId};
use crate::numeric::{Price, Quantity};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Order side (buyer or seller)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    /// Buy order
    Bid,
    /// Sell order
    Ask,
}

impl Side {
    /// Get the opposite side
    pub fn opposite(&self) -> Self {
        match self {
            Side::Bid => Side::Ask,
            Side::Ask => Side::Bid,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Bid => write!(f, "BID"),
            Side::Ask => write!(f, "ASK"),
        }
    }
}

/// A single order's state
///
/// `remaining_quantity` is mutated only by fills and never goes below
/// zero. `arrival_time` (Unix nanos) is the time-priority tie-break and
/// is immutable after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub owner_id: OwnerId,
    pub side: Side,
    pub price: Price,
    pub quantity: Quantity,
    pub remaining_quantity: Quantity,
    pub arrival_time: i64,
}

impl Order {
    /// Create a new order with its full size remaining
    pub fn new(
        id: OrderId,
        owner_id: OwnerId,
        side: Side,
        price: Price,
        quantity: Quantity,
        arrival_time: i64,
    ) -> Self {
        Self {
            id,
            owner_id,
            side,
            price,
            quantity,
            remaining_quantity: quantity,
            arrival_time,
        }
    }

    /// Check if the order is completely filled
    pub fn is_filled(&self) -> bool {
        self.remaining_quantity.is_zero()
    }

    /// How much of the original size has been filled
    pub fn filled_quantity(&self) -> Quantity {
        self.quantity
            .checked_sub(self.remaining_quantity)
            .unwrap_or_else(Quantity::zero)
    }

    /// Reduce the remaining size by a fill
    ///
    /// # Panics
    /// Panics if the fill exceeds the remaining size; callers clamp the
    /// fill to `min(resting, incoming)` before calling.
    pub fn fill(&mut self, quantity: Quantity) {
        self.remaining_quantity = self
            .remaining_quantity
            .checked_sub(quantity)
            .expect("fill exceeds remaining quantity");
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[size:{} | id:{}]", self.remaining_quantity, self.id)
    }
}
