//! Price level with a FIFO order queue
//!
//! A price level holds every resting order at one exact price, in
//! arrival order. New orders always append at the tail and partial
//! fills never reorder the queue, so time priority among equal prices
//! is preserved structurally.

use std::collections::VecDeque;
use std::fmt;

use types::ids::{OrderId, OwnerId};
use types::numeric::{Price, Quantity};
use types::order::{Order, Side};

/// An incoming (aggressing) order being matched against resting liquidity
///
/// Market orders carry no price of their own; they consume resting
/// orders at whatever the level's price is.
#[derive(Debug, Clone)]
pub struct IncomingOrder {
    pub id: OrderId,
    pub owner_id: OwnerId,
    pub side: Side,
    pub remaining_quantity: Quantity,
}

impl IncomingOrder {
    pub fn new(id: OrderId, owner_id: OwnerId, side: Side, quantity: Quantity) -> Self {
        Self {
            id,
            owner_id,
            side,
            remaining_quantity: quantity,
        }
    }

    pub fn is_filled(&self) -> bool {
        self.remaining_quantity.is_zero()
    }
}

/// One matched pair produced during a fill
///
/// Ephemeral result returned to the engine, which converts it into a
/// trade record. `maker_remaining` is the resting order's size after
/// the match, letting the engine retire fully-filled makers from its
/// id index.
#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    pub maker_order_id: OrderId,
    pub maker_owner_id: OwnerId,
    pub taker_order_id: OrderId,
    pub taker_owner_id: OwnerId,
    pub price: Price,
    pub size_filled: Quantity,
    pub maker_remaining: Quantity,
}

/// All resting orders at one exact price, kept in arrival order
///
/// Invariant: `total_volume` equals the sum of remaining sizes over the
/// queue at all times observable between calls.
#[derive(Debug, Clone)]
pub struct PriceLevel {
    price: Price,
    orders: VecDeque<Order>,
    total_volume: Quantity,
}

impl PriceLevel {
    /// Create a new empty price level
    pub fn new(price: Price) -> Self {
        Self {
            price,
            orders: VecDeque::new(),
            total_volume: Quantity::zero(),
        }
    }

    /// Append an order at the tail of the queue (time priority)
    pub fn add_order(&mut self, order: Order) {
        debug_assert_eq!(order.price, self.price);
        self.total_volume += order.remaining_quantity;
        self.orders.push_back(order);
    }

    /// Remove an order by id, preserving the order of the rest
    ///
    /// Removal shifts the queue rather than swapping with the tail, so
    /// time priority among the remaining orders is untouched. Returns
    /// `None` (no-op) if the id is not present.
    pub fn remove_order(&mut self, order_id: &OrderId) -> Option<Order> {
        let position = self.orders.iter().position(|o| &o.id == order_id)?;
        let order = self.orders.remove(position)?;
        self.total_volume = self
            .total_volume
            .checked_sub(order.remaining_quantity)
            .unwrap_or_else(Quantity::zero);
        Some(order)
    }

    /// Match an incoming order against the queue in strict arrival order
    ///
    /// Visits resting orders front-to-back until the incoming order is
    /// exhausted or the queue is. Each visit fills
    /// `min(resting, incoming)` from both orders and the level volume.
    /// Fully-consumed resting orders are removed after the scan; a
    /// partially-filled order keeps its queue position. Returns the
    /// ordered matches (empty if the incoming order arrives filled).
    pub fn fill_against(&mut self, incoming: &mut IncomingOrder) -> Vec<Match> {
        let mut matches = Vec::new();

        for resting in self.orders.iter_mut() {
            if incoming.is_filled() {
                break;
            }

            let filled = resting.remaining_quantity.min(incoming.remaining_quantity);
            resting.fill(filled);
            incoming.remaining_quantity = incoming
                .remaining_quantity
                .checked_sub(filled)
                .unwrap_or_else(Quantity::zero);
            self.total_volume = self
                .total_volume
                .checked_sub(filled)
                .unwrap_or_else(Quantity::zero);

            matches.push(Match {
                maker_order_id: resting.id,
                maker_owner_id: resting.owner_id,
                taker_order_id: incoming.id,
                taker_owner_id: incoming.owner_id,
                price: self.price,
                size_filled: filled,
                maker_remaining: resting.remaining_quantity,
            });
        }

        // Fills run front-to-back, so exhausted orders form a prefix
        while self.orders.front().is_some_and(|o| o.is_filled()) {
            self.orders.pop_front();
        }

        matches
    }

    /// The level's immutable price
    pub fn price(&self) -> Price {
        self.price
    }

    /// Total remaining size across the queue
    pub fn total_volume(&self) -> Quantity {
        self.total_volume
    }

    /// Number of resting orders
    pub fn order_count(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Resting orders in arrival order
    pub fn iter(&self) -> impl Iterator<Item = &Order> {
        self.orders.iter()
    }

    /// The order next in line to be filled
    pub fn front(&self) -> Option<&Order> {
        self.orders.front()
    }
}

impl fmt::Display for PriceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[price:{} | volume:{}]", self.price, self.total_volume)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::ids::{OrderId, OwnerId};

    fn resting(id: u64, quantity: u64, arrival: i64) -> Order {
        Order::new(
            OrderId::from_u64(id),
            OwnerId::from_u64(1),
            Side::Bid,
            Price::from_u64(10_000),
            Quantity::from_u64(quantity),
            arrival,
        )
    }

    fn taker(id: u64, quantity: u64) -> IncomingOrder {
        IncomingOrder::new(
            OrderId::from_u64(id),
            OwnerId::from_u64(2),
            Side::Ask,
            Quantity::from_u64(quantity),
        )
    }

    #[test]
    fn test_add_order_accumulates_volume() {
        let mut level = PriceLevel::new(Price::from_u64(10_000));
        level.add_order(resting(1, 5, 1));
        level.add_order(resting(2, 8, 2));
        level.add_order(resting(3, 10, 3));

        assert_eq!(level.total_volume(), Quantity::from_u64(23));
        assert_eq!(level.order_count(), 3);
    }

    #[test]
    fn test_remove_order_preserves_fifo() {
        // Scenario: sizes 5, 8, 10 rest in that order; removing the 8
        // leaves [5, 10] with volume 15
        let mut level = PriceLevel::new(Price::from_u64(10_000));
        level.add_order(resting(1, 5, 1));
        level.add_order(resting(2, 8, 2));
        level.add_order(resting(3, 10, 3));

        let removed = level.remove_order(&OrderId::from_u64(2)).unwrap();
        assert_eq!(removed.remaining_quantity, Quantity::from_u64(8));
        assert_eq!(level.total_volume(), Quantity::from_u64(15));

        let sizes: Vec<Quantity> = level.iter().map(|o| o.remaining_quantity).collect();
        assert_eq!(sizes, vec![Quantity::from_u64(5), Quantity::from_u64(10)]);
    }

    #[test]
    fn test_remove_absent_order_is_noop() {
        let mut level = PriceLevel::new(Price::from_u64(10_000));
        level.add_order(resting(1, 5, 1));

        assert!(level.remove_order(&OrderId::from_u64(99)).is_none());
        assert_eq!(level.total_volume(), Quantity::from_u64(5));
        assert_eq!(level.order_count(), 1);
    }

    #[test]
    fn test_fill_against_earlier_arrival_first() {
        let mut level = PriceLevel::new(Price::from_u64(10_000));
        level.add_order(resting(1, 5, 1));
        level.add_order(resting(2, 8, 2));

        let mut incoming = taker(10, 6);
        let matches = level.fill_against(&mut incoming);

        // Order 1 (earlier) is consumed completely before order 2 is touched
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].maker_order_id, OrderId::from_u64(1));
        assert_eq!(matches[0].size_filled, Quantity::from_u64(5));
        assert_eq!(matches[1].maker_order_id, OrderId::from_u64(2));
        assert_eq!(matches[1].size_filled, Quantity::from_u64(1));

        assert!(incoming.is_filled());
        assert_eq!(level.order_count(), 1);
        assert_eq!(level.total_volume(), Quantity::from_u64(7));
    }

    #[test]
    fn test_fill_against_partial_keeps_queue_position() {
        let mut level = PriceLevel::new(Price::from_u64(10_000));
        level.add_order(resting(1, 10, 1));
        level.add_order(resting(2, 4, 2));

        let mut incoming = taker(10, 3);
        let matches = level.fill_against(&mut incoming);

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].maker_remaining, Quantity::from_u64(7));

        // Partially-filled order 1 stays at the front
        assert_eq!(level.front().unwrap().id, OrderId::from_u64(1));
        assert_eq!(
            level.front().unwrap().remaining_quantity,
            Quantity::from_u64(7)
        );
    }

    #[test]
    fn test_fill_against_exhausts_queue() {
        let mut level = PriceLevel::new(Price::from_u64(10_000));
        level.add_order(resting(1, 2, 1));
        level.add_order(resting(2, 3, 2));

        let mut incoming = taker(10, 9);
        let matches = level.fill_against(&mut incoming);

        assert_eq!(matches.len(), 2);
        assert!(level.is_empty());
        assert_eq!(level.total_volume(), Quantity::zero());
        assert_eq!(incoming.remaining_quantity, Quantity::from_u64(4));
    }

    #[test]
    fn test_fill_against_already_filled_incoming() {
        let mut level = PriceLevel::new(Price::from_u64(10_000));
        level.add_order(resting(1, 5, 1));

        let mut incoming = taker(10, 0);
        let matches = level.fill_against(&mut incoming);

        assert!(matches.is_empty());
        assert_eq!(level.total_volume(), Quantity::from_u64(5));
    }

    #[test]
    fn test_volume_equals_sum_of_remaining() {
        let mut level = PriceLevel::new(Price::from_u64(10_000));
        level.add_order(resting(1, 5, 1));
        level.add_order(resting(2, 8, 2));
        level.add_order(resting(3, 10, 3));

        let mut incoming = taker(10, 7);
        level.fill_against(&mut incoming);
        level.remove_order(&OrderId::from_u64(3));

        let sum = level
            .iter()
            .fold(Quantity::zero(), |acc, o| acc + o.remaining_quantity);
        assert_eq!(level.total_volume(), sum);
    }
}
