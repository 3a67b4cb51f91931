//! Ask (sell-side) book
//!
//! Mirror of the bid side: price levels keyed by price in a `BTreeMap`,
//! with the best ask at the lowest key.

use std::collections::BTreeMap;

use types::ids::OrderId;
use types::numeric::{Price, Quantity};
use types::order::Order;

use super::price_level::PriceLevel;
use super::LevelDepth;

/// The sell side of the book
#[derive(Debug, Clone, Default)]
pub struct AskBook {
    levels: BTreeMap<Price, PriceLevel>,
}

impl AskBook {
    /// Create a new empty ask book
    pub fn new() -> Self {
        Self {
            levels: BTreeMap::new(),
        }
    }

    /// Insert a resting order, creating its level lazily
    ///
    /// Returns true when a new level was created for this price.
    pub fn insert(&mut self, order: Order) -> bool {
        let price = order.price;
        let created = !self.levels.contains_key(&price);
        self.levels
            .entry(price)
            .or_insert_with(|| PriceLevel::new(price))
            .add_order(order);
        created
    }

    /// Remove an order from its level, dropping the level if emptied
    ///
    /// Returns the removed order and whether its level went away, or
    /// `None` if no such order rests at this price.
    pub fn remove(&mut self, order_id: &OrderId, price: Price) -> Option<(Order, bool)> {
        let level = self.levels.get_mut(&price)?;
        let order = level.remove_order(order_id)?;
        let emptied = level.is_empty();
        if emptied {
            // An empty level must never stay indexed
            self.levels.remove(&price);
        }
        Some((order, emptied))
    }

    /// The best ask: lowest price and its volume
    pub fn best_ask(&self) -> Option<(Price, Quantity)> {
        self.levels
            .iter()
            .next()
            .map(|(price, level)| (*price, level.total_volume()))
    }

    /// The best ask price
    pub fn best_price(&self) -> Option<Price> {
        self.levels.keys().next().copied()
    }

    /// Mutable access to the best level, for matching
    pub(crate) fn best_level_mut(&mut self) -> Option<&mut PriceLevel> {
        self.levels.values_mut().next()
    }

    /// Drop a level emptied by matching
    pub(crate) fn drop_level(&mut self, price: Price) {
        self.levels.remove(&price);
    }

    /// Sum of volume across all levels, O(number of levels)
    pub fn total_volume(&self) -> Quantity {
        self.levels
            .values()
            .fold(Quantity::zero(), |acc, level| acc + level.total_volume())
    }

    /// All levels best-first (lowest price first)
    pub fn depth(&self) -> Vec<LevelDepth> {
        self.levels
            .iter()
            .map(|(price, level)| LevelDepth {
                price: *price,
                volume: level.total_volume(),
                order_count: level.order_count(),
            })
            .collect()
    }

    /// Look up one level by exact price
    pub fn level(&self, price: Price) -> Option<&PriceLevel> {
        self.levels.get(&price)
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}
