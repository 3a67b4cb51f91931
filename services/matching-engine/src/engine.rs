//! Order book core and matching engine
//!
//! `OrderBook` is the single-threaded core: both sides, the id index,
//! and the trade log, with all matching and lifecycle logic.
//! `MatchingEngine` wraps it for concurrent callers: one exclusive
//! write lock over every mutation (a market order must see a
//! consistent snapshot across the levels it touches), shared read
//! access for queries, and event/log emission outside the lock.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use types::errors::OrderBookError;
use types::ids::{OrderId, OrderIdGenerator, OwnerId};
use types::numeric::{Price, Quantity};
use types::order::{Order, Side};
use types::trade::Trade;

use crate::book::{AskBook, BidBook, IncomingOrder, LevelDepth, Match};
use crate::events::{BookEvent, EventSink, NullSink};
use crate::time::{Clock, SystemClock};
use crate::trade_log::TradeLog;

/// Where a resting order currently lives
///
/// The non-owning back-reference from an order to its price level: the
/// level map on `side` holds the order under `price`. The level alone
/// owns the order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderLocation {
    pub side: Side,
    pub price: Price,
}

/// Result of resting a limit order
#[derive(Debug, Clone, PartialEq)]
pub struct LimitPlacement {
    pub order_id: OrderId,
    pub level_created: bool,
}

/// Result of executing a market order
#[derive(Debug, Clone)]
pub struct MarketExecution {
    /// One trade per match, in execution order
    pub trades: Vec<Trade>,
    /// The underlying matches, with maker detail
    pub matches: Vec<Match>,
    /// Prices of levels fully consumed and removed
    pub levels_removed: Vec<Price>,
}

/// Result of cancelling a resting order
#[derive(Debug, Clone)]
pub struct Cancellation {
    pub order: Order,
    pub level_removed: bool,
}

/// Full per-side view of current price levels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookSnapshot {
    /// Bid levels, best (highest price) first
    pub bids: Vec<LevelDepth>,
    /// Ask levels, best (lowest price) first
    pub asks: Vec<LevelDepth>,
}

/// The two book sides plus the authoritative order-id index
///
/// Invariant: every id in `orders_by_id` resolves to exactly one order
/// in the side-appropriate level map under the recorded price, and
/// every resting order is indexed. No operation leaves the book
/// half-mutated: failures are checked before any state change.
#[derive(Debug, Default)]
pub struct OrderBook {
    bids: BidBook,
    asks: AskBook,
    orders_by_id: HashMap<OrderId, OrderLocation>,
    order_ids: OrderIdGenerator,
    trade_log: TradeLog,
}

impl OrderBook {
    /// Create an empty book
    pub fn new() -> Self {
        Self {
            bids: BidBook::new(),
            asks: AskBook::new(),
            orders_by_id: HashMap::new(),
            order_ids: OrderIdGenerator::new(),
            trade_log: TradeLog::new(),
        }
    }

    /// Rest a limit order at its price, creating the level lazily
    ///
    /// Purely passive: the order never crosses against the opposite
    /// side on arrival, it only joins the tail of its level's queue.
    pub fn place_limit_order(
        &mut self,
        side: Side,
        price: Price,
        quantity: Quantity,
        owner_id: OwnerId,
        arrival_time: i64,
    ) -> Result<LimitPlacement, OrderBookError> {
        if quantity.is_zero() {
            return Err(OrderBookError::InvalidQuantity(
                "order size must be positive".to_string(),
            ));
        }

        let order_id = self.order_ids.next_id();
        let order = Order::new(order_id, owner_id, side, price, quantity, arrival_time);

        let level_created = match side {
            Side::Bid => self.bids.insert(order),
            Side::Ask => self.asks.insert(order),
        };
        self.orders_by_id
            .insert(order_id, OrderLocation { side, price });

        Ok(LimitPlacement {
            order_id,
            level_created,
        })
    }

    /// Execute a market order against the opposite side
    ///
    /// Liquidity is checked up front: if the requested size exceeds the
    /// opposite side's aggregate volume the call fails without touching
    /// any state. Otherwise levels are consumed best-price-first, each
    /// one FIFO, until the order is exhausted; emptied levels are
    /// dropped and fully-filled makers leave the id index.
    pub fn place_market_order(
        &mut self,
        side: Side,
        quantity: Quantity,
        owner_id: OwnerId,
        executed_at: i64,
    ) -> Result<MarketExecution, OrderBookError> {
        if quantity.is_zero() {
            return Err(OrderBookError::InvalidQuantity(
                "order size must be positive".to_string(),
            ));
        }

        let available = match side {
            Side::Bid => self.asks.total_volume(),
            Side::Ask => self.bids.total_volume(),
        };
        if quantity > available {
            return Err(OrderBookError::InsufficientLiquidity {
                requested: quantity,
                available,
            });
        }

        let mut incoming = IncomingOrder::new(self.order_ids.next_id(), owner_id, side, quantity);
        let (matches, levels_removed) = match side {
            Side::Bid => Self::fill_asks(&mut self.asks, &mut incoming),
            Side::Ask => Self::fill_bids(&mut self.bids, &mut incoming),
        };
        debug_assert!(incoming.is_filled());

        for m in &matches {
            if m.maker_remaining.is_zero() {
                self.orders_by_id.remove(&m.maker_order_id);
            }
        }

        let trades = matches
            .iter()
            .map(|m| self.trade_log.record(m.price, m.size_filled, side, executed_at))
            .collect();

        Ok(MarketExecution {
            trades,
            matches,
            levels_removed,
        })
    }

    /// Walk ask levels lowest-price-first, filling the incoming bid
    fn fill_asks(asks: &mut AskBook, incoming: &mut IncomingOrder) -> (Vec<Match>, Vec<Price>) {
        let mut matches = Vec::new();
        let mut levels_removed = Vec::new();

        while !incoming.is_filled() {
            let (price, emptied) = match asks.best_level_mut() {
                Some(level) => {
                    let price = level.price();
                    matches.extend(level.fill_against(incoming));
                    (price, level.is_empty())
                }
                None => break,
            };
            if emptied {
                asks.drop_level(price);
                levels_removed.push(price);
            }
        }

        (matches, levels_removed)
    }

    /// Walk bid levels highest-price-first, filling the incoming ask
    fn fill_bids(bids: &mut BidBook, incoming: &mut IncomingOrder) -> (Vec<Match>, Vec<Price>) {
        let mut matches = Vec::new();
        let mut levels_removed = Vec::new();

        while !incoming.is_filled() {
            let (price, emptied) = match bids.best_level_mut() {
                Some(level) => {
                    let price = level.price();
                    matches.extend(level.fill_against(incoming));
                    (price, level.is_empty())
                }
                None => break,
            };
            if emptied {
                bids.drop_level(price);
                levels_removed.push(price);
            }
        }

        (matches, levels_removed)
    }

    /// Cancel a resting order by id
    ///
    /// Removes the order from its level, drops the level if it became
    /// empty, and retires the id. Fails with `OrderNotFound` when the
    /// id is absent (already filled, cancelled, or never placed).
    pub fn cancel_order(&mut self, order_id: OrderId) -> Result<Cancellation, OrderBookError> {
        let location = self
            .orders_by_id
            .get(&order_id)
            .copied()
            .ok_or(OrderBookError::OrderNotFound { order_id })?;

        let removed = match location.side {
            Side::Bid => self.bids.remove(&order_id, location.price),
            Side::Ask => self.asks.remove(&order_id, location.price),
        };
        let (order, level_removed) =
            removed.ok_or(OrderBookError::OrderNotFound { order_id })?;
        self.orders_by_id.remove(&order_id);

        Ok(Cancellation {
            order,
            level_removed,
        })
    }

    /// Price of the highest bid level, if any
    pub fn best_bid(&self) -> Option<Price> {
        self.bids.best_price()
    }

    /// Price of the lowest ask level, if any
    pub fn best_ask(&self) -> Option<Price> {
        self.asks.best_price()
    }

    /// Sum of resting volume on one side, O(number of levels)
    pub fn aggregate_volume(&self, side: Side) -> Quantity {
        match side {
            Side::Bid => self.bids.total_volume(),
            Side::Ask => self.asks.total_volume(),
        }
    }

    /// Full set of current levels per side, best-first
    pub fn snapshot(&self) -> BookSnapshot {
        BookSnapshot {
            bids: self.bids.depth(),
            asks: self.asks.depth(),
        }
    }

    /// Look up a resting order by id
    pub fn order(&self, order_id: OrderId) -> Option<&Order> {
        let location = self.orders_by_id.get(&order_id)?;
        let level = match location.side {
            Side::Bid => self.bids.level(location.price)?,
            Side::Ask => self.asks.level(location.price)?,
        };
        level.iter().find(|o| o.id == order_id)
    }

    /// Number of resting orders across both sides
    pub fn open_order_count(&self) -> usize {
        self.orders_by_id.len()
    }

    /// The append-only trade history
    pub fn trade_log(&self) -> &TradeLog {
        &self.trade_log
    }
}

/// Thread-safe operation surface over an [`OrderBook`]
///
/// Every mutation runs under one exclusive write lock; queries take
/// the shared read lock. Timestamps are read under the lock, so the
/// stamp order of concurrent placements always matches their queue
/// order. Nothing inside the lock suspends or performs I/O, and only
/// this one lock exists, so there is no ordering hazard.
/// A poisoned lock is recovered rather than propagated; the book's
/// failure-free mutation paths keep it consistent even if a caller
/// panicked elsewhere.
pub struct MatchingEngine {
    book: RwLock<OrderBook>,
    clock: Arc<dyn Clock>,
    sink: Arc<dyn EventSink>,
}

impl MatchingEngine {
    /// Engine on the system clock with events discarded
    pub fn new() -> Self {
        Self::with_parts(Arc::new(SystemClock), Arc::new(NullSink))
    }

    /// Engine with an injected clock and event sink
    pub fn with_parts(clock: Arc<dyn Clock>, sink: Arc<dyn EventSink>) -> Self {
        Self {
            book: RwLock::new(OrderBook::new()),
            clock,
            sink,
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, OrderBook> {
        self.book.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, OrderBook> {
        self.book.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Rest a limit order; returns its engine-assigned id
    pub fn place_limit_order(
        &self,
        side: Side,
        price: Price,
        quantity: Quantity,
        owner_id: OwnerId,
    ) -> Result<OrderId, OrderBookError> {
        let placement = {
            let mut book = self.write();
            // Stamped under the lock: queue position and arrival_time
            // must agree on who came first
            let arrival_time = self.clock.now_nanos();
            book.place_limit_order(side, price, quantity, owner_id, arrival_time)
        };
        let placement = match placement {
            Ok(placement) => placement,
            Err(err) => {
                warn!(%side, %price, size = %quantity, error = %err, "limit order rejected");
                return Err(err);
            }
        };

        info!(
            %price,
            %side,
            size = %quantity,
            owner = %owner_id,
            order_id = %placement.order_id,
            "new limit order"
        );
        if placement.level_created {
            self.sink.publish(&BookEvent::LevelCreated { side, price });
        }
        self.sink.publish(&BookEvent::OrderAccepted {
            order_id: placement.order_id,
            owner_id,
            side,
            price,
            quantity,
        });

        Ok(placement.order_id)
    }

    /// Fill a market order; returns the resulting trades in order
    pub fn place_market_order(
        &self,
        side: Side,
        quantity: Quantity,
        owner_id: OwnerId,
    ) -> Result<Vec<Trade>, OrderBookError> {
        let execution = {
            let mut book = self.write();
            let executed_at = self.clock.now_nanos();
            book.place_market_order(side, quantity, owner_id, executed_at)
        };
        let execution = match execution {
            Ok(execution) => execution,
            Err(err) => {
                warn!(%side, size = %quantity, error = %err, "market order rejected");
                return Err(err);
            }
        };

        if let Some(trade) = execution.trades.last() {
            info!(current_price = %trade.price, fills = execution.trades.len(), "market order filled");
        }

        for m in &execution.matches {
            if m.maker_remaining.is_zero() {
                self.sink.publish(&BookEvent::OrderFilled {
                    order_id: m.maker_order_id,
                });
            } else {
                self.sink.publish(&BookEvent::OrderPartiallyFilled {
                    order_id: m.maker_order_id,
                    filled_quantity: m.size_filled,
                    remaining_quantity: m.maker_remaining,
                });
            }
        }
        for trade in &execution.trades {
            self.sink.publish(&BookEvent::TradeExecuted {
                trade: trade.clone(),
            });
        }
        for price in &execution.levels_removed {
            debug!(price = %price, "price level cleared");
            self.sink.publish(&BookEvent::LevelRemoved {
                side: side.opposite(),
                price: *price,
            });
        }

        Ok(execution.trades)
    }

    /// Cancel a resting order by id
    pub fn cancel_order(&self, order_id: OrderId) -> Result<(), OrderBookError> {
        let cancellation = {
            let mut book = self.write();
            book.cancel_order(order_id)
        };
        let cancellation = match cancellation {
            Ok(cancellation) => cancellation,
            Err(err) => {
                warn!(%order_id, error = %err, "cancel rejected");
                return Err(err);
            }
        };

        debug!(%order_id, "order cancelled");
        self.sink.publish(&BookEvent::OrderCanceled {
            order_id,
            unfilled_quantity: cancellation.order.remaining_quantity,
        });
        if cancellation.level_removed {
            debug!(price = %cancellation.order.price, "price level cleared");
            self.sink.publish(&BookEvent::LevelRemoved {
                side: cancellation.order.side,
                price: cancellation.order.price,
            });
        }

        Ok(())
    }

    /// Price of the highest bid level, if any
    pub fn best_bid(&self) -> Option<Price> {
        self.read().best_bid()
    }

    /// Price of the lowest ask level, if any
    pub fn best_ask(&self) -> Option<Price> {
        self.read().best_ask()
    }

    /// Sum of resting volume on one side
    pub fn aggregate_volume(&self, side: Side) -> Quantity {
        self.read().aggregate_volume(side)
    }

    /// Full set of current levels per side, best-first
    pub fn snapshot(&self) -> BookSnapshot {
        self.read().snapshot()
    }

    /// All trades so far, in execution order
    pub fn trades(&self) -> Vec<Trade> {
        self.read().trade_log().trades().to_vec()
    }

    /// Price of the most recent trade
    pub fn last_trade_price(&self) -> Option<Price> {
        self.read().trade_log().last_price()
    }

    /// Number of resting orders across both sides
    pub fn open_order_count(&self) -> usize {
        self.read().open_order_count()
    }
}

impl Default for MatchingEngine {
    fn default() -> Self {
        Self::new()
    }
}


// ── Property-Based Tests ────────────────────────────────────────────
