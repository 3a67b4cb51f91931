//! Single-instrument limit order book and matching engine
//!
//! Accepts resting limit orders and incoming market orders, matches
//! them under price-time priority, and records trades while keeping
//! aggregate depth statistics.
//!
//! **Key invariants:**
//! - Price-time priority strictly enforced: better price first, earlier
//!   arrival first at equal prices
//! - A level's total volume always equals the sum of its resting sizes
//! - Volume is conserved across partial fills
//! - Exhausted price levels are removed the instant they empty
//! - A failed operation leaves the book exactly as it was
//!
//! Limit orders are purely passive here: they rest without crossing
//! against the opposite side on arrival. Matching happens only when a
//! market order aggresses against resting liquidity.

pub mod book;
pub mod engine;
pub mod events;
pub mod time;
pub mod trade_log;

pub use engine::{BookSnapshot, MatchingEngine, OrderBook};
pub use events::{BookEvent, EventSink};
